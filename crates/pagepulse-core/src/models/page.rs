//! 페이지 식별 스냅샷.
//!
//! 호스트 브리지가 페이지뷰 시작 시점에 채워 주는 페이지 정보.
//! 파이프라인은 이 스냅샷을 읽기만 한다.

use serde::{Deserialize, Serialize};

/// 현재 페이지뷰의 식별 정보
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    /// 플랫폼 버전 문자열 (NavigationTiming의 mediaWikiVersion으로 전송)
    pub platform_version: String,
    /// 위키 식별자 (dbname)
    pub wiki: String,
    /// 페이지 이름
    pub page_name: String,
    /// 네임스페이스 ID (특수 문서에서는 없음)
    pub namespace_id: Option<i32>,
    /// 리비전 ID (특수 문서에서는 없음)
    pub rev_id: Option<u64>,
    /// 현재 액션 (view, edit 등 — 특수 문서에서는 없음)
    pub action: Option<String>,
    /// 특수 문서 이름 (일반 문서에서는 없음)
    pub special_page: Option<String>,
    /// 대문 여부
    pub is_main_page: bool,
    /// 일반 문서(article) 여부
    pub is_article: bool,
    /// 모바일 렌더링 모드 라벨 (데스크톱 모드면 전송하지 않음)
    pub mobile_mode: Option<String>,
    /// 문서 대표 이미지 URL (ResourceTiming 수집 대상)
    pub lead_image_url: Option<String>,
    /// 로그인 사용자 ID (익명이면 없음)
    pub user_id: Option<u64>,
    /// 직전 행위가 문서 저장이었음을 알리는 마커 (SaveTiming 트리거)
    pub post_edit: bool,
}

impl PageInfo {
    /// 익명 사용자 여부
    pub fn is_anon(&self) -> bool {
        self.user_id.is_none()
    }
}

/// 문서 로딩 상태 (document.readyState 대응)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anon_when_no_user_id() {
        let mut info = PageInfo::default();
        assert!(info.is_anon());

        info.user_id = Some(99);
        assert!(!info.is_anon());
    }

    #[test]
    fn page_info_from_host_json() {
        let json = r#"{
            "platformVersion": "1.43.0",
            "wiki": "kowiki",
            "pageName": "대문",
            "namespaceId": 0,
            "revId": 12345,
            "action": "view",
            "isMainPage": true,
            "isArticle": true
        }"#;
        let info: PageInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.wiki, "kowiki");
        assert_eq!(info.namespace_id, Some(0));
        assert!(info.special_page.is_none());
        assert!(!info.post_edit);
    }
}
