//! 페이지 수명주기 포트.
//!
//! 구현: 호스트 브리지 (문서 이벤트 바인딩). 페이지 식별 정보,
//! 로드 이벤트 대기, 가시성 변화를 노출한다.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::models::page::{PageInfo, ReadyState};

/// 현재 페이지뷰의 호스트 인터페이스
#[async_trait]
pub trait PageHost: Send + Sync {
    /// 페이지 식별 스냅샷
    fn info(&self) -> PageInfo;

    /// 호스트가 발급한 페이지뷰 토큰 (20자리 hex).
    /// 없으면 파이프라인이 직접 생성해 페이지뷰 동안 유지한다.
    fn pageview_token(&self) -> Option<String>;

    /// 문서 로딩 상태
    fn ready_state(&self) -> ReadyState;

    /// 페이지 load 이벤트 대기.
    /// 이미 발생했다면 즉시 반환한다.
    async fn wait_load(&self);

    /// 탭 가시성 watch 채널 (값: hidden 여부).
    /// 가시성 API 미지원 환경이면 None — 항상 보이는 것으로 간주한다.
    fn visibility(&self) -> Option<watch::Receiver<bool>>;
}

/// 성능 설문 표시 요청 포트.
/// 설문 UI 자체는 호스트 소관이고, 파이프라인은 요청만 전달한다.
pub trait SurveyPresenter: Send + Sync {
    /// 설문 표시 요청 (fire-and-forget)
    fn show_survey(&self, name: &str);
}
