//! NavigationTiming / SaveTiming 전송 페이로드.
//!
//! 수집 백엔드 스키마와 필드 이름이 일치해야 하므로 serde rename을
//! 통해 정확한 camelCase 이름으로 직렬화한다. 결측 필드는 맵에서
//! 통째로 빠진다 (0이나 null로 채우지 않음).

use serde::{Deserialize, Serialize};

/// Navigation Timing 파생 필드 — 전부 navigationStart 기준 오프셋(ms).
///
/// `redirecting`/`unload`는 해당 이벤트가 없으면 0으로 전송한다.
/// `secure_connection_start`의 0은 재사용된 연결을 뜻하는 유효값.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavTimingFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_start: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_start: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_connection_start: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_end: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_start: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_start: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_end: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dom_interactive: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dom_complete: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_event_start: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_event_end: Option<u64>,
    /// domainLookupEnd − domainLookupStart
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_lookup: Option<u64>,
    /// 리다이렉트에 쓰인 시간 (없으면 0)
    pub redirecting: u64,
    /// 리다이렉트가 있었을 때만 전송
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_count: Option<u32>,
    /// 이전 문서 unload에 쓰인 시간 (없으면 0)
    pub unload: u64,
    /// 명명된 단계에 속하지 않는 유휴 구간 합
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gaps: Option<u64>,
}

/// NavigationTiming 스키마 페이로드
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationTimingEvent {
    pub pageview_token: String,
    pub media_wiki_version: String,
    pub is_anon: bool,
    pub is_oversample: bool,
    /// 매칭된 오버샘플 사유 배열의 JSON 문자열
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oversample_reason: Option<String>,
    /// 특수 문서 이름 — namespaceId/revId/action과 상호 배타
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mw_special_page_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rev_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_mode: Option<String>,
    /// 페이지 모듈이 정착한 시각 (타임라인 시계 기준 ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_wiki_load_end: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netinfo_effective_connection_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_memory: Option<f64>,
    /// Navigation Timing 파생 오프셋
    #[serde(flatten)]
    pub timing: NavTimingFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_paint: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative_layout_shift: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest_contentful_paint: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_task_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_task_total_duration: Option<u64>,
}

/// SaveTiming 스키마 페이로드 — 문서 저장 직후 페이지뷰에서만 전송
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTimingEvent {
    pub media_wiki_version: String,
    /// responseStart − navigationStart
    pub save_timing: u64,
}
