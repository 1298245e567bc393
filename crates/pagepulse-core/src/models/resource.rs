//! 리소스/서버 계측 전송 페이로드.
//!
//! 대표 이미지 리소스 타이밍, Server-Timing 항목, 중앙 공지 배너 마크,
//! Feature Policy 위반 보고.

use serde::{Deserialize, Serialize};

/// ResourceTiming 스키마 페이로드 — 대표 리소스 한 건
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTimingEvent {
    pub pageview_token: String,
    /// 어떤 대표 리소스인지 ("top-image")
    pub label: String,
    /// 리소스 URL
    pub name: String,
    pub initiator_type: String,
    /// navigationStart 기준 오프셋 (ms)
    pub start_time: u64,
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoded_body_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded_body_size: Option<u64>,
}

/// ServerTiming 스키마 페이로드 — 내비게이션 엔트리의 항목당 한 건
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTimingEvent {
    pub pageview_token: String,
    pub name: String,
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// CentralNoticeTiming 스키마 페이로드 — 배너 스크립트 마크 시각
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentralNoticeTimingEvent {
    pub pageview_token: String,
    /// 배너 마크의 navigationStart 기준 오프셋 (ms)
    pub time: u64,
}

/// FeaturePolicyViolation 스키마 페이로드 — 위반당 한 건, 상한 20건
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturePolicyViolationEvent {
    pub pageview_token: String,
    pub feature_id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_number: Option<u32>,
}
