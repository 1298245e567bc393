//! 웹 바이탈 계열 전송 페이로드.
//!
//! 페인트 마크, 첫 입력 지연, 레이아웃 이동, 요소 타이밍, CPU 벤치마크.
//! 좁은 스키마들이며 전부 pageviewToken으로 페이지뷰에 귀속된다.

use serde::{Deserialize, Serialize};

/// PaintTiming 스키마 페이로드 — 페인트 마크당 한 건
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintTimingEvent {
    pub pageview_token: String,
    /// "first-paint" | "first-contentful-paint"
    pub name: String,
    /// navigationStart 기준 오프셋 (ms)
    pub start_time: u64,
    pub is_oversample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oversample_reason: Option<String>,
}

/// FirstInputDelay 스키마 페이로드 — 페이지뷰당 최대 한 건
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstInputDelayEvent {
    pub pageview_token: String,
    /// processingStart − startTime (ms)
    pub input_delay: u64,
}

/// LayoutShift 스키마 페이로드 — 엔트리당 한 건, 상한 20건
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutShiftEvent {
    pub pageview_token: String,
    pub value: f64,
    pub start_time: u64,
}

/// ElementTiming 스키마 페이로드 — 엔트리당 한 건, 상한 20건
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementTimingEvent {
    pub pageview_token: String,
    /// elementtiming 속성값
    pub identifier: String,
    pub render_time: u64,
    pub load_time: u64,
}

/// CpuBenchmark 스키마 페이로드 — 페이지뷰당 최대 한 건
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuBenchmarkEvent {
    pub pageview_token: String,
    /// 고정 작업 루프의 경과 시간 (ms)
    pub score: u64,
    /// 배터리 잔량 0.0~1.0 (호스트가 노출할 때만)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f64>,
}
