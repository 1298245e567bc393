//! 성능 타임라인 원시 데이터.
//!
//! 호스트의 성능 타임라인이 넘겨주는 원시 마크와 엔트리. 모든 파생값은
//! navigationStart 기준 오프셋으로만 계산한다 — 절대 타임스탬프를 그대로
//! 내보내는 것은 이 설계가 막아야 하는 버그 유형이다.

use serde::{Deserialize, Serialize};

/// 내비게이션 종류 (W3C PerformanceNavigation type 대응)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationType {
    /// 일반 탐색 (링크 클릭, 주소 입력)
    Navigate,
    /// 새로고침
    Reload,
    /// 뒤로/앞으로 이동
    BackForward,
    /// 그 외 (prerender 등)
    Other,
}

impl NavigationType {
    /// W3C 타입 코드에서 변환
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => NavigationType::Navigate,
            1 => NavigationType::Reload,
            2 => NavigationType::BackForward,
            _ => NavigationType::Other,
        }
    }

    /// 타이밍 스키마 전송 대상이 되는 일반 탐색인지
    pub fn is_regular(&self) -> bool {
        matches!(self, NavigationType::Navigate)
    }
}

/// Navigation Timing 원시 마크 (epoch 기준 ms).
///
/// navigationStart만 필수이고 나머지는 엔진/상황에 따라 결측일 수 있다.
/// secureConnectionStart의 0은 "재사용된 연결"이라는 유효한 값이므로
/// 결측(None)과 구분해 보존한다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationMarks {
    pub navigation_start: f64,
    pub fetch_start: Option<f64>,
    pub domain_lookup_start: Option<f64>,
    pub domain_lookup_end: Option<f64>,
    pub connect_start: Option<f64>,
    pub secure_connection_start: Option<f64>,
    pub connect_end: Option<f64>,
    pub request_start: Option<f64>,
    pub response_start: Option<f64>,
    pub response_end: Option<f64>,
    pub dom_interactive: Option<f64>,
    pub dom_complete: Option<f64>,
    pub load_event_start: Option<f64>,
    pub load_event_end: Option<f64>,
    pub redirect_start: Option<f64>,
    pub redirect_end: Option<f64>,
    pub unload_event_start: Option<f64>,
    pub unload_event_end: Option<f64>,
    /// 레거시 벤더 first-paint 마크 (표준 paint 엔트리 부재 시 폴백)
    pub ms_first_paint: Option<f64>,
}

/// 내비게이션 엔트리의 Server-Timing 항목
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerTimingEntry {
    pub name: String,
    pub duration: f64,
    pub description: Option<String>,
}

/// 현재 페이지뷰의 내비게이션 스냅샷 — 수집 시점의 불변 읽기
#[derive(Debug, Clone)]
pub struct NavigationSnapshot {
    /// 내비게이션 종류
    pub nav_type: NavigationType,
    /// 리다이렉트 횟수
    pub redirect_count: u32,
    /// 원시 타이밍 마크
    pub marks: NavigationMarks,
    /// Server-Timing 항목 (없으면 빈 목록)
    pub server_timing: Vec<ServerTimingEntry>,
}

/// 성능 타임라인 엔트리 종류 (구독/조회 키)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Paint,
    LargestContentfulPaint,
    LayoutShift,
    LongTask,
    FirstInput,
    Element,
    Resource,
    Mark,
    PolicyViolation,
}

/// 성능 타임라인 엔트리.
///
/// 모든 시간 필드는 타임라인 시계 기준 ms (navigationStart = 0).
#[derive(Debug, Clone)]
pub enum PerfEntry {
    Paint {
        /// "first-paint" | "first-contentful-paint"
        name: String,
        start_time: f64,
    },
    LargestContentfulPaint {
        start_time: f64,
        /// 렌더 시각 — 있으면 startTime보다 우선
        render_time: Option<f64>,
    },
    LayoutShift {
        value: f64,
        start_time: f64,
        /// 직전 사용자 입력으로 유발된 이동인지
        had_recent_input: bool,
    },
    LongTask {
        start_time: f64,
        duration: f64,
    },
    FirstInput {
        start_time: f64,
        processing_start: f64,
    },
    Element {
        /// elementtiming 속성값
        identifier: String,
        render_time: f64,
        load_time: f64,
    },
    Resource {
        name: String,
        initiator_type: String,
        start_time: f64,
        duration: f64,
        transfer_size: Option<u64>,
        encoded_body_size: Option<u64>,
        decoded_body_size: Option<u64>,
    },
    Mark {
        name: String,
        start_time: f64,
    },
    PolicyViolation {
        feature_id: String,
        url: String,
        source_file: Option<String>,
        line_number: Option<u32>,
        column_number: Option<u32>,
    },
}

impl PerfEntry {
    /// 엔트리 종류
    pub fn kind(&self) -> EntryKind {
        match self {
            PerfEntry::Paint { .. } => EntryKind::Paint,
            PerfEntry::LargestContentfulPaint { .. } => EntryKind::LargestContentfulPaint,
            PerfEntry::LayoutShift { .. } => EntryKind::LayoutShift,
            PerfEntry::LongTask { .. } => EntryKind::LongTask,
            PerfEntry::FirstInput { .. } => EntryKind::FirstInput,
            PerfEntry::Element { .. } => EntryKind::Element,
            PerfEntry::Resource { .. } => EntryKind::Resource,
            PerfEntry::Mark { .. } => EntryKind::Mark,
            PerfEntry::PolicyViolation { .. } => EntryKind::PolicyViolation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_type_codes() {
        assert_eq!(NavigationType::from_code(0), NavigationType::Navigate);
        assert_eq!(NavigationType::from_code(1), NavigationType::Reload);
        assert_eq!(NavigationType::from_code(2), NavigationType::BackForward);
        assert_eq!(NavigationType::from_code(255), NavigationType::Other);

        assert!(NavigationType::Navigate.is_regular());
        assert!(!NavigationType::Reload.is_regular());
        assert!(!NavigationType::BackForward.is_regular());
    }

    #[test]
    fn perf_entry_kind_mapping() {
        let entry = PerfEntry::LayoutShift {
            value: 0.05,
            start_time: 300.0,
            had_recent_input: false,
        };
        assert_eq!(entry.kind(), EntryKind::LayoutShift);

        let entry = PerfEntry::Mark {
            name: "mwCentralNoticeBanner".into(),
            start_time: 1200.0,
        };
        assert_eq!(entry.kind(), EntryKind::Mark);
    }

    #[test]
    fn marks_deserialize_with_defaults() {
        let json = r#"{ "navigationStart": 100.0, "fetchStart": 200.0 }"#;
        let marks: NavigationMarks = serde_json::from_str(json).unwrap();
        assert_eq!(marks.navigation_start, 100.0);
        assert_eq!(marks.fetch_start, Some(200.0));
        assert!(marks.secure_connection_start.is_none());
    }
}
