//! 텔레메트리 이벤트 엔벨로프.
//!
//! 스키마 이름 + 평탄한 필드 맵. 전송 기회마다 한 번 만들어져 즉시
//! 싱크에 넘겨지고, 보관하거나 재사용하지 않는다.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;

/// 전송 스키마 이름 상수.
/// 수집 백엔드와의 상호운용을 위해 정확한 이름을 유지한다.
pub mod schema {
    pub const NAVIGATION_TIMING: &str = "NavigationTiming";
    pub const SAVE_TIMING: &str = "SaveTiming";
    pub const PAINT_TIMING: &str = "PaintTiming";
    pub const FIRST_INPUT_DELAY: &str = "FirstInputDelay";
    pub const LAYOUT_SHIFT: &str = "LayoutShift";
    pub const ELEMENT_TIMING: &str = "ElementTiming";
    pub const SERVER_TIMING: &str = "ServerTiming";
    pub const RESOURCE_TIMING: &str = "ResourceTiming";
    pub const CENTRAL_NOTICE_TIMING: &str = "CentralNoticeTiming";
    pub const FEATURE_POLICY_VIOLATION: &str = "FeaturePolicyViolation";
    pub const CPU_BENCHMARK: &str = "CpuBenchmark";
}

/// 전송 이벤트 — 스키마 이름과 평탄한 필드 맵
#[derive(Debug, Clone)]
pub struct TelemetryEvent {
    /// 수집 백엔드 스키마 이름
    pub schema: &'static str,
    /// 평탄한 필드 맵 (중첩 객체 없음)
    pub fields: Map<String, Value>,
    /// 이벤트 조립 시각 (싱크의 배치/지연 판단용)
    pub occurred_at: DateTime<Utc>,
}

impl TelemetryEvent {
    /// 직렬화 가능한 페이로드를 평탄한 필드 맵으로 변환해 이벤트 생성.
    /// 페이로드는 최상위가 객체여야 한다.
    pub fn from_payload<T: Serialize>(schema: &'static str, payload: &T) -> Result<Self, CoreError> {
        let value = serde_json::to_value(payload)?;
        let fields = match value {
            Value::Object(map) => map,
            other => {
                return Err(CoreError::Internal(format!(
                    "이벤트 페이로드가 객체가 아님: {other}"
                )))
            }
        };
        Ok(Self {
            schema,
            fields,
            occurred_at: Utc::now(),
        })
    }

    /// 필드값 조회
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
