//! 비콘 파이프라인 설정 구조체.
//!
//! 샘플링 배율, 오버샘플 스펙, 설문/벤치마크 배율 등 페이지뷰 단위
//! 결정에 쓰이는 설정을 정의한다. 호스트가 페이지에 주입하는 JSON
//! 설정 객체를 그대로 역직렬화한다 (키는 camelCase).

use std::collections::HashMap;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================
// 샘플링 배율
// ============================================================

/// 샘플링 배율 — "N분의 1" 확률.
///
/// 유한한 1 이상의 숫자만 샘플링 가능하다. `0`, 결측, 숫자가 아닌 값은
/// 모두 "샘플링하지 않음"으로 수렴한다. `1`은 항상 샘플링.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleFactor(f64);

impl SampleFactor {
    /// 샘플링하지 않는 배율
    pub const NEVER: SampleFactor = SampleFactor(0.0);

    /// 항상 샘플링하는 배율
    pub const ALWAYS: SampleFactor = SampleFactor(1.0);

    /// 배율 생성
    pub fn new(rate: f64) -> Self {
        SampleFactor(rate)
    }

    /// 원시 배율값
    pub fn rate(&self) -> f64 {
        self.0
    }

    /// 샘플링 가능한 배율인지 (유한한 숫자이고 1 이상)
    pub fn is_samplable(&self) -> bool {
        self.0.is_finite() && self.0 >= 1.0
    }

    /// 토큰 모듈러 연산에 쓰는 정수 모집단 크기.
    /// 샘플링 불가능한 배율이면 None.
    pub fn population(&self) -> Option<u32> {
        if !self.is_samplable() {
            return None;
        }
        Some(self.0.round().min(u32::MAX as f64) as u32)
    }
}

impl Default for SampleFactor {
    fn default() -> Self {
        SampleFactor::NEVER
    }
}

impl From<f64> for SampleFactor {
    fn from(rate: f64) -> Self {
        SampleFactor(rate)
    }
}

impl Serialize for SampleFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for SampleFactor {
    /// 숫자가 아닌 설정값(문자열, 불리언, null)은 역직렬화 실패 대신
    /// NEVER로 수렴시킨다. 배율 하나가 잘못돼도 설정 전체를 버리지 않는다.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FactorVisitor;

        impl<'de> Visitor<'de> for FactorVisitor {
            type Value = SampleFactor;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("샘플링 배율 숫자")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(SampleFactor(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(SampleFactor(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(SampleFactor(v as f64))
            }

            fn visit_str<E: de::Error>(self, _v: &str) -> Result<Self::Value, E> {
                Ok(SampleFactor::NEVER)
            }

            fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
                Ok(SampleFactor::NEVER)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(SampleFactor::NEVER)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(SampleFactor::NEVER)
            }

            fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
                Deserialize::deserialize(d)
            }
        }

        deserializer.deserialize_any(FactorVisitor)
    }
}

// ============================================================
// 오버샘플 스펙
// ============================================================

/// 오버샘플 스펙 — 차원별 {값 → 배율} 매핑.
///
/// 각 차원은 독립적으로 평가되며, 한 페이지뷰가 여러 값에 동시에
/// 매칭될 수 있다 (매칭마다 오버샘플 사유 하나).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OversampleSpec {
    /// 지역 코드 → 배율 (정확 일치)
    pub geo: HashMap<String, SampleFactor>,
    /// User-Agent 조각 → 배율 (부분 문자열 포함, 복수 매칭 유지)
    pub user_agent: HashMap<String, SampleFactor>,
    /// 페이지 이름 → 배율 (정확 일치)
    pub page_name: HashMap<String, SampleFactor>,
    /// 위키 식별자 → 배율 (정확 일치)
    pub wiki: HashMap<String, SampleFactor>,
}

impl OversampleSpec {
    /// 어떤 차원에도 항목이 없는지
    pub fn is_empty(&self) -> bool {
        self.geo.is_empty()
            && self.user_agent.is_empty()
            && self.page_name.is_empty()
            && self.wiki.is_empty()
    }
}

// ============================================================
// 비콘 설정
// ============================================================

/// 비콘 파이프라인 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BeaconConfig {
    /// 기본 샘플링 배율 (N분의 1 페이지뷰가 NavigationTiming을 전송)
    pub sampling_factor: SampleFactor,
    /// 오버샘플 스펙 (선택)
    pub oversample_factor: Option<OversampleSpec>,
    /// 성능 설문 샘플링 배율 (익명 사용자)
    pub survey_sampling_factor: SampleFactor,
    /// 성능 설문 샘플링 배율 (로그인 사용자)
    pub survey_authenticated_sampling_factor: SampleFactor,
    /// CPU 마이크로벤치마크 샘플링 배율
    pub cpu_benchmark_sampling_factor: SampleFactor,
    /// 표시할 설문 이름 (없으면 설문 비활성)
    pub survey_name: Option<String>,
}
