//! 오버샘플 차원 평가.
//!
//! 차원 매칭은 (라이브 컨텍스트, 스펙)의 순수 함수이고, 배율 추첨은
//! 매칭 결과에 따로 적용한다. 여러 차원·여러 값이 동시에 매칭될 수
//! 있으며 전부 유지된다 (first-match-wins 아님).

use std::collections::HashMap;

use pagepulse_core::config::{OversampleSpec, SampleFactor};

use crate::sampling;

/// 오버샘플 평가에 쓰는 라이브 컨텍스트
#[derive(Debug, Clone, Default)]
pub struct OversampleContext {
    pub geo_country: Option<String>,
    pub user_agent: Option<String>,
    pub page_name: String,
    pub wiki: String,
}

/// 매칭된 차원 값 하나 (사유 라벨 + 적용할 배율)
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionMatch {
    /// "geo:KR", "ua:Chrome" 형태의 사유 라벨
    pub reason: String,
    pub factor: SampleFactor,
}

/// 지역 차원 매칭 — 해석된 지역 코드의 정확 일치
pub fn geo_matches(
    dimension: &HashMap<String, SampleFactor>,
    live: Option<&str>,
) -> Vec<(String, SampleFactor)> {
    let Some(geo) = live else {
        return Vec::new();
    };
    match dimension.get(geo) {
        Some(factor) => vec![(geo.to_string(), *factor)],
        None => Vec::new(),
    }
}

/// User-Agent 차원 매칭 — 설정된 조각의 부분 문자열 포함.
/// 매칭되는 조각을 전부 반환한다.
pub fn ua_matches(
    dimension: &HashMap<String, SampleFactor>,
    live: Option<&str>,
) -> Vec<(String, SampleFactor)> {
    let Some(ua) = live else {
        return Vec::new();
    };
    dimension
        .iter()
        .filter(|(fragment, _)| ua.contains(fragment.as_str()))
        .map(|(fragment, factor)| (fragment.clone(), *factor))
        .collect()
}

/// 식별자 차원 매칭 — pageName/wiki의 정확 일치
pub fn exact_matches(
    dimension: &HashMap<String, SampleFactor>,
    live: &str,
) -> Vec<(String, SampleFactor)> {
    match dimension.get(live) {
        Some(factor) => vec![(live.to_string(), *factor)],
        None => Vec::new(),
    }
}

/// 전체 차원 매칭 — 사유 라벨을 접두사와 함께 구성
pub fn matched_dimensions(spec: &OversampleSpec, ctx: &OversampleContext) -> Vec<DimensionMatch> {
    let mut matches = Vec::new();

    for (value, factor) in geo_matches(&spec.geo, ctx.geo_country.as_deref()) {
        matches.push(DimensionMatch {
            reason: format!("geo:{value}"),
            factor,
        });
    }
    for (value, factor) in ua_matches(&spec.user_agent, ctx.user_agent.as_deref()) {
        matches.push(DimensionMatch {
            reason: format!("ua:{value}"),
            factor,
        });
    }
    for (value, factor) in exact_matches(&spec.page_name, &ctx.page_name) {
        matches.push(DimensionMatch {
            reason: format!("pagename:{value}"),
            factor,
        });
    }
    for (value, factor) in exact_matches(&spec.wiki, &ctx.wiki) {
        matches.push(DimensionMatch {
            reason: format!("wiki:{value}"),
            factor,
        });
    }
    matches
}

/// 매칭된 차원마다 배율 추첨을 적용해 최종 사유 목록을 만든다.
/// `sampler`는 테스트에서 결정적 추첨으로 바꿔 끼울 수 있다.
pub fn draw_reasons(
    matches: Vec<DimensionMatch>,
    mut sampler: impl FnMut(SampleFactor) -> bool,
) -> Vec<String> {
    matches
        .into_iter()
        .filter(|m| sampler(m.factor))
        .map(|m| m.reason)
        .collect()
}

/// 오버샘플 사유 수집 (무작위 추첨 경로)
pub fn collect_reasons(spec: &OversampleSpec, ctx: &OversampleContext) -> Vec<String> {
    draw_reasons(matched_dimensions(spec, ctx), sampling::in_sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo_spec(pairs: &[(&str, f64)]) -> HashMap<String, SampleFactor> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), SampleFactor::new(*v)))
            .collect()
    }

    #[test]
    fn geo_exact_membership() {
        let dimension = geo_spec(&[("XX", 1.0)]);
        assert_eq!(
            geo_matches(&dimension, Some("XX")),
            vec![("XX".to_string(), SampleFactor::ALWAYS)]
        );
        assert!(geo_matches(&dimension, Some("US")).is_empty());
        assert!(geo_matches(&dimension, None).is_empty());
        assert!(geo_matches(&HashMap::new(), Some("XX")).is_empty());
    }

    #[test]
    fn ua_substring_keeps_all_matches() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/126.0 Safari/537.36";
        let mut dimension = HashMap::new();
        dimension.insert("Chrome".to_string(), SampleFactor::ALWAYS);
        dimension.insert("AppleWebKit".to_string(), SampleFactor::ALWAYS);
        dimension.insert("MSIE".to_string(), SampleFactor::ALWAYS);

        let mut matched: Vec<String> = ua_matches(&dimension, Some(ua))
            .into_iter()
            .map(|(value, _)| value)
            .collect();
        matched.sort();
        // 매칭되는 조각 둘 다 유지
        assert_eq!(matched, vec!["AppleWebKit", "Chrome"]);
    }

    #[test]
    fn reasons_carry_dimension_prefix() {
        let mut spec = OversampleSpec::default();
        spec.geo.insert("KR".into(), SampleFactor::ALWAYS);
        spec.user_agent.insert("Chrome".into(), SampleFactor::ALWAYS);
        spec.wiki.insert("kowiki".into(), SampleFactor::ALWAYS);
        spec.page_name.insert("대문".into(), SampleFactor::ALWAYS);

        let ctx = OversampleContext {
            geo_country: Some("KR".into()),
            user_agent: Some("Chrome/126.0".into()),
            page_name: "대문".into(),
            wiki: "kowiki".into(),
        };

        let reasons = collect_reasons(&spec, &ctx);
        assert_eq!(reasons.len(), 4);
        assert!(reasons.contains(&"geo:KR".to_string()));
        assert!(reasons.contains(&"ua:Chrome".to_string()));
        assert!(reasons.contains(&"pagename:대문".to_string()));
        assert!(reasons.contains(&"wiki:kowiki".to_string()));
    }

    #[test]
    fn empty_spec_yields_no_reasons() {
        let ctx = OversampleContext {
            geo_country: Some("KR".into()),
            user_agent: Some("Chrome".into()),
            page_name: "대문".into(),
            wiki: "kowiki".into(),
        };
        assert!(collect_reasons(&OversampleSpec::default(), &ctx).is_empty());
    }

    #[test]
    fn draw_filters_by_factor() {
        let matches = vec![
            DimensionMatch {
                reason: "geo:KR".into(),
                factor: SampleFactor::ALWAYS,
            },
            DimensionMatch {
                reason: "ua:Chrome".into(),
                factor: SampleFactor::new(1_000_000.0),
            },
        ];
        // 추첨을 결정적으로 바꿔 배율 1만 통과시킨다
        let reasons = draw_reasons(matches, |factor| factor.rate() == 1.0);
        assert_eq!(reasons, vec!["geo:KR"]);
    }

    #[test]
    fn unsamplable_factor_never_contributes() {
        let mut spec = OversampleSpec::default();
        spec.geo.insert("KR".into(), SampleFactor::new(0.0));
        let ctx = OversampleContext {
            geo_country: Some("KR".into()),
            ..Default::default()
        };
        // 매칭은 되지만 배율 0 추첨에서 전부 탈락
        assert_eq!(matched_dimensions(&spec, &ctx).len(), 1);
        assert!(collect_reasons(&spec, &ctx).is_empty());
    }
}
