//! 샘플링 엔진.
//!
//! 배율을 불리언 결정으로 바꾸는 두 전략을 제공한다.
//!
//! - 무작위: 균등 난수 한 번 — OS 암호학적 RNG 우선, 스레드 PRNG 폴백
//! - 결정적: 페이지뷰 토큰 기반 — 같은 페이지뷰에서는 언제 다시 물어도
//!   같은 답을 준다 (모듈 정착 이후의 재확인이 앞선 결정과 일치해야 함)

use rand::rngs::OsRng;
use rand::{RngCore, TryRngCore};
use tracing::debug;

use pagepulse_core::config::SampleFactor;

/// 페이지뷰 토큰 길이 (소문자 hex)
const TOKEN_LEN: usize = 20;
/// 토큰에서 샘플링에 쓰는 hex 접두부 길이
const TOKEN_PREFIX_LEN: usize = 8;

/// 무작위 샘플링 — "N분의 1" 확률로 true.
/// 배율이 샘플링 불가능하면 (1 미만, 숫자 아님) 항상 false.
pub fn in_sample(factor: SampleFactor) -> bool {
    in_sample_from(entropy_draw(), factor)
}

/// 고정된 난수값으로 샘플링 판정 (순수 함수, 테스트 주입점)
pub fn in_sample_from(draw: f64, factor: SampleFactor) -> bool {
    if !factor.is_samplable() {
        return false;
    }
    (draw * factor.rate()).floor() == 0.0
}

/// 토큰 기반 결정적 샘플링.
///
/// 토큰 앞 8자리 hex를 u32로 읽어 모집단 크기로 나눈 나머지가 0인지
/// 본다. 같은 토큰이면 항상 같은 답. 형식이 어긋난 토큰은 절대
/// 샘플에 들지 않는다.
pub fn token_in_sample(token: &str, factor: SampleFactor) -> bool {
    let Some(population) = factor.population() else {
        return false;
    };
    let Some(prefix) = token.get(0..TOKEN_PREFIX_LEN) else {
        debug!("페이지뷰 토큰이 너무 짧음: {}자", token.len());
        return false;
    };
    let Ok(value) = u32::from_str_radix(prefix, 16) else {
        debug!("페이지뷰 토큰 hex 해석 실패: {prefix}");
        return false;
    };
    value % population == 0
}

/// 페이지뷰 토큰 생성 — 20자리 소문자 hex.
/// 호스트가 토큰을 발급하지 않을 때 파이프라인이 대신 만든다.
pub fn generate_token() -> String {
    use std::fmt::Write;

    let mut bytes = [0u8; TOKEN_LEN / 2];
    if OsRng.try_fill_bytes(&mut bytes).is_err() {
        rand::rng().fill_bytes(&mut bytes);
    }
    let mut token = String::with_capacity(TOKEN_LEN);
    for byte in bytes {
        let _ = write!(token, "{byte:02x}");
    }
    token
}

/// 균등 난수 [0,1).
/// 2^32로 나눠 1.0이 나오지 않게 한다 — 배율 1은 항상 샘플에 들어야 한다.
pub fn entropy_draw() -> f64 {
    entropy_u32() as f64 / (u32::MAX as f64 + 1.0)
}

/// OS 암호학적 RNG 우선, 실패 시 스레드 PRNG 폴백
fn entropy_u32() -> u32 {
    match OsRng.try_next_u32() {
        Ok(value) => value,
        Err(_) => rand::rng().next_u32(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsamplable_factors_never_sample() {
        for draw in [0.0, 0.5, 0.999] {
            assert!(!in_sample_from(draw, SampleFactor::new(0.0)));
            assert!(!in_sample_from(draw, SampleFactor::new(0.9)));
            assert!(!in_sample_from(draw, SampleFactor::new(-5.0)));
            assert!(!in_sample_from(draw, SampleFactor::new(f64::NAN)));
            assert!(!in_sample_from(draw, SampleFactor::new(f64::INFINITY)));
        }
    }

    #[test]
    fn factor_one_always_samples() {
        for draw in [0.0, 0.25, 0.5, 0.999_999] {
            assert!(in_sample_from(draw, SampleFactor::ALWAYS));
        }
        // 실제 난수 경로에서도 배율 1은 항상 true
        for _ in 0..1_000 {
            assert!(in_sample(SampleFactor::ALWAYS));
        }
    }

    #[test]
    fn fixed_draw_is_deterministic() {
        // draw 0.99 × 배율 2 → floor(1.98) = 1 → false
        assert!(!in_sample_from(0.99, SampleFactor::new(2.0)));
        // draw 0.01 × 배율 2 → floor(0.02) = 0 → true
        assert!(in_sample_from(0.01, SampleFactor::new(2.0)));
        // 같은 입력은 언제나 같은 결과
        for _ in 0..100 {
            assert!(in_sample_from(0.01, SampleFactor::new(2.0)));
        }
    }

    #[test]
    fn token_sampling_is_stable() {
        // 접두부 00000000 → 값 0 → 모든 모집단에서 0 % n == 0
        let token = "00000000abcdef012345";
        for _ in 0..50 {
            assert!(token_in_sample(token, SampleFactor::new(7.0)));
        }
        // 접두부 00000001 → 값 1 → 모집단 2에서는 탈락
        let token = "00000001abcdef012345";
        for _ in 0..50 {
            assert!(!token_in_sample(token, SampleFactor::new(2.0)));
        }
    }

    #[test]
    fn token_sampling_rejects_malformed_tokens() {
        assert!(!token_in_sample("", SampleFactor::ALWAYS));
        assert!(!token_in_sample("abc", SampleFactor::ALWAYS));
        assert!(!token_in_sample("zzzzzzzz0123456789ab", SampleFactor::ALWAYS));
    }

    #[test]
    fn token_sampling_respects_factor_rules() {
        let token = "00000000abcdef012345";
        assert!(!token_in_sample(token, SampleFactor::new(0.0)));
        assert!(!token_in_sample(token, SampleFactor::new(0.5)));
        assert!(!token_in_sample(token, SampleFactor::new(f64::NAN)));
    }

    #[test]
    fn generated_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 20);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        // 생성된 토큰은 토큰 샘플링 입력으로 바로 쓸 수 있다
        let _ = token_in_sample(&token, SampleFactor::ALWAYS);
        // 두 토큰이 같을 확률은 무시할 수 있다
        assert_ne!(generate_token(), generate_token());
    }
}
