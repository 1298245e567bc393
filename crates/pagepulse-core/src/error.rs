//! PAGEPULSE 핵심 에러 타입.
//!
//! 파이프라인과 어댑터가 공유하는 에러 정의. 수집기는 에러를 바깥으로
//! 전파하지 않고 로깅 후 해당 데이터 소스만 포기한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 직렬화, 설정, 호스트 API 미지원 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 호스트 환경이 해당 측정 API를 제공하지 않음
    #[error("미지원 API: {0}")]
    Unsupported(String),

    /// 성능 엔트리 구독 실패 (네이티브 observer가 구독 시점에 throw)
    #[error("엔트리 구독 실패 — {kind}: {message}")]
    Observe {
        /// 구독하려던 엔트리 종류
        kind: String,
        /// 실패 사유
        message: String,
    },

    /// 페이지 모듈 로딩 실패
    #[error("모듈 로딩 실패: {0}")]
    ModuleLoad(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
