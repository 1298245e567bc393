//! 페이지 모듈 로더 포트.
//!
//! 구현: 호스트 브리지 (페이지 모듈 로더 바인딩). 로딩 중인 모듈
//! 집합과 모듈별 비동기 대기 프리미티브를 노출한다.

use async_trait::async_trait;

use crate::error::CoreError;

/// 페이지 모듈 로딩 대기 인터페이스
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// 현재 로딩 중인 모듈 이름 목록
    fn pending(&self) -> Vec<String>;

    /// 모듈 집합 일괄 대기.
    /// 하나라도 실패하면 Err — 호출부가 개별 대기로 폴백한다.
    async fn wait_all(&self, modules: &[String]) -> Result<(), CoreError>;

    /// 모듈 하나 대기.
    /// 성공/실패와 무관하게 반드시 완료되어야 한다 (영원히 대기 금지).
    async fn wait(&self, module: &str) -> Result<(), CoreError>;
}
