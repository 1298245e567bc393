//! 클라이언트 환경 포트.
//!
//! 구현: 호스트 브리지. User-Agent, 지역 코드, 네트워크/기기 정보,
//! 배터리 상태를 노출한다. 값이 없는 환경은 전부 None.

use async_trait::async_trait;

/// 클라이언트 환경 조회 인터페이스
#[async_trait]
pub trait ClientEnv: Send + Sync {
    /// User-Agent 문자열
    fn user_agent(&self) -> Option<String>;

    /// 지역 기반 오버샘플에 쓰는 해석된 지역 코드 ("KR" 등)
    fn geo_country(&self) -> Option<String>;

    /// 유효 연결 종류 ("4g" 등, Network Information API)
    fn connection_type(&self) -> Option<String>;

    /// 기기 메모리 (GiB 단위 근사값)
    fn device_memory(&self) -> Option<f64>;

    /// 배터리 잔량 0.0~1.0.
    /// 배터리 API는 비동기이며 미지원/전원 연결 환경이면 None.
    async fn battery_level(&self) -> Option<f64>;
}
