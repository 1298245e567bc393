//! 이벤트 싱크 포트.
//!
//! 구현: 호스트 브리지의 전송 큐. 파이프라인이 바깥 세계로 내보내는
//! 유일한 호출이다. fire-and-forget이며 스키마 간 순서를 보장하지
//! 않는다. 전송 실패/재시도는 싱크 소관이고 코어로 돌아오지 않는다.

use crate::models::event::TelemetryEvent;

/// 텔레메트리 이벤트 싱크
pub trait EventSink: Send + Sync {
    /// 이벤트 한 건 전송 (fire-and-forget)
    fn emit(&self, event: TelemetryEvent);
}
