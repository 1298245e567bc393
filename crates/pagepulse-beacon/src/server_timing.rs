//! Server-Timing 수집.
//!
//! 내비게이션 엔트리에 실려 온 Server-Timing 항목을 항목당 한 건의
//! 이벤트로 변환한다. 항목이 없으면 아무것도 내지 않는다.

use pagepulse_core::models::resource::ServerTimingEvent;
use pagepulse_core::models::timeline::ServerTimingEntry;

/// Server-Timing 항목당 한 건의 페이로드
pub fn server_timing_events(entries: &[ServerTimingEntry], token: &str) -> Vec<ServerTimingEvent> {
    entries
        .iter()
        .map(|entry| ServerTimingEvent {
            pageview_token: token.to_string(),
            name: entry.name.clone(),
            duration: entry.duration,
            description: entry.description.clone(),
        })
        .collect()
}
