//! 요소 타이밍 수집.
//!
//! elementtiming 속성이 달린 요소의 렌더/로드 시각을 엔트리당 한 건씩
//! 내보낸다. 오작동하는 문서가 엔트리를 쏟아내도 상한에서 끊는다.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use pagepulse_core::models::event::schema;
use pagepulse_core::models::timeline::{EntryKind, PerfEntry};
use pagepulse_core::models::vitals::ElementTimingEvent;
use pagepulse_core::ports::sink::EventSink;
use pagepulse_core::ports::timeline::{ObserverHandle, Timeline};

use crate::assembler;
use crate::guard::EmissionGuard;

const CHANNEL_CAPACITY: usize = 32;

/// element 엔트리 스트림 구독. 미지원이면 None.
pub fn spawn(
    timeline: &dyn Timeline,
    sink: Arc<dyn EventSink>,
    guard: Arc<EmissionGuard>,
    token: String,
) -> Option<JoinHandle<()>> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let handle = match timeline.observe(EntryKind::Element, tx) {
        Ok(handle) => handle,
        Err(err) => {
            debug!(%err, "element 엔트리 미지원");
            return None;
        }
    };
    Some(tokio::spawn(drain(rx, handle, sink, guard, token)))
}

async fn drain(
    mut rx: mpsc::Receiver<PerfEntry>,
    handle: Box<dyn ObserverHandle>,
    sink: Arc<dyn EventSink>,
    guard: Arc<EmissionGuard>,
    token: String,
) {
    while let Some(entry) = rx.recv().await {
        let PerfEntry::Element {
            identifier,
            render_time,
            load_time,
        } = entry
        else {
            continue;
        };
        if !guard.count_element() {
            break;
        }

        let payload = ElementTimingEvent {
            pageview_token: token.clone(),
            identifier,
            render_time: render_time.round() as u64,
            load_time: load_time.round() as u64,
        };
        assembler::emit_payload(sink.as_ref(), schema::ELEMENT_TIMING, &payload);
    }
    handle.disconnect();
}
