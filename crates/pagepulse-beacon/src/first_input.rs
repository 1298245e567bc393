//! 첫 입력 지연 수집.
//!
//! first-input 엔트리는 페이지뷰당 하나만 의미가 있다. 첫 엔트리를
//! 받으면 바로 구독을 끊고, 가드로 재전송을 막는다.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use pagepulse_core::models::event::schema;
use pagepulse_core::models::timeline::{EntryKind, PerfEntry};
use pagepulse_core::models::vitals::FirstInputDelayEvent;
use pagepulse_core::ports::sink::EventSink;
use pagepulse_core::ports::timeline::{ObserverHandle, Timeline};

use crate::assembler;
use crate::guard::EmissionGuard;

const CHANNEL_CAPACITY: usize = 8;

/// first-input 스트림 구독. 미지원이면 None.
pub fn spawn(
    timeline: &dyn Timeline,
    sink: Arc<dyn EventSink>,
    guard: Arc<EmissionGuard>,
    token: String,
) -> Option<JoinHandle<()>> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let handle = match timeline.observe(EntryKind::FirstInput, tx) {
        Ok(handle) => handle,
        Err(err) => {
            debug!(%err, "first-input 엔트리 미지원");
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
        let PerfEntry::FirstInput {
            start_time,
            processing_start,
        } = entry
        else {
            continue;
        };

        let delay = processing_start - start_time;
        if delay >= 0.0 && guard.begin_first_input() {
            let payload = FirstInputDelayEvent {
                pageview_token: token.clone(),
                input_delay: delay.round() as u64,
            };
            assembler::emit_payload(sink.as_ref(), schema::FIRST_INPUT_DELAY, &payload);
        }
        // 첫 엔트리로 끝 — 이후 입력은 관심 대상이 아니다
        break;
    }
    handle.disconnect();
}
