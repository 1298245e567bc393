//! Feature Policy 위반 보고 수집.
//!
//! 위반 보고를 건당 한 건씩 내보내되 상한에서 끊는다. 같은 기능을
//! 반복 호출하는 문서가 보고를 무한정 만들 수 있기 때문이다.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use pagepulse_core::models::event::schema;
use pagepulse_core::models::resource::FeaturePolicyViolationEvent;
use pagepulse_core::models::timeline::{EntryKind, PerfEntry};
use pagepulse_core::ports::sink::EventSink;
use pagepulse_core::ports::timeline::{ObserverHandle, Timeline};

use crate::assembler;
use crate::guard::EmissionGuard;

const CHANNEL_CAPACITY: usize = 32;

/// 위반 보고 스트림 구독. 미지원이면 None.
pub fn spawn(
    timeline: &dyn Timeline,
    sink: Arc<dyn EventSink>,
    guard: Arc<EmissionGuard>,
    token: String,
) -> Option<JoinHandle<()>> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let handle = match timeline.observe(EntryKind::PolicyViolation, tx) {
        Ok(handle) => handle,
        Err(err) => {
            debug!(%err, "feature policy 위반 보고 미지원");
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
        let PerfEntry::PolicyViolation {
            feature_id,
            url,
            source_file,
            line_number,
            column_number,
        } = entry
        else {
            continue;
        };
        if !guard.count_policy_violation() {
            break;
        }

        let payload = FeaturePolicyViolationEvent {
            pageview_token: token.clone(),
            feature_id,
            url,
            source_file,
            line_number,
            column_number,
        };
        assembler::emit_payload(sink.as_ref(), schema::FEATURE_POLICY_VIOLATION, &payload);
    }
    handle.disconnect();
}
