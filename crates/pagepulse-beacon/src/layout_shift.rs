//! 레이아웃 이동 수집.
//!
//! 두 경로를 제공한다: 본 이벤트에 얹을 윈도우-세션 CLS 집계와,
//! 엔트리당 한 건씩 내보내는 상한부 스트림. 직전 사용자 입력으로
//! 유발된 이동은 두 경로 모두에서 제외한다.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use pagepulse_core::models::event::schema;
use pagepulse_core::models::timeline::{EntryKind, PerfEntry};
use pagepulse_core::models::vitals::LayoutShiftEvent;
use pagepulse_core::ports::sink::EventSink;
use pagepulse_core::ports::timeline::{ObserverHandle, Timeline};

use crate::assembler;
use crate::guard::EmissionGuard;

/// 세션 최대 길이 — 초과 시 새 세션 시작
pub const SESSION_WINDOW_MS: f64 = 5_000.0;
/// 직전 엔트리와의 최대 간격 — 초과 시 새 세션 시작
pub const SESSION_GAP_MS: f64 = 1_000.0;
/// 노이즈 한계 — 미만이면 0으로 클램프
pub const NOISE_FLOOR: f64 = 0.01;

const CHANNEL_CAPACITY: usize = 32;

/// 윈도우-세션 CLS 점수.
///
/// 엔트리를 세션 누계로 합산하되 세션 시작 후 5초 초과 또는 직전
/// 엔트리 후 1초 초과면 세션을 새로 연다. 최종 점수는 세션 누계의
/// 최대값을 소수 셋째 자리로 반올림한 값이다.
pub fn cumulative_score(entries: &[PerfEntry]) -> f64 {
    let mut max = 0.0_f64;
    let mut current = 0.0_f64;
    let mut session_start = f64::NEG_INFINITY;
    let mut previous = f64::NEG_INFINITY;

    for entry in entries {
        let PerfEntry::LayoutShift {
            value,
            start_time,
            had_recent_input,
        } = entry
        else {
            continue;
        };
        if *had_recent_input {
            continue;
        }

        if start_time - session_start > SESSION_WINDOW_MS || start_time - previous > SESSION_GAP_MS
        {
            session_start = *start_time;
            current = 0.0;
        }
        previous = *start_time;
        current += value;
        max = max.max(current);
    }

    let rounded = (max * 1000.0).round() / 1000.0;
    if rounded < NOISE_FLOOR {
        0.0
    } else {
        rounded
    }
}

/// 레이아웃 이동 스트림 구독.
///
/// 구독 실패는 미지원으로 취급해 여기서만 처리하고 전파하지 않는다.
pub fn spawn(
    timeline: &dyn Timeline,
    sink: Arc<dyn EventSink>,
    guard: Arc<EmissionGuard>,
    token: String,
) -> Option<JoinHandle<()>> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let handle = match timeline.observe(EntryKind::LayoutShift, tx) {
        Ok(handle) => handle,
        Err(err) => {
            debug!(%err, "layout-shift 엔트리 미지원");
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
        let PerfEntry::LayoutShift {
            value,
            start_time,
            had_recent_input,
        } = entry
        else {
            continue;
        };
        if had_recent_input {
            continue;
        }
        if !guard.count_layout_shift() {
            // 상한 도달 — 이후 엔트리는 받지 않는다
            break;
        }

        let payload = LayoutShiftEvent {
            pageview_token: token.clone(),
            value,
            start_time: start_time.round() as u64,
        };
        assembler::emit_payload(sink.as_ref(), schema::LAYOUT_SHIFT, &payload);
    }
    handle.disconnect();
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use parking_lot::Mutex;

    use pagepulse_core::error::CoreError;
    use pagepulse_core::models::event::TelemetryEvent;
    use pagepulse_core::models::timeline::NavigationSnapshot;

    use super::*;

    fn shift(value: f64, start_time: f64) -> PerfEntry {
        PerfEntry::LayoutShift {
            value,
            start_time,
            had_recent_input: false,
        }
    }

    #[test]
    fn empty_entries_score_zero() {
        assert_eq!(cumulative_score(&[]), 0.0);
    }

    #[test]
    fn single_session_sums_values() {
        let entries = [shift(0.05, 0.0), shift(0.02, 500.0), shift(0.03, 900.0)];
        assert_eq!(cumulative_score(&entries), 0.1);
    }

    #[test]
    fn session_resets_after_quiet_gap() {
        // 1초 넘는 공백 — 두 번째 엔트리는 새 세션
        let entries = [shift(0.2, 0.0), shift(0.05, 1_500.0)];
        assert_eq!(cumulative_score(&entries), 0.2);
    }

    #[test]
    fn session_resets_after_window_limit() {
        // 간격은 1초 이하지만 세션 시작 후 5초를 넘기는 지점에서 리셋
        let entries = [
            shift(0.1, 0.0),
            shift(0.1, 900.0),
            shift(0.1, 1_800.0),
            shift(0.1, 2_700.0),
            shift(0.1, 3_600.0),
            shift(0.1, 4_500.0),
            shift(0.1, 5_400.0),
        ];
        assert_eq!(cumulative_score(&entries), 0.6);
    }

    #[test]
    fn max_session_wins() {
        let entries = [
            shift(0.1, 0.0),
            shift(0.1, 800.0),
            // 새 세션 — 누계가 더 크다
            shift(0.3, 3_000.0),
            shift(0.2, 3_500.0),
        ];
        assert_eq!(cumulative_score(&entries), 0.5);
    }

    #[test]
    fn recent_input_shifts_are_excluded() {
        let entries = [
            shift(0.02, 0.0),
            PerfEntry::LayoutShift {
                value: 1.0,
                start_time: 100.0,
                had_recent_input: true,
            },
            shift(0.03, 200.0),
        ];
        assert_eq!(cumulative_score(&entries), 0.05);
    }

    #[test]
    fn noise_floor_clamps_to_zero() {
        let entries = [shift(0.005, 0.0)];
        assert_eq!(cumulative_score(&entries), 0.0);
    }

    #[test]
    fn score_rounds_to_three_decimals() {
        let entries = [shift(0.123456, 0.0)];
        assert_eq!(cumulative_score(&entries), 0.123);
    }

    // ==================== 스트림 테스트 ====================

    struct StubHandle(Arc<AtomicBool>);

    impl ObserverHandle for StubHandle {
        fn disconnect(&self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    struct ObservableTimeline {
        slot: Mutex<Option<mpsc::Sender<PerfEntry>>>,
        disconnected: Arc<AtomicBool>,
        supported: bool,
    }

    impl ObservableTimeline {
        fn supported() -> Self {
            Self {
                slot: Mutex::new(None),
                disconnected: Arc::new(AtomicBool::new(false)),
                supported: true,
            }
        }

        fn unsupported() -> Self {
            Self {
                supported: false,
                ..Self::supported()
            }
        }

        /// 구독 시 넘겨받은 송신단을 꺼낸다 (테스트가 직접 엔트리 주입)
        fn take_sender(&self) -> mpsc::Sender<PerfEntry> {
            self.slot.lock().take().unwrap()
        }
    }

    impl Timeline for ObservableTimeline {
        fn navigation(&self) -> Option<NavigationSnapshot> {
            None
        }

        fn now(&self) -> Option<f64> {
            None
        }

        fn entries(&self, _kind: EntryKind) -> Vec<PerfEntry> {
            Vec::new()
        }

        fn observe(
            &self,
            _kind: EntryKind,
            tx: mpsc::Sender<PerfEntry>,
        ) -> Result<Box<dyn ObserverHandle>, CoreError> {
            if !self.supported {
                return Err(CoreError::Observe {
                    kind: "layout-shift".into(),
                    message: "지원하지 않는 엔트리 종류".into(),
                });
            }
            *self.slot.lock() = Some(tx);
            Ok(Box::new(StubHandle(Arc::clone(&self.disconnected))))
        }
    }

    #[derive(Default)]
    struct CapturingSink(Mutex<Vec<TelemetryEvent>>);

    impl EventSink for CapturingSink {
        fn emit(&self, event: TelemetryEvent) {
            self.0.lock().push(event);
        }
    }

    #[tokio::test]
    async fn stream_emits_one_event_per_entry() {
        let timeline = ObservableTimeline::supported();
        let sink = Arc::new(CapturingSink::default());
        let guard = Arc::new(EmissionGuard::default());

        let task = spawn(&timeline, sink.clone(), guard, "tok".into()).unwrap();
        let tx = timeline.take_sender();
        tx.send(shift(0.05, 120.6)).await.unwrap();
        tx.send(PerfEntry::LayoutShift {
            value: 1.0,
            start_time: 200.0,
            had_recent_input: true,
        })
        .await
        .unwrap();
        tx.send(shift(0.02, 300.0)).await.unwrap();
        drop(tx);
        task.await.unwrap();

        let events = sink.0.lock();
        // 사용자 입력 유발 엔트리는 스트림에서도 제외
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].schema, "LayoutShift");
        assert_eq!(events[0].field("pageviewToken").unwrap(), "tok");
        assert_eq!(events[0].field("startTime").unwrap(), 121);
    }

    #[tokio::test]
    async fn stream_stops_at_cap_and_disconnects() {
        let timeline = ObservableTimeline::supported();
        let sink = Arc::new(CapturingSink::default());
        let guard = Arc::new(EmissionGuard::default());

        let task = spawn(&timeline, sink.clone(), guard, "tok".into()).unwrap();
        let tx = timeline.take_sender();
        for i in 0..25 {
            tx.send(shift(0.01, f64::from(i) * 10.0)).await.unwrap();
        }
        drop(tx);
        task.await.unwrap();

        assert_eq!(sink.0.lock().len(), 20);
        assert!(timeline.disconnected.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unsupported_subscription_yields_no_task() {
        let timeline = ObservableTimeline::unsupported();
        let sink = Arc::new(CapturingSink::default());
        let guard = Arc::new(EmissionGuard::default());

        assert!(spawn(&timeline, sink, guard, "tok".into()).is_none());
    }
}
