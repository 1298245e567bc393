//! 수명주기 게이트.
//!
//! Loading → 탭 상태 파악 → 모듈 정착 → load 이벤트 → Ready 순서를
//! 한 번만 통과시킨다. Ready 전 어느 시점이든 탭이 숨겨졌다면 그대로
//! Ready에 도달하되 결과에 표시한다 — 백그라운드 탭의 측정값은
//! 집계를 오염시키므로 하류에서 전송을 건너뛴다.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use pagepulse_core::models::page::ReadyState;
use pagepulse_core::ports::modules::ModuleLoader;
use pagepulse_core::ports::page::PageHost;
use pagepulse_core::ports::timeline::Timeline;

/// Ready 도달 시점의 게이트 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOutcome {
    /// Ready 전에 탭이 한 번이라도 숨겨졌는지
    pub hidden: bool,
    /// 모듈 정착 직후 동기로 읽은 타임라인 시각 (ms)
    pub load_end: Option<u64>,
}

/// 페이지뷰당 하나 — 값으로 소비되므로 Ready는 최대 한 번이다
pub struct LifecycleGate {
    hidden: Arc<AtomicBool>,
    watcher: Option<JoinHandle<()>>,
}

impl LifecycleGate {
    /// 가시성 감시를 시작한다. 최초 hidden 전환 한 번만 기록하고,
    /// 이미 숨겨진 채 시작했다면 감시 없이 바로 기록한다.
    pub fn watch(page: &dyn PageHost) -> Self {
        let hidden = Arc::new(AtomicBool::new(false));
        let watcher = page.visibility().and_then(|mut rx| {
            if *rx.borrow() {
                hidden.store(true, Ordering::SeqCst);
                return None;
            }
            let flag = Arc::clone(&hidden);
            Some(tokio::spawn(async move {
                while rx.changed().await.is_ok() {
                    if *rx.borrow() {
                        flag.store(true, Ordering::SeqCst);
                        break;
                    }
                }
            }))
        });
        Self { hidden, watcher }
    }

    /// 모듈 정착과 load 이벤트를 기다려 Ready에 도달한다.
    ///
    /// load-end는 모듈 정착 직후 같은 틱에서 읽는다 — 뒤로 미루면
    /// 스케줄링이 측정값을 왜곡한다. 마지막 한 틱 양보는 호스트가
    /// 자기 loadEventEnd 마크를 채울 시간이다.
    pub async fn wait_ready(
        mut self,
        page: &dyn PageHost,
        modules: &dyn ModuleLoader,
        timeline: &dyn Timeline,
    ) -> GateOutcome {
        settle_modules(modules).await;
        let load_end = timeline.now().map(|now| now.round() as u64);

        if page.ready_state() != ReadyState::Complete {
            page.wait_load().await;
        }
        tokio::task::yield_now().await;

        // Ready 도달 — 가시성 감시 해제, 이후 전환은 기록되지 않는다
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
        GateOutcome {
            hidden: self.hidden.load(Ordering::SeqCst),
            load_end,
        }
    }
}

/// 로딩 중인 모듈이 전부 끝나기를 기다린다.
///
/// 결합 대기가 빠른 공통 경로다. 하나라도 실패하면 전체가 거부되므로
/// 모듈별 대기로 폴백해 실패한 모듈이 나머지를 막지 않게 한다.
/// 개별 대기가 끝나기만 하면 두 경로 모두 종료가 보장된다.
pub async fn settle_modules(modules: &dyn ModuleLoader) {
    let pending = modules.pending();
    if pending.is_empty() {
        return;
    }

    if modules.wait_all(&pending).await.is_ok() {
        return;
    }

    debug!(count = pending.len(), "결합 대기 실패, 모듈별 대기로 폴백");
    let waits = pending.iter().map(|module| modules.wait(module));
    for result in futures::future::join_all(waits).await {
        if let Err(err) = result {
            debug!(%err, "모듈 로딩 실패 무시");
        }
    }
}
