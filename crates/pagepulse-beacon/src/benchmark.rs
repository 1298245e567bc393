//! CPU 마이크로벤치마크.
//!
//! 고정 크기 작업 루프를 전용 스레드에서 돌리고 벽시계 경과 시간을
//! 점수로 쓴다. 메인 스레드와는 oneshot 완료 메시지로만 통신하며,
//! 스레드를 못 만들면 조용히 건너뛴다. 측정 중인 페이지를 벤치마크가
//! 방해하면 안 된다.

use std::hint::black_box;
use std::time::Instant;

use tokio::sync::oneshot;
use tracing::debug;

use crate::guard::EmissionGuard;

/// 수십 ms 수준으로 맞춘 작업 루프 크기
const WORK_ITERATIONS: u64 = 100_000_000;

/// 벤치마크를 한 번 실행하고 경과 ms를 돌려준다.
///
/// 가드가 이미 선점됐거나 스레드 생성에 실패하면 no-op으로 None.
pub async fn run(guard: &EmissionGuard) -> Option<u64> {
    run_sized(guard, WORK_ITERATIONS).await
}

async fn run_sized(guard: &EmissionGuard, iterations: u64) -> Option<u64> {
    if !guard.begin_cpu_benchmark() {
        return None;
    }

    let (tx, rx) = oneshot::channel();
    let spawned = std::thread::Builder::new()
        .name("pagepulse-benchmark".into())
        .spawn(move || {
            let started = Instant::now();
            let mut acc = 0u64;
            for i in 0..iterations {
                // black_box가 루프 제거 최적화를 막는다
                acc = acc.wrapping_add(black_box(i));
            }
            black_box(acc);
            let _ = tx.send(started.elapsed().as_millis() as u64);
        });

    if let Err(err) = spawned {
        debug!(%err, "벤치마크 스레드 생성 실패");
        return None;
    }

    // 조인은 완료 메시지로만 한다. 스레드가 죽으면 송신단이 닫혀
    // 여기서 Err로 끝난다.
    rx.await.ok()
}
