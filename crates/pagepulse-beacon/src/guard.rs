//! 전송 가드.
//!
//! 페이지뷰 단위 1회성 실행 플래그와 관찰자별 전송 상한 카운터.
//! 파이프라인 인스턴스의 필드로만 존재하고 전역 상태를 두지 않는다.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// 경계 관찰자별 전송 상한 (페이지뷰당)
pub const MAX_OBSERVER_EVENTS: u32 = 20;

/// 페이지뷰 단위 전송 가드
#[derive(Debug, Default)]
pub struct EmissionGuard {
    primary: AtomicBool,
    cpu_benchmark: AtomicBool,
    first_input: AtomicBool,
    layout_shifts: AtomicU32,
    elements: AtomicU32,
    policy_violations: AtomicU32,
}

impl EmissionGuard {
    /// 파이프라인 본 실행 선점. 최초 호출만 true.
    pub fn begin_primary(&self) -> bool {
        !self.primary.swap(true, Ordering::SeqCst)
    }

    /// CPU 벤치마크 실행 선점. 최초 호출만 true.
    pub fn begin_cpu_benchmark(&self) -> bool {
        !self.cpu_benchmark.swap(true, Ordering::SeqCst)
    }

    /// 첫 입력 지연 전송 선점. 최초 호출만 true.
    pub fn begin_first_input(&self) -> bool {
        !self.first_input.swap(true, Ordering::SeqCst)
    }

    /// layout-shift 전송 카운트. 상한 도달 후 false.
    pub fn count_layout_shift(&self) -> bool {
        Self::bump(&self.layout_shifts)
    }

    /// element-timing 전송 카운트. 상한 도달 후 false.
    pub fn count_element(&self) -> bool {
        Self::bump(&self.elements)
    }

    /// feature-policy 위반 전송 카운트. 상한 도달 후 false.
    pub fn count_policy_violation(&self) -> bool {
        Self::bump(&self.policy_violations)
    }

    fn bump(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                if n < MAX_OBSERVER_EVENTS {
                    Some(n + 1)
                } else {
                    None
                }
            })
            .is_ok()
    }
}
