//! 성능 타임라인 포트.
//!
//! 구현: 호스트 브리지 (Performance Timeline / PerformanceObserver
//! 바인딩). 조회는 버퍼된 엔트리를 포함하고, 구독은 기존 엔트리를
//! 먼저 흘려보낸 뒤 새 엔트리를 전달한다.

use tokio::sync::mpsc;

use crate::error::CoreError;
use crate::models::timeline::{EntryKind, NavigationSnapshot, PerfEntry};

/// 성능 타임라인 조회/구독 인터페이스
pub trait Timeline: Send + Sync {
    /// 현재 페이지뷰의 내비게이션 스냅샷.
    /// Navigation Timing 미지원 환경이면 None.
    fn navigation(&self) -> Option<NavigationSnapshot>;

    /// 타임라인 시계 (navigationStart 기준 경과 ms).
    /// 고해상도 시계 미지원 환경이면 None.
    fn now(&self) -> Option<f64>;

    /// 해당 종류의 버퍼된 엔트리 조회.
    /// 미지원 종류는 빈 목록 (원시 API의 try/catch → [] 관례와 동일).
    fn entries(&self, kind: EntryKind) -> Vec<PerfEntry>;

    /// 해당 종류의 엔트리 스트림 구독.
    ///
    /// 버퍼된 엔트리를 먼저 `tx`로 보낸 뒤 새 엔트리를 이어서 보낸다.
    /// 미지원 종류 구독은 네이티브 observer가 동기로 throw하는 경우에
    /// 해당하며 `Err`로 보고된다 — 호출부는 구독 지점에서만 처리한다.
    fn observe(
        &self,
        kind: EntryKind,
        tx: mpsc::Sender<PerfEntry>,
    ) -> Result<Box<dyn ObserverHandle>, CoreError>;
}

/// 구독 해제 핸들.
/// 수집기가 상한에 도달하면 호출해 엔트리 전달을 멈춘다.
pub trait ObserverHandle: Send + Sync {
    /// 구독 해제 (멱등)
    fn disconnect(&self);
}
