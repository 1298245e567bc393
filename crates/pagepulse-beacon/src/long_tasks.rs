//! 롱태스크 집계.
//!
//! 버퍼된 longtask 엔트리를 건수와 총 시간으로 요약해 본 이벤트에
//! 얹는다. 엔트리가 하나도 없으면 (미지원 포함) 요약 자체가 없다.

use pagepulse_core::models::timeline::PerfEntry;

/// 롱태스크 요약 — 건수와 총 시간(ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongTaskSummary {
    pub count: u64,
    pub total_duration: u64,
}

/// 버퍼된 엔트리를 요약한다. LongTask 엔트리가 없으면 None.
pub fn summarize(entries: &[PerfEntry]) -> Option<LongTaskSummary> {
    let mut count = 0u64;
    let mut total = 0.0f64;

    for entry in entries {
        if let PerfEntry::LongTask { duration, .. } = entry {
            count += 1;
            total += duration;
        }
    }

    if count == 0 {
        return None;
    }
    Some(LongTaskSummary {
        count,
        total_duration: total.round() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_entries_no_summary() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn counts_and_sums_durations() {
        let entries = [
            PerfEntry::LongTask {
                start_time: 1_000.0,
                duration: 80.0,
            },
            PerfEntry::LongTask {
                start_time: 2_500.0,
                duration: 120.5,
            },
            // 다른 종류 엔트리는 무시
            PerfEntry::Paint {
                name: "first-paint".into(),
                start_time: 400.0,
            },
        ];
        let summary = summarize(&entries).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_duration, 201);
    }
}
