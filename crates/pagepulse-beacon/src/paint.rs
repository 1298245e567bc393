//! 페인트 타이밍 수집.
//!
//! 표준 paint 엔트리를 우선하고, 엔트리가 전혀 없을 때만 레거시 벤더
//! first-paint 마크로 폴백한다. 어느 쪽도 없으면 필드를 내지 않는다 —
//! 센티널 값은 없다.

use pagepulse_core::models::timeline::{NavigationMarks, PerfEntry};
use pagepulse_core::models::vitals::PaintTimingEvent;

/// 본 이벤트에 얹을 first-paint 오프셋.
///
/// paint 엔트리가 하나라도 있으면 그중 first-paint만 찾고, 전혀 없을
/// 때만 벤더 마크 폴백을 시도한다.
pub fn first_paint_offset(entries: &[PerfEntry], marks: &NavigationMarks) -> Option<u64> {
    let mut any_paint = false;
    for entry in entries {
        if let PerfEntry::Paint { name, start_time } = entry {
            any_paint = true;
            if name == "first-paint" {
                return Some(start_time.round() as u64);
            }
        }
    }
    if any_paint {
        return None;
    }

    // 벤더 폴백 마크는 epoch 기준이라 오프셋으로 변환한다
    match marks.ms_first_paint {
        Some(value) if value > marks.navigation_start => {
            Some((value - marks.navigation_start).round() as u64)
        }
        _ => None,
    }
}

/// 버퍼된 LCP 후보 중 마지막 것의 시각.
/// renderTime이 있으면 startTime보다 우선한다.
pub fn largest_contentful_paint(entries: &[PerfEntry]) -> Option<u64> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            PerfEntry::LargestContentfulPaint {
                start_time,
                render_time,
            } => Some(render_time.unwrap_or(*start_time)),
            _ => None,
        })
        .last()
        .map(|value| value.round() as u64)
}

/// 페인트 마크당 한 건씩 내보낼 PaintTiming 페이로드
pub fn paint_events(
    entries: &[PerfEntry],
    token: &str,
    is_oversample: bool,
    oversample_reason: Option<&str>,
) -> Vec<PaintTimingEvent> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            PerfEntry::Paint { name, start_time } => Some(PaintTimingEvent {
                pageview_token: token.to_string(),
                name: name.clone(),
                start_time: start_time.round() as u64,
                is_oversample,
                oversample_reason: oversample_reason.map(str::to_string),
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paint(name: &str, start_time: f64) -> PerfEntry {
        PerfEntry::Paint {
            name: name.into(),
            start_time,
        }
    }

    #[test]
    fn standard_entry_wins_over_vendor_mark() {
        let entries = [
            paint("first-paint", 843.4),
            paint("first-contentful-paint", 901.0),
        ];
        let marks = NavigationMarks {
            navigation_start: 100.0,
            ms_first_paint: Some(999.0),
            ..Default::default()
        };
        assert_eq!(first_paint_offset(&entries, &marks), Some(843));
    }

    #[test]
    fn vendor_mark_used_only_without_paint_entries() {
        let marks = NavigationMarks {
            navigation_start: 100.0,
            ms_first_paint: Some(750.0),
            ..Default::default()
        };
        assert_eq!(first_paint_offset(&[], &marks), Some(650));

        // paint 엔트리가 있는데 first-paint가 없으면 폴백하지 않는다
        let entries = [paint("first-contentful-paint", 901.0)];
        assert_eq!(first_paint_offset(&entries, &marks), None);
    }

    #[test]
    fn vendor_mark_before_navigation_start_is_dropped() {
        let marks = NavigationMarks {
            navigation_start: 100.0,
            ms_first_paint: Some(40.0),
            ..Default::default()
        };
        assert_eq!(first_paint_offset(&[], &marks), None);
    }

    #[test]
    fn absent_everything_yields_nothing() {
        let marks = NavigationMarks {
            navigation_start: 100.0,
            ..Default::default()
        };
        assert_eq!(first_paint_offset(&[], &marks), None);
    }

    #[test]
    fn last_lcp_candidate_wins() {
        let entries = [
            PerfEntry::LargestContentfulPaint {
                start_time: 600.0,
                render_time: None,
            },
            PerfEntry::LargestContentfulPaint {
                start_time: 1_100.0,
                render_time: Some(1_080.6),
            },
        ];
        // 마지막 후보의 renderTime 우선
        assert_eq!(largest_contentful_paint(&entries), Some(1081));
        assert_eq!(largest_contentful_paint(&[]), None);
    }

    #[test]
    fn one_payload_per_paint_mark() {
        let entries = [
            paint("first-paint", 843.0),
            paint("first-contentful-paint", 901.2),
        ];
        let events = paint_events(&entries, "tok", true, Some(r#"["geo:KR"]"#));

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "first-paint");
        assert_eq!(events[0].start_time, 843);
        assert!(events[0].is_oversample);
        assert_eq!(events[1].start_time, 901);
        assert_eq!(events[1].oversample_reason.as_deref(), Some(r#"["geo:KR"]"#));
    }
}
