//! Navigation Timing 오프셋 계산.
//!
//! 원시 마크(epoch ms)를 navigationStart 기준 오프셋으로 변환한다.
//! 마크가 결측이거나 navigationStart보다 앞서면(규격 위반 순서) 해당
//! 필드만 빠지고 나머지는 정상 전송된다. 절대 타임스탬프나 음수 델타가
//! 나가는 일은 없어야 한다.

use pagepulse_core::models::navigation::NavTimingFields;
use pagepulse_core::models::timeline::NavigationMarks;

/// 원시 마크에서 전송용 오프셋 필드를 계산한다.
pub fn compute_offsets(marks: &NavigationMarks, redirect_count: u32) -> NavTimingFields {
    let nav_start = marks.navigation_start;

    let mut fields = NavTimingFields {
        fetch_start: offset_from(nav_start, marks.fetch_start),
        connect_start: offset_from(nav_start, marks.connect_start),
        connect_end: offset_from(nav_start, marks.connect_end),
        request_start: offset_from(nav_start, marks.request_start),
        response_start: offset_from(nav_start, marks.response_start),
        response_end: offset_from(nav_start, marks.response_end),
        dom_interactive: offset_from(nav_start, marks.dom_interactive),
        dom_complete: offset_from(nav_start, marks.dom_complete),
        load_event_start: offset_from(nav_start, marks.load_event_start),
        load_event_end: offset_from(nav_start, marks.load_event_end),
        ..Default::default()
    };

    // secureConnectionStart의 0은 "재사용된 연결"이라는 유효값이라 오프셋
    // 변환 없이 0 그대로 내보낸다.
    fields.secure_connection_start = match marks.secure_connection_start {
        Some(value) if value == 0.0 => Some(0),
        other => offset_from(nav_start, other),
    };

    // DNS가 캐시돼 있으면 start/end가 fetchStart와 같게 찍히므로 구간
    // 자체는 늘 계산 가능하다.
    fields.dns_lookup = span(marks.domain_lookup_start, marks.domain_lookup_end);

    // redirect/unload 마크는 타임스탬프 대신 0이 올 수 있는 필드라
    // 0을 "발생하지 않음"으로 읽고 구간값 대신 0을 내보낸다.
    match (marks.redirect_start, marks.redirect_end) {
        (Some(start), Some(end)) if start > 0.0 && end >= start => {
            fields.redirecting = (end - start).round() as u64;
            fields.redirect_count = Some(redirect_count);
        }
        _ => fields.redirecting = 0,
    }
    match (marks.unload_event_start, marks.unload_event_end) {
        (Some(start), Some(end)) if start > 0.0 && end >= start => {
            fields.unload = (end - start).round() as u64;
        }
        _ => fields.unload = 0,
    }

    fields.gaps = gaps(marks);

    fields
}

/// navigationStart 기준 오프셋. 결측이거나 navigationStart보다 앞선
/// 마크는 필드 단위로 버린다.
fn offset_from(nav_start: f64, mark: Option<f64>) -> Option<u64> {
    match mark {
        Some(value) if value >= nav_start => Some((value - nav_start).round() as u64),
        _ => None,
    }
}

/// 두 마크 사이 구간(ms). 역순이면 버린다.
fn span(start: Option<f64>, end: Option<f64>) -> Option<u64> {
    match (start, end) {
        (Some(start), Some(end)) if end >= start => Some((end - start).round() as u64),
        _ => None,
    }
}

/// 명명된 단계 사이의 유휴 구간 합.
///
/// 네 구간 중 하나라도 음수(규격 위반 순서)거나 필요한 마크가 결측이면
/// 합계 전체를 버린다.
fn gaps(marks: &NavigationMarks) -> Option<u64> {
    let intervals = [
        (marks.fetch_start?, marks.domain_lookup_start?),
        (marks.domain_lookup_end?, marks.connect_start?),
        (marks.connect_end?, marks.request_start?),
        (marks.dom_complete?, marks.load_event_start?),
    ];

    let mut total = 0.0;
    for (earlier, later) in intervals {
        let gap = later - earlier;
        if gap < 0.0 {
            return None;
        }
        total += gap;
    }
    Some(total.round() as u64)
}
