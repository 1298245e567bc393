//! 대표 타임라인 엔트리 수집.
//!
//! 버퍼된 엔트리 중 특별히 지정된 것만 골라 낸다: 문서 대표 이미지의
//! 리소스 타이밍과, 중앙 공지 배너 스크립트가 남기는 사용자 마크.

use pagepulse_core::models::resource::{CentralNoticeTimingEvent, ResourceTimingEvent};
use pagepulse_core::models::timeline::PerfEntry;

/// 대표 이미지 리소스 라벨
pub const TOP_IMAGE_LABEL: &str = "top-image";
/// 중앙 공지 배너가 남기는 마크 이름
pub const CENTRAL_NOTICE_MARK: &str = "mwCentralNoticeBanner";

/// 문서 대표 이미지의 리소스 타이밍.
///
/// URL이 정확히 일치하는 첫 리소스 엔트리를 쓴다. 대표 이미지가 없는
/// 문서거나 엔트리가 버퍼에 없으면 (미지원 포함) 내지 않는다.
pub fn top_image_event(
    entries: &[PerfEntry],
    lead_image_url: Option<&str>,
    token: &str,
) -> Option<ResourceTimingEvent> {
    let url = lead_image_url?;
    entries.iter().find_map(|entry| match entry {
        PerfEntry::Resource {
            name,
            initiator_type,
            start_time,
            duration,
            transfer_size,
            encoded_body_size,
            decoded_body_size,
        } if name == url => Some(ResourceTimingEvent {
            pageview_token: token.to_string(),
            label: TOP_IMAGE_LABEL.to_string(),
            name: name.clone(),
            initiator_type: initiator_type.clone(),
            start_time: start_time.round() as u64,
            duration: duration.round() as u64,
            transfer_size: *transfer_size,
            encoded_body_size: *encoded_body_size,
            decoded_body_size: *decoded_body_size,
        }),
        _ => None,
    })
}

/// 중앙 공지 배너 마크 시각.
pub fn central_notice_event(entries: &[PerfEntry], token: &str) -> Option<CentralNoticeTimingEvent> {
    entries.iter().find_map(|entry| match entry {
        PerfEntry::Mark { name, start_time } if name == CENTRAL_NOTICE_MARK => {
            Some(CentralNoticeTimingEvent {
                pageview_token: token.to_string(),
                time: start_time.round() as u64,
            })
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> PerfEntry {
        PerfEntry::Resource {
            name: name.into(),
            initiator_type: "img".into(),
            start_time: 410.4,
            duration: 95.2,
            transfer_size: Some(48_211),
            encoded_body_size: Some(47_950),
            decoded_body_size: Some(121_400),
        }
    }

    #[test]
    fn matches_lead_image_by_exact_url() {
        let lead = "https://upload.example.org/lead.jpg";
        let entries = [image("https://upload.example.org/other.png"), image(lead)];

        let event = top_image_event(&entries, Some(lead), "tok").unwrap();
        assert_eq!(event.label, "top-image");
        assert_eq!(event.name, lead);
        assert_eq!(event.start_time, 410);
        assert_eq!(event.duration, 95);
        assert_eq!(event.transfer_size, Some(48_211));
    }

    #[test]
    fn no_lead_image_no_event() {
        let entries = [image("https://upload.example.org/lead.jpg")];
        assert!(top_image_event(&entries, None, "tok").is_none());
        assert!(top_image_event(&[], Some("https://upload.example.org/lead.jpg"), "tok").is_none());
    }

    #[test]
    fn central_notice_mark_is_picked_up() {
        let entries = [
            PerfEntry::Mark {
                name: "unrelated".into(),
                start_time: 300.0,
            },
            PerfEntry::Mark {
                name: CENTRAL_NOTICE_MARK.into(),
                start_time: 1_204.7,
            },
        ];
        let event = central_notice_event(&entries, "tok").unwrap();
        assert_eq!(event.time, 1_205);
        assert!(central_notice_event(&[], "tok").is_none());
    }
}
