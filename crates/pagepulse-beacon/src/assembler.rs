//! 이벤트 조립.
//!
//! 측정 기회마다 한 번 만든 공유 컨텍스트에 수집기 출력을 얹어 스키마별
//! 이벤트를 조립한다. 특수 문서는 namespaceId/revId/action 대신
//! mwSpecialPageName을 실는다 — 두 필드 집합은 상호 배타이며 동시에
//! 나가는 일이 없다.

use serde::Serialize;
use tracing::warn;

use pagepulse_core::models::event::TelemetryEvent;
use pagepulse_core::models::navigation::{NavTimingFields, NavigationTimingEvent};
use pagepulse_core::models::page::PageInfo;
use pagepulse_core::ports::sink::EventSink;

/// 측정 기회당 한 번 구성되는 공유 요청 컨텍스트
#[derive(Debug, Clone, Default)]
pub struct SharedContext {
    pub pageview_token: String,
    pub page: PageInfo,
    pub origin_country: Option<String>,
    pub connection_type: Option<String>,
    pub device_memory: Option<f64>,
    /// 페이지 모듈 정착 시각 (타임라인 시계 기준 ms)
    pub load_end: Option<u64>,
}

/// 본 전송인지 오버샘플 전송인지
#[derive(Debug, Clone, PartialEq)]
pub enum SampleKind {
    /// 메인 샘플링에 당첨된 본 전송
    Base,
    /// 매칭된 사유 목록을 싣는 오버샘플 전송 — 사유가 몇 개든 한 건
    Oversample(Vec<String>),
}

impl SampleKind {
    pub fn is_oversample(&self) -> bool {
        matches!(self, SampleKind::Oversample(_))
    }

    /// 사유 배열의 JSON 문자열 (본 전송이면 None)
    pub fn reason_json(&self) -> Option<String> {
        match self {
            SampleKind::Base => None,
            SampleKind::Oversample(reasons) => serde_json::to_string(reasons).ok(),
        }
    }
}

/// 본 이벤트에 얹는 바이탈 집계
#[derive(Debug, Clone, Copy, Default)]
pub struct VitalsSummary {
    pub first_paint: Option<u64>,
    pub cumulative_layout_shift: Option<f64>,
    pub largest_contentful_paint: Option<u64>,
    pub long_task_count: Option<u64>,
    pub long_task_total_duration: Option<u64>,
}

impl SharedContext {
    /// NavigationTiming 이벤트 조립 — 공유 컨텍스트 + 타이밍 오프셋 + 바이탈
    pub fn navigation_event(
        &self,
        kind: &SampleKind,
        timing: NavTimingFields,
        vitals: VitalsSummary,
    ) -> NavigationTimingEvent {
        let mut event = NavigationTimingEvent {
            pageview_token: self.pageview_token.clone(),
            media_wiki_version: self.page.platform_version.clone(),
            is_anon: self.page.is_anon(),
            is_oversample: kind.is_oversample(),
            oversample_reason: kind.reason_json(),
            mobile_mode: mobile_mode_label(&self.page),
            media_wiki_load_end: self.load_end,
            origin_country: self.origin_country.clone(),
            netinfo_effective_connection_type: self.connection_type.clone(),
            device_memory: self.device_memory,
            timing,
            first_paint: vitals.first_paint,
            cumulative_layout_shift: vitals.cumulative_layout_shift,
            largest_contentful_paint: vitals.largest_contentful_paint,
            long_task_count: vitals.long_task_count,
            long_task_total_duration: vitals.long_task_total_duration,
            ..Default::default()
        };

        // 특수 문서에는 ID/리비전/액션이 없다
        if let Some(special) = &self.page.special_page {
            event.mw_special_page_name = Some(special.clone());
        } else {
            event.namespace_id = self.page.namespace_id;
            event.rev_id = self.page.rev_id;
            event.action = self.page.action.clone();
        }

        event
    }
}

/// 데스크톱 모드 라벨은 싣지 않는다 ("stable"/"beta"만 의미가 있다)
fn mobile_mode_label(page: &PageInfo) -> Option<String> {
    page.mobile_mode
        .as_ref()
        .filter(|mode| !mode.contains("desktop"))
        .cloned()
}

/// 페이로드를 평탄화해 싱크로 보낸다. 조립 실패는 로그만 남기고
/// 버린다 — 전송 경로에서 위로 전파되는 에러는 없다.
pub fn emit_payload<T: Serialize>(sink: &dyn EventSink, schema: &'static str, payload: &T) {
    match TelemetryEvent::from_payload(schema, payload) {
        Ok(event) => sink.emit(event),
        Err(err) => warn!(schema, %err, "이벤트 조립 실패"),
    }
}
