//! 전송 파이프라인.
//!
//! 페이지뷰당 한 번 구성되는 오케스트레이터. 수명주기 게이트를 통과한
//! 뒤 샘플링을 판정하고, 수집기를 돌려 스키마별 이벤트를 싱크로
//! 내보낸다. 한 번 쓰는 플래그와 카운터는 전부 이 인스턴스에 속하므로
//! 테스트에서 깨끗하게 다시 초기화할 수 있다.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use pagepulse_core::config::BeaconConfig;
use pagepulse_core::models::event::schema;
use pagepulse_core::models::navigation::SaveTimingEvent;
use pagepulse_core::models::page::PageInfo;
use pagepulse_core::models::timeline::{EntryKind, NavigationSnapshot};
use pagepulse_core::models::vitals::CpuBenchmarkEvent;
use pagepulse_core::ports::client::ClientEnv;
use pagepulse_core::ports::modules::ModuleLoader;
use pagepulse_core::ports::page::{PageHost, SurveyPresenter};
use pagepulse_core::ports::sink::EventSink;
use pagepulse_core::ports::timeline::Timeline;

use crate::assembler::{self, SampleKind, SharedContext, VitalsSummary};
use crate::benchmark;
use crate::element_timing;
use crate::feature_policy;
use crate::first_input;
use crate::gate::{GateOutcome, LifecycleGate};
use crate::guard::EmissionGuard;
use crate::layout_shift;
use crate::long_tasks;
use crate::navtiming;
use crate::oversample::{self, OversampleContext};
use crate::paint;
use crate::resource;
use crate::sampling;
use crate::server_timing;

/// 페이지뷰 하나를 계측하는 파이프라인
pub struct BeaconPipeline {
    config: BeaconConfig,
    page: Arc<dyn PageHost>,
    timeline: Arc<dyn Timeline>,
    modules: Arc<dyn ModuleLoader>,
    client: Arc<dyn ClientEnv>,
    survey: Arc<dyn SurveyPresenter>,
    sink: Arc<dyn EventSink>,
    guard: Arc<EmissionGuard>,
    observers: Mutex<Vec<JoinHandle<()>>>,
    token: String,
    sampled: bool,
}

impl BeaconPipeline {
    /// 포트를 주입해 파이프라인을 구성한다.
    ///
    /// 메인 샘플링 판정은 여기서 토큰 기반으로 내린다 — 모듈 로딩이
    /// 끝난 뒤 다시 확인해도 같은 답이 나와야 하기 때문이다.
    pub fn new(
        config: BeaconConfig,
        page: Arc<dyn PageHost>,
        timeline: Arc<dyn Timeline>,
        modules: Arc<dyn ModuleLoader>,
        client: Arc<dyn ClientEnv>,
        survey: Arc<dyn SurveyPresenter>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let token = page
            .pageview_token()
            .unwrap_or_else(sampling::generate_token);
        let sampled = sampling::token_in_sample(&token, config.sampling_factor);

        Self {
            config,
            page,
            timeline,
            modules,
            client,
            survey,
            sink,
            guard: Arc::new(EmissionGuard::default()),
            observers: Mutex::new(Vec::new()),
            token,
            sampled,
        }
    }

    /// 이 페이지뷰의 토큰
    pub fn pageview_token(&self) -> &str {
        &self.token
    }

    /// 메인 샘플링 당첨 여부
    pub fn is_sampled(&self) -> bool {
        self.sampled
    }

    /// 파이프라인 실행. 페이지뷰당 한 번만 동작하고 재호출은 no-op.
    pub async fn run(&self) {
        if !self.guard.begin_primary() {
            debug!("파이프라인 재실행 시도 무시");
            return;
        }

        debug!(token = %self.token, sampled = self.sampled, "수명주기 게이트 대기");
        let gate = LifecycleGate::watch(self.page.as_ref());
        let outcome = gate
            .wait_ready(
                self.page.as_ref(),
                self.modules.as_ref(),
                self.timeline.as_ref(),
            )
            .await;
        self.on_ready(outcome).await;
    }

    /// 남아 있는 관찰자 태스크가 끝날 때까지 대기.
    /// 호스트가 페이지 전환 때 엔트리 채널을 닫으면 자연히 끝난다.
    pub async fn quiesce(&self) {
        let handles: Vec<_> = std::mem::take(&mut *self.observers.lock());
        for handle in handles {
            let _ = handle.await;
        }
    }

    async fn on_ready(&self, outcome: GateOutcome) {
        let page = self.page.info();

        // 저장 직후 신호는 샘플링/가시성/내비게이션 종류와 무관하게 본다
        self.maybe_emit_save_timing(&page);

        if outcome.hidden {
            debug!("백그라운드 탭 — 타이밍 전송 생략");
            return;
        }

        // 오버샘플은 지연 초기화되는 지역 정보에 의존하므로 여기서 판정한다
        let reasons = self.oversample_reasons(&page);
        if !self.sampled && reasons.is_empty() {
            debug!("샘플링 미당첨, 오버샘플 해당 없음");
            return;
        }

        let Some(snapshot) = self.timeline.navigation() else {
            debug!("Navigation Timing 미지원 — 전송 포기");
            return;
        };
        if !snapshot.nav_type.is_regular() {
            debug!(nav_type = ?snapshot.nav_type, "일반 탐색이 아님 — 전송 생략");
            return;
        }

        let ctx = self.shared_context(page, outcome.load_end);
        self.emit_primary(&ctx, &snapshot, &reasons);
        self.emit_narrow_schemas(&ctx, &snapshot, &reasons);
        self.spawn_observers();
        self.maybe_run_benchmark().await;
        self.maybe_request_survey(&ctx.page);
    }

    fn shared_context(&self, page: PageInfo, load_end: Option<u64>) -> SharedContext {
        SharedContext {
            pageview_token: self.token.clone(),
            origin_country: self.client.geo_country(),
            connection_type: self.client.connection_type(),
            device_memory: self.client.device_memory(),
            load_end,
            page,
        }
    }

    fn oversample_reasons(&self, page: &PageInfo) -> Vec<String> {
        let Some(spec) = &self.config.oversample_factor else {
            return Vec::new();
        };
        if spec.is_empty() {
            return Vec::new();
        }
        let ctx = OversampleContext {
            geo_country: self.client.geo_country(),
            user_agent: self.client.user_agent(),
            page_name: page.page_name.clone(),
            wiki: page.wiki.clone(),
        };
        oversample::collect_reasons(spec, &ctx)
    }

    /// 본 전송과 오버샘플 전송. 같은 측정값으로 최대 두 건이며,
    /// 오버샘플은 사유가 몇 개든 결합 배열을 실은 한 건이다.
    fn emit_primary(
        &self,
        ctx: &SharedContext,
        snapshot: &NavigationSnapshot,
        reasons: &[String],
    ) {
        let timing = navtiming::compute_offsets(&snapshot.marks, snapshot.redirect_count);
        let vitals = self.vitals_summary(snapshot);

        if self.sampled {
            let event = ctx.navigation_event(&SampleKind::Base, timing.clone(), vitals);
            assembler::emit_payload(self.sink.as_ref(), schema::NAVIGATION_TIMING, &event);
            info!("NavigationTiming 본 전송");
        }
        if !reasons.is_empty() {
            let kind = SampleKind::Oversample(reasons.to_vec());
            let event = ctx.navigation_event(&kind, timing, vitals);
            assembler::emit_payload(self.sink.as_ref(), schema::NAVIGATION_TIMING, &event);
            info!(reasons = reasons.len(), "NavigationTiming 오버샘플 전송");
        }
    }

    fn vitals_summary(&self, snapshot: &NavigationSnapshot) -> VitalsSummary {
        let paints = self.timeline.entries(EntryKind::Paint);
        let lcp = self.timeline.entries(EntryKind::LargestContentfulPaint);
        let shifts = self.timeline.entries(EntryKind::LayoutShift);
        let tasks = self.timeline.entries(EntryKind::LongTask);
        let long_tasks = long_tasks::summarize(&tasks);

        VitalsSummary {
            first_paint: paint::first_paint_offset(&paints, &snapshot.marks),
            cumulative_layout_shift: (!shifts.is_empty())
                .then(|| layout_shift::cumulative_score(&shifts)),
            largest_contentful_paint: paint::largest_contentful_paint(&lcp),
            long_task_count: long_tasks.map(|summary| summary.count),
            long_task_total_duration: long_tasks.map(|summary| summary.total_duration),
        }
    }

    /// 좁은 스키마 전송 — 기회당 한 번씩, 본/오버샘플 전송과 중복 없음
    fn emit_narrow_schemas(
        &self,
        ctx: &SharedContext,
        snapshot: &NavigationSnapshot,
        reasons: &[String],
    ) {
        let sink = self.sink.as_ref();

        // 본 샘플이 아닌 페이지뷰는 오버샘플 경로로만 여기 도달한다
        let oversample_only = !self.sampled;
        let reason_json = if oversample_only && !reasons.is_empty() {
            serde_json::to_string(reasons).ok()
        } else {
            None
        };
        let paints = self.timeline.entries(EntryKind::Paint);
        for event in paint::paint_events(
            &paints,
            &self.token,
            oversample_only,
            reason_json.as_deref(),
        ) {
            assembler::emit_payload(sink, schema::PAINT_TIMING, &event);
        }

        for event in server_timing::server_timing_events(&snapshot.server_timing, &self.token) {
            assembler::emit_payload(sink, schema::SERVER_TIMING, &event);
        }

        let resources = self.timeline.entries(EntryKind::Resource);
        if let Some(event) = resource::top_image_event(
            &resources,
            ctx.page.lead_image_url.as_deref(),
            &self.token,
        ) {
            assembler::emit_payload(sink, schema::RESOURCE_TIMING, &event);
        }

        let marks = self.timeline.entries(EntryKind::Mark);
        if let Some(event) = resource::central_notice_event(&marks, &self.token) {
            assembler::emit_payload(sink, schema::CENTRAL_NOTICE_TIMING, &event);
        }
    }

    /// 관찰자 수집기 구독. 늦게 도착하는 엔트리는 본 전송과 독립적으로
    /// 흘러나간다.
    fn spawn_observers(&self) {
        let timeline = self.timeline.as_ref();
        let mut handles = self.observers.lock();
        handles.extend(layout_shift::spawn(
            timeline,
            Arc::clone(&self.sink),
            Arc::clone(&self.guard),
            self.token.clone(),
        ));
        handles.extend(first_input::spawn(
            timeline,
            Arc::clone(&self.sink),
            Arc::clone(&self.guard),
            self.token.clone(),
        ));
        handles.extend(element_timing::spawn(
            timeline,
            Arc::clone(&self.sink),
            Arc::clone(&self.guard),
            self.token.clone(),
        ));
        handles.extend(feature_policy::spawn(
            timeline,
            Arc::clone(&self.sink),
            Arc::clone(&self.guard),
            self.token.clone(),
        ));
    }

    fn maybe_emit_save_timing(&self, page: &PageInfo) {
        if !page.post_edit {
            return;
        }
        let Some(snapshot) = self.timeline.navigation() else {
            return;
        };
        let Some(response_start) = snapshot.marks.response_start else {
            return;
        };
        let delta = response_start - snapshot.marks.navigation_start;
        if delta <= 0.0 {
            return;
        }

        let payload = SaveTimingEvent {
            media_wiki_version: page.platform_version.clone(),
            save_timing: delta.round() as u64,
        };
        assembler::emit_payload(self.sink.as_ref(), schema::SAVE_TIMING, &payload);
        info!("SaveTiming 전송");
    }

    async fn maybe_run_benchmark(&self) {
        if !sampling::token_in_sample(&self.token, self.config.cpu_benchmark_sampling_factor) {
            return;
        }
        let Some(score) = benchmark::run(&self.guard).await else {
            return;
        };

        let payload = CpuBenchmarkEvent {
            pageview_token: self.token.clone(),
            score,
            battery_level: self.client.battery_level().await,
        };
        assembler::emit_payload(self.sink.as_ref(), schema::CPU_BENCHMARK, &payload);
    }

    /// 본 샘플에 당첨된 문서 페이지뷰만 설문 대상이다. 설문 배율은
    /// 기본 샘플링이 적용된 뒤의 비율로 해석된다.
    fn maybe_request_survey(&self, page: &PageInfo) {
        if !self.sampled {
            return;
        }
        let Some(name) = &self.config.survey_name else {
            return;
        };
        if page.is_main_page || !page.is_article {
            return;
        }

        let factor = if page.is_anon() {
            self.config.survey_sampling_factor
        } else {
            self.config.survey_authenticated_sampling_factor
        };
        if sampling::token_in_sample(&self.token, factor) {
            info!(survey = %name, "성능 설문 표시 요청");
            self.survey.show_survey(name);
        }
    }
}
