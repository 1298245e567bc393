//! 시뮬레이션 페이지뷰 계측 데모
//!
//! 호스트 포트를 전부 인메모리 구현으로 채우고 파이프라인을 한 번
//! 돌려, 스키마별로 어떤 이벤트가 어떤 필드로 나가는지 보여준다.
//!
//! 실행:
//!   cargo run -p pagepulse-beacon --example simulated_pageview

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};

use pagepulse_beacon::pipeline::BeaconPipeline;
use pagepulse_core::config::{BeaconConfig, OversampleSpec, SampleFactor};
use pagepulse_core::error::CoreError;
use pagepulse_core::models::event::TelemetryEvent;
use pagepulse_core::models::page::{PageInfo, ReadyState};
use pagepulse_core::models::timeline::{
    EntryKind, NavigationMarks, NavigationSnapshot, NavigationType, PerfEntry, ServerTimingEntry,
};
use pagepulse_core::ports::client::ClientEnv;
use pagepulse_core::ports::modules::ModuleLoader;
use pagepulse_core::ports::page::{PageHost, SurveyPresenter};
use pagepulse_core::ports::sink::EventSink;
use pagepulse_core::ports::timeline::{ObserverHandle, Timeline};

/// 받은 이벤트를 그대로 출력하는 싱크
struct PrintSink {
    count: AtomicUsize,
}

impl EventSink for PrintSink {
    fn emit(&self, event: TelemetryEvent) {
        let order = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        let body = serde_json::to_string_pretty(&event.fields)
            .unwrap_or_else(|err| format!("<직렬화 실패: {err}>"));
        println!("\n  [{order}] schema={} @ {}", event.schema, event.occurred_at);
        println!("{body}");
    }
}

struct SimulatedPage;

#[async_trait]
impl PageHost for SimulatedPage {
    fn info(&self) -> PageInfo {
        PageInfo {
            platform_version: "1.43.0".into(),
            wiki: "kowiki".into(),
            page_name: "서울특별시".into(),
            namespace_id: Some(0),
            rev_id: Some(378_421),
            action: Some("view".into()),
            is_article: true,
            mobile_mode: Some("stable".into()),
            lead_image_url: Some("https://upload.example.org/seoul-skyline.jpg".into()),
            ..Default::default()
        }
    }

    fn pageview_token(&self) -> Option<String> {
        Some("c844bf0b2b4bbf2d2134".into())
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::Complete
    }

    async fn wait_load(&self) {}

    fn visibility(&self) -> Option<watch::Receiver<bool>> {
        None
    }
}

struct SimulatedTimeline {
    senders: Mutex<Vec<mpsc::Sender<PerfEntry>>>,
}

impl SimulatedTimeline {
    /// 첫 방문 페이지뷰의 전형적인 타이밍 마크 (epoch 기준 ms)
    fn marks() -> NavigationMarks {
        let start = 1_755_800_000_000.0;
        NavigationMarks {
            navigation_start: start,
            fetch_start: Some(start + 100.0),
            domain_lookup_start: Some(start + 110.0),
            domain_lookup_end: Some(start + 125.0),
            connect_start: Some(start + 126.0),
            secure_connection_start: Some(start + 135.0),
            connect_end: Some(start + 150.0),
            request_start: Some(start + 150.0),
            response_start: Some(start + 200.0),
            response_end: Some(start + 300.0),
            dom_interactive: Some(start + 320.0),
            dom_complete: Some(start + 350.0),
            load_event_start: Some(start + 470.0),
            load_event_end: Some(start + 475.0),
            ..Default::default()
        }
    }
}

impl Timeline for SimulatedTimeline {
    fn navigation(&self) -> Option<NavigationSnapshot> {
        Some(NavigationSnapshot {
            nav_type: NavigationType::Navigate,
            redirect_count: 0,
            marks: Self::marks(),
            server_timing: vec![ServerTimingEntry {
                name: "cache".into(),
                duration: 12.5,
                description: Some("hit-front".into()),
            }],
        })
    }

    fn now(&self) -> Option<f64> {
        Some(1_482.0)
    }

    fn entries(&self, kind: EntryKind) -> Vec<PerfEntry> {
        // 본 전송 시점에 이미 버퍼에 쌓여 있는 엔트리들
        match kind {
            EntryKind::Paint => vec![
                PerfEntry::Paint {
                    name: "first-paint".into(),
                    start_time: 843.0,
                },
                PerfEntry::Paint {
                    name: "first-contentful-paint".into(),
                    start_time: 901.0,
                },
            ],
            EntryKind::LargestContentfulPaint => vec![PerfEntry::LargestContentfulPaint {
                start_time: 1_102.0,
                render_time: Some(1_080.0),
            }],
            EntryKind::LayoutShift => vec![PerfEntry::LayoutShift {
                value: 0.021,
                start_time: 650.0,
                had_recent_input: false,
            }],
            EntryKind::LongTask => vec![PerfEntry::LongTask {
                start_time: 700.0,
                duration: 82.0,
            }],
            EntryKind::Resource => vec![PerfEntry::Resource {
                name: "https://upload.example.org/seoul-skyline.jpg".into(),
                initiator_type: "img".into(),
                start_time: 412.0,
                duration: 96.0,
                transfer_size: Some(48_211),
                encoded_body_size: Some(47_902),
                decoded_body_size: Some(47_902),
            }],
            EntryKind::Mark => vec![PerfEntry::Mark {
                name: "mwCentralNoticeBanner".into(),
                start_time: 1_204.0,
            }],
            _ => Vec::new(),
        }
    }

    fn observe(
        &self,
        _kind: EntryKind,
        tx: mpsc::Sender<PerfEntry>,
    ) -> Result<Box<dyn ObserverHandle>, CoreError> {
        self.senders.lock().push(tx);
        struct NoopHandle;
        impl ObserverHandle for NoopHandle {
            fn disconnect(&self) {}
        }
        Ok(Box::new(NoopHandle))
    }
}

struct SimulatedLoader;

#[async_trait]
impl ModuleLoader for SimulatedLoader {
    fn pending(&self) -> Vec<String> {
        vec!["ui.base".into(), "ui.gadgets".into()]
    }

    async fn wait_all(&self, _modules: &[String]) -> Result<(), CoreError> {
        // 페이지 모듈 로딩 흉내
        tokio::time::sleep(Duration::from_millis(30)).await;
        Ok(())
    }

    async fn wait(&self, _module: &str) -> Result<(), CoreError> {
        Ok(())
    }
}

struct SimulatedClient;

#[async_trait]
impl ClientEnv for SimulatedClient {
    fn user_agent(&self) -> Option<String> {
        Some("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/126.0".into())
    }

    fn geo_country(&self) -> Option<String> {
        Some("KR".into())
    }

    fn connection_type(&self) -> Option<String> {
        Some("4g".into())
    }

    fn device_memory(&self) -> Option<f64> {
        Some(8.0)
    }

    async fn battery_level(&self) -> Option<f64> {
        Some(0.83)
    }
}

struct SimulatedSurvey;

impl SurveyPresenter for SimulatedSurvey {
    fn show_survey(&self, name: &str) {
        println!("\n  >> 성능 설문 표시 요청: {name}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 로깅 설정
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("============================================================");
    println!("PAGEPULSE 시뮬레이션 페이지뷰");
    println!("============================================================");

    // === 1. 파이프라인 구성 ===
    println!("\n=== 1. 파이프라인 구성 ===");
    let mut oversample = OversampleSpec::default();
    oversample.geo.insert("KR".into(), SampleFactor::new(10.0));
    let config = BeaconConfig {
        sampling_factor: SampleFactor::ALWAYS,
        oversample_factor: Some(oversample),
        survey_sampling_factor: SampleFactor::ALWAYS,
        survey_name: Some("perceived-performance".into()),
        cpu_benchmark_sampling_factor: SampleFactor::ALWAYS,
        ..Default::default()
    };
    println!("  샘플링 배율: 1 (항상), 오버샘플: geo KR 1/10");

    let timeline = Arc::new(SimulatedTimeline {
        senders: Mutex::new(Vec::new()),
    });
    let sink = Arc::new(PrintSink {
        count: AtomicUsize::new(0),
    });
    let pipeline = BeaconPipeline::new(
        config,
        Arc::new(SimulatedPage),
        Arc::clone(&timeline) as Arc<dyn Timeline>,
        Arc::new(SimulatedLoader),
        Arc::new(SimulatedClient),
        Arc::new(SimulatedSurvey),
        Arc::clone(&sink) as Arc<dyn EventSink>,
    );
    println!("  페이지뷰 토큰: {}", pipeline.pageview_token());
    println!("  본 샘플링 당첨: {}", pipeline.is_sampled());

    // === 2. 페이지뷰 실행 ===
    println!("\n=== 2. 페이지뷰 실행 ===");
    pipeline.run().await;

    // === 3. 늦게 도착하는 엔트리 ===
    println!("\n=== 3. 늦게 도착하는 엔트리 ===");
    let senders: Vec<_> = std::mem::take(&mut *timeline.senders.lock());
    for tx in &senders {
        let _ = tx
            .send(PerfEntry::LayoutShift {
                value: 0.034,
                start_time: 3_210.0,
                had_recent_input: false,
            })
            .await;
        let _ = tx
            .send(PerfEntry::Element {
                identifier: "lead-image".into(),
                render_time: 612.4,
                load_time: 615.9,
            })
            .await;
    }
    drop(senders);
    pipeline.quiesce().await;

    println!("\n============================================================");
    println!("전송된 이벤트: {}건", sink.count.load(Ordering::SeqCst));
    println!("============================================================");

    Ok(())
}
