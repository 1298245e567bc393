//! # pagepulse-beacon
//!
//! 페이지뷰 성능 계측 파이프라인.
//! 샘플링 판정, 수명주기 게이트, Navigation Timing 오프셋 계산,
//! 웹 바이탈 수집기, 스키마별 이벤트 조립/전송을 담당한다.
//! 호스트 연결은 전부 pagepulse-core 포트를 통해 주입받는다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use pagepulse_beacon::pipeline::BeaconPipeline;
//!
//! let pipeline = BeaconPipeline::new(
//!     config, page, timeline, modules, client, survey, sink,
//! );
//! pipeline.run().await;
//! ```

pub mod assembler;
pub mod benchmark;
pub mod element_timing;
pub mod feature_policy;
pub mod first_input;
pub mod gate;
pub mod guard;
pub mod layout_shift;
pub mod long_tasks;
pub mod navtiming;
pub mod oversample;
pub mod paint;
pub mod pipeline;
pub mod resource;
pub mod sampling;
pub mod server_timing;

pub use pipeline::BeaconPipeline;
