//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 호스트 브리지(웹뷰 바인딩)가 이 trait들을 구현하며,
//! 파이프라인은 `Arc<dyn T>`로 주입받는다.
//!
//! 측정 API가 없는 환경은 에러가 아니라 일급 분기다. 포트는
//! `Option`/`Err`로 "미지원"을 보고하고, 수집기는 그 분기를 구성
//! 시점에 한 번 처리한다.

pub mod client;
pub mod modules;
pub mod page;
pub mod sink;
pub mod timeline;
