//! PAGEPULSE 도메인 모델.
//!
//! 파이프라인과 호스트 어댑터가 공유하는 핵심 데이터 구조체를 정의한다.
//! 전송 페이로드는 전부 `serde` Serialize/Deserialize를 구현한다.

pub mod event;
pub mod navigation;
pub mod page;
pub mod resource;
pub mod timeline;
pub mod vitals;
