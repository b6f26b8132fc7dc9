pub mod model;
pub mod provider;
pub mod service;

pub use model::{ProcessedText, TextSegment};
pub use provider::{ProcessingError, SegmentProvider};
pub use service::SegmentService;
