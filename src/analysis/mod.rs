pub mod http;
pub mod pipeline;
pub mod service;

#[cfg(test)]
pub mod fake;

pub use http::HttpEmotionService;
pub use pipeline::{AnalysisOutcome, AnalysisPipeline};
