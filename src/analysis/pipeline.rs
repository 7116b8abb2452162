use super::service::{EmotionResult, EmotionService, RecommendationSet};
use crate::capture::CapturedImage;
use crate::error::{AppError, DetectionError, RecommendationError};
use crate::language::Language;
use std::rc::Rc;

/// Emotion and recommendations produced by one successful run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub emotion: EmotionResult,
    pub recommendations: RecommendationSet,
}

/// Drives the two remote calls of an analysis
///
/// Detection always completes before recommendations are requested. Nothing
/// is retried; the first failure ends the run.
#[derive(Clone)]
pub struct AnalysisPipeline {
    service: Rc<dyn EmotionService>,
}

impl AnalysisPipeline {
    pub fn new(service: Rc<dyn EmotionService>) -> Self {
        Self { service }
    }

    pub async fn detect_emotion(&self, image: &CapturedImage) -> Result<EmotionResult, DetectionError> {
        tracing::info!("Detecting emotion...");
        let emotion = self.service.detect_emotion(image).await?;
        tracing::info!(
            "Detected emotion: {} (confidence {:?})",
            emotion.label,
            emotion.confidence
        );
        Ok(emotion)
    }

    pub async fn fetch_recommendations(
        &self,
        emotion: &str,
        language: Language,
    ) -> Result<RecommendationSet, RecommendationError> {
        tracing::info!("Fetching {} recommendations for {}", language.code(), emotion);
        let set = self.service.fetch_recommendations(emotion, language).await?;
        tracing::info!("Received {} tracks ({})", set.tracks.len(), set.genre);
        Ok(set)
    }

    pub async fn run(
        &self,
        image: CapturedImage,
        language: Language,
    ) -> Result<AnalysisOutcome, AppError> {
        let emotion = self.detect_emotion(&image).await?;
        let recommendations = self.fetch_recommendations(&emotion.label, language).await?;

        Ok(AnalysisOutcome {
            emotion,
            recommendations,
        })
    }
}
