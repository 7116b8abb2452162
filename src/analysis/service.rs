use crate::capture::CapturedImage;
use crate::error::{DetectionError, RecommendationError};
use crate::language::Language;
use async_trait::async_trait;
use reqwest::Url;

/// Detected emotion with the model's confidence, when it reported one
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionResult {
    pub label: String,
    pub confidence: Option<f64>,
}

impl EmotionResult {
    /// Build a result, rejecting an empty label.
    ///
    /// A confidence that is not a finite number in `[0, 1]` is dropped.
    pub fn new(label: impl Into<String>, confidence: Option<f64>) -> Result<Self, DetectionError> {
        let label = label.into().trim().to_string();
        if label.is_empty() {
            return Err(DetectionError::MissingEmotion);
        }

        let confidence = confidence.filter(|c| {
            let valid = c.is_finite() && (0.0..=1.0).contains(c);
            if !valid {
                tracing::warn!("Ignoring out-of-range confidence {}", c);
            }
            valid
        });

        Ok(Self { label, confidence })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub artist: String,
    pub embed_url: Url,
    pub external_url: Option<Url>,
}

/// Tracks recommended for one emotion, in the order the service returned them
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationSet {
    pub genre: String,
    pub tracks: Vec<Track>,
}

/// Remote emotion-detection and recommendation endpoints
#[async_trait(?Send)]
pub trait EmotionService {
    async fn detect_emotion(&self, image: &CapturedImage) -> Result<EmotionResult, DetectionError>;

    async fn fetch_recommendations(
        &self,
        emotion: &str,
        language: Language,
    ) -> Result<RecommendationSet, RecommendationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_label_is_missing_emotion() {
        assert_eq!(EmotionResult::new("  ", Some(0.5)), Err(DetectionError::MissingEmotion));
    }

    #[test]
    fn test_confidence_range() {
        assert_eq!(EmotionResult::new("Happy", Some(0.92)).unwrap().confidence, Some(0.92));
        assert_eq!(EmotionResult::new("Happy", Some(1.0)).unwrap().confidence, Some(1.0));
        assert_eq!(EmotionResult::new("Happy", Some(1.5)).unwrap().confidence, None);
        assert_eq!(EmotionResult::new("Happy", Some(f64::NAN)).unwrap().confidence, None);
        assert_eq!(EmotionResult::new("Happy", None).unwrap().confidence, None);
    }
}
