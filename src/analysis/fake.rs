use super::service::{EmotionResult, EmotionService, RecommendationSet, Track};
use crate::capture::CapturedImage;
use crate::error::{DetectionError, RecommendationError};
use crate::language::Language;
use async_trait::async_trait;
use reqwest::Url;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::Notify;

/// Scripted stand-in for the remote service that records every call
pub struct FakeService {
    pub detection: RefCell<Result<EmotionResult, DetectionError>>,
    pub recommendations: RefCell<Result<RecommendationSet, RecommendationError>>,
    pub calls: RefCell<Vec<String>>,
    pub images: RefCell<Vec<CapturedImage>>,
    /// When set, detection waits for a notification before answering
    pub gate: RefCell<Option<Rc<Notify>>>,
}

impl FakeService {
    /// Detection answers `happy` at 0.92, recommendations one Pop track
    pub fn happy_pop() -> Rc<Self> {
        Rc::new(Self {
            detection: RefCell::new(Ok(EmotionResult {
                label: "happy".to_string(),
                confidence: Some(0.92),
            })),
            recommendations: RefCell::new(Ok(RecommendationSet {
                genre: "Pop".to_string(),
                tracks: vec![Track {
                    name: "Song A".to_string(),
                    artist: "Artist A".to_string(),
                    embed_url: Url::parse("https://embed/a").unwrap(),
                    external_url: None,
                }],
            })),
            calls: RefCell::new(Vec::new()),
            images: RefCell::new(Vec::new()),
            gate: RefCell::new(None),
        })
    }

    /// Hold detection until the returned notifier fires
    pub fn hold(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        *self.gate.borrow_mut() = Some(gate.clone());
        gate
    }

    pub fn detection_calls(&self) -> usize {
        self.calls.borrow().iter().filter(|c| *c == "detect").count()
    }

    pub fn recommendation_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with("recommend"))
            .count()
    }
}

#[async_trait(?Send)]
impl EmotionService for FakeService {
    async fn detect_emotion(&self, image: &CapturedImage) -> Result<EmotionResult, DetectionError> {
        self.calls.borrow_mut().push("detect".to_string());
        self.images.borrow_mut().push(image.clone());

        let gate = self.gate.borrow().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.detection.borrow().clone()
    }

    async fn fetch_recommendations(
        &self,
        emotion: &str,
        language: Language,
    ) -> Result<RecommendationSet, RecommendationError> {
        self.calls
            .borrow_mut()
            .push(format!("recommend {} {}", emotion, language.code()));
        self.recommendations.borrow().clone()
    }
}
