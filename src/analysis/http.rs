use super::service::{EmotionResult, EmotionService, RecommendationSet, Track};
use crate::capture::CapturedImage;
use crate::error::{DetectionError, RecommendationError};
use crate::language::Language;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct DetectRequest<'a> {
    image: &'a str,
}

#[derive(Deserialize)]
struct DetectResponse {
    #[serde(default)]
    emotion: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Deserialize)]
struct RecommendationResponse {
    genre: String,
    #[serde(default)]
    tracks: Option<Vec<WireTrack>>,
}

#[derive(Deserialize)]
struct WireTrack {
    name: String,
    artist: String,
    embed_url: String,
    #[serde(default)]
    spotify_url: Option<String>,
}

impl WireTrack {
    fn into_track(self) -> Result<Track, RecommendationError> {
        let embed_url = Url::parse(&self.embed_url).map_err(|e| {
            RecommendationError::Malformed(format!("invalid embed_url {:?}: {}", self.embed_url, e))
        })?;
        let external_url = self.spotify_url.as_deref().and_then(|u| Url::parse(u).ok());

        Ok(Track {
            name: self.name,
            artist: self.artist,
            embed_url,
            external_url,
        })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the emotion-detection service over HTTP
pub struct HttpEmotionService {
    base_url: Url,
    client: Client,
}

impl HttpEmotionService {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(api_url).with_context(|| format!("Invalid API URL: {}", api_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API URL cannot be used as a base: {}", api_url);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { base_url, client })
    }

    /// Append percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Status code and the service's `error` message (or the reason phrase)
async fn failure(response: Response) -> (u16, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());

    (status.as_u16(), message)
}

#[async_trait(?Send)]
impl EmotionService for HttpEmotionService {
    async fn detect_emotion(&self, image: &CapturedImage) -> Result<EmotionResult, DetectionError> {
        let url = self.endpoint(&["detect-emotion"]);
        tracing::debug!("POST {} with {:?}", url, image);

        let request = match image {
            CapturedImage::Binary { bytes, mime } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(image.file_name())
                    .mime_str(mime)
                    .map_err(|e| DetectionError::Transport(e.to_string()))?;
                self.client
                    .post(url)
                    .multipart(Form::new().part("image", part))
            }
            CapturedImage::DataUrl(data_url) => {
                self.client.post(url).json(&DetectRequest { image: data_url })
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| DetectionError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let (status, message) = failure(response).await;
            return Err(DetectionError::Status { status, message });
        }

        let body: DetectResponse = response
            .json()
            .await
            .map_err(|e| DetectionError::Malformed(e.to_string()))?;

        let label = body.emotion.ok_or(DetectionError::MissingEmotion)?;
        EmotionResult::new(label, body.confidence)
    }

    async fn fetch_recommendations(
        &self,
        emotion: &str,
        language: Language,
    ) -> Result<RecommendationSet, RecommendationError> {
        let url = self.endpoint(&["recommendations", emotion, language.code()]);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RecommendationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let (status, message) = failure(response).await;
            return Err(RecommendationError::Status { status, message });
        }

        let body: RecommendationResponse = response
            .json()
            .await
            .map_err(|e| RecommendationError::Malformed(e.to_string()))?;

        let tracks = body
            .tracks
            .unwrap_or_default()
            .into_iter()
            .map(WireTrack::into_track)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RecommendationSet {
            genre: body.genre,
            tracks,
        })
    }
}
