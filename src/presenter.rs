use crate::input::CaptureSource;
use crate::messages::AnalysisState;
use std::fmt::Write as _;
use tokio::sync::watch;

/// Print a one-off message to the user
pub fn notice(message: &str) {
    println!("{}", message);
}

/// Render an analysis state for the terminal
pub fn render(state: &AnalysisState) -> String {
    match state {
        AnalysisState::Idle => "Upload an image or start the camera.".to_string(),
        AnalysisState::Ready(source) => format!("Ready to analyze {}.", describe_source(source)),
        AnalysisState::Analyzing(_) => "Analyzing...".to_string(),
        AnalysisState::Succeeded(outcome) => {
            let mut out = format!("Detected Emotion: {}", outcome.emotion.label);
            if let Some(confidence) = outcome.emotion.confidence {
                let _ = write!(out, "\nConfidence: {:.1}%", confidence * 100.0);
            }

            let set = &outcome.recommendations;
            if set.tracks.is_empty() {
                out.push_str("\nNo tracks found.");
            } else {
                let _ = write!(out, "\nRecommended Songs ({}):", set.genre);
                for (i, track) in set.tracks.iter().enumerate() {
                    let _ = write!(
                        out,
                        "\n  {}. {} - {} ({})",
                        i + 1,
                        track.name,
                        track.artist,
                        track.embed_url
                    );
                    if let Some(url) = &track.external_url {
                        let _ = write!(out, "\n     listen: {}", url);
                    }
                }
            }
            out
        }
        AnalysisState::Failed(e) => format!("Error: {}", e),
    }
}

pub fn describe_source(source: &CaptureSource) -> &'static str {
    match source {
        CaptureSource::None => "nothing",
        CaptureSource::FileBlob { .. } => "the selected image",
        CaptureSource::CameraStream(_) => "the camera",
    }
}

/// Print every state transition until the orchestrator goes away
pub async fn present_states(mut rx: watch::Receiver<AnalysisState>) {
    while rx.changed().await.is_ok() {
        let text = render(&rx.borrow_and_update());
        notice(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisOutcome;
    use crate::analysis::service::{EmotionResult, RecommendationSet, Track};
    use crate::error::{AppError, DetectionError};
    use reqwest::Url;

    fn outcome(tracks: Vec<Track>) -> AnalysisState {
        AnalysisState::Succeeded(AnalysisOutcome {
            emotion: EmotionResult {
                label: "Happy".to_string(),
                confidence: Some(0.923),
            },
            recommendations: RecommendationSet {
                genre: "pop".to_string(),
                tracks,
            },
        })
    }

    #[test]
    fn test_render_tracks_in_order() {
        let track = |name: &str| Track {
            name: name.to_string(),
            artist: "Artist".to_string(),
            embed_url: Url::parse("https://open.spotify.com/embed/track/1").unwrap(),
            external_url: None,
        };

        let text = render(&outcome(vec![track("Song A"), track("Song B")]));

        assert_eq!(
            text,
            "Detected Emotion: Happy\n\
             Confidence: 92.3%\n\
             Recommended Songs (pop):\n  \
             1. Song A - Artist (https://open.spotify.com/embed/track/1)\n  \
             2. Song B - Artist (https://open.spotify.com/embed/track/1)"
        );
    }

    #[test]
    fn test_render_empty_tracks() {
        let text = render(&outcome(Vec::new()));
        assert!(text.ends_with("No tracks found."));
    }

    #[test]
    fn test_render_failure_is_one_message() {
        let state = AnalysisState::Failed(AppError::Detection(DetectionError::MissingEmotion));
        assert_eq!(
            render(&state),
            "Error: emotion detection failed: response is missing the emotion label"
        );
    }
}
