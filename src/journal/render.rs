use chrono::NaiveDate;

use super::core::CaptureState;
use crate::classifier::SceneObservation;

/// Caption shown from the moment a photo arrives until inference settles.
pub const IN_FLIGHT_CAPTION: &str = "Classify scene";

/// Renders the ranked caption for a classified photo: a header line plus the
/// top two observations, each as `"  (0.81) beach"`.
pub fn ranked_caption(observations: &[SceneObservation]) -> String {
    let lines: Vec<String> = observations
        .iter()
        .take(2)
        .map(|o| format!("  ({:.2}) {}", o.confidence, o.label))
        .collect();
    format!("Classification:\n{}", lines.join("\n"))
}

/// Renders the caption for a capture whose classification failed.
pub fn failure_caption(reason: &str) -> String {
    format!("Unable to classify scene.\n{}", reason)
}

/// Maps a capture state onto the caption the entry should show, if any.
///
/// `Idle` and `Capturing` leave the caption untouched (the camera UI owns
/// the screen); every later state has a definite caption.
pub fn caption_for(state: &CaptureState) -> Option<String> {
    match state {
        CaptureState::Idle | CaptureState::Capturing { .. } => None,
        CaptureState::Captured { .. } | CaptureState::Classifying { .. } => {
            Some(IN_FLIGHT_CAPTION.to_string())
        }
        CaptureState::Classified { observations } => Some(ranked_caption(observations)),
        CaptureState::ClassificationFailed { reason } => Some(failure_caption(reason)),
    }
}

/// Formats an entry date like `"Mar 07, 2019"`.
pub fn entry_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}
