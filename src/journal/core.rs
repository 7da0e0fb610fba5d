use std::sync::Arc;

use crate::classifier::{Photo, SceneModelKind, SceneObservation};

/// Reason recorded when inference completes without producing observations.
pub const NO_RESULTS_REASON: &str = "The classifier returned no results.";

/// Lifecycle of one capture, from shutter press to rendered caption.
#[derive(Debug, Clone, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Capturing {
        kind: SceneModelKind,
    },
    Captured {
        photo: Arc<Photo>,
        kind: SceneModelKind,
    },
    Classifying {
        photo: Arc<Photo>,
        kind: SceneModelKind,
    },
    Classified {
        observations: Vec<SceneObservation>,
    },
    ClassificationFailed {
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub enum JournalEvent {
    /// The user asked for a capture with the given scene model.
    CapturePressed(SceneModelKind),
    /// The camera produced a photo.
    PhotoCaptured(Arc<Photo>),
    /// The camera was dismissed without a photo.
    CaptureCancelled,
    /// Inference was handed to a worker.
    InferenceSubmitted,
    /// The worker returned observations.
    ResultsReady(Vec<SceneObservation>),
    /// The worker failed.
    InferenceFailed(String),
    /// The host acknowledged the outcome and is ready for the next capture.
    Reset,
}

#[derive(Debug, Clone)]
pub enum Effect {
    LaunchCamera(SceneModelKind),
    ClassifyPhoto {
        photo: Arc<Photo>,
        kind: SceneModelKind,
    },
}

/// Advances the capture machine by one event.
///
/// Pure function: the caller runs the returned effects. An event that does
/// not apply in the current state is dropped without a state change, so a
/// worker result arriving after the host has moved on is a no-op rather
/// than a crash or a stale-caption overwrite.
pub fn transition(state: CaptureState, event: JournalEvent) -> (CaptureState, Vec<Effect>) {
    match (state, event) {
        (CaptureState::Idle, JournalEvent::CapturePressed(kind)) => (
            CaptureState::Capturing { kind },
            vec![Effect::LaunchCamera(kind)],
        ),
        (CaptureState::Capturing { kind }, JournalEvent::PhotoCaptured(photo)) => (
            CaptureState::Captured {
                photo: Arc::clone(&photo),
                kind,
            },
            vec![Effect::ClassifyPhoto { photo, kind }],
        ),
        (CaptureState::Capturing { .. }, JournalEvent::CaptureCancelled) => {
            (CaptureState::Idle, vec![])
        }
        (CaptureState::Captured { photo, kind }, JournalEvent::InferenceSubmitted) => {
            (CaptureState::Classifying { photo, kind }, vec![])
        }
        (CaptureState::Classifying { .. }, JournalEvent::ResultsReady(observations)) => {
            if observations.is_empty() {
                (
                    CaptureState::ClassificationFailed {
                        reason: NO_RESULTS_REASON.to_string(),
                    },
                    vec![],
                )
            } else {
                (CaptureState::Classified { observations }, vec![])
            }
        }
        (CaptureState::Classifying { .. }, JournalEvent::InferenceFailed(reason)) => (
            CaptureState::ClassificationFailed { reason },
            vec![],
        ),
        (CaptureState::Classified { .. }, JournalEvent::Reset)
        | (CaptureState::ClassificationFailed { .. }, JournalEvent::Reset) => {
            (CaptureState::Idle, vec![])
        }

        // Default case
        (state, _) => (state, vec![]),
    }
}
