mod error;
mod orientation;
mod text;
mod vision;

pub use error::ClassifierError;
pub use orientation::PixelOrientation;
pub use text::{MessageClassifier, OnnxTextModel, TextModel, NO_PREDICTION};
pub use vision::{
    OnnxVisionModel, Photo, SceneClassifier, SceneObservation, VisionModel, VisionModelConfig,
};

/// Which scene model a capture should run.
///
/// Passed explicitly through the capture flow so two concurrent captures can
/// use different models without sharing mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneModelKind {
    /// Everyday scene tagging.
    General,
    /// Restricted-content screening.
    Restricted,
}
