use ort::Error as OrtError;
use std::fmt;

use crate::vocabulary::VocabularyError;

/// Represents the different types of errors that can occur in the classifiers.
#[derive(Debug)]
pub enum ClassifierError {
    /// Error occurred while locating or reading a bundled resource
    ResourceError(String),
    /// Error occurred while loading or running an ONNX model
    ModelError(String),
    /// Error occurred while decoding or preparing pixel data
    ImageError(String),
    /// Error occurred while interpreting model outputs
    PredictionError(String),
    /// Error occurred due to invalid input parameters
    ValidationError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceError(msg) => write!(f, "Resource error: {}", msg),
            Self::ModelError(msg) => write!(f, "Model error: {}", msg),
            Self::ImageError(msg) => write!(f, "Image error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<OrtError> for ClassifierError {
    fn from(err: OrtError) -> Self {
        ClassifierError::ModelError(err.to_string())
    }
}

impl From<VocabularyError> for ClassifierError {
    fn from(err: VocabularyError) -> Self {
        ClassifierError::ResourceError(err.to_string())
    }
}

impl From<image::ImageError> for ClassifierError {
    fn from(err: image::ImageError) -> Self {
        ClassifierError::ImageError(err.to_string())
    }
}
