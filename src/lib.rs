//! On-device classification core for a camera photo journal: a TF-IDF
//! spam/ham filter over typed messages, and ONNX scene tagging over captured
//! photos with a per-capture choice between a general scene model and a
//! restricted-content model.
//!
//! # Basic Usage
//!
//! Featurization is pure and needs no model files:
//!
//! ```rust
//! use daybook::{vectorize, Vocabulary};
//!
//! let vocabulary = Vocabulary::from_terms(["free", "win", "call"]);
//! let features = vectorize("call me to win a free prize call now", &vocabulary);
//! assert_eq!(features.len(), vocabulary.len());
//! ```
//!
//! # Capture Flow
//!
//! The journal host drives a full capture against a bundled asset directory
//! (vocabulary, models, and label files):
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use daybook::{AssetCatalog, FileCamera, Journal, PixelOrientation, SceneModelKind};
//!
//! let mut journal = Journal::builder()
//!     .with_assets(AssetCatalog::new("assets"))
//!     .with_camera(Arc::new(FileCamera::new("photo.jpg", PixelOrientation::Up)))
//!     .build()?;
//!
//! let entry = journal.capture(SceneModelKind::General);
//! println!("{}\n{}", entry.date_label(), entry.caption);
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod classifier;
pub mod journal;
mod runtime;
pub mod vectorizer;
pub mod vocabulary;

pub use assets::{AssetCatalog, AssetError};
pub use classifier::{
    ClassifierError, MessageClassifier, OnnxTextModel, OnnxVisionModel, Photo, PixelOrientation,
    SceneClassifier, SceneModelKind, SceneObservation, TextModel, VisionModel, VisionModelConfig,
    NO_PREDICTION,
};
pub use journal::{
    Camera, CameraError, FileCamera, Journal, JournalBuilder, JournalEntry, JournalError,
};
pub use runtime::{create_session_builder, OptLevel, RuntimeConfig};
pub use vectorizer::{vectorize, FeatureVector};
pub use vocabulary::{Vocabulary, VocabularyError};

pub fn init_logger() {
    env_logger::init();
}
