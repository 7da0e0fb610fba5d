use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use log::{info, warn};
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;

use super::error::ClassifierError;
use crate::assets::AssetCatalog;
use crate::runtime::{create_session_builder, RuntimeConfig};
use crate::vectorizer::{vectorize, FeatureVector};
use crate::vocabulary::{read_line_list, Vocabulary};

/// Label reported when the message model cannot produce a prediction.
pub const NO_PREDICTION: &str = "No Prediction";

/// A model that labels a message feature vector.
///
/// Implementations must be thread-safe; the journal shell calls `predict`
/// from worker threads.
pub trait TextModel: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<String, ClassifierError>;
}

/// ONNX-backed text model: feeds the feature vector as a `[1, n]` tensor and
/// maps the highest output score onto an ordered label list.
pub struct OnnxTextModel {
    session: Mutex<Session>,
    input_name: String,
    labels: Vec<String>,
}

impl OnnxTextModel {
    pub fn from_files<P: AsRef<Path>>(
        model_path: P,
        labels_path: P,
        config: &RuntimeConfig,
    ) -> Result<Self, ClassifierError> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            return Err(ClassifierError::ResourceError(format!(
                "Model file not found: {}",
                model_path.display()
            )));
        }

        let labels = read_line_list(labels_path.as_ref())?;
        if labels.is_empty() {
            return Err(ClassifierError::ValidationError(format!(
                "Labels file is empty: {}",
                labels_path.as_ref().display()
            )));
        }

        // Create session using the singleton environment
        let session = create_session_builder(config)?.commit_from_file(model_path)?;
        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or_else(|| ClassifierError::ModelError("Model has no inputs".to_string()))?;

        info!(
            "Text model loaded from {:?} ({} labels)",
            model_path,
            labels.len()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            labels,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl TextModel for OnnxTextModel {
    fn predict(&self, features: &FeatureVector) -> Result<String, ClassifierError> {
        let row: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input_array = Array2::from_shape_vec((1, row.len()), row)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create input array: {}", e)))?;
        let input_dyn = input_array.into_dyn();
        let input_view = input_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            self.input_name.as_str(),
            Tensor::from_array(input_view.into_owned())
                .map_err(|e| ClassifierError::ModelError(format!("Failed to create input tensor: {}", e)))?,
        );

        let mut session = self
            .session
            .lock()
            .map_err(|e| ClassifierError::PredictionError(format!("Session lock poisoned: {}", e)))?;
        let outputs = session
            .run(input_tensors)
            .map_err(|e| ClassifierError::PredictionError(format!("Failed to run model: {}", e)))?;
        let scores = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::PredictionError(format!("Failed to extract scores: {}", e)))?;

        let scores: Vec<f32> = scores.1.iter().cloned().collect();
        if scores.len() != self.labels.len() {
            return Err(ClassifierError::PredictionError(format!(
                "Model produced {} scores for {} labels",
                scores.len(),
                self.labels.len()
            )));
        }

        let best = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(index, _)| index)
            .ok_or_else(|| ClassifierError::PredictionError("Model produced no scores".to_string()))?;

        Ok(self.labels[best].clone())
    }
}

/// Classifies free-form messages by TF-IDF featurization plus a text model.
///
/// `classify` never fails: any model error is logged and reported as the
/// fixed [`NO_PREDICTION`] label, matching the presentation contract.
/// Missing resources are a packaging defect and surface as `Err` at
/// construction instead.
pub struct MessageClassifier {
    vocabulary: Vocabulary,
    model: Box<dyn TextModel>,
}

impl MessageClassifier {
    pub fn new(vocabulary: Vocabulary, model: Box<dyn TextModel>) -> Self {
        Self { vocabulary, model }
    }

    /// Loads the vocabulary, model, and labels from an asset catalog.
    pub fn from_assets(catalog: &AssetCatalog, config: &RuntimeConfig) -> Result<Self, ClassifierError> {
        let vocabulary = Vocabulary::from_file(catalog.vocabulary_path())?;
        let model = OnnxTextModel::from_files(
            catalog.message_model_path(),
            catalog.message_labels_path(),
            config,
        )?;
        Ok(Self::new(vocabulary, Box::new(model)))
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Featurizes `text` and asks the model for a label.
    pub fn classify(&self, text: &str) -> String {
        let features = vectorize(text, &self.vocabulary);
        match self.model.predict(&features) {
            Ok(label) => label,
            Err(e) => {
                warn!("Message prediction failed: {}", e);
                NO_PREDICTION.to_string()
            }
        }
    }
}
