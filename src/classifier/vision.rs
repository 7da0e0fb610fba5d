use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use image::imageops::FilterType;
use image::DynamicImage;
use log::info;
use ndarray::Array4;
use ort::session::Session;
use ort::value::Tensor;
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::orientation::PixelOrientation;
use super::SceneModelKind;
use crate::assets::AssetCatalog;
use crate::runtime::{create_session_builder, RuntimeConfig};
use crate::vocabulary::read_line_list;

/// One labeled scene hypothesis with its confidence in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObservation {
    pub label: String,
    pub confidence: f32,
}

impl SceneObservation {
    pub fn new<S: Into<String>>(label: S, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// A captured photo plus the orientation metadata the camera recorded.
#[derive(Debug, Clone)]
pub struct Photo {
    pub image: DynamicImage,
    pub orientation: PixelOrientation,
}

impl Photo {
    pub fn new(image: DynamicImage, orientation: PixelOrientation) -> Self {
        Self { image, orientation }
    }

    /// The pixels normalized to upright, ready for inference.
    pub fn upright(&self) -> DynamicImage {
        self.orientation.apply(self.image.clone())
    }
}

/// A model that labels an already-upright image.
///
/// Implementations must be thread-safe; the journal shell calls `classify`
/// from worker threads.
pub trait VisionModel: Send + Sync {
    fn classify(&self, image: &DynamicImage) -> Result<Vec<SceneObservation>, ClassifierError>;
}

/// Preprocessing settings for [`OnnxVisionModel`].
#[derive(Debug, Clone)]
pub struct VisionModelConfig {
    /// Model input edge in pixels; the image is resized to a square.
    pub input_size: u32,
    /// Per-channel normalization mean (RGB order).
    pub mean: [f32; 3],
    /// Per-channel normalization standard deviation (RGB order).
    pub std: [f32; 3],
}

impl Default for VisionModelConfig {
    fn default() -> Self {
        // Normalization values for ImageNet-pretrained models
        Self {
            input_size: 224,
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

/// ONNX-backed vision model: resizes to the input edge, normalizes RGB
/// channels, runs the session on a `[1, 3, H, W]` tensor, and softmaxes the
/// outputs against an ordered label list.
pub struct OnnxVisionModel {
    session: Mutex<Session>,
    input_name: String,
    labels: Vec<String>,
    config: VisionModelConfig,
}

impl OnnxVisionModel {
    pub fn from_files<P: AsRef<Path>>(
        model_path: P,
        labels_path: P,
        vision_config: VisionModelConfig,
        runtime_config: &RuntimeConfig,
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
        let session = create_session_builder(runtime_config)?.commit_from_file(model_path)?;
        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or_else(|| ClassifierError::ModelError("Model has no inputs".to_string()))?;

        info!(
            "Vision model loaded from {:?} ({} labels)",
            model_path,
            labels.len()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            labels,
            config: vision_config,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Converts an upright image into a normalized `[1, 3, H, W]` array.
    fn preprocess(&self, image: &DynamicImage) -> Array4<f32> {
        let size = self.config.input_size;
        let resized = image.resize_exact(size, size, FilterType::Triangle);
        let rgb = resized.to_rgb8();

        let size = size as usize;
        let mut pixels = Array4::<f32>::zeros((1, 3, size, size));
        for (y, row) in rgb.rows().enumerate() {
            for (x, pixel) in row.enumerate() {
                for channel in 0..3 {
                    let value = pixel[channel] as f32 / 255.0;
                    pixels[[0, channel, y, x]] =
                        (value - self.config.mean[channel]) / self.config.std[channel];
                }
            }
        }
        pixels
    }
}

impl VisionModel for OnnxVisionModel {
    fn classify(&self, image: &DynamicImage) -> Result<Vec<SceneObservation>, ClassifierError> {
        let pixels = self.preprocess(image);
        let input_dyn = pixels.into_dyn();
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

        let logits: Vec<f32> = scores.1.iter().cloned().collect();
        if logits.len() != self.labels.len() {
            return Err(ClassifierError::ModelError(format!(
                "Model produced {} scores for {} labels",
                logits.len(),
                self.labels.len()
            )));
        }

        let confidences = softmax(&logits);
        Ok(self
            .labels
            .iter()
            .zip(confidences)
            .map(|(label, confidence)| SceneObservation::new(label.clone(), confidence))
            .collect())
    }
}

/// Numerically stable softmax.
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.iter().map(|x| x / sum).collect()
}

/// Routes a photo to one of two eagerly loaded vision models.
///
/// The general model tags everyday scenes; the restricted model screens for
/// content the journal must not caption. Which one runs is an explicit
/// argument to `classify`, so concurrent captures cannot race on a shared
/// toggle. Both models load at construction: a bundle that cannot produce a
/// working model pair is a configuration defect surfaced as `Err`, not a
/// deferred crash.
pub struct SceneClassifier {
    general: Box<dyn VisionModel>,
    restricted: Box<dyn VisionModel>,
}

impl SceneClassifier {
    pub fn new(general: Box<dyn VisionModel>, restricted: Box<dyn VisionModel>) -> Self {
        Self {
            general,
            restricted,
        }
    }

    /// Loads both scene models from an asset catalog.
    pub fn from_assets(catalog: &AssetCatalog, config: &RuntimeConfig) -> Result<Self, ClassifierError> {
        let general = OnnxVisionModel::from_files(
            catalog.scene_model_path(SceneModelKind::General),
            catalog.scene_labels_path(SceneModelKind::General),
            VisionModelConfig::default(),
            config,
        )?;
        let restricted = OnnxVisionModel::from_files(
            catalog.scene_model_path(SceneModelKind::Restricted),
            catalog.scene_labels_path(SceneModelKind::Restricted),
            VisionModelConfig::default(),
            config,
        )?;
        info!("Scene classifier ready (general + restricted models)");
        Ok(Self::new(Box::new(general), Box::new(restricted)))
    }

    /// Normalizes the photo upright, runs the selected model, and returns
    /// observations sorted by confidence, highest first.
    pub fn classify(
        &self,
        photo: &Photo,
        kind: SceneModelKind,
    ) -> Result<Vec<SceneObservation>, ClassifierError> {
        let upright = photo.upright();
        let model = match kind {
            SceneModelKind::General => &self.general,
            SceneModelKind::Restricted => &self.restricted,
        };

        let mut observations = model.classify(&upright)?;
        observations.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct FakeVisionModel {
        observations: Vec<SceneObservation>,
        seen_dimensions: Arc<Mutex<Vec<(u32, u32)>>>,
    }

    impl FakeVisionModel {
        fn returning(observations: Vec<SceneObservation>) -> (Self, Arc<Mutex<Vec<(u32, u32)>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    observations,
                    seen_dimensions: Arc::clone(&seen),
                },
                seen,
            )
        }
    }

    impl VisionModel for FakeVisionModel {
        fn classify(&self, image: &DynamicImage) -> Result<Vec<SceneObservation>, ClassifierError> {
            self.seen_dimensions
                .lock()
                .unwrap()
                .push((image.width(), image.height()));
            Ok(self.observations.clone())
        }
    }

    struct FailingVisionModel;

    impl VisionModel for FailingVisionModel {
        fn classify(&self, _image: &DynamicImage) -> Result<Vec<SceneObservation>, ClassifierError> {
            Err(ClassifierError::PredictionError("inference failed".to_string()))
        }
    }

    fn test_photo(width: u32, height: u32, orientation: PixelOrientation) -> Photo {
        let image = DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
        Photo::new(image, orientation)
    }

    #[test]
    fn test_softmax_uniform() {
        let probs = softmax(&[0.0, 0.0]);
        assert!((probs[0] - 0.5).abs() < 1e-6);
        assert!((probs[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[3.0, -1.0, 0.5, 10.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs[3] > 0.99);
    }

    #[test]
    fn test_classify_selects_general_model() {
        let (general, general_seen) =
            FakeVisionModel::returning(vec![SceneObservation::new("beach", 0.9)]);
        let (restricted, restricted_seen) =
            FakeVisionModel::returning(vec![SceneObservation::new("flagged", 0.9)]);
        let classifier = SceneClassifier::new(Box::new(general), Box::new(restricted));

        let observations = classifier
            .classify(&test_photo(4, 4, PixelOrientation::Up), SceneModelKind::General)
            .unwrap();

        assert_eq!(observations[0].label, "beach");
        assert_eq!(general_seen.lock().unwrap().len(), 1);
        assert_eq!(restricted_seen.lock().unwrap().len(), 0);
    }

    #[test]
    fn test_classify_selects_restricted_model() {
        let (general, general_seen) =
            FakeVisionModel::returning(vec![SceneObservation::new("beach", 0.9)]);
        let (restricted, restricted_seen) =
            FakeVisionModel::returning(vec![SceneObservation::new("flagged", 0.9)]);
        let classifier = SceneClassifier::new(Box::new(general), Box::new(restricted));

        let observations = classifier
            .classify(
                &test_photo(4, 4, PixelOrientation::Up),
                SceneModelKind::Restricted,
            )
            .unwrap();

        assert_eq!(observations[0].label, "flagged");
        assert_eq!(general_seen.lock().unwrap().len(), 0);
        assert_eq!(restricted_seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_observations_sorted_by_confidence_descending() {
        let (model, _) = FakeVisionModel::returning(vec![
            SceneObservation::new("low", 0.1),
            SceneObservation::new("high", 0.8),
            SceneObservation::new("mid", 0.3),
        ]);
        let (other, _) = FakeVisionModel::returning(vec![]);
        let classifier = SceneClassifier::new(Box::new(model), Box::new(other));

        let observations = classifier
            .classify(&test_photo(4, 4, PixelOrientation::Up), SceneModelKind::General)
            .unwrap();

        let labels: Vec<&str> = observations.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["high", "mid", "low"]);
    }

    #[test]
    fn test_orientation_normalized_before_inference() {
        let (model, seen) = FakeVisionModel::returning(vec![]);
        let (other, _) = FakeVisionModel::returning(vec![]);
        let classifier = SceneClassifier::new(Box::new(model), Box::new(other));

        // A 3x2 buffer stored sideways comes out 2x3 once upright.
        classifier
            .classify(&test_photo(3, 2, PixelOrientation::Right), SceneModelKind::General)
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![(2, 3)]);
    }

    #[test]
    fn test_model_failure_propagates() {
        let (other, _) = FakeVisionModel::returning(vec![]);
        let classifier = SceneClassifier::new(Box::new(FailingVisionModel), Box::new(other));

        let result = classifier.classify(&test_photo(4, 4, PixelOrientation::Up), SceneModelKind::General);
        assert!(matches!(result, Err(ClassifierError::PredictionError(_))));
    }
}
