pub mod core;
pub mod render;

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;
use std::thread;

use chrono::{Local, NaiveDate};
use log::{debug, info, warn};

use self::core::{transition, CaptureState, Effect, JournalEvent};
use crate::assets::{AssetCatalog, AssetError};
use crate::classifier::{
    ClassifierError, MessageClassifier, Photo, PixelOrientation, SceneClassifier, SceneModelKind,
};
use crate::runtime::RuntimeConfig;

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("No camera configured")]
    MissingCamera,
    #[error("Asset error: {0}")]
    Assets(#[from] AssetError),
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),
}

#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("Capture cancelled")]
    Cancelled,
    #[error("Camera unavailable: {0}")]
    Unavailable(String),
    #[error("Could not read photo: {0}")]
    Decode(#[from] image::ImageError),
}

/// The capture device seam. The real camera UI lives outside this crate;
/// anything that can hand back a [`Photo`] can stand in for it.
pub trait Camera: Send + Sync {
    fn capture(&self) -> Result<Photo, CameraError>;
}

/// A camera that "captures" by decoding an image file, with a caller-supplied
/// orientation standing in for the EXIF metadata a device camera would record.
pub struct FileCamera {
    path: PathBuf,
    orientation: PixelOrientation,
}

impl FileCamera {
    pub fn new<P: AsRef<Path>>(path: P, orientation: PixelOrientation) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            orientation,
        }
    }
}

impl Camera for FileCamera {
    fn capture(&self) -> Result<Photo, CameraError> {
        let image = image::open(&self.path)?;
        Ok(Photo::new(image, self.orientation))
    }
}

/// One journal page: the date it was opened, the caption under the photo,
/// and the photo itself once a capture succeeds.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub caption: String,
    pub photo: Option<Arc<Photo>>,
}

impl JournalEntry {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            caption: String::new(),
            photo: None,
        }
    }

    /// The date formatted for display, like `"Mar 07, 2019"`.
    pub fn date_label(&self) -> String {
        render::entry_date(self.date)
    }
}

/// The journal host: owns today's entry and drives the capture machine.
///
/// Captures run an explicit event loop: the shutter press, the camera result,
/// and the worker's inference result all arrive as [`JournalEvent`]s on one
/// channel and are folded through the pure [`transition`] function on the
/// calling thread. Inference itself runs on a spawned worker; its result is
/// sent back with `let _ = tx.send(..)`, so a worker that outlives the host
/// quietly drops its answer instead of touching dead state.
pub struct Journal {
    message_classifier: MessageClassifier,
    scene_classifier: Arc<SceneClassifier>,
    camera: Arc<dyn Camera>,
    entry: JournalEntry,
    state: CaptureState,
}

impl Journal {
    /// Creates a new JournalBuilder for fluent construction
    pub fn builder() -> JournalBuilder {
        JournalBuilder::new()
    }

    pub fn entry(&self) -> &JournalEntry {
        &self.entry
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Classifies a typed message on the calling thread.
    pub fn classify_message(&self, text: &str) -> String {
        self.message_classifier.classify(text)
    }

    /// Runs one full capture: launches the camera, classifies the photo with
    /// the selected scene model, and leaves the rendered caption on the
    /// entry. Returns the entry once the capture settles.
    pub fn capture(&mut self, kind: SceneModelKind) -> &JournalEntry {
        let (tx, rx) = channel();
        self.apply(JournalEvent::CapturePressed(kind), &tx);

        // Drain events until the machine settles. While we are in a busy
        // state exactly one sender is still due to report: the camera result
        // is queued before Capturing is observed, and the worker holds a
        // sender clone until it answers.
        while matches!(
            self.state,
            CaptureState::Capturing { .. }
                | CaptureState::Captured { .. }
                | CaptureState::Classifying { .. }
        ) {
            match rx.recv() {
                Ok(event) => self.apply(event, &tx),
                Err(_) => break,
            }
        }

        // The caption survives on the entry; the machine is ready for the
        // next capture.
        self.apply(JournalEvent::Reset, &tx);
        &self.entry
    }

    fn apply(&mut self, event: JournalEvent, tx: &Sender<JournalEvent>) {
        let (next, effects) = transition(std::mem::take(&mut self.state), event);
        debug!("capture state: {:?} ({} effects)", next, effects.len());
        self.state = next;

        if let CaptureState::Captured { photo, .. } = &self.state {
            self.entry.photo = Some(Arc::clone(photo));
        }
        if let Some(caption) = render::caption_for(&self.state) {
            self.entry.caption = caption;
        }

        for effect in effects {
            self.run_effect(effect, tx);
        }
    }

    fn run_effect(&self, effect: Effect, tx: &Sender<JournalEvent>) {
        match effect {
            Effect::LaunchCamera(kind) => {
                info!("Launching camera for {:?} capture", kind);
                let event = match self.camera.capture() {
                    Ok(photo) => JournalEvent::PhotoCaptured(Arc::new(photo)),
                    Err(CameraError::Cancelled) => JournalEvent::CaptureCancelled,
                    Err(e) => {
                        warn!("Camera failed: {}", e);
                        JournalEvent::CaptureCancelled
                    }
                };
                let _ = tx.send(event);
            }
            Effect::ClassifyPhoto { photo, kind } => {
                let _ = tx.send(JournalEvent::InferenceSubmitted);
                let classifier = Arc::clone(&self.scene_classifier);
                let tx = tx.clone();
                thread::spawn(move || {
                    let event = match classifier.classify(&photo, kind) {
                        Ok(observations) => JournalEvent::ResultsReady(observations),
                        Err(e) => JournalEvent::InferenceFailed(e.to_string()),
                    };
                    let _ = tx.send(event);
                });
            }
        }
    }
}

/// Fluent constructor for [`Journal`].
///
/// `build` is the startup validation step: with no classifiers injected it
/// checks the asset bundle and loads every model eagerly, so a broken bundle
/// fails here with an `Err` instead of crashing mid-capture.
pub struct JournalBuilder {
    assets: Option<AssetCatalog>,
    camera: Option<Arc<dyn Camera>>,
    message_classifier: Option<MessageClassifier>,
    scene_classifier: Option<SceneClassifier>,
    runtime_config: RuntimeConfig,
}

impl JournalBuilder {
    pub fn new() -> Self {
        Self {
            assets: None,
            camera: None,
            message_classifier: None,
            scene_classifier: None,
            runtime_config: RuntimeConfig::default(),
        }
    }

    pub fn with_assets(mut self, catalog: AssetCatalog) -> Self {
        self.assets = Some(catalog);
        self
    }

    pub fn with_camera(mut self, camera: Arc<dyn Camera>) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Replaces the asset-loaded message classifier, bypassing asset
    /// validation for the text path.
    pub fn with_message_classifier(mut self, classifier: MessageClassifier) -> Self {
        self.message_classifier = Some(classifier);
        self
    }

    /// Replaces the asset-loaded scene classifier, bypassing asset
    /// validation for the image path.
    pub fn with_scene_classifier(mut self, classifier: SceneClassifier) -> Self {
        self.scene_classifier = Some(classifier);
        self
    }

    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    pub fn build(self) -> Result<Journal, JournalError> {
        let camera = self.camera.ok_or(JournalError::MissingCamera)?;

        let (message_classifier, scene_classifier) =
            match (self.message_classifier, self.scene_classifier) {
                (Some(message), Some(scene)) => (message, scene),
                (message, scene) => {
                    let catalog = self.assets.unwrap_or_else(AssetCatalog::new_default);
                    catalog.validate()?;
                    let message = match message {
                        Some(m) => m,
                        None => MessageClassifier::from_assets(&catalog, &self.runtime_config)?,
                    };
                    let scene = match scene {
                        Some(s) => s,
                        None => SceneClassifier::from_assets(&catalog, &self.runtime_config)?,
                    };
                    (message, scene)
                }
            };

        info!("Journal ready");
        Ok(Journal {
            message_classifier,
            scene_classifier: Arc::new(scene_classifier),
            camera,
            entry: JournalEntry::new(Local::now().date_naive()),
            state: CaptureState::default(),
        })
    }
}

impl Default for JournalBuilder {
    fn default() -> Self {
        Self::new()
    }
}
