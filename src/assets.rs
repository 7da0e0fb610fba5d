use std::env;
use std::path::{Path, PathBuf};

use crate::classifier::SceneModelKind;

/// Text-feature vocabulary, one term per line.
pub const VOCABULARY_FILE: &str = "vocabulary.txt";
/// Spam/ham classifier over the message feature vector.
pub const MESSAGE_MODEL_FILE: &str = "message.onnx";
/// Ordered output labels for the message model.
pub const MESSAGE_LABELS_FILE: &str = "message.labels.txt";
/// General scene classifier.
pub const SCENE_MODEL_FILE: &str = "scene.onnx";
/// Ordered output labels for the scene model.
pub const SCENE_LABELS_FILE: &str = "scene.labels.txt";
/// Restricted-content classifier.
pub const MODERATION_MODEL_FILE: &str = "moderation.onnx";
/// Ordered output labels for the moderation model.
pub const MODERATION_LABELS_FILE: &str = "moderation.labels.txt";

/// Every file a complete asset bundle must contain.
pub const REQUIRED_FILES: [&str; 7] = [
    VOCABULARY_FILE,
    MESSAGE_MODEL_FILE,
    MESSAGE_LABELS_FILE,
    SCENE_MODEL_FILE,
    SCENE_LABELS_FILE,
    MODERATION_MODEL_FILE,
    MODERATION_LABELS_FILE,
];

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Assets directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("Missing assets in {}: {}", .dir.display(), .files.join(", "))]
    MissingAssets { dir: PathBuf, files: Vec<String> },
}

/// Locates the bundled vocabulary, model, and label files.
///
/// The catalog itself is just a directory handle; `validate` is the explicit
/// startup check that every required file is present.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    assets_dir: PathBuf,
}

impl AssetCatalog {
    pub fn new<P: AsRef<Path>>(assets_dir: P) -> Self {
        Self {
            assets_dir: assets_dir.as_ref().to_path_buf(),
        }
    }

    /// Creates a catalog over the default assets directory.
    pub fn new_default() -> Self {
        Self::new(Self::default_assets_dir())
    }

    /// Returns the default assets directory path
    pub fn default_assets_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("DAYBOOK_ASSETS") {
            return PathBuf::from(path);
        }

        // 2. An assets directory next to the working directory
        let local = PathBuf::from("assets");
        if local.is_dir() {
            return local;
        }

        // 3. Use platform-specific data directory
        if let Some(data_dir) = dirs::data_local_dir() {
            return data_dir.join("daybook").join("assets");
        }

        // 4. If all else fails, use system temp directory (platform agnostic)
        env::temp_dir().join("daybook").join("assets")
    }

    pub fn dir(&self) -> &Path {
        &self.assets_dir
    }

    pub fn vocabulary_path(&self) -> PathBuf {
        self.assets_dir.join(VOCABULARY_FILE)
    }

    pub fn message_model_path(&self) -> PathBuf {
        self.assets_dir.join(MESSAGE_MODEL_FILE)
    }

    pub fn message_labels_path(&self) -> PathBuf {
        self.assets_dir.join(MESSAGE_LABELS_FILE)
    }

    pub fn scene_model_path(&self, kind: SceneModelKind) -> PathBuf {
        match kind {
            SceneModelKind::General => self.assets_dir.join(SCENE_MODEL_FILE),
            SceneModelKind::Restricted => self.assets_dir.join(MODERATION_MODEL_FILE),
        }
    }

    pub fn scene_labels_path(&self, kind: SceneModelKind) -> PathBuf {
        match kind {
            SceneModelKind::General => self.assets_dir.join(SCENE_LABELS_FILE),
            SceneModelKind::Restricted => self.assets_dir.join(MODERATION_LABELS_FILE),
        }
    }

    /// Checks that every required file is present, reporting all missing
    /// files in one error rather than stopping at the first.
    pub fn validate(&self) -> Result<(), AssetError> {
        log::info!("Validating assets in {:?}", self.assets_dir);
        if !self.assets_dir.is_dir() {
            return Err(AssetError::DirectoryNotFound(self.assets_dir.clone()));
        }

        let missing: Vec<String> = REQUIRED_FILES
            .iter()
            .filter(|name| !self.assets_dir.join(name).is_file())
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            log::info!("All {} assets present", REQUIRED_FILES.len());
            Ok(())
        } else {
            log::warn!("Missing assets: {}", missing.join(", "));
            Err(AssetError::MissingAssets {
                dir: self.assets_dir.clone(),
                files: missing,
            })
        }
    }
}
