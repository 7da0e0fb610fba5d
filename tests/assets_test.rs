use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use daybook::{
    AssetCatalog, AssetError, Camera, CameraError, Journal, JournalError, Photo, SceneModelKind,
};

fn temp_assets_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("daybook-it-assets-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

struct NoCamera;

impl Camera for NoCamera {
    fn capture(&self) -> Result<Photo, CameraError> {
        Err(CameraError::Unavailable("test".to_string()))
    }
}

#[test]
fn test_validate_missing_directory() {
    let catalog = AssetCatalog::new("/tmp/daybook-it-no-such-bundle");
    let err = catalog.validate().unwrap_err();
    assert!(matches!(err, AssetError::DirectoryNotFound(_)));
}

#[test]
fn test_validate_lists_every_missing_asset() {
    let dir = temp_assets_dir("partial");
    fs::write(dir.join("vocabulary.txt"), "free\nwin\ncall\n").unwrap();
    fs::write(dir.join("message.labels.txt"), "ham\nspam\n").unwrap();

    let catalog = AssetCatalog::new(&dir);
    match catalog.validate().unwrap_err() {
        AssetError::MissingAssets { files, .. } => {
            assert!(files.contains(&"message.onnx".to_string()));
            assert!(files.contains(&"scene.onnx".to_string()));
            assert!(files.contains(&"scene.labels.txt".to_string()));
            assert!(files.contains(&"moderation.onnx".to_string()));
            assert!(files.contains(&"moderation.labels.txt".to_string()));
            assert!(!files.contains(&"vocabulary.txt".to_string()));
            assert!(!files.contains(&"message.labels.txt".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_scene_paths_follow_model_kind() {
    let catalog = AssetCatalog::new("/tmp/bundle");
    assert_ne!(
        catalog.scene_model_path(SceneModelKind::General),
        catalog.scene_model_path(SceneModelKind::Restricted)
    );
    assert_ne!(
        catalog.scene_labels_path(SceneModelKind::General),
        catalog.scene_labels_path(SceneModelKind::Restricted)
    );
}

#[test]
fn test_journal_build_fails_fast_on_broken_bundle() {
    // Startup validation: a bundle with no models must fail at build() with
    // the full list of missing files, before any capture is attempted.
    let dir = temp_assets_dir("broken");
    fs::write(dir.join("vocabulary.txt"), "free\nwin\ncall\n").unwrap();

    let result = Journal::builder()
        .with_assets(AssetCatalog::new(&dir))
        .with_camera(Arc::new(NoCamera))
        .build();

    match result {
        Err(JournalError::Assets(AssetError::MissingAssets { files, .. })) => {
            assert_eq!(files.len(), 6);
        }
        other => panic!("unexpected result: {:?}", other.err()),
    }
}
