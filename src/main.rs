use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use daybook::journal::core::NO_RESULTS_REASON;
use daybook::journal::render;
use daybook::{
    AssetCatalog, FileCamera, Journal, MessageClassifier, Photo, PixelOrientation, RuntimeConfig,
    SceneClassifier, SceneModelKind,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Asset bundle directory (defaults to $DAYBOOK_ASSETS, ./assets, or the
    /// platform data directory)
    #[arg(long)]
    assets: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the asset bundle and load every model
    Check,
    /// Classify a typed message as spam or ham
    Text {
        /// The message to classify
        message: String,
    },
    /// Classify an image file and print the ranked caption
    Photo {
        /// Path to the image file
        path: PathBuf,
        /// Use the restricted-content model instead of the general scene model
        #[arg(long)]
        restricted: bool,
        /// EXIF orientation code (1-8) of the stored pixels
        #[arg(long, default_value_t = 1)]
        orientation: u16,
    },
    /// Run a full capture through the journal with a file-backed camera
    Journal {
        /// Path to the image file the camera will "capture"
        path: PathBuf,
        /// Use the restricted-content model instead of the general scene model
        #[arg(long)]
        restricted: bool,
        /// EXIF orientation code (1-8) of the stored pixels
        #[arg(long, default_value_t = 1)]
        orientation: u16,
    },
}

fn main() -> Result<()> {
    daybook::init_logger();
    let args = Args::parse();

    let catalog = match args.assets {
        Some(dir) => AssetCatalog::new(dir),
        None => AssetCatalog::new_default(),
    };

    match args.command {
        Command::Check => check(&catalog),
        Command::Text { message } => classify_text(&catalog, &message),
        Command::Photo {
            path,
            restricted,
            orientation,
        } => classify_photo(&catalog, &path, restricted, orientation),
        Command::Journal {
            path,
            restricted,
            orientation,
        } => run_journal(catalog, &path, restricted, orientation),
    }
}

fn kind_for(restricted: bool) -> SceneModelKind {
    if restricted {
        SceneModelKind::Restricted
    } else {
        SceneModelKind::General
    }
}

fn orientation_for(code: u16) -> Result<PixelOrientation> {
    PixelOrientation::from_exif(code)
        .ok_or_else(|| anyhow::anyhow!("Invalid orientation code {} (expected 1-8)", code))
}

fn check(catalog: &AssetCatalog) -> Result<()> {
    info!("Checking asset bundle at {:?}", catalog.dir());
    catalog.validate()?;

    let config = RuntimeConfig::default();
    let start = Instant::now();
    MessageClassifier::from_assets(catalog, &config)?;
    SceneClassifier::from_assets(catalog, &config)?;
    info!("All models loaded in {:.2?}", start.elapsed());

    println!("Asset bundle OK: {}", catalog.dir().display());
    Ok(())
}

fn classify_text(catalog: &AssetCatalog, message: &str) -> Result<()> {
    let classifier = MessageClassifier::from_assets(catalog, &RuntimeConfig::default())?;
    info!("Classifying message: {}", message);
    println!("{}", classifier.classify(message));
    Ok(())
}

fn classify_photo(
    catalog: &AssetCatalog,
    path: &PathBuf,
    restricted: bool,
    orientation: u16,
) -> Result<()> {
    let orientation = orientation_for(orientation)?;
    let classifier = SceneClassifier::from_assets(catalog, &RuntimeConfig::default())?;

    info!("Classifying {:?}", path);
    let photo = Photo::new(image::open(path)?, orientation);
    let start = Instant::now();
    match classifier.classify(&photo, kind_for(restricted)) {
        Ok(observations) if !observations.is_empty() => {
            println!("{}", render::ranked_caption(&observations));
        }
        Ok(_) => println!("{}", render::failure_caption(NO_RESULTS_REASON)),
        Err(e) => println!("{}", render::failure_caption(&e.to_string())),
    }
    info!("Classified in {:.2?}", start.elapsed());
    Ok(())
}

fn run_journal(
    catalog: AssetCatalog,
    path: &PathBuf,
    restricted: bool,
    orientation: u16,
) -> Result<()> {
    let orientation = orientation_for(orientation)?;
    let mut journal = Journal::builder()
        .with_assets(catalog)
        .with_camera(Arc::new(FileCamera::new(path, orientation)))
        .build()?;

    let entry = journal.capture(kind_for(restricted));
    println!("{}", entry.date_label());
    println!("{}", entry.caption);
    Ok(())
}
