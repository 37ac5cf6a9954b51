use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use lookbook::server::{self, State};
use lookbook::{
    BuiltinModel, Classify, ContentRegistry, ImageClassifier, ModelInfo, ModelManager,
};

/// Curated content shipped with the demo, keyed to the built-in model's
/// vocabulary.
const DEFAULT_CONTENT: &str = include_str!("../assets/content.json");

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the demo server to
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Force a fresh download of the model files
    #[arg(short, long)]
    fresh: bool,

    /// Remote model file URL (overrides the built-in model; requires the
    /// matching hash and labels flags)
    #[arg(long, requires_all = ["model_hash", "labels_url", "labels_hash"])]
    model_url: Option<String>,

    /// SHA-256 hash of the remote model file
    #[arg(long)]
    model_hash: Option<String>,

    /// Remote labels file URL (JSON array of strings, in model output order)
    #[arg(long)]
    labels_url: Option<String>,

    /// SHA-256 hash of the remote labels file
    #[arg(long)]
    labels_hash: Option<String>,

    /// Cache directory name for a custom model
    #[arg(long, default_value = "custom")]
    model_name: String,

    /// Input edge length a custom model expects, in pixels
    #[arg(long)]
    input_size: Option<u32>,

    /// Path to the curated content registry (JSON); the bundled registry is
    /// used when omitted
    #[arg(long)]
    content: Option<PathBuf>,
}

fn resolve_model_source(args: &Args) -> ModelInfo {
    match (&args.model_url, &args.model_hash, &args.labels_url, &args.labels_hash) {
        (Some(model_url), Some(model_hash), Some(labels_url), Some(labels_hash)) => ModelInfo {
            name: args.model_name.clone(),
            model_url: model_url.clone(),
            labels_url: labels_url.clone(),
            model_hash: model_hash.clone(),
            labels_hash: labels_hash.clone(),
        },
        _ => BuiltinModel::SqueezeNet.get_model_info(),
    }
}

fn build_classifier(
    manager: &ModelManager,
    info: &ModelInfo,
    args: &Args,
) -> anyhow::Result<ImageClassifier> {
    let builder = if args.model_url.is_some() {
        let input_size = args.input_size.map(|edge| (edge, edge));
        ImageClassifier::builder().with_custom_model(
            &manager.get_model_path(&info.name).to_string_lossy(),
            &manager.get_labels_path(&info.name).to_string_lossy(),
            input_size,
        )?
    } else {
        ImageClassifier::builder().with_model(BuiltinModel::SqueezeNet)?
    };
    builder.build().context("Failed to build the classifier")
}

fn load_registry(args: &Args) -> anyhow::Result<ContentRegistry> {
    match &args.content {
        Some(path) => ContentRegistry::from_path(path)
            .with_context(|| format!("Failed to load content registry from {:?}", path)),
        None => ContentRegistry::from_json(DEFAULT_CONTENT)
            .context("Bundled content registry is malformed"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("=== Starting Lookbook Demo ===");

    let model_info = resolve_model_source(&args);
    let manager = ModelManager::new_default().context("Failed to create model manager")?;

    if args.fresh {
        info!("Fresh download requested - removing any existing model files...");
        manager.remove_download(&model_info.name)?;
    }

    if let Err(e) = manager.ensure_model_downloaded(&model_info).await {
        // The demo cannot do anything without a classifier
        log::error!("Model setup failed: {}", e);
        eprintln!("The classifier model could not be downloaded or verified: {e}");
        eprintln!("Check your network connection and the model URL/hash flags, then try again.");
        std::process::exit(1);
    }

    let classifier = build_classifier(&manager, &model_info, &args)?;
    let labels = classifier.labels().to_vec();
    info!(
        "Classifier ready: {} labels, input {}x{}",
        labels.len(),
        classifier.model_characteristics.input_width,
        classifier.model_characteristics.input_height
    );

    // Two-phase initialization: the vocabulary comes from the loaded model,
    // then the registry is checked against that exact key set
    let registry = load_registry(&args)?;
    let report = registry.validate_against(&labels);
    if !report.unknown.is_empty() {
        warn!(
            "{} content registry entries will never be shown: {:?}",
            report.unknown.len(),
            report.unknown
        );
    }

    let state = Arc::new(State::new(
        Arc::new(classifier) as Arc<dyn Classify>,
        Arc::new(registry),
    ));
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("Failed to bind {}", args.addr))?;
    info!("Serving on http://{}", args.addr);
    println!("Lookbook is running on http://{}", args.addr);

    axum::serve(listener, app)
        .await
        .context("Server exited with an error")?;

    Ok(())
}
