use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_registry::{
    api::{build_http_client, HttpRecordsApi, RecordsApi},
    cache::RecordsCache,
    config::{Config, StorageBackend},
    form::ImageForm,
    notify::TracingNotifier,
    object_store as obj,
    search::ProductSearch,
    submission::{SubmitOutcome, Submission},
    validation::{ImageFile, ValidationRules},
    AppState,
};

#[derive(Parser)]
#[command(name = "image-registry", about = "Upload and register images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an image and register it with the records API
    Add {
        /// Path to the image
        file: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
    /// Print the registered records
    List,
    /// Search the product catalog
    Search {
        query: String,
    },
    /// Add a product to the wishlist
    Wishlist {
        product_id: u64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    match log_format.to_lowercase().as_str() {
        "gcp" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_stackdriver::layer())
                .init();
        }
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_list(false),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let config = Config::load()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        records_api = %config.api.records_url,
        "image-registry starting"
    );

    let state = build_state(config).await?;

    match cli.command {
        Commands::Add {
            file,
            title,
            description,
        } => add(&state, file, title, description).await,
        Commands::List => {
            let records = state.cache.records().await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
        Commands::Search { query } => {
            let products = state.search.search(&query).await?;
            println!("{}", serde_json::to_string_pretty(&products)?);
            Ok(())
        }
        Commands::Wishlist { product_id } => {
            state.search.add_to_wishlist(product_id);
            Ok(())
        }
    }
}

async fn build_state(config: Config) -> anyhow::Result<AppState> {
    let uploader: Arc<dyn obj::Uploader> = match config.storage.backend {
        StorageBackend::Local => {
            let store = obj::LocalStore::new(
                &config.storage.local_storage_path,
                &config.storage.public_base_url,
            )?;
            info!(
                "Using local storage backend at: {}",
                config.storage.local_storage_path
            );
            Arc::new(store)
        }
        StorageBackend::Gcs => {
            let bucket = config
                .storage
                .gcs_bucket
                .as_deref()
                .context("GCS_BUCKET is required when STORAGE_BACKEND=gcs")?;
            let store =
                obj::GcsStore::new(bucket, config.storage.gcs_credentials_file.as_deref()).await?;
            info!("Using GCS storage backend, bucket: {}", bucket);
            Arc::new(store)
        }
    };

    let client = build_http_client(config.api.timeout)?;
    let api: Arc<dyn RecordsApi> =
        Arc::new(HttpRecordsApi::new(client.clone(), &config.api.records_url));
    let cache = Arc::new(RecordsCache::new(Arc::clone(&api)));
    let submission = Submission::new(
        api,
        cache.clone(),
        Arc::new(TracingNotifier),
        ValidationRules::with_max_image_bytes(config.max_upload_size),
    );
    let search = ProductSearch::new(client, &config.api.catalog_url);

    Ok(AppState {
        cache,
        search,
        submission,
        uploader,
    })
}

async fn add(
    state: &AppState,
    file: PathBuf,
    title: String,
    description: String,
) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&file)
        .await
        .with_context(|| format!("Failed to read image: {}", file.display()))?;
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();

    let mut form = ImageForm::new();
    form.set_title(title);
    form.set_description(description);

    // Same as picking a file: the upload starts before submit, and a failed
    // upload surfaces later as a missing-upload notification.
    if let Err(e) = form
        .attach_image(ImageFile::new(name, bytes), state.uploader.as_ref())
        .await
    {
        tracing::error!(error = %e, "Image upload failed");
    }

    match state.submission.submit(&mut form).await {
        SubmitOutcome::Registered => Ok(()),
        SubmitOutcome::Invalid(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("{field}: {message}");
            }
            anyhow::bail!("image draft is invalid")
        }
        outcome => anyhow::bail!("image was not registered: {outcome:?}"),
    }
}
