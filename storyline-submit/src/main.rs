//! storyline-submit - submit one draft work from the command line
//!
//! Wires bootstrap configuration, the filesystem object store and the SQLite
//! document store into the submission pipeline, waits for the redirect, then
//! prints the notifications and navigation intents it emitted.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storyline_common::config::{
    default_config_path, load_toml_config, RootFolderInitializer, RootFolderResolver, TomlConfig,
};
use storyline_common::events::{EventBus, StorylineEvent};
use storyline_submit::db::{init_database_pool, SqliteDocumentStore};
use storyline_submit::models::{Genre, WorkFields};
use storyline_submit::services::LogNavigator;
use storyline_submit::storage::LocalObjectStore;
use storyline_submit::{build_orchestrator, SubmissionServices};
use tokio::sync::broadcast;
use tracing::{error, info, warn};

const MODULE_NAME: &str = "storyline-submit";

#[derive(Parser, Debug)]
#[command(version, about = "Submit a new draft work")]
struct Args {
    /// Work title (required, must not be blank)
    #[arg(long)]
    title: String,

    /// Work description
    #[arg(long, default_value = "")]
    description: String,

    /// Genre tag (horror, drama, romance, sci-fi, fantasy)
    #[arg(long, default_value = "")]
    tag: String,

    /// Cover image to upload
    #[arg(long)]
    cover: Option<PathBuf>,

    /// Root folder holding the object store and database
    #[arg(short, long, env = "STORYLINE_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// List the genre catalog and exit
    #[arg(long)]
    list_genres: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(|| default_config_path(MODULE_NAME));

    let bootstrap_level = args.log_level.clone().unwrap_or_else(|| "info".to_string());
    let config = load_config(config_path.as_deref(), &bootstrap_level)?;

    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));
    match &config.logging.file {
        Some(log_path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    info!("Starting {} v{}", MODULE_NAME, env!("CARGO_PKG_VERSION"));

    if args.list_genres {
        for genre in Genre::ALL {
            println!("{:<8} {}", genre.value(), genre.label());
        }
        return Ok(());
    }

    let root_folder = RootFolderResolver::new(MODULE_NAME)
        .with_cli_arg(args.root_folder.clone())
        .with_toml(&config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());
    let pool = init_database_pool(&db_path)
        .await
        .context("Failed to open database")?;

    let settings = config.submission.clone();
    let object_store = LocalObjectStore::new(initializer.objects_path())
        .with_public_base_url(settings.public_base_url.clone());

    let event_bus = EventBus::new(100);
    let mut events = event_bus.subscribe();

    let services = SubmissionServices::new(
        Arc::new(object_store),
        Arc::new(SqliteDocumentStore::new(pool.clone())),
        Arc::new(LogNavigator),
        event_bus,
    );
    let orchestrator = build_orchestrator(settings, services)?;

    if let Some(cover) = &args.cover {
        let payload = tokio::fs::read(cover)
            .await
            .with_context(|| format!("Failed to read cover image {}", cover.display()))?;
        let file_name = cover
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let preview = orchestrator.select_cover(payload, file_name);
        info!(preview = %preview, "Cover selected");
    }

    let tag = args.tag.trim();
    if !tag.is_empty() && tag.parse::<Genre>().is_err() {
        warn!(tag = %tag, "Tag is not in the genre catalog; storing it as given");
    }

    let fields = WorkFields::new(args.title)
        .with_description(args.description)
        .with_tag(args.tag);

    let outcome = orchestrator.submit_selected(fields).await;
    let result = match outcome {
        Ok(work) => {
            info!(work_id = %work.id, "Draft work created");
            orchestrator.wait_for_redirect().await;
            Ok(())
        }
        Err(e) => {
            error!("Submission failed: {}", e);
            Err(anyhow::anyhow!(e.user_message()))
        }
    };

    // Everything the pipeline emitted (including the redirect) is already
    // in the channel once the outcome is known and the redirect awaited
    for line in drain_events(&mut events) {
        println!("{}", line);
    }
    pool.close().await;

    result
}

/// Load the TOML config, logging through a temporary stderr subscriber
///
/// The config decides the real log level and file, so the global
/// subscriber does not exist yet.
fn load_config(path: Option<&Path>, bootstrap_level: &str) -> Result<TomlConfig> {
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(bootstrap_level))
        .finish();
    tracing::subscriber::with_default(bootstrap, || match path {
        Some(path) => load_toml_config(path)
            .with_context(|| format!("Failed to load {}", path.display())),
        None => Ok(TomlConfig::default()),
    })
}

/// Console lines for the notifications and navigation intents already emitted
fn drain_events(events: &mut broadcast::Receiver<StorylineEvent>) -> Vec<String> {
    let mut lines = Vec::new();
    loop {
        match events.try_recv() {
            Ok(StorylineEvent::NotificationPosted { notification, .. }) => {
                let label = if notification.is_error() { "error" } else { "ok" };
                lines.push(format!("[{}] {}", label, notification.message));
            }
            Ok(StorylineEvent::NavigationRequested { path, .. }) => {
                lines.push(format!("-> {}", path));
            }
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "Event printer lagged");
            }
            Err(_) => break,
        }
    }
    lines
}
