use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use studymate_core::client::GeminiClient;
use studymate_flows::FlowGateway;
use studymate_server::config::AppConfig;
use studymate_server::http_server;
use studymate_server::state::AppState;
use studymate_store::{FirestoreStore, MemoryStore, ProfileStoreRef, TaskStoreRef};

#[derive(Parser, Debug)]
#[command(name = "studymate-server", about = "StudyMate backend server")]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP server address
    #[arg(long)]
    http_addr: Option<SocketAddr>,

    /// Gemini API key (falls back to config file or GEMINI_API_KEY)
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Gemini model to use for text and structured flows
    #[arg(short = 'm', long)]
    model: Option<String>,

    /// Use the in-memory store even when Firestore is configured
    #[arg(long)]
    memory_store: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("Starting StudyMate server");

    // Parse command line args
    let args = Args::parse();

    // Load config from file or the default location
    let mut config = match &args.config {
        Some(path) => {
            let cfg = AppConfig::load_from_file(path)?;
            info!("Loaded configuration from {}", path.display());
            cfg
        }
        None => AppConfig::load_from_default()?,
    };

    // Update config from CLI args
    if let Some(api_key) = args.api_key {
        config.gemini.api_key = Some(api_key);
    }
    if let Some(model) = args.model {
        config.gemini.model_name = Some(model);
    }
    if let Some(addr) = args.http_addr {
        config.http_addr = Some(addr.to_string());
    }
    config.gemini.apply_env_key();

    // Initialize the Gemini client and flow gateway
    let gemini_client = GeminiClient::new(config.gemini.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize Gemini client: {}", e))?;
    info!("Initialized Gemini client");
    let gateway = FlowGateway::from_client(gemini_client);

    // Pick the store backend
    let (tasks, profiles): (TaskStoreRef, ProfileStoreRef) = match &config.firestore {
        Some(firestore_config) if !args.memory_store => {
            info!(
                project_id = %firestore_config.project_id,
                "Using the Firestore document store"
            );
            let store = Arc::new(FirestoreStore::new(firestore_config.clone()));
            (store.clone() as TaskStoreRef, store as ProfileStoreRef)
        }
        _ => {
            warn!("Using the in-memory store; data will not survive a restart");
            let store = Arc::new(MemoryStore::new());
            (store.clone() as TaskStoreRef, store as ProfileStoreRef)
        }
    };

    let addr = config.http_addr()?;
    let state = AppState::new(config, gateway, tasks, profiles);

    http_server::run_server(state, addr).await
}
