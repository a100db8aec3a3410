use sg_server::handlers::{RpcDispatcher, Services};
use sg_server::{AppState, build_router, logger};

use sg_auth::{AuthGate, GatePolicy, MemorySessionStore, PasswordVault, SessionStore,
    SingleSessionPolicy};
use sg_db::{AccountRepository, ConnectionRepository};
use sg_graph::ConnectionGraph;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = sg_config::Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let config_dir = sg_config::Config::config_dir()?;
        let log_dir = config_dir.join(&config.logging.dir);

        // Ensure log directory exists
        std::fs::create_dir_all(&log_dir)?;

        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting sg-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Initialize database pool and run migrations
    let database_path = config.database_path()?;
    info!("Connecting to database: {}", database_path.display());

    let pool = sg_db::connect(&database_path).await?;
    info!("Database ready");

    // Session store with background expiry sweep
    let store = MemorySessionStore::new(
        Duration::from_secs(config.session.idle_timeout_secs),
        Duration::from_secs(config.session.cleanup_interval_secs),
    );
    store.start_cleanup_task();

    let gate = AuthGate::new(
        Arc::clone(&store) as Arc<dyn SessionStore>,
        GatePolicy {
            token_metadata_key: config.auth.token_metadata_key.clone(),
            allow_list: config.auth.allow_list.clone(),
        },
    );

    let services = Arc::new(Services {
        sessions: Arc::clone(&store) as Arc<dyn SessionStore>,
        policy: SingleSessionPolicy::new(Arc::clone(&store) as Arc<dyn SessionStore>),
        vault: PasswordVault,
        accounts: AccountRepository::new(pool.clone()),
        graph: ConnectionGraph::new(
            AccountRepository::new(pool.clone()),
            ConnectionRepository::new(pool.clone()),
            config.graph.page_size,
            sg_config::MAX_PAGE_SIZE,
        ),
    });

    let dispatcher = RpcDispatcher::new(
        gate,
        services,
        Duration::from_secs(config.handler.timeout_secs),
    );

    // Build router
    let app = build_router(
        AppState {
            dispatcher: Arc::new(dispatcher),
        },
        config.server.max_concurrent_calls,
    );

    // Create TCP listener
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;

    let actual_addr = listener.local_addr()?;
    info!("Server listening on {actual_addr}");

    // Start server with graceful shutdown
    let store_for_shutdown = Arc::clone(&store);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received SIGINT (Ctrl+C), initiating graceful shutdown"),
                Err(e) => error!("Failed to listen for SIGINT: {e}"),
            }
            store_for_shutdown.stop_cleanup_task();
        })
        .await?;

    info!("Shutdown complete");
    Ok(())
}
