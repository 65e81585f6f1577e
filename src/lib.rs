pub mod api;
pub mod config;
pub mod core_state;
pub mod db;
pub mod hardware;
pub mod models;
pub mod pipeline;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::core_state::{CoreError, CoreState};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to initialize application state: {0}")]
    Core(#[from] CoreError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the service and block until shutdown.
///
/// Backend checks use blocking HTTP, so state is built before the async
/// runtime starts and dropped after it stops.
pub fn run() -> Result<(), StartupError> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env();
    let addr = config.listen_addr;
    let core = Arc::new(CoreState::from_config(config)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(api::serve(core.clone(), addr));
    drop(runtime);
    drop(core);

    result.map_err(StartupError::from)
}
