//! Process-wide application state.
//!
//! `CoreState` is built once at startup, wrapped in `Arc` and shared with
//! every request handler. It owns the inference gateway (the loaded model
//! handle) and knows where the dashboard database lives.

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::db::{self, DatabaseError};
use crate::pipeline::inference::{InferenceError, InferenceGateway};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Inference setup failed: {0}")]
    Inference(#[from] InferenceError),
}

pub struct CoreState {
    pub config: AppConfig,
    gateway: InferenceGateway,
    db_path: PathBuf,
}

impl CoreState {
    pub fn new(config: AppConfig, gateway: InferenceGateway) -> Self {
        let db_path = config.db_path.clone();
        Self {
            config,
            gateway,
            db_path,
        }
    }

    /// Check the inference backends and prepare the database.
    /// Blocking; run before entering the async runtime.
    pub fn from_config(config: AppConfig) -> Result<Self, CoreError> {
        let gateway = InferenceGateway::from_config(&config)?;
        let state = Self::new(config, gateway);
        drop(state.open_db()?);
        tracing::info!(path = %state.db_path.display(), "Dashboard database ready");
        Ok(state)
    }

    pub fn gateway(&self) -> &InferenceGateway {
        &self.gateway
    }

    /// Fresh connection per caller; connections are not shared across threads.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }
}
