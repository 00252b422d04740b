//! Application state wiring the store and configuration together.
//!
//! The edit controller is generic over `ProfileStore`; AppState pins it to
//! the SQLite implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use persona_core::service::bootstrap::{BootstrapOutcome, bootstrap_profile};
use persona_infra::config::{database_url, load_global_config, resolve_data_dir};
use persona_infra::sqlite::pool::DatabasePool;
use persona_infra::sqlite::profile::SqliteProfileStore;
use persona_types::config::GlobalConfig;

/// Shared application state used by every command.
pub struct AppState {
    pub store: Arc<SqliteProfileStore>,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
    /// Result of the first-run bootstrap step for this invocation.
    pub bootstrap: BootstrapOutcome,
}

impl AppState {
    /// Initialize the application state: open the DB, then run the
    /// first-run bootstrap before any view or editor reads the profile.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let config = load_global_config(&data_dir).await;

        let db_url = database_url(&data_dir, &config);
        let db_pool = DatabasePool::new(&db_url)
            .await
            .with_context(|| format!("failed to open database at {db_url}"))?;

        let store = Arc::new(SqliteProfileStore::open(db_pool).await?);

        let bootstrap = bootstrap_profile(store.as_ref(), config.bootstrap.seed())
            .await
            .context("first-run bootstrap failed")?;

        Ok(Self {
            store,
            config,
            data_dir,
            bootstrap,
        })
    }
}
