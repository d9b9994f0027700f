mod config;
mod db;
mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::config::{AppConfig, StorageConfig};
use crate::db::ChatStore;
use crate::db::memory::MemoryStore;
use crate::db::postgres::PgStore;
use crate::llm::LlmChat;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;

    let store: Arc<dyn ChatStore> = match &config.storage {
        StorageConfig::Memory => Arc::new(MemoryStore::new()),
        StorageConfig::Postgres { database_url, max_connections } => {
            let pool = db::init_pool(database_url, *max_connections).await?;
            Arc::new(PgStore::new(pool))
        }
    };
    tracing::info!(backend = store.backend(), "store initialized");

    // Non-fatal: the composite endpoint answers with a provider error until configured.
    let llm: Option<Arc<dyn LlmChat>> = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(provider = client.provider(), model = client.model(), "LLM client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured; AI replies disabled");
            None
        }
    };

    let mut state = state::AppState::new(store, llm).with_locale(config.locale);
    if let Some(prompt) = config.system_prompt.as_deref() {
        state = state.with_system_prompt(prompt);
    }

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!(port = config.port, "openlife listening");
    axum::serve(listener, app).await?;
    Ok(())
}
