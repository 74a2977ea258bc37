mod config;
mod core;
mod interfaces;

use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::core::dispatcher::Dispatcher;
use crate::core::interpreter::Interpreter;
use crate::core::llm::providers::google::GoogleProvider;
use crate::core::store::{SqliteStore, TodoStore};
use crate::interfaces::web::ApiServer;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("fatal: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let config = Config::from_env()?;
    let store: Arc<dyn TodoStore> = Arc::new(SqliteStore::open(&config.database_path)?);
    let provider = Arc::new(GoogleProvider::new(
        config.gemini_api_key.clone(),
        config.request_timeout,
    )?);
    let interpreter = Arc::new(Interpreter::new(provider, config.gemini_model.clone()));
    let dispatcher = Arc::new(Dispatcher::new(store.clone()));

    info!("Starting todobot (model: {})...", config.gemini_model);
    ApiServer::new(config.host, config.port, interpreter, dispatcher, store)
        .serve()
        .await
}
