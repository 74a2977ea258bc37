use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Runtime configuration, read from the environment once at startup.
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let gemini_api_key =
            env::var("GEMINI_API_KEY").context("GEMINI_API_KEY is not set")?;
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);
        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "todos.db".to_string());
        let timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            gemini_api_key,
            gemini_model,
            host,
            port,
            database_path,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
