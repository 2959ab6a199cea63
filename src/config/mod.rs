// Configuration management from environment variables

use dotenv::dotenv;
use std::env;

/// Configuration settings for the indexer service
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Server configuration
    pub host: String,
    pub port: u16,

    // Store configuration
    pub database_url: Option<String>,
    pub memory_db: bool,

    // Default write-gate TTL in milliseconds
    pub gate_ttl_ms: u64,
}

impl AppConfig {
    /// Creates configuration instance from environment variables.
    /// `DATABASE_URL` is mandatory unless the in-memory store is
    /// selected with `MEMORY_DB=true`.
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .unwrap_or(3000);

        let memory_db = env::var("MEMORY_DB")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let database_url = env::var("DATABASE_URL").ok();
        if !memory_db && database_url.is_none() {
            return Err("DATABASE_URL must be set".to_string());
        }

        let gate_ttl_ms = env::var("GATE_TTL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(5000);

        Ok(Self {
            host,
            port,
            database_url,
            memory_db,
            gate_ttl_ms,
        })
    }

    /// Returns formatted server address string (host:port)
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
