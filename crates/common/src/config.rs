//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Runtime configuration
    pub log_level: String,
    pub rust_log: String,
    pub port: u16,

    /// Bootstrap credentials for the built-in user directory. A deployment
    /// backed by a real identity provider replaces the directory wholesale,
    /// so these only matter for local and demo environments.
    pub agent_email: String,
    pub agent_password: String,
    pub agent_name: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "switchboard=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),

            agent_email: env::var("AGENT_EMAIL")
                .unwrap_or_else(|_| "agent@switchboard.dev".to_string()),
            agent_password: env::var("AGENT_PASSWORD")
                .unwrap_or_else(|_| "agent-dev-password".to_string()),
            agent_name: env::var("AGENT_NAME").unwrap_or_else(|_| "Support Agent".to_string()),
        };

        Ok(config)
    }
}
