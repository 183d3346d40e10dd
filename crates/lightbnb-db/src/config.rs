//! Environment-driven connection configuration

use std::env;

/// PostgreSQL connection parameters.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
}

impl DbConfig {
    /// Read connection parameters from `LIGHTBNB_DB_*` environment
    /// variables, falling back to localhost defaults.
    pub fn from_env() -> Self {
        let host = env::var("LIGHTBNB_DB_HOST").unwrap_or_else(|_| "localhost".to_string());
        let user = env::var("LIGHTBNB_DB_USER").unwrap_or_else(|_| "lightbnb".to_string());
        let password = env::var("LIGHTBNB_DB_PASSWORD").unwrap_or_default();
        let database = env::var("LIGHTBNB_DB_NAME").unwrap_or_else(|_| "lightbnb".to_string());
        let max_connections = env::var("LIGHTBNB_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        Self {
            host,
            user,
            password,
            database,
            max_connections,
        }
    }
}
