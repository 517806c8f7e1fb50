//! Server bootstrap configuration, read once at startup.

use std::env;

use crate::pagination::DEFAULT_PAGE_SIZE;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// Records per collection page. Fixed server-side; the API exposes no
    /// per-request override.
    pub page_size: u64,
}

impl Config {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite::memory:".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
