use std::path::PathBuf;

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Server hosting the per-source search/detail endpoints and the save form.
    pub base_url: String,
    pub sources_path: PathBuf,
    /// Path (relative to `base_url`) the curated record is submitted to.
    pub save_path: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Default percentage applied by the copy-price workflow.
    pub markup_percent: Decimal,
}
