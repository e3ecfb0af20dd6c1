use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Use it when the
/// caller manages the environment itself.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation live here, decoupled from the real environment so the
/// tests can drive it with a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("PRICEMATCH_ENV", "development"))?;
    let log_level = or_default("PRICEMATCH_LOG_LEVEL", "info");

    let base_url = or_default("PRICEMATCH_BASE_URL", "http://localhost:5000");
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRICEMATCH_BASE_URL".to_string(),
            reason: format!("'{base_url}' must start with http:// or https://"),
        });
    }

    let sources_path = PathBuf::from(or_default(
        "PRICEMATCH_SOURCES_PATH",
        "./config/sources.yaml",
    ));

    let save_path = or_default("PRICEMATCH_SAVE_PATH", "/");
    if !save_path.starts_with('/') {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRICEMATCH_SAVE_PATH".to_string(),
            reason: format!("'{save_path}' must start with '/'"),
        });
    }

    let request_timeout_secs = parse_u64("PRICEMATCH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PRICEMATCH_USER_AGENT", "pricematch/0.1 (price-comparison)");

    let raw_markup = or_default("PRICEMATCH_MARKUP_PERCENT", "0");
    let markup_percent =
        Decimal::from_str(raw_markup.trim()).map_err(|e| ConfigError::InvalidEnvVar {
            var: "PRICEMATCH_MARKUP_PERCENT".to_string(),
            reason: e.to_string(),
        })?;

    Ok(AppConfig {
        env,
        log_level,
        base_url,
        sources_path,
        save_path,
        request_timeout_secs,
        user_agent,
        markup_percent,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PRICEMATCH_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
