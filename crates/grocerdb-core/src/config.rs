use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_KASSAL_BASE_URL: &str = "https://kassal.app/api/v1/";
const DEFAULT_VISION_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_VISION_MODEL: &str = "gpt-4o-2024-08-06";
const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost,http://localhost:8080,http://localhost:8081,http://techtaitans.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let kassal_api_key = require("KASSAL_API_KEY")?;

    let env = parse_environment(&or_default("GROCERDB_ENV", "development"))?;

    let bind_addr = parse_addr("GROCERDB_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("GROCERDB_LOG_LEVEL", "info");
    let sales_path = PathBuf::from(or_default("GROCERDB_SALES_PATH", "data/sales_data.json"));
    let images_root = PathBuf::from(or_default(
        "GROCERDB_IMAGES_ROOT",
        "data/downloaded_images",
    ));
    let cors_origins = split_list(&or_default("GROCERDB_CORS_ORIGINS", DEFAULT_CORS_ORIGINS));
    if cors_origins.iter().any(|origin| origin == "*") {
        return Err(ConfigError::InvalidEnvVar {
            var: "GROCERDB_CORS_ORIGINS".to_string(),
            reason: "wildcard origin cannot be combined with credentialed CORS; list origins explicitly"
                .to_string(),
        });
    }

    let kassal_base_url = or_default("KASSAL_BASE_URL", DEFAULT_KASSAL_BASE_URL);
    let kassal_request_timeout_secs = parse_u64("GROCERDB_KASSAL_REQUEST_TIMEOUT_SECS", "10")?;
    let kassal_max_retries = parse_u32("GROCERDB_KASSAL_MAX_RETRIES", "0")?;
    let kassal_retry_backoff_base_secs =
        parse_u64("GROCERDB_KASSAL_RETRY_BACKOFF_BASE_SECS", "2")?;

    let on_sale_max_concurrency = parse_usize("GROCERDB_ON_SALE_MAX_CONCURRENCY", "4")?;
    if on_sale_max_concurrency == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "GROCERDB_ON_SALE_MAX_CONCURRENCY".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let openai_api_key = lookup("OPENAI_API_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty());
    let vision_base_url = or_default("GROCERDB_VISION_BASE_URL", DEFAULT_VISION_BASE_URL);
    let vision_model = or_default("GROCERDB_VISION_MODEL", DEFAULT_VISION_MODEL);
    let vision_request_timeout_secs = parse_u64("GROCERDB_VISION_REQUEST_TIMEOUT_SECS", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        sales_path,
        images_root,
        cors_origins,
        kassal_api_key,
        kassal_base_url,
        kassal_request_timeout_secs,
        kassal_max_retries,
        kassal_retry_backoff_base_secs,
        on_sale_max_concurrency,
        openai_api_key,
        vision_base_url,
        vision_model,
        vision_request_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GROCERDB_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
