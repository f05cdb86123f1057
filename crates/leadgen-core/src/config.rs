use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds a value that cannot be parsed.
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
/// Returns `ConfigError` if a variable holds a value that cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("LEADGEN_ENV", "development"))?;
    let log_level = or_default("LEADGEN_LOG_LEVEL", "info");

    let places_api_key = lookup("GOOGLE_PLACES_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());
    let places_timeout_secs = parse_u64("LEADGEN_PLACES_TIMEOUT_SECS", "30")?;
    let places_max_results = or_default("LEADGEN_PLACES_MAX_RESULTS", "20")
        .trim()
        .parse::<u32>()
        .map_err(|e| invalid("LEADGEN_PLACES_MAX_RESULTS", e.to_string()))?;
    if !(1..=20).contains(&places_max_results) {
        return Err(invalid(
            "LEADGEN_PLACES_MAX_RESULTS",
            format!("{places_max_results} is outside 1..=20"),
        ));
    }

    let fetch_timeout_secs = parse_u64("LEADGEN_FETCH_TIMEOUT_SECS", "5")?;
    if fetch_timeout_secs == 0 {
        return Err(invalid(
            "LEADGEN_FETCH_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }
    let user_agent = or_default("LEADGEN_USER_AGENT", DEFAULT_USER_AGENT);
    let strip_country_prefix = parse_bool(
        "LEADGEN_STRIP_COUNTRY_PREFIX",
        &or_default("LEADGEN_STRIP_COUNTRY_PREFIX", "true"),
    )?;

    let max_concurrent = parse_usize("LEADGEN_MAX_CONCURRENT", "1")?;
    let inter_request_delay_ms = parse_u64("LEADGEN_INTER_REQUEST_DELAY_MS", "500")?;
    let max_businesses = parse_usize("LEADGEN_MAX_BUSINESSES", "50")?;
    let data_dir = PathBuf::from(or_default("LEADGEN_DATA_DIR", "./data"));

    Ok(AppConfig {
        env,
        log_level,
        places_api_key,
        places_timeout_secs,
        places_max_results,
        fetch_timeout_secs,
        user_agent,
        strip_country_prefix,
        max_concurrent,
        inter_request_delay_ms,
        max_businesses,
        data_dir,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LEADGEN_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
