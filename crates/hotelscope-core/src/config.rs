use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://www.booking.com";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_4) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/81.0.4044.113 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
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
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// config. Parsing is decoupled from the process environment so tests can
/// drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let bind_addr = parse_addr("HOTELSCOPE_BIND_ADDR", "127.0.0.1:8050")?;
    let log_level = or_default("HOTELSCOPE_LOG_LEVEL", "info");

    let base_url = or_default("HOTELSCOPE_BASE_URL", DEFAULT_BASE_URL)
        .trim_end_matches('/')
        .to_string();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(
            "HOTELSCOPE_BASE_URL",
            format!("\"{base_url}\" must start with http:// or https://"),
        ));
    }

    let request_timeout_secs = parse_u64("HOTELSCOPE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("HOTELSCOPE_USER_AGENT", DEFAULT_USER_AGENT);
    let inter_request_delay_ms = parse_u64("HOTELSCOPE_INTER_REQUEST_DELAY_MS", "250")?;
    let max_retries = parse_u32("HOTELSCOPE_MAX_RETRIES", "0")?;
    let retry_backoff_base_secs = parse_u64("HOTELSCOPE_RETRY_BACKOFF_BASE_SECS", "5")?;

    let max_pages = parse_usize("HOTELSCOPE_MAX_PAGES", "40")?;
    if max_pages == 0 {
        return Err(invalid(
            "HOTELSCOPE_MAX_PAGES",
            "must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        bind_addr,
        log_level,
        base_url,
        request_timeout_secs,
        user_agent,
        inter_request_delay_ms,
        max_retries,
        retry_backoff_base_secs,
        max_pages,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
