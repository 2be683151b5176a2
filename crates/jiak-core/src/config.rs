use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1/";
pub const DEFAULT_DATAMALL_BASE_URL: &str = "https://datamall2.mytransport.sg/ltaodataservice/";

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
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.trim().is_empty()) };

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

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    // Page sizes and page ceilings of zero would either never advance or
    // never fetch, so they are rejected up front.
    let parse_positive = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let value = parse_u64(var, default)?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let narrow = |var: &str, value: u64| -> Result<usize, ConfigError> {
        usize::try_from(value).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let firestore_project_id = require("JIAK_FIRESTORE_PROJECT_ID")?;

    let env = parse_environment(&or_default("JIAK_ENV", "development"))?;
    let bind_addr = parse_addr("JIAK_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("JIAK_LOG_LEVEL", "info");

    let http_timeout_secs = parse_positive("JIAK_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("JIAK_USER_AGENT", "jiak/0.1 (mall-eateries)");

    let firestore_api_key = optional("JIAK_FIRESTORE_API_KEY");
    let firestore_base_url = or_default("JIAK_FIRESTORE_BASE_URL", DEFAULT_FIRESTORE_BASE_URL);
    let firestore_page_size = {
        let raw = parse_positive("JIAK_FIRESTORE_PAGE_SIZE", "300")?;
        u32::try_from(raw).map_err(|e| ConfigError::InvalidEnvVar {
            var: "JIAK_FIRESTORE_PAGE_SIZE".to_string(),
            reason: e.to_string(),
        })?
    };
    let firestore_max_pages = narrow(
        "JIAK_FIRESTORE_MAX_PAGES",
        parse_positive("JIAK_FIRESTORE_MAX_PAGES", "100")?,
    )?;

    let datamall_account_key = optional("DATAMALL_ACCOUNT_KEY");
    let datamall_base_url = or_default("JIAK_DATAMALL_BASE_URL", DEFAULT_DATAMALL_BASE_URL);
    let carpark_page_size = narrow(
        "JIAK_CARPARK_PAGE_SIZE",
        parse_positive("JIAK_CARPARK_PAGE_SIZE", "500")?,
    )?;
    let carpark_max_pages = narrow(
        "JIAK_CARPARK_MAX_PAGES",
        parse_positive("JIAK_CARPARK_MAX_PAGES", "50")?,
    )?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        http_timeout_secs,
        user_agent,
        firestore_project_id,
        firestore_api_key,
        firestore_base_url,
        firestore_page_size,
        firestore_max_pages,
        datamall_account_key,
        datamall_base_url,
        carpark_page_size,
        carpark_max_pages,
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
            var: "JIAK_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
