use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse. Every variable has a
/// default, so a bare environment is valid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let state_log_path = PathBuf::from(or_default("MVCWATCH_STATE_LOG", "./mvcwatch-status.log"));
    let log_level = or_default("MVCWATCH_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("MVCWATCH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("MVCWATCH_USER_AGENT", "mvcwatch/0.1 (appointment-watch)");
    let max_retries = parse_u32("MVCWATCH_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("MVCWATCH_RETRY_BACKOFF_BASE_SECS", "1")?;

    Ok(AppConfig {
        state_log_path,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_succeeds_on_empty_environment() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should apply");
        assert_eq!(cfg.state_log_path, PathBuf::from("./mvcwatch-status.log"));
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.user_agent, "mvcwatch/0.1 (appointment-watch)");
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.retry_backoff_base_secs, 1);
    }

    #[test]
    fn build_app_config_honours_overrides() {
        let mut map = HashMap::new();
        map.insert("MVCWATCH_STATE_LOG", "/var/lib/mvcwatch/status.log");
        map.insert("MVCWATCH_REQUEST_TIMEOUT_SECS", "60");
        map.insert("MVCWATCH_MAX_RETRIES", "5");
        let cfg = build_app_config(lookup_from_map(&map)).expect("overrides should parse");
        assert_eq!(
            cfg.state_log_path,
            PathBuf::from("/var/lib/mvcwatch/status.log")
        );
        assert_eq!(cfg.request_timeout_secs, 60);
        assert_eq!(cfg.max_retries, 5);
    }

    #[test]
    fn build_app_config_rejects_non_numeric_timeout() {
        let mut map = HashMap::new();
        map.insert("MVCWATCH_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MVCWATCH_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(MVCWATCH_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_non_numeric_retries() {
        let mut map = HashMap::new();
        map.insert("MVCWATCH_MAX_RETRIES", "many");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MVCWATCH_MAX_RETRIES"),
            "expected InvalidEnvVar(MVCWATCH_MAX_RETRIES), got: {result:?}"
        );
    }
}
