use std::path::PathBuf;

/// Process-wide settings shared by every watcher subcommand.
///
/// Per-run parameters (service, keyword filters, recipients) come from the
/// CLI; this struct carries the ambient knobs loaded from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub state_log_path: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}
