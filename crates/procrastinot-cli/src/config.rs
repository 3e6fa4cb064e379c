use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use serde::Deserialize;

static CONFIG: OnceLock<CliConfig> = OnceLock::new();

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Optional user config at `~/.config/procrastinot/config.toml`.
///
/// ```toml
/// api_url = "https://procrastinot.example.com"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub api_url: Option<String>,
}

impl CliConfig {
    fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".config/procrastinot/config.toml"))
    }

    pub fn load() -> &'static CliConfig {
        CONFIG.get_or_init(|| {
            Self::config_path()
                .and_then(|path| fs::read_to_string(path).ok())
                .and_then(|content| toml::from_str(&content).ok())
                .unwrap_or_default()
        })
    }
}

/// Base URL resolution: `--server` flag, then `PROCRASTINOT_API_URL`, then
/// the config file, then the local dev default.
pub fn api_base_url(flag: Option<&str>) -> String {
    flag.map(str::to_string)
        .or_else(|| std::env::var("PROCRASTINOT_API_URL").ok())
        .or_else(|| CliConfig::load().api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}
