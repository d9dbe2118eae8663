use std::{fs, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::warn;

pub const CONFIG_FILE_NAME: &str = "analyzer.toml";
pub const LOCAL_API_URL: &str = "http://127.0.0.1:8000/api";
pub const PRODUCTION_API_URL: &str = "https://resume-analyzer-api.onrender.com/api";

const API_PATH_SUFFIX: &str = "/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployEnvironment {
    Development,
    Production,
}

impl DeployEnvironment {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "development" | "dev" | "local" => Some(Self::Development),
            _ => None,
        }
    }

    /// Release builds talk to production unless told otherwise.
    fn build_default() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }

    pub fn default_api_url(self) -> &'static str {
        match self {
            Self::Development => LOCAL_API_URL,
            Self::Production => PRODUCTION_API_URL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Service root (without `/api`) taken from env or the config file.
    pub api_url: Option<String>,
    pub environment: DeployEnvironment,
    /// Per-request limit; `None` waits as long as the service takes.
    pub request_timeout: Option<Duration>,
    pub report_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: None,
            environment: DeployEnvironment::build_default(),
            request_timeout: None,
            report_dir: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    environment: Option<String>,
    timeout_secs: Option<u64>,
    report_dir: Option<PathBuf>,
}

impl Settings {
    /// API base URL: explicit override, then the configured service root
    /// with `/api` appended, then the environment default.
    pub fn resolve_base_url(&self, explicit_override: Option<&str>) -> String {
        if let Some(explicit) = non_empty(explicit_override) {
            return explicit.trim_end_matches('/').to_string();
        }
        if let Some(root) = non_empty(self.api_url.as_deref()) {
            let root = root.trim_end_matches('/');
            if root.ends_with(API_PATH_SUFFIX) {
                return root.to_string();
            }
            return format!("{root}{API_PATH_SUFFIX}");
        }
        self.environment.default_api_url().to_string()
    }

    /// Directory reports are written to: configured, else Downloads, else cwd.
    pub fn report_output_dir(&self) -> PathBuf {
        self.report_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn load_settings() -> Settings {
    let file_contents = fs::read_to_string(CONFIG_FILE_NAME).ok();
    load_settings_from(file_contents.as_deref(), |name| std::env::var(name).ok())
}

/// Layers `analyzer.toml` contents, then environment variables, over the
/// defaults.
pub fn load_settings_from(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if file_cfg.api_url.is_some() {
                    settings.api_url = file_cfg.api_url;
                }
                if let Some(env_name) = file_cfg.environment.as_deref() {
                    match DeployEnvironment::parse(env_name) {
                        Some(parsed) => settings.environment = parsed,
                        None => warn!(environment = env_name, "ignoring unknown environment"),
                    }
                }
                if let Some(secs) = file_cfg.timeout_secs.filter(|secs| *secs > 0) {
                    settings.request_timeout = Some(Duration::from_secs(secs));
                }
                if file_cfg.report_dir.is_some() {
                    settings.report_dir = file_cfg.report_dir;
                }
            }
            Err(err) => warn!("ignoring malformed {CONFIG_FILE_NAME}: {err}"),
        }
    }

    if let Some(v) = env("RESUME_ANALYZER_API_URL").filter(|v| !v.trim().is_empty()) {
        settings.api_url = Some(v);
    }
    if let Some(v) = env("RESUME_ANALYZER_ENV") {
        match DeployEnvironment::parse(&v) {
            Some(parsed) => settings.environment = parsed,
            None => warn!(environment = %v, "ignoring unknown RESUME_ANALYZER_ENV"),
        }
    }
    if let Some(v) = env("RESUME_ANALYZER_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => settings.request_timeout = Some(Duration::from_secs(secs)),
            _ => warn!(value = %v, "ignoring invalid RESUME_ANALYZER_TIMEOUT_SECS"),
        }
    }
    if let Some(v) = env("RESUME_ANALYZER_REPORT_DIR").filter(|v| !v.trim().is_empty()) {
        settings.report_dir = Some(PathBuf::from(v));
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
