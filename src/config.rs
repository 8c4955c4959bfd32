use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "Flowtag";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default model when `OPENAI_MODEL` is unset.
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_BIND: &str = "127.0.0.1:8743";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default log filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,flowtag=debug"
}

/// Runtime configuration, read once at startup from the environment.
///
/// The credential and model name are externally managed secrets; the core
/// only requires "a non-empty credential" and "a model name".
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OpenAI API key. Empty when unconfigured — generation is refused
    /// before any network call in that case.
    pub api_key: String,
    pub model: String,
    pub api_base_url: String,
    pub bind_addr: SocketAddr,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind = std::env::var("FLOWTAG_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let bind_addr = bind.parse().unwrap_or_else(|_| {
            tracing::warn!(%bind, "Invalid FLOWTAG_BIND, falling back to default");
            DEFAULT_BIND.parse().expect("default bind address is valid")
        });

        Self {
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            bind_addr,
            request_timeout_secs: std::env::var("FLOWTAG_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Whether a credential is configured at all.
    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            bind_addr: DEFAULT_BIND.parse().expect("default bind address is valid"),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
