use voicepath_llm::gemini::{ModelNames, DEFAULT_BASE_URL};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for in-flight requests to drain after a shutdown
    /// signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Text generation provider settings.
    pub llm: LlmConfig,
}

/// Gemini connection settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// `None` leaves the server running but makes LLM-backed endpoints fail.
    pub api_key: Option<String>,
    pub base_url: String,
    pub models: ModelNames,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            llm: LlmConfig::from_env(),
        }
    }
}

impl LlmConfig {
    /// Load LLM settings from environment variables with defaults.
    ///
    /// | Env Var                | Default                                             |
    /// |------------------------|-----------------------------------------------------|
    /// | `GEMINI_API_KEY`       | unset                                               |
    /// | `GEMINI_BASE_URL`      | `https://generativelanguage.googleapis.com/v1beta`  |
    /// | `LLM_EXTRACTION_MODEL` | `gemini-2.5-flash`                                  |
    /// | `LLM_FLOWCHART_MODEL`  | `gemini-2.5-flash-lite`                             |
    /// | `LLM_ASSISTANT_MODEL`  | `gemini-2.5-flash-lite`                             |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; LLM-backed endpoints will fail");
        }

        let base_url = std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let defaults = ModelNames::default();
        let models = ModelNames {
            extraction: std::env::var("LLM_EXTRACTION_MODEL").unwrap_or(defaults.extraction),
            flowchart: std::env::var("LLM_FLOWCHART_MODEL").unwrap_or(defaults.flowchart),
            assistant: std::env::var("LLM_ASSISTANT_MODEL").unwrap_or(defaults.assistant),
        };

        Self {
            api_key,
            base_url,
            models,
        }
    }
}
