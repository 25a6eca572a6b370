use anyhow::{Context, Result};

/// Default upload cap: 5 MiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Largest accepted upload, in bytes.
    pub max_file_size: usize,
    /// Generative-language API key; the AI endpoints report unavailable without it.
    pub gemini_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            gemini_api_key: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        Ok(Config {
            port: lookup("PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(defaults.port),
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            max_file_size: lookup("MAX_FILE_SIZE")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_FILE_SIZE must be a byte count")?
                .unwrap_or(defaults.max_file_size),
            gemini_api_key: lookup("GOOGLE_GEMINI_API_KEY")
                .or_else(|| lookup("GOOGLE_AI_API_KEY"))
                .filter(|key| !key.trim().is_empty()),
        })
    }
}
