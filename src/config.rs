use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        endpoint: get_env_or_default("LECTERN_ENDPOINT", "http://localhost:5000/ask"),
        source_label: get_env_or_default("LECTERN_SOURCE", "Cloud_Computing.pdf"),
    }
});

pub struct Config {
    pub endpoint: String,
    pub source_label: String,
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Per-run options for one console session, assembled in main from CONFIG
/// defaults plus CLI overrides and handed to the console explicitly.
#[derive(Debug, Clone)]
pub struct ConsoleOptions {
    pub endpoint: String,
    pub source_label: String,
    /// Milliseconds between typed characters; 0 disables the animation.
    pub type_interval_ms: u64,
    /// Whether the recent-queries panel is rendered at all.
    pub show_history: bool,
}

impl ConsoleOptions {
    pub fn from_config() -> ConsoleOptions {
        ConsoleOptions {
            endpoint: CONFIG.endpoint.clone(),
            source_label: CONFIG.source_label.clone(),
            type_interval_ms: 10,
            show_history: true,
        }
    }
}
