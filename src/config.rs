// src/config.rs

use std::env;
use std::net::SocketAddr;
use dotenvy::dotenv;

pub const DEFAULT_PREVIEW_MAX_WORDS: usize = 40;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub rust_log: String,
    pub log_dir: String,
    /// Word limit for previews that name neither a limit nor a content kind.
    pub preview_max_words: usize,
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            rust_log: "info".to_string(),
            log_dir: "logs".to_string(),
            preview_max_words: DEFAULT_PREVIEW_MAX_WORDS,
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let bind_addr = parse_var("BIND_ADDR").unwrap_or(defaults.bind_addr);

        let rust_log = env::var("RUST_LOG").unwrap_or(defaults.rust_log);

        let log_dir = env::var("LOG_DIR").unwrap_or(defaults.log_dir);

        let preview_max_words =
            parse_var("PREVIEW_MAX_WORDS").unwrap_or(defaults.preview_max_words);

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        Self {
            bind_addr,
            rust_log,
            log_dir,
            preview_max_words,
            cors_origins,
        }
    }
}

/// Reads and parses an optional environment variable.
/// A value that is set but unparseable aborts startup.
fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    let value = raw
        .trim()
        .parse()
        .unwrap_or_else(|_| panic!("{} must be a valid value, got {:?}", key, raw));
    Some(value)
}
