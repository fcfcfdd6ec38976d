//! Server configuration.
//!
//! Everything comes from `TPO_`-prefixed environment variables, with sane defaults for local development.
use std::{env, path::PathBuf};

use chrono::Duration;
use log::*;

const DEFAULT_TPO_HOST: &str = "127.0.0.1";
const DEFAULT_TPO_PORT: u16 = 8370;
const DEFAULT_TPO_DATABASE_URL: &str = "sqlite://data/tradepost.db";
const DEFAULT_UPLOAD_DIR: &str = "data/uploads";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Every environment variable the server reads. The summary prints these and nothing else, so the list must never
/// grow a variable that carries a secret.
pub const ENV_VARS: [&str; 7] = [
    "RUST_LOG",
    "TPO_HOST",
    "TPO_PORT",
    "TPO_DATABASE_URL",
    "TPO_UPLOAD_DIR",
    "TPO_SESSION_TTL",
    "TPO_MAX_UPLOAD_BYTES",
];

/// Prints the current value of each configuration variable to stdout.
pub fn print_env_summary() {
    println!("Current environment values:");
    for name in ENV_VARS {
        let value = match env::var(name) {
            Ok(v) => v,
            Err(env::VarError::NotPresent) => "Not set".to_string(),
            Err(env::VarError::NotUnicode(v)) => format!("Invalid value: {}", v.to_string_lossy()),
        };
        println!("  {name:<25} {value}");
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Directory where uploaded product images are stored.
    pub upload_dir: PathBuf,
    /// Idle sessions older than this are treated as logged out.
    pub session_ttl: Duration,
    /// Hard cap on the size of a single image upload.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_TPO_HOST.to_string(),
            port: DEFAULT_TPO_PORT,
            database_url: DEFAULT_TPO_DATABASE_URL.to_string(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("TPO_HOST").ok().unwrap_or_else(|| DEFAULT_TPO_HOST.into());
        let port = env::var("TPO_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for TPO_PORT. {e} Using the default, {DEFAULT_TPO_PORT}, instead."
                    );
                    DEFAULT_TPO_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_TPO_PORT);
        let database_url = env::var("TPO_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ TPO_DATABASE_URL is not set. Using the default, {DEFAULT_TPO_DATABASE_URL}.");
            DEFAULT_TPO_DATABASE_URL.to_string()
        });
        let upload_dir =
            env::var("TPO_UPLOAD_DIR").map(PathBuf::from).ok().unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));
        let session_ttl = env::var("TPO_SESSION_TTL")
            .map(|s| {
                s.parse::<i64>().map(Duration::hours).unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid hour count for TPO_SESSION_TTL. {e} Using the default, \
                         {DEFAULT_SESSION_TTL_HOURS}h, instead."
                    );
                    Duration::hours(DEFAULT_SESSION_TTL_HOURS)
                })
            })
            .ok()
            .unwrap_or_else(|| Duration::hours(DEFAULT_SESSION_TTL_HOURS));
        let max_upload_bytes = env::var("TPO_MAX_UPLOAD_BYTES")
            .map(|s| {
                s.parse::<usize>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid size for TPO_MAX_UPLOAD_BYTES. {e} Using the default, \
                         {DEFAULT_MAX_UPLOAD_BYTES}, instead."
                    );
                    DEFAULT_MAX_UPLOAD_BYTES
                })
            })
            .ok()
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        Self { host, port, database_url, upload_dir, session_ttl, max_upload_bytes }
    }
}
