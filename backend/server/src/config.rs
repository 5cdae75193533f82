use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

pub const UPSTREAM_KEY: &str = "APPS_SCRIPT_URL";

pub struct Config {
    pub port: u16,
    pub upstream_url: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "1111"),
            upstream_url: load_upstream_url(),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

// Missing is not fatal at startup, every check-in answers 500 until it is set.
fn load_upstream_url() -> Option<String> {
    let url = env::var(UPSTREAM_KEY)
        .ok()
        .or_else(|| read_secret(UPSTREAM_KEY))
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    if url.is_none() {
        warn!("{UPSTREAM_KEY} not set, check-ins will fail until it is configured");
    }

    url
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("No {secret_name} secret at {path}: {e}");
        })
        .ok()
}
