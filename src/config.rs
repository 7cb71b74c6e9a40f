//! Configuration management for the TIDAL client.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the platform-specific local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Built-in defaults for endpoints and country code
//!
//! Client id and secret have no default; the command-line front end refuses
//! to run without them, the library takes them as plain arguments.

use std::{env, path::PathBuf};

pub const DEFAULT_API_URL: &str = "https://openapi.tidal.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://auth.tidal.com/v1/oauth2/token";
pub const DEFAULT_COUNTRY_CODE: &str = "US";

/// Loads environment variables from `tidalcli/.env` in the local data directory.
///
/// The directory is created when missing. A missing `.env` file is fine, since
/// every value can also come straight from the process environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/tidalcli/.env`
/// - macOS: `~/Library/Application Support/tidalcli/.env`
/// - Windows: `%LOCALAPPDATA%/tidalcli/.env`
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tidalcli/.env");
    path
}

/// Client id registered on the TIDAL developer portal (`TIDAL_CLIENT_ID`).
pub fn tidal_client_id() -> Option<String> {
    non_empty_var("TIDAL_CLIENT_ID")
}

/// Client secret matching [`tidal_client_id`] (`TIDAL_CLIENT_SECRET`).
pub fn tidal_client_secret() -> Option<String> {
    non_empty_var("TIDAL_CLIENT_SECRET")
}

/// Base url for resource endpoints (`TIDAL_API_URL`).
pub fn tidal_api_url() -> String {
    non_empty_var("TIDAL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Token endpoint for the client-credentials grant (`TIDAL_AUTH_URL`).
pub fn tidal_auth_url() -> String {
    non_empty_var("TIDAL_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string())
}

/// Country used when a command does not pass one (`TIDAL_COUNTRY_CODE`).
pub fn tidal_country_code() -> String {
    non_empty_var("TIDAL_COUNTRY_CODE").unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Endpoints a [`TidalApi`](crate::tidal::TidalApi) talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TidalConfig {
    pub api_url: String,
    pub auth_url: String,
}

impl TidalConfig {
    pub fn new(api_url: impl Into<String>, auth_url: impl Into<String>) -> Self {
        TidalConfig {
            api_url: trim_trailing_slash(api_url.into()),
            auth_url: auth_url.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(tidal_api_url(), tidal_auth_url())
    }
}

impl Default for TidalConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, DEFAULT_AUTH_URL)
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
