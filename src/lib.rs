//! TIDAL Catalog Client Library
//!
//! This library provides an async client for the TIDAL catalog API. It
//! manages OAuth2 client-credentials authorization and exposes typed track
//! lookups on top of a small, reusable query engine.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by queries and authorization
//! - `management` - Credentials and the per-client credential store
//! - `tidal` - TIDAL API client: query engine, authorization, endpoints
//! - `types` - Wire response shapes and domain entities
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use tidalcli::{config, tidal::{Pagination, TidalApi}};
//!
//! #[tokio::main]
//! async fn main() -> tidalcli::Res<()> {
//!     config::load_env().await?;
//!     let api = TidalApi::with_config(config::TidalConfig::from_env());
//!     api.authorize("client-id", "client-secret").await?;
//!     let tracks = api.tracks.list(&["345485959"], "US", Pagination::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod tidal;
pub mod types;
pub mod utils;

pub use error::TidalError;

/// Result alias for the command-line layer.
///
/// Command functions in [`cli`] return `Res<()>` and let `main` print the
/// error. The library itself returns [`TidalError`].
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Status line prefixed with a blue `o`.
///
/// Takes `format!` arguments.
///
/// ```
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Status line prefixed with a green check mark, printed once a command
/// has done its job.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line prefixed with a red `!` and exits with status 1.
///
/// The expansion has type `!`, so it can end a `let ... else` block or a
/// match arm of any type.
///
/// ```
/// if let Err(e) = result {
///     error!("{}", e);
/// }
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Status line prefixed with a yellow `!`. Used for outcomes that are worth
/// pointing out but do not stop the command, such as a failed list lookup.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
