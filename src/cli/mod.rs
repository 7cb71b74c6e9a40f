//! # CLI Module
//!
//! Command-line front end over [`crate::tidal::TidalApi`]. Every command
//! builds a fresh client from the environment, authorizes it with the
//! configured client credentials, runs one lookup and prints the outcome.
//!
//! ## Commands
//!
//! - [`auth`] - Verifies the client credentials and shows the token lifetime
//! - [`track`] - Fetches a single track by id
//! - [`tracks`] - Lists tracks by ids, artist, ISRC or similarity
//! - [`info`] - Shows version and configured endpoints
//!
//! ## Output
//!
//! Tables are rendered with `tabled`, requests show an `indicatif` spinner
//! and status lines use the crate's `info!`, `success!`, `warning!` and
//! `error!` macros. A failed list lookup is reported as a warning; errors
//! before a request is sent terminate the process.
//!
//! ## Usage
//!
//! ```bash
//! tidalcli auth
//! tidalcli track 345485959 --country US
//! tidalcli tracks --ids 345485959,251380837
//! tidalcli tracks --isrc USSM12209515 --limit 5
//! tidalcli tracks --artist 1566 --offset 10 --limit 10
//! tidalcli tracks --similar 345485959
//! ```

mod auth;
mod info;
mod tracks;

pub use auth::auth;
pub use info::info;
pub use tracks::{TrackFilter, track, tracks};
