//! Core library for the `clweather` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The bulletin source seam and its aviationweather.gov client
//! - Concurrent per-station fetching under a shared deadline
//! - Tolerant METAR/TAF parsing into normalized bulletins
//!
//! Rendering lives in `clweather-cli`.

pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod parse;
pub mod provider;
pub mod units;

pub use config::Config;
pub use error::{FetchError, ParseError};
pub use model::{Bulletin, BulletinKind, FetchOutcome, KindSelector, OutputMode, StationRequest};
pub use provider::{BulletinSource, source_from_config};
