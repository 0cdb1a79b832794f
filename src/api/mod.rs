//! REST Countries client and record model.

pub mod client;
pub mod model;

use thiserror::Error;

pub use client::{CountriesClient, FilterKind};
pub use model::Country;

/// Why a fetch produced no usable records.
///
/// A plain "no matches" on a list query is not an error; list fetches return
/// an empty vector for it. `NotFound` is reserved for exact lookups.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no country matches '{0}'")]
    NotFound(String),
    #[error("a search value is required for the {0} filter")]
    InvalidInput(&'static str),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}
