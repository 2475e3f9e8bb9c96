//! Error types for ingredient resolution.

use pvl_model::Rxcui;
use pvl_output::OutputError;
use thiserror::Error;

/// Failure that aborts a resolution run.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The mapping cache could not be read or written.
    #[error("mapping cache: {0}")]
    Cache(#[from] OutputError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Failure to resolve a single product.
///
/// Never escapes a batch: the product is recorded as unresolved and the
/// batch moves on.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request for rxcui {rxcui} failed: {source}")]
    Network {
        rxcui: Rxcui,
        #[source]
        source: reqwest::Error,
    },

    #[error("RxNav returned HTTP {status} for rxcui {rxcui}")]
    Status { rxcui: Rxcui, status: u16 },

    #[error("malformed RxNav response for rxcui {rxcui}: {message}")]
    Malformed { rxcui: Rxcui, message: String },

    /// Used by lookups that cannot reach their backend at all.
    #[error("lookup unavailable for rxcui {rxcui}: {message}")]
    Unavailable { rxcui: Rxcui, message: String },
}
