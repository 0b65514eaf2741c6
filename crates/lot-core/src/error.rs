//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `LotError` as one variant
//! via `#[from]`, so configuration defects surface unchanged at the caller.

use thiserror::Error;

/// The top-level error type for `lot-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum LotError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `lot-*` crates.
pub type LotResult<T> = Result<T, LotError>;
