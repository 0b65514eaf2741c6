use lot_core::LotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegimenError {
    #[error("regimen catalog parse error: {0}")]
    Parse(String),

    #[error("duplicate regimen name {0:?}")]
    DuplicateName(String),

    #[error("invalid parameter for regimen {regimen:?}: {reason}")]
    InvalidParameter { regimen: String, reason: String },

    #[error("catalog holds {0} regimens; at most 65,536 are supported")]
    TooMany(usize),

    #[error(transparent)]
    Core(#[from] LotError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RegimenResult<T> = Result<T, RegimenError>;
