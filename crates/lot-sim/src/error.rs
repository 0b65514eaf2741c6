use lot_core::LotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("incidence error: {0}")]
    Incidence(String),

    #[error(transparent)]
    Core(#[from] LotError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
