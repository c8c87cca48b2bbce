use thiserror::Error;

/// Errors raised by the numerical model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid width {0}: must be finite and positive")]
    InvalidWidth(f64),

    #[error("cannot normalise {0}: peak is zero or not finite")]
    DegenerateCurve(&'static str),

    #[error("total channel flux is {0}, chromaticity undefined")]
    DegenerateFlux(f64),

    #[error("invalid simulation parameters: {0}")]
    InvalidParams(String),

    #[error("sampling distribution: {0}")]
    Distribution(String),
}

pub type SimResult<T> = Result<T, SimError>;
