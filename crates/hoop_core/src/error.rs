use thiserror::Error;

/// Errors raised outside the tick path.
///
/// The per-tick interaction loop never fails: degenerate numeric or timing
/// input degrades to a safe default (zero velocity, no score change). The
/// only fallible operations are configuration loading and validation.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
