use thiserror::Error;

#[derive(Debug, Error)]
pub enum JurisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: set {hint}")]
    MissingCredential { hint: String },
}

impl JurisError {
    /// Short error code string, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            JurisError::Config(_) => "CONFIG_ERROR",
            JurisError::MissingCredential { .. } => "MISSING_CREDENTIAL",
        }
    }
}

pub type Result<T> = std::result::Result<T, JurisError>;
