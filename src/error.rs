use thiserror::Error;

/// Errors that can occur while composing and presenting an ad creative
#[derive(Error, Debug)]
pub enum AdError {
    #[error("Invalid transition: {event} while in state {from}")]
    InvalidTransition { from: &'static str, event: &'static str },

    #[error("Missing required creative asset: {0}")]
    MissingAsset(String),

    #[error("Viewability obstruction registration failed: {0}")]
    ObstructionRegistration(String),

    #[error("URL error: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unknown error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AdError>;
