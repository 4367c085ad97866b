use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BriefError {
    #[error("ticker parameter required")]
    MissingTicker,

    #[error("{0}")]
    Http(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Company not found in SEC database")]
    CompanyNotFound,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for BriefError {
    fn from(err: serde_json::Error) -> Self {
        BriefError::Serialization(err.to_string())
    }
}
