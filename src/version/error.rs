use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Feed returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Invalid feed document: {0}")]
    InvalidDocument(String),
}

impl From<quick_xml::Error> for FeedError {
    fn from(e: quick_xml::Error) -> Self {
        FeedError::InvalidDocument(e.to_string())
    }
}
