use thiserror::Error;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// No usable scraper credential was supplied.
    #[error("Missing Apify token. Provide via header \"x-apify-token\" or query param \"apify_token\"")]
    MissingCredential,

    /// The scraping backend failed.
    #[error("{0}")]
    Upstream(String),
}

impl From<anyhow::Error> for EngineError {
    fn from(e: anyhow::Error) -> Self {
        EngineError::Upstream(e.to_string())
    }
}
