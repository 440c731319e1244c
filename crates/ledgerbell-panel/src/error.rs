use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    HttpClient(#[from] ledgerbell_http_client::Error),

    #[error("unexpected status code: {0}")]
    UnexpectedStatus(http::StatusCode),
}
