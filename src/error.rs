use thiserror::Error;

/// Classified failure kinds for the extraction pipeline.
///
/// `Config` is fatal at startup. `Backend` and `MalformedResponse` are
/// recoverable at the batch-runner boundary (the document is skipped).
/// `IncompleteRecord` is recoverable at the parser boundary (the record is
/// dropped, sibling records survive).
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("backend request failed: {0}")]
    Backend(String),

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("incomplete relation record: missing or empty '{field}'")]
    IncompleteRecord { field: &'static str },
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        ExtractError::Backend(err.to_string())
    }
}
