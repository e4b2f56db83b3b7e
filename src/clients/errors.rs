use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Setlist.fm deserialization error: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Setlist.fm API unexpected response: status {status}, body: {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Setlist #{index} is missing field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
