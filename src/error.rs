use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Unexpected status from IBAN service: {0}")]
    UnexpectedStatus(u16),
    #[error("IBAN validation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Submission rejected: {0}")]
    SubmissionError(String),
    #[error("Invalid account record: {0}")]
    AccountError(String),
    #[error("Invalid input on line {line}: {message}")]
    InputError { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, FormError>;
