use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("report is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A numeric column held something other than a whole number.
    #[error("line {line}: {column} must be a whole number, got {value:?}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    /// A row ended before a required column.
    #[error("line {line}: missing {column}")]
    MissingColumn { line: u64, column: &'static str },
}
