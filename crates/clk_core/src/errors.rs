use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClkError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Degenerate table: {0}")]
    DegenerateTable(String),
}

impl ClkError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord { line, reason: reason.into() }
    }

    /// IO failures stay `Io`; anything else the CSV layer rejects is a
    /// malformed record at the line it reports.
    pub(crate) fn from_csv(e: csv::Error) -> Self {
        let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
        if !e.is_io_error() {
            return Self::malformed(line, e.to_string());
        }
        match e.into_kind() {
            csv::ErrorKind::Io(io) => Self::Io(io),
            kind => Self::malformed(line, format!("{kind:?}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClkError>;
