use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("no finished matches to aggregate")]
    NoData,
    #[error("unknown team: {team}")]
    UnknownTeam { team: String },
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
}

impl ModelError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            line,
            reason: reason.into(),
        }
    }
}
