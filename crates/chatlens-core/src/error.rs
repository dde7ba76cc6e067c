use crate::types::Counter;
use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unordered input: message {index} at {current} precedes {previous}")]
    UnorderedInput {
        index: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },

    #[error("Missing counter {counter} on message sent at {at}")]
    MissingCounter { counter: Counter, at: NaiveDateTime },

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("Unknown report: {0}")]
    UnknownReport(String),

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Actor listed more than once: {0}")]
    DuplicateActor(String),

    #[error("Unexpected bucket key: {0}")]
    UnexpectedKey(String),

    #[error("Table shape error: {0}")]
    Shape(String),

    #[error("Invalid report: {0}")]
    InvalidReport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
