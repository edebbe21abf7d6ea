use thiserror::Error;

/// errors raised at the configuration and hourly-table boundary.
/// the calculation itself is total and never fails.
#[derive(Error, Debug)]
pub enum CashFlowError {
    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("hourly row for {date} has {len} values, at most 24 allowed")]
    InvalidHourlyRow {
        date: String,
        len: usize,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CashFlowError>;
