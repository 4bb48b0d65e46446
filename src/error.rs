//! Error types for the cycle and insight engine

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No period start has been recorded yet. Callers render this as
    /// "not yet tracked", not as a failure.
    #[error("cycle tracking has not started")]
    Untracked,

    #[error("cycle length must be between 20 and 40 days, got {0}")]
    CycleLengthOutOfRange(u32),

    #[error("period length must be between 2 and 10 days, got {0}")]
    PeriodLengthOutOfRange(u32),

    #[error("date {0} plus a cycle is past the last representable date")]
    DateOutOfRange(chrono::NaiveDate),

    #[error("invalid setting {name}: {value}")]
    InvalidSetting { name: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
