//! Cycle model: cycle day, phase, and next-start prediction
//!
//! Everything here is a pure function of its arguments. "Today" is always
//! supplied by the caller as a calendar date, so time of day never enters
//! the arithmetic.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::{CycleConfig, LogBook};

/// Last cycle day labelled follicular. Fixed, whatever the cycle length.
pub const FOLLICULAR_LAST_DAY: i64 = 14;
/// Last cycle day labelled ovulation. Fixed, whatever the cycle length.
pub const OVULATION_LAST_DAY: i64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Menstruation,
    Follicular,
    Ovulation,
    Luteal,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Menstruation => "menstruation",
            Phase::Follicular => "follicular",
            Phase::Ovulation => "ovulation",
            Phase::Luteal => "luteal",
        }
    }

    /// Label shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Menstruation => "Menstruation",
            Phase::Follicular => "Follicular Phase",
            Phase::Ovulation => "Ovulation",
            Phase::Luteal => "Luteal Phase",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Signed whole days from `from` to `to`.
pub fn whole_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// 1-based day within the current cycle, wrapping at the configured cycle
/// length. Dates before the recorded start wrap backwards.
pub fn current_cycle_day(config: &CycleConfig, today: NaiveDate) -> Result<i64> {
    let start = config.last_period_start.ok_or(Error::Untracked)?;
    let elapsed = whole_days_between(start, today);
    // a zero length only gets here from an unvalidated config
    let length = i64::from(config.cycle_length_days.max(1));
    Ok(elapsed.rem_euclid(length) + 1)
}

/// Phase for a cycle day. Reads only the period length from `config`.
pub fn cycle_phase(cycle_day: i64, config: &CycleConfig) -> Phase {
    if cycle_day <= i64::from(config.period_length_days) {
        Phase::Menstruation
    } else if cycle_day <= FOLLICULAR_LAST_DAY {
        Phase::Follicular
    } else if cycle_day <= OVULATION_LAST_DAY {
        Phase::Ovulation
    } else {
        Phase::Luteal
    }
}

pub fn predict_next_start(config: &CycleConfig) -> Result<NaiveDate> {
    let start = config.last_period_start.ok_or(Error::Untracked)?;
    add_cycle(start, config)
}

fn add_cycle(start: NaiveDate, config: &CycleConfig) -> Result<NaiveDate> {
    start
        .checked_add_days(Days::new(u64::from(config.cycle_length_days)))
        .ok_or(Error::DateOutOfRange(start))
}

/// How the cycle day is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleStrategy {
    /// Wraps modulo the cycle length from the configured last period start.
    #[default]
    Configured,
    /// Raw days elapsed since the latest log with flow, without wrapping.
    #[serde(alias = "inferred-from-history")]
    Inferred,
}

impl CycleStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleStrategy::Configured => "configured",
            CycleStrategy::Inferred => "inferred",
        }
    }

    pub fn cycle_day(
        &self,
        config: &CycleConfig,
        logs: &LogBook,
        today: NaiveDate,
    ) -> Result<i64> {
        match self {
            CycleStrategy::Configured => current_cycle_day(config, today),
            CycleStrategy::Inferred => {
                let last_flow = logs
                    .latest_flow_on_or_before(today)
                    .ok_or(Error::Untracked)?;
                Ok(whole_days_between(last_flow, today))
            }
        }
    }

    pub fn next_start(
        &self,
        config: &CycleConfig,
        logs: &LogBook,
        today: NaiveDate,
    ) -> Result<NaiveDate> {
        match self {
            CycleStrategy::Configured => predict_next_start(config),
            CycleStrategy::Inferred => {
                let last_flow = logs
                    .latest_flow_on_or_before(today)
                    .ok_or(Error::Untracked)?;
                add_cycle(last_flow, config)
            }
        }
    }
}

impl fmt::Display for CycleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CycleStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "configured" => Ok(CycleStrategy::Configured),
            "inferred" | "inferred-from-history" => Ok(CycleStrategy::Inferred),
            _ => Err(format!("Unknown cycle strategy: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub cycle_day: i64,
    pub phase: Phase,
    pub phase_label: String,
    pub next_predicted_start: NaiveDate,
    pub days_until_next_start: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleStatus {
    Tracked(CycleSummary),
    Untracked,
}

/// Untracked cycles come back as `Ok(CycleStatus::Untracked)`; any other
/// error is passed through.
pub fn summarize(
    strategy: CycleStrategy,
    config: &CycleConfig,
    logs: &LogBook,
    today: NaiveDate,
) -> Result<CycleStatus> {
    let tracked = strategy.cycle_day(config, logs, today).and_then(|day| {
        let next = strategy.next_start(config, logs, today)?;
        Ok((day, next))
    });

    let (cycle_day, next_predicted_start) = match tracked {
        Ok(tracked) => tracked,
        Err(Error::Untracked) => return Ok(CycleStatus::Untracked),
        Err(e) => return Err(e),
    };

    let phase = cycle_phase(cycle_day, config);
    Ok(CycleStatus::Tracked(CycleSummary {
        cycle_day,
        phase,
        phase_label: phase.label().to_string(),
        next_predicted_start,
        days_until_next_start: whole_days_between(today, next_predicted_start),
    }))
}
