//! Saheli backend
//!
//! Derives cycle status and health insights from daily logs:
//! - Cycle model: cycle day, phase, next predicted start
//! - Insight engine: threshold rules over the trailing window of logs
//! - Period history: bleeding episodes and cycle statistics
//! - HTTP routes exposing the above over JSON
//!
//! The engine does no I/O and never reads the clock. Callers pass in an
//! already loaded snapshot of logs and settings along with "today".

pub mod config;
pub mod cycle;
pub mod error;
pub mod history;
pub mod insights;
pub mod models;
pub mod routes;


pub use config::AppConfig;
pub use cycle::{
    current_cycle_day, cycle_phase, predict_next_start, summarize, CycleStatus, CycleStrategy,
    CycleSummary, Phase,
};
pub use error::{Error, Result};
pub use history::{cycle_stats, period_history, BleedingEpisode, CycleStats};
pub use insights::{Insight, InsightEngine, InsightKind, InsightProfile, RuleSettings, Severity};
pub use models::{CycleConfig, DailyLog, LogBook, Meal, Mood, PeriodFlow, Symptom};
