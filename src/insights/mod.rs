//! Insight Engine - rule-triggered health insights
//!
//! Each call selects the trailing window of logs (30 by default), runs every
//! rule against it in a fixed order, and returns a fresh list. Nothing is
//! cached between calls; the caller owns storing the latest result.
//!
//! ## Default rules
//!
//! - **Hydration** - average water intake below 6 cups
//! - **Mood** - persistent sad, anxious or irritable days
//! - **Exercise** - too few active days
//! - **Calories** - average logged calories below 1200 (needs 7 days of meals)
//! - **Heavy flow** - more than two heavy-flow days
//!
//! ## Usage
//!
//! ```rust,ignore
//! use saheli_backend::insights::{InsightEngine, InsightProfile};
//!
//! let engine = InsightEngine::from_settings(InsightProfile::Standard.settings());
//! let insights = engine.analyze(&logs, today);
//! ```

pub mod engine;
pub mod rules;
pub mod types;

pub use engine::{
    InsightEngine, InsightProfile, RuleSettings, DEFAULT_WINDOW_SIZE, SHORT_WINDOW_SIZE,
};
pub use rules::{
    CalorieRule, ExerciseRule, HeavyFlowRule, HydrationRule, Measurement, MoodRule,
    MoodThreshold, Rule, Window,
};
pub use types::{Insight, InsightKind, RuleId, Severity};
