//! The rule battery: each rule measures one metric over the window, checks a
//! threshold, and renders its own message.

use chrono::NaiveDate;

use crate::models::{DailyLog, LogBook, PeriodFlow};

use super::types::{Insight, InsightKind, RuleId, Severity};

/// The trailing logs a rule evaluates: the most recent non-empty logs on or
/// before "today", newest first. Days with no log are not part of it.
#[derive(Debug, Clone)]
pub struct Window<'a> {
    entries: Vec<(NaiveDate, &'a DailyLog)>,
}

impl<'a> Window<'a> {
    pub fn select(logs: &'a LogBook, today: NaiveDate, size: usize) -> Self {
        Self {
            entries: logs.recent(today, size),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.iter().map(|(date, _)| *date)
    }

    pub fn logs(&self) -> impl Iterator<Item = &'a DailyLog> + '_ {
        self.entries.iter().map(|(_, log)| *log)
    }

    fn count(&self, predicate: impl Fn(&DailyLog) -> bool) -> Measurement {
        Measurement {
            value: self.logs().filter(|&log| predicate(log)).count() as f64,
            samples: self.len(),
        }
    }
}

/// A metric value plus the number of logs it was computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub value: f64,
    pub samples: usize,
}

impl Measurement {
    fn mean(values: impl Iterator<Item = f64>) -> Self {
        let (sum, samples) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
        let value = if samples > 0 { sum / samples as f64 } else { 0.0 };
        Self { value, samples }
    }
}

/// A threshold rule evaluated by the insight engine
pub trait Rule: Send + Sync {
    fn id(&self) -> RuleId;

    fn kind(&self) -> InsightKind;

    fn severity(&self) -> Severity {
        self.kind().default_severity()
    }

    /// Fewest samples the metric needs before the rule is considered at all
    fn min_samples(&self) -> usize;

    fn measure(&self, window: &Window<'_>) -> Measurement;

    fn triggers(&self, measurement: &Measurement) -> bool;

    fn message(&self, measurement: &Measurement) -> String;

    /// Measure, check the sample size, then the threshold. A rule without
    /// enough samples is skipped silently.
    fn evaluate(&self, window: &Window<'_>) -> Option<Insight> {
        let measurement = self.measure(window);
        if measurement.samples == 0 || measurement.samples < self.min_samples() {
            tracing::debug!(
                rule = self.id().as_str(),
                samples = measurement.samples,
                required = self.min_samples(),
                "Rule skipped, not enough samples"
            );
            return None;
        }

        if !self.triggers(&measurement) {
            return None;
        }

        tracing::debug!(
            rule = self.id().as_str(),
            value = measurement.value,
            samples = measurement.samples,
            "Rule fired"
        );
        Some(
            Insight::new(self.kind(), self.message(&measurement))
                .with_severity(self.severity())
                .with_rule(self.id()),
        )
    }
}

/// Average water intake below the recommended cups per day
#[derive(Debug, Clone, PartialEq)]
pub struct HydrationRule {
    pub min_samples: usize,
    pub min_mean_cups: f64,
}

impl Default for HydrationRule {
    fn default() -> Self {
        Self {
            min_samples: 1,
            min_mean_cups: 6.0,
        }
    }
}

impl Rule for HydrationRule {
    fn id(&self) -> RuleId {
        RuleId::Hydration
    }

    fn kind(&self) -> InsightKind {
        InsightKind::Warning
    }

    fn min_samples(&self) -> usize {
        self.min_samples
    }

    fn measure(&self, window: &Window<'_>) -> Measurement {
        Measurement::mean(window.logs().filter_map(|log| log.water_cups).map(f64::from))
    }

    fn triggers(&self, measurement: &Measurement) -> bool {
        measurement.value < self.min_mean_cups
    }

    fn message(&self, measurement: &Measurement) -> String {
        format!(
            "Your water intake averages {:.1} cups a day, below the recommended {:.1}. Consider drinking more water.",
            measurement.value, self.min_mean_cups
        )
    }
}

/// How many low-mood days it takes for the mood rule to fire
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoodThreshold {
    /// More than this many low-mood days in the window
    Count(usize),
    /// More than this share of the days with a mood entry
    Fraction(f64),
}

/// Persistent sad, anxious or irritable moods
#[derive(Debug, Clone, PartialEq)]
pub struct MoodRule {
    pub min_samples: usize,
    pub threshold: MoodThreshold,
}

impl Default for MoodRule {
    fn default() -> Self {
        Self {
            min_samples: 1,
            threshold: MoodThreshold::Count(10),
        }
    }
}

impl Rule for MoodRule {
    fn id(&self) -> RuleId {
        RuleId::Mood
    }

    fn kind(&self) -> InsightKind {
        InsightKind::Alert
    }

    fn min_samples(&self) -> usize {
        self.min_samples
    }

    /// Low-mood days, out of the days with any mood recorded
    fn measure(&self, window: &Window<'_>) -> Measurement {
        let moods: Vec<_> = window.logs().filter_map(|log| log.mood).collect();
        Measurement {
            value: moods.iter().filter(|mood| mood.is_low()).count() as f64,
            samples: moods.len(),
        }
    }

    fn triggers(&self, measurement: &Measurement) -> bool {
        match self.threshold {
            MoodThreshold::Count(max) => measurement.value > max as f64,
            MoodThreshold::Fraction(max) => {
                measurement.value / measurement.samples as f64 > max
            }
        }
    }

    fn message(&self, measurement: &Measurement) -> String {
        format!(
            "Persistent low mood detected on {} of {} days with a mood entry. Consider consulting a healthcare provider.",
            measurement.value as usize, measurement.samples
        )
    }
}

/// Too few days with exercise logged
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseRule {
    pub min_samples: usize,
    pub min_days: usize,
}

impl Default for ExerciseRule {
    fn default() -> Self {
        Self {
            min_samples: 1,
            min_days: 8,
        }
    }
}

impl Rule for ExerciseRule {
    fn id(&self) -> RuleId {
        RuleId::Exercise
    }

    fn kind(&self) -> InsightKind {
        InsightKind::Info
    }

    fn min_samples(&self) -> usize {
        self.min_samples
    }

    fn measure(&self, window: &Window<'_>) -> Measurement {
        window.count(DailyLog::exercised)
    }

    fn triggers(&self, measurement: &Measurement) -> bool {
        measurement.value < self.min_days as f64
    }

    fn message(&self, measurement: &Measurement) -> String {
        format!(
            "Exercise logged on {} of the last {} days. Regular exercise can help manage PMS symptoms.",
            measurement.value as usize, measurement.samples
        )
    }
}

/// Average logged calories below a floor
#[derive(Debug, Clone, PartialEq)]
pub struct CalorieRule {
    pub min_samples: usize,
    pub min_mean_calories: f64,
}

impl Default for CalorieRule {
    fn default() -> Self {
        Self {
            min_samples: 7,
            min_mean_calories: 1200.0,
        }
    }
}

impl Rule for CalorieRule {
    fn id(&self) -> RuleId {
        RuleId::Calories
    }

    fn kind(&self) -> InsightKind {
        InsightKind::Warning
    }

    fn min_samples(&self) -> usize {
        self.min_samples
    }

    fn measure(&self, window: &Window<'_>) -> Measurement {
        Measurement::mean(
            window
                .logs()
                .map(DailyLog::total_calories)
                .filter(|total| *total > 0)
                .map(f64::from),
        )
    }

    fn triggers(&self, measurement: &Measurement) -> bool {
        measurement.value < self.min_mean_calories
    }

    fn message(&self, measurement: &Measurement) -> String {
        format!(
            "Your logged meals average {:.1} calories a day, below {:.1}. Make sure you are eating enough, especially around your period.",
            measurement.value, self.min_mean_calories
        )
    }
}

/// Repeated heavy-flow days
#[derive(Debug, Clone, PartialEq)]
pub struct HeavyFlowRule {
    pub min_samples: usize,
    pub max_days: usize,
}

impl Default for HeavyFlowRule {
    fn default() -> Self {
        Self {
            min_samples: 1,
            max_days: 2,
        }
    }
}

impl Rule for HeavyFlowRule {
    fn id(&self) -> RuleId {
        RuleId::HeavyFlow
    }

    fn kind(&self) -> InsightKind {
        InsightKind::Alert
    }

    fn min_samples(&self) -> usize {
        self.min_samples
    }

    fn measure(&self, window: &Window<'_>) -> Measurement {
        window.count(|log| log.period_flow == PeriodFlow::Heavy)
    }

    fn triggers(&self, measurement: &Measurement) -> bool {
        measurement.value > self.max_days as f64
    }

    fn message(&self, measurement: &Measurement) -> String {
        format!(
            "Heavy flow logged on {} of the last {} days. If heavy bleeding is common for you, talk to a healthcare provider.",
            measurement.value as usize, measurement.samples
        )
    }
}
