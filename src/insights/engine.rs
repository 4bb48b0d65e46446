//! Insight Engine - runs the rule battery over a window of recent logs

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::models::LogBook;

use super::rules::{
    CalorieRule, ExerciseRule, HeavyFlowRule, HydrationRule, MoodRule, MoodThreshold, Rule,
    Window,
};
use super::types::{Insight, InsightKind, RuleId};

pub const DEFAULT_WINDOW_SIZE: usize = 30;
pub const SHORT_WINDOW_SIZE: usize = 7;

const EMPTY_MESSAGE: &str = "Start logging your days to see personalized health insights.";
const ALL_CLEAR_MESSAGE: &str = "Your recent patterns look fine. Keep tracking!";

/// Named rule parameter presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsightProfile {
    /// Mood fires above 10 low days, exercise below 8 days
    #[default]
    Standard,
    /// Last 7 logs. Mood fires above half of the mood entries, exercise
    /// below 3 days
    ShortWindow,
}

impl InsightProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightProfile::Standard => "standard",
            InsightProfile::ShortWindow => "short-window",
        }
    }

    pub fn settings(&self) -> RuleSettings {
        match self {
            InsightProfile::Standard => RuleSettings::default(),
            InsightProfile::ShortWindow => RuleSettings {
                window_size: SHORT_WINDOW_SIZE,
                mood: MoodRule {
                    threshold: MoodThreshold::Fraction(0.5),
                    ..MoodRule::default()
                },
                exercise: ExerciseRule {
                    min_days: 3,
                    ..ExerciseRule::default()
                },
                ..RuleSettings::default()
            },
        }
    }
}

impl fmt::Display for InsightProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(InsightProfile::Standard),
            "short-window" => Ok(InsightProfile::ShortWindow),
            _ => Err(format!("Unknown insight profile: {}", s)),
        }
    }
}

/// Parameters for the default rule set
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSettings {
    pub window_size: usize,
    pub hydration: HydrationRule,
    pub mood: MoodRule,
    pub exercise: ExerciseRule,
    pub calories: CalorieRule,
    pub heavy_flow: HeavyFlowRule,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            hydration: HydrationRule::default(),
            mood: MoodRule::default(),
            exercise: ExerciseRule::default(),
            calories: CalorieRule::default(),
            heavy_flow: HeavyFlowRule::default(),
        }
    }
}

/// Evaluates every registered rule, in registration order, against the
/// window ending at the given day. Holds no state between calls.
pub struct InsightEngine {
    window_size: usize,
    rules: Vec<Box<dyn Rule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Engine with the standard profile
    pub fn new() -> Self {
        Self::from_settings(RuleSettings::default())
    }

    /// Engine with the five built-in rules in their fixed order
    pub fn from_settings(settings: RuleSettings) -> Self {
        let mut engine = Self::empty(settings.window_size);

        engine.register(Box::new(settings.hydration));
        engine.register(Box::new(settings.mood));
        engine.register(Box::new(settings.exercise));
        engine.register(Box::new(settings.calories));
        engine.register(Box::new(settings.heavy_flow));

        engine
    }

    /// Engine with no rules registered
    pub fn empty(window_size: usize) -> Self {
        Self {
            window_size,
            rules: vec![],
        }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn rule_ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    /// Fresh insight list for the logs up to and including `today`.
    ///
    /// Fired rules come back in rule order. When none fires, the list holds a
    /// single fallback: an invitation to start tracking if the window is
    /// empty, an all-clear otherwise.
    pub fn analyze(&self, logs: &LogBook, today: NaiveDate) -> Vec<Insight> {
        let window = Window::select(logs, today, self.window_size);
        if window.is_empty() {
            tracing::debug!(%today, "No logs in window");
            return vec![Insight::new(InsightKind::Info, EMPTY_MESSAGE)];
        }

        let insights: Vec<Insight> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(&window))
            .collect();

        tracing::debug!(
            %today,
            window = window.len(),
            fired = insights.len(),
            "Insight analysis complete"
        );

        if insights.is_empty() {
            vec![Insight::new(InsightKind::Success, ALL_CLEAR_MESSAGE)]
        } else {
            insights
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::Severity;
    use crate::models::{DailyLog, Marker, Meal, Mood, PeriodFlow};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn healthy() -> DailyLog {
        DailyLog {
            mood: Some(Mood::Happy),
            water_cups: Some(8),
            exercise: Some(Marker::Flag(true)),
            meals: vec![Meal::new("thali", 1800)],
            ..Default::default()
        }
    }

    fn book(logs: Vec<DailyLog>) -> LogBook {
        logs.into_iter()
            .enumerate()
            .map(|(i, log)| (date(i as u32 + 1), log))
            .collect()
    }

    #[test]
    fn test_engine_registers_rules_in_order() {
        let engine = InsightEngine::new();
        assert_eq!(
            engine.rule_ids(),
            vec![
                RuleId::Hydration,
                RuleId::Mood,
                RuleId::Exercise,
                RuleId::Calories,
                RuleId::HeavyFlow,
            ]
        );
        assert_eq!(engine.window_size(), 30);
    }

    #[test]
    fn test_empty_logs_invite_tracking() {
        let insights = InsightEngine::new().analyze(&LogBook::new(), date(30));
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Info);
        assert_eq!(insights[0].severity, Severity::Low);
        assert_eq!(insights[0].rule, None);
    }

    #[test]
    fn test_logs_after_today_are_outside_window() {
        let logs = book(vec![healthy(); 10]);
        let before = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let insights = InsightEngine::new().analyze(&logs, before);
        assert_eq!(insights[0].message, EMPTY_MESSAGE);
    }

    #[test]
    fn test_all_clear_when_nothing_fires() {
        let logs = book(vec![healthy(); 10]);
        let insights = InsightEngine::new().analyze(&logs, date(30));
        assert_eq!(
            insights,
            vec![Insight::new(InsightKind::Success, ALL_CLEAR_MESSAGE)]
        );
    }

    #[test]
    fn test_fired_rules_replace_fallback_and_keep_order() {
        let troubled = DailyLog {
            mood: Some(Mood::Sad),
            water_cups: Some(3),
            period_flow: PeriodFlow::Heavy,
            ..Default::default()
        };
        let logs = book(vec![troubled; 12]);

        let insights = InsightEngine::new().analyze(&logs, date(30));
        let fired: Vec<_> = insights.iter().map(|i| i.rule).collect();
        assert_eq!(
            fired,
            vec![
                Some(RuleId::Hydration),
                Some(RuleId::Mood),
                Some(RuleId::Exercise),
                Some(RuleId::HeavyFlow),
            ]
        );
        assert!(insights
            .iter()
            .all(|i| i.kind != InsightKind::Success && i.rule.is_some()));
    }

    #[test]
    fn test_analysis_is_repeatable() {
        let mut logs: Vec<DailyLog> = (0..20).map(|_| healthy()).collect();
        logs[3].water_cups = Some(1);
        logs[4].mood = Some(Mood::Anxious);
        let logs = book(logs);

        let engine = InsightEngine::new();
        let first = engine.analyze(&logs, date(25));
        let second = engine.analyze(&logs, date(25));
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_window_size_limits_history() {
        // older dehydrated days fall outside a 5-log window
        let mut logs = vec![
            DailyLog {
                water_cups: Some(1),
                ..healthy()
            };
            10
        ];
        logs.extend(vec![healthy(); 5]);
        let logs = book(logs);

        let settings = RuleSettings {
            window_size: 5,
            ..RuleSettings::default()
        };
        let narrow = InsightEngine::from_settings(settings).analyze(&logs, date(30));
        assert!(narrow.iter().all(|i| i.rule != Some(RuleId::Hydration)));

        let wide = InsightEngine::new().analyze(&logs, date(30));
        assert!(wide.iter().any(|i| i.rule == Some(RuleId::Hydration)));
    }

    #[test]
    fn test_short_window_profile() {
        let mut logs = vec![
            DailyLog {
                mood: Some(Mood::Irritable),
                ..healthy()
            };
            4
        ];
        logs.extend(vec![
            DailyLog {
                exercise: None,
                ..healthy()
            };
            2
        ]);
        let logs = book(logs);

        let standard = InsightEngine::new().analyze(&logs, date(30));
        let standard_rules: Vec<_> = standard.iter().filter_map(|i| i.rule).collect();
        assert_eq!(standard_rules, vec![RuleId::Exercise]);

        let short = InsightEngine::from_settings(InsightProfile::ShortWindow.settings())
            .analyze(&logs, date(30));
        let short_rules: Vec<_> = short.iter().filter_map(|i| i.rule).collect();
        assert_eq!(short_rules, vec![RuleId::Mood]);
    }

    #[test]
    fn test_short_window_profile_ignores_older_logs() {
        // a week of good days after three weeks of low moods
        let mut logs = vec![
            DailyLog {
                mood: Some(Mood::Sad),
                ..healthy()
            };
            21
        ];
        logs.extend(vec![healthy(); 7]);
        let logs = book(logs);

        let engine = InsightEngine::from_settings(InsightProfile::ShortWindow.settings());
        assert_eq!(engine.window_size(), SHORT_WINDOW_SIZE);
        assert!(engine.window_size() < DEFAULT_WINDOW_SIZE);
        assert_eq!(
            engine.analyze(&logs, date(30)),
            vec![Insight::new(InsightKind::Success, ALL_CLEAR_MESSAGE)]
        );

        let standard = InsightEngine::new().analyze(&logs, date(30));
        assert_eq!(standard[0].rule, Some(RuleId::Mood));
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!(
            "short-window".parse::<InsightProfile>(),
            Ok(InsightProfile::ShortWindow)
        );
        assert!("weekly".parse::<InsightProfile>().is_err());
    }
}
