use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};

pub const MIN_CYCLE_LENGTH_DAYS: u32 = 20;
pub const MAX_CYCLE_LENGTH_DAYS: u32 = 40;
pub const MIN_PERIOD_LENGTH_DAYS: u32 = 2;
pub const MAX_PERIOD_LENGTH_DAYS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mood {
    Happy,
    Calm,
    Energetic,
    Tired,
    Sad,
    Anxious,
    Irritable,
    Stressed,
}

impl Mood {
    pub fn is_low(&self) -> bool {
        matches!(self, Mood::Sad | Mood::Anxious | Mood::Irritable)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodFlow {
    #[default]
    None,
    Spotting,
    Light,
    Medium,
    Heavy,
}

impl PeriodFlow {
    pub fn is_bleeding(&self) -> bool {
        !matches!(self, PeriodFlow::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodProduct {
    Pad,
    Tampon,
    Cup,
    Disc,
    PeriodUnderwear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Symptom {
    Cramps,
    Headache,
    Bloating,
    Acne,
    Fatigue,
    Backache,
    BreastTenderness,
    Nausea,
}

/// Checkbox or free text ("30 min walk").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Marker {
    Flag(bool),
    Text(String),
}

impl Marker {
    pub fn is_present(&self) -> bool {
        match self {
            Marker::Flag(flag) => *flag,
            Marker::Text(text) => !text.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub estimated_calories: Option<u32>,
}

impl Meal {
    pub fn new(description: impl Into<String>, estimated_calories: u32) -> Self {
        Self {
            description: description.into(),
            estimated_calories: Some(estimated_calories),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default, deserialize_with = "lenient_flow")]
    pub period_flow: PeriodFlow,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub period_product: Option<PeriodProduct>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub water_cups: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub exercise: Option<Marker>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meals: Vec<Meal>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supplements: Option<Marker>,
    #[serde(default, deserialize_with = "lenient_symptoms", skip_serializing_if = "BTreeSet::is_empty")]
    pub symptoms: BTreeSet<Symptom>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub absent: bool,
}

impl DailyLog {
    pub fn total_calories(&self) -> u32 {
        self.meals
            .iter()
            .filter_map(|meal| meal.estimated_calories)
            .fold(0u32, u32::saturating_add)
    }

    pub fn exercised(&self) -> bool {
        self.exercise.as_ref().is_some_and(Marker::is_present)
    }

    /// True when nothing was recorded. Such a log is the same as no entry.
    pub fn is_empty(&self) -> bool {
        self.mood.is_none()
            && !self.period_flow.is_bleeding()
            && self.period_product.is_none()
            && self.water_cups.is_none()
            && !self.exercised()
            && self.meals.is_empty()
            && !self.supplements.as_ref().is_some_and(Marker::is_present)
            && self.symptoms.is_empty()
            && self.notes.as_deref().map_or(true, |n| n.trim().is_empty())
            && !self.absent
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<NaiveDate, DailyLog>",
    into = "BTreeMap<NaiveDate, DailyLog>"
)]
pub struct LogBook {
    entries: BTreeMap<NaiveDate, DailyLog>,
}

impl LogBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty log removes the entry.
    pub fn upsert(&mut self, date: NaiveDate, log: DailyLog) {
        if log.is_empty() {
            self.entries.remove(&date);
        } else {
            self.entries.insert(date, log);
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyLog> {
        self.entries.get(&date)
    }

    pub fn logged_on(&self, date: NaiveDate) -> bool {
        self.entries.contains_key(&date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, &DailyLog)> {
        self.entries.iter().map(|(date, log)| (*date, log))
    }

    /// The `limit` most recent logs dated on or before `today`, newest first.
    pub fn recent(&self, today: NaiveDate, limit: usize) -> Vec<(NaiveDate, &DailyLog)> {
        self.entries
            .range(..=today)
            .rev()
            .take(limit)
            .map(|(date, log)| (*date, log))
            .collect()
    }

    pub fn latest_flow_on_or_before(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.entries
            .range(..=today)
            .rev()
            .find(|(_, log)| log.period_flow.is_bleeding())
            .map(|(date, _)| *date)
    }
}

impl From<BTreeMap<NaiveDate, DailyLog>> for LogBook {
    fn from(entries: BTreeMap<NaiveDate, DailyLog>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<LogBook> for BTreeMap<NaiveDate, DailyLog> {
    fn from(book: LogBook) -> Self {
        book.entries
    }
}

impl FromIterator<(NaiveDate, DailyLog)> for LogBook {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, DailyLog)>>(iter: I) -> Self {
        let mut book = LogBook::new();
        for (date, log) in iter {
            book.upsert(date, log);
        }
        book
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    #[serde(default = "default_cycle_length")]
    pub cycle_length_days: u32,
    #[serde(default = "default_period_length")]
    pub period_length_days: u32,
    #[serde(default)]
    pub last_period_start: Option<NaiveDate>,
}

fn default_cycle_length() -> u32 {
    28
}

fn default_period_length() -> u32 {
    5
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            cycle_length_days: default_cycle_length(),
            period_length_days: default_period_length(),
            last_period_start: None,
        }
    }
}

impl CycleConfig {
    pub fn new(
        cycle_length_days: u32,
        period_length_days: u32,
        last_period_start: Option<NaiveDate>,
    ) -> Result<Self> {
        let config = Self {
            cycle_length_days,
            period_length_days,
            last_period_start,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_CYCLE_LENGTH_DAYS..=MAX_CYCLE_LENGTH_DAYS).contains(&self.cycle_length_days) {
            return Err(Error::CycleLengthOutOfRange(self.cycle_length_days));
        }
        if !(MIN_PERIOD_LENGTH_DAYS..=MAX_PERIOD_LENGTH_DAYS).contains(&self.period_length_days) {
            return Err(Error::PeriodLengthOutOfRange(self.period_length_days));
        }
        Ok(())
    }

    pub fn record_period_start(&mut self, date: NaiveDate) {
        self.last_period_start = Some(date);
    }
}

// Form input arrives loosely typed. Anything that does not decode cleanly is
// treated as absent instead of rejecting the whole log.

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_flow<'de, D>(deserializer: D) -> std::result::Result<PeriodFlow, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient(deserializer)?.unwrap_or(false))
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

fn lenient_symptoms<'de, D>(deserializer: D) -> std::result::Result<BTreeSet<Symptom>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

fn count_from_value(value: &Value) -> Option<u32> {
    let count = match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(truncate_count)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate_count))
        }
        _ => None,
    }?;
    u32::try_from(count).ok()
}

// 7.9 cups counts as 7, whether it arrives as a number or a string
fn truncate_count(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0).then(|| f.trunc() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn water(cups: u32) -> DailyLog {
        DailyLog {
            water_cups: Some(cups),
            ..Default::default()
        }
    }

    #[test]
    fn test_total_calories_follows_meals() {
        let mut log = DailyLog {
            meals: vec![Meal::new("oats", 350), Meal::new("dal and rice", 600)],
            ..Default::default()
        };
        assert_eq!(log.total_calories(), 950);

        log.meals.push(Meal::new("chai", 120));
        assert_eq!(log.total_calories(), 1070);

        log.meals.clear();
        assert_eq!(log.total_calories(), 0);
    }

    #[test]
    fn test_default_log_is_empty() {
        assert!(DailyLog::default().is_empty());

        let log = DailyLog {
            exercise: Some(Marker::Flag(false)),
            notes: Some("  ".into()),
            ..Default::default()
        };
        assert!(log.is_empty());

        assert!(!water(0).is_empty());
        let absent = DailyLog {
            absent: true,
            ..Default::default()
        };
        assert!(!absent.is_empty());
    }

    #[test]
    fn test_exercise_marker_presence() {
        let text = DailyLog {
            exercise: Some(Marker::Text("30 min walk".into())),
            ..Default::default()
        };
        let flag = DailyLog {
            exercise: Some(Marker::Flag(true)),
            ..Default::default()
        };
        let blank = DailyLog {
            exercise: Some(Marker::Text(String::new())),
            ..Default::default()
        };
        assert!(text.exercised());
        assert!(flag.exercised());
        assert!(!blank.exercised());
    }

    #[test]
    fn test_decode_form_style_log() {
        let log: DailyLog = serde_json::from_value(json!({
            "mood": "anxious",
            "period_flow": "heavy",
            "period_product": "period-underwear",
            "water_cups": "7",
            "exercise": "yoga",
            "meals": [{"description": "poha", "estimated_calories": 300}],
            "symptoms": ["cramps", "breast-tenderness", "cramps"],
            "absent": true
        }))
        .unwrap();

        assert_eq!(log.mood, Some(Mood::Anxious));
        assert_eq!(log.period_flow, PeriodFlow::Heavy);
        assert_eq!(log.period_product, Some(PeriodProduct::PeriodUnderwear));
        assert_eq!(log.water_cups, Some(7));
        assert!(log.exercised());
        assert_eq!(log.total_calories(), 300);
        assert_eq!(log.symptoms.len(), 2);
        assert!(log.absent);
    }

    #[test]
    fn test_malformed_fields_decode_as_absent() {
        let log: DailyLog = serde_json::from_value(json!({
            "mood": "",
            "period_flow": "gushing",
            "water_cups": "NaN",
            "meals": [{"description": "snack", "estimated_calories": -50}],
            "symptoms": ["cramps", "unknown"]
        }))
        .unwrap();

        assert_eq!(log.mood, None);
        assert_eq!(log.period_flow, PeriodFlow::None);
        assert_eq!(log.water_cups, None);
        assert_eq!(log.total_calories(), 0);
        assert_eq!(log.symptoms, BTreeSet::from([Symptom::Cramps]));
    }

    #[test]
    fn test_fractional_counts_truncate_as_number_or_string() {
        let as_number: DailyLog = serde_json::from_value(json!({"water_cups": 7.9})).unwrap();
        let as_string: DailyLog = serde_json::from_value(json!({"water_cups": " 7.9 "})).unwrap();
        assert_eq!(as_number.water_cups, Some(7));
        assert_eq!(as_string.water_cups, Some(7));

        let negative: DailyLog = serde_json::from_value(json!({"water_cups": "-2.5"})).unwrap();
        assert_eq!(negative.water_cups, None);
    }

    #[test]
    fn test_malformed_notes_and_absent_do_not_reject_log() {
        let log: DailyLog = serde_json::from_value(json!({
            "mood": "calm",
            "notes": 5,
            "absent": "yes"
        }))
        .unwrap();

        assert_eq!(log.mood, Some(Mood::Calm));
        assert_eq!(log.notes, None);
        assert!(!log.absent);
    }

    #[test]
    fn test_upsert_empty_log_removes_entry() {
        let mut book = LogBook::new();
        book.upsert(date(2024, 3, 1), water(6));
        assert!(book.logged_on(date(2024, 3, 1)));

        book.upsert(date(2024, 3, 1), DailyLog::default());
        assert!(!book.logged_on(date(2024, 3, 1)));
        assert!(book.is_empty());
    }

    #[test]
    fn test_logbook_json_keys_and_empty_entries() {
        let book: LogBook = serde_json::from_value(json!({
            "2024-03-02": {"water_cups": 4},
            "2024-03-01": {"water_cups": 8},
            "2024-03-03": {}
        }))
        .unwrap();

        assert_eq!(book.len(), 2);
        let dates: Vec<_> = book.iter().map(|(d, _)| d).collect();
        assert_eq!(dates, vec![date(2024, 3, 1), date(2024, 3, 2)]);

        let out = serde_json::to_value(&book).unwrap();
        assert_eq!(out["2024-03-01"]["water_cups"], 8);
    }

    #[test]
    fn test_recent_is_newest_first_and_bounded_by_today() {
        let book: LogBook = (1..=10).map(|d| (date(2024, 3, d), water(d))).collect();

        let recent = book.recent(date(2024, 3, 8), 3);
        let dates: Vec<_> = recent.iter().map(|(d, _)| *d).collect();
        assert_eq!(dates, vec![date(2024, 3, 8), date(2024, 3, 7), date(2024, 3, 6)]);

        assert_eq!(book.recent(date(2024, 2, 1), 30).len(), 0);
        assert_eq!(book.recent(date(2024, 4, 1), 30).len(), 10);
    }

    #[test]
    fn test_latest_flow_on_or_before() {
        let mut book = LogBook::new();
        let flow = |f| DailyLog {
            period_flow: f,
            ..Default::default()
        };
        book.upsert(date(2024, 3, 1), flow(PeriodFlow::Medium));
        book.upsert(date(2024, 3, 2), flow(PeriodFlow::Spotting));
        book.upsert(date(2024, 3, 5), water(5));
        book.upsert(date(2024, 3, 29), flow(PeriodFlow::Light));

        assert_eq!(
            book.latest_flow_on_or_before(date(2024, 3, 10)),
            Some(date(2024, 3, 2))
        );
        assert_eq!(
            book.latest_flow_on_or_before(date(2024, 3, 29)),
            Some(date(2024, 3, 29))
        );
        assert_eq!(book.latest_flow_on_or_before(date(2024, 2, 1)), None);
    }

    #[test]
    fn test_cycle_config_defaults_and_validation() {
        let config = CycleConfig::default();
        assert_eq!(config.cycle_length_days, 28);
        assert_eq!(config.period_length_days, 5);
        assert_eq!(config.last_period_start, None);

        assert!(CycleConfig::new(20, 2, None).is_ok());
        assert!(CycleConfig::new(40, 10, None).is_ok());
        assert_eq!(
            CycleConfig::new(19, 5, None),
            Err(Error::CycleLengthOutOfRange(19))
        );
        assert_eq!(
            CycleConfig::new(28, 11, None),
            Err(Error::PeriodLengthOutOfRange(11))
        );
    }

    #[test]
    fn test_record_period_start_overwrites() {
        let mut config = CycleConfig::new(30, 4, Some(date(2024, 1, 1))).unwrap();
        config.record_period_start(date(2024, 1, 31));
        assert_eq!(config.last_period_start, Some(date(2024, 1, 31)));
    }

    #[test]
    fn test_cycle_config_partial_json_uses_defaults() {
        let config: CycleConfig =
            serde_json::from_value(json!({"last_period_start": "2024-01-01"})).unwrap();
        assert_eq!(config.cycle_length_days, 28);
        assert_eq!(config.last_period_start, Some(date(2024, 1, 1)));
    }
}
