//! Core types for the insight engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What an insight is telling the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Info,
    Warning,
    Alert,
    Success,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Info => "info",
            InsightKind::Warning => "warning",
            InsightKind::Alert => "alert",
            InsightKind::Success => "success",
        }
    }

    /// Severity an insight of this kind carries unless a rule overrides it
    pub fn default_severity(&self) -> Severity {
        match self {
            InsightKind::Alert => Severity::High,
            InsightKind::Warning => Severity::Medium,
            InsightKind::Info | InsightKind::Success => Severity::Low,
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifies the rule behind a triggered insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    Hydration,
    Mood,
    Exercise,
    Calories,
    HeavyFlow,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::Hydration => "hydration",
            RuleId::Mood => "mood",
            RuleId::Exercise => "exercise",
            RuleId::Calories => "calories",
            RuleId::HeavyFlow => "heavy_flow",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hydration" => Ok(RuleId::Hydration),
            "mood" => Ok(RuleId::Mood),
            "exercise" => Ok(RuleId::Exercise),
            "calories" => Ok(RuleId::Calories),
            "heavy_flow" => Ok(RuleId::HeavyFlow),
            _ => Err(format!("Unknown rule: {}", s)),
        }
    }
}

/// A single observation surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub severity: Severity,
    pub message: String,
    /// Rule that produced this insight; `None` for the fallback insights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleId>,
}

impl Insight {
    /// Create an insight with the kind's default severity
    pub fn new(kind: InsightKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            rule: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_rule(mut self, rule: RuleId) -> Self {
        self.rule = Some(rule);
        self
    }
}
