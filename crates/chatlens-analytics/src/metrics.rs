//! Metric definitions and their column names.

use crate::bucketing::{weekday_name, WEEKDAYS};
use crate::intervals::Speed;
use chatlens_core::{AnalyticsError, Counter, MessageType, Period, Result, SubPeriod};
use chrono::Weekday;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Column name of the message count.
pub const MESSAGES_COLUMN: &str = "Qty_messages";

/// One table column: what is summed or counted over a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Total characters matched for a counter (volume).
    CharLength(Counter),
    /// Number of matches recorded for a counter (frequency).
    Occurrences(Counter),
    /// Number of messages in the bucket.
    Messages,
    Period(Period),
    SubPeriod(SubPeriod),
    Weekday(Weekday),
    MessageType(MessageType),
    /// Gaps of one speed class between consecutive bucket messages.
    Interval(Speed),
}

impl Metric {
    pub fn column(&self) -> String {
        match self {
            Metric::CharLength(c) => c.to_string(),
            Metric::Occurrences(c) => format!("Qty_{}", c.slug()),
            Metric::Messages => MESSAGES_COLUMN.to_string(),
            Metric::Period(p) => p.label().to_string(),
            Metric::SubPeriod(s) => s.label().to_string(),
            Metric::Weekday(w) => weekday_name(*w).to_string(),
            Metric::MessageType(t) => format!("Type_{}", t.label()),
            Metric::Interval(s) => s.column().to_string(),
        }
    }

    /// The counter this metric reads, if any.
    pub fn counter(&self) -> Option<Counter> {
        match self {
            Metric::CharLength(c) | Metric::Occurrences(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column())
    }
}

impl FromStr for Metric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        if s == MESSAGES_COLUMN {
            return Ok(Metric::Messages);
        }
        if let Some(counter) = s.strip_prefix("Qty_char_").and_then(Counter::from_slug) {
            return Ok(Metric::CharLength(counter));
        }
        if let Some(counter) = s.strip_prefix("Qty_").and_then(Counter::from_slug) {
            return Ok(Metric::Occurrences(counter));
        }
        if let Some(t) = MessageType::ALL
            .into_iter()
            .find(|t| s.strip_prefix("Type_") == Some(t.label()))
        {
            return Ok(Metric::MessageType(t));
        }
        if let Some(p) = Period::ALL.into_iter().find(|p| p.label() == s) {
            return Ok(Metric::Period(p));
        }
        if let Some(sp) = SubPeriod::ALL.into_iter().find(|sp| sp.label() == s) {
            return Ok(Metric::SubPeriod(sp));
        }
        if let Some(w) = WEEKDAYS.into_iter().find(|w| weekday_name(*w) == s) {
            return Ok(Metric::Weekday(w));
        }
        if let Some(speed) = Speed::ALL.into_iter().find(|sp| sp.column() == s) {
            return Ok(Metric::Interval(speed));
        }
        Err(AnalyticsError::UnknownMetric(s.to_string()))
    }
}

/// An ordered list of metrics with unique column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    metrics: Vec<Metric>,
}

impl MetricSpec {
    pub fn new(metrics: Vec<Metric>) -> Result<Self> {
        let mut seen = HashSet::new();
        for metric in &metrics {
            let column = metric.column();
            if !seen.insert(column.clone()) {
                return Err(AnalyticsError::DuplicateColumn(column));
            }
        }
        Ok(Self { metrics })
    }

    /// Parse column names into a spec.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let metrics = names
            .iter()
            .map(|n| n.as_ref().parse())
            .collect::<Result<Vec<Metric>>>()?;
        Self::new(metrics)
    }

    /// Build a spec known to have unique columns (the built-in catalog).
    pub(crate) fn from_unique(metrics: Vec<Metric>) -> Self {
        debug_assert!(Self::new(metrics.clone()).is_ok());
        Self { metrics }
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn columns(&self) -> Vec<String> {
        self.metrics.iter().map(Metric::column).collect()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn needs_intervals(&self) -> bool {
        self.metrics.iter().any(|m| matches!(m, Metric::Interval(_)))
    }
}
