//! Grouping of messages into ordered buckets.
//!
//! Closed dimensions (weekday, actor, day period, ...) always yield their full
//! key set in canonical order. The month dimension is open-ended and keeps
//! first-seen order, which is chronological for a time-ordered chat.

use chatlens_core::{AnalyticsError, Chat, Message, MessageType, Period, Result, SubPeriod};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Weekdays in canonical Sunday-first order.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// One group of messages sharing a key.
#[derive(Debug, Clone)]
pub struct Bucket<'a> {
    pub key: String,
    /// Row label shown in tables. Equal to the key except for actor buckets,
    /// which are keyed by id and labelled by display name.
    pub label: String,
    pub messages: Vec<&'a Message>,
}

/// Buckets in output order.
#[derive(Debug, Clone, Default)]
pub struct Buckets<'a> {
    entries: Vec<Bucket<'a>>,
}

impl<'a> Buckets<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|b| b.key.as_str()).collect()
    }

    pub fn get(&self, key: &str) -> Option<&Bucket<'a>> {
        self.entries.iter().find(|b| b.key == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bucket<'a>> {
        self.entries.iter()
    }

    fn push(&mut self, key: String) -> usize {
        self.entries.push(Bucket {
            label: key.clone(),
            key,
            messages: Vec::new(),
        });
        self.entries.len() - 1
    }
}

impl<'a> IntoIterator for Buckets<'a> {
    type Item = Bucket<'a>;
    type IntoIter = std::vec::IntoIter<Bucket<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Group `messages` by `key_fn`.
///
/// With `fixed_keys` the result holds exactly those keys, in that order, and a
/// message mapping to any other key is an error. Without them, keys appear in
/// first-seen order.
pub fn bucket<'a, I, F>(messages: I, key_fn: F, fixed_keys: Option<&[String]>) -> Result<Buckets<'a>>
where
    I: IntoIterator<Item = &'a Message>,
    F: Fn(&Message) -> String,
{
    let mut buckets = Buckets::default();
    let mut positions: HashMap<String, usize> = HashMap::new();

    if let Some(keys) = fixed_keys {
        for key in keys {
            if !positions.contains_key(key) {
                let idx = buckets.push(key.clone());
                positions.insert(key.clone(), idx);
            }
        }
    }

    for msg in messages {
        let key = key_fn(msg);
        let idx = match positions.get(&key) {
            Some(&idx) => idx,
            None if fixed_keys.is_some() => return Err(AnalyticsError::UnexpectedKey(key)),
            None => {
                let idx = buckets.push(key.clone());
                positions.insert(key, idx);
                idx
            }
        };
        buckets.entries[idx].messages.push(msg);
    }

    Ok(buckets)
}

/// The axis a table's rows are grouped along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Month,
    Weekday,
    Actor,
    Period,
    SubPeriod,
    MessageType,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Month,
        Dimension::Weekday,
        Dimension::Actor,
        Dimension::Period,
        Dimension::SubPeriod,
        Dimension::MessageType,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Month => "month",
            Dimension::Weekday => "weekday",
            Dimension::Actor => "actor",
            Dimension::Period => "period",
            Dimension::SubPeriod => "sub_period",
            Dimension::MessageType => "message_type",
        }
    }

    /// Bucket key of one message along this dimension.
    pub fn key_of(self, msg: &Message) -> String {
        match self {
            Dimension::Month => msg.month_label(),
            Dimension::Weekday => weekday_name(msg.weekday()).to_string(),
            Dimension::Actor => msg.actor.clone(),
            Dimension::Period => msg.day_period.label().to_string(),
            Dimension::SubPeriod => msg.day_sub_period.label().to_string(),
            Dimension::MessageType => msg.message_type.label().to_string(),
        }
    }

    /// Canonical key set, or `None` for the open-ended month dimension.
    pub fn fixed_keys(self, chat: &Chat) -> Option<Vec<String>> {
        match self {
            Dimension::Month => None,
            Dimension::Weekday => Some(
                WEEKDAYS
                    .iter()
                    .map(|w| weekday_name(*w).to_string())
                    .collect(),
            ),
            Dimension::Actor => Some(chat.actors.iter().map(|a| a.id.clone()).collect()),
            Dimension::Period => Some(Period::ALL.iter().map(|p| p.label().to_string()).collect()),
            Dimension::SubPeriod => Some(
                SubPeriod::ALL
                    .iter()
                    .map(|s| s.label().to_string())
                    .collect(),
            ),
            Dimension::MessageType => Some(
                MessageType::ALL
                    .iter()
                    .map(|t| t.label().to_string())
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| AnalyticsError::UnknownDimension(s.to_string()))
    }
}

/// Bucket a whole chat along `dimension`. Actor buckets require unique
/// actor ids.
pub fn bucket_chat(chat: &Chat, dimension: Dimension) -> Result<Buckets<'_>> {
    if dimension == Dimension::Actor {
        chat.check_actors()?;
    }
    let fixed = dimension.fixed_keys(chat);
    let mut buckets = bucket(&chat.messages, |m| dimension.key_of(m), fixed.as_deref())?;

    if dimension == Dimension::Actor {
        for entry in &mut buckets.entries {
            if let Some(actor) = chat.actor(&entry.key) {
                entry.label = actor.display_name.clone();
            }
        }
    }

    Ok(buckets)
}
