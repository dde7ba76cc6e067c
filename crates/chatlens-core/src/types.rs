use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single annotated chat message, as produced by the chat loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Identity of the sender.
    pub actor: String,
    pub created_at: NaiveDateTime,
    #[serde(rename = "type", default)]
    pub message_type: MessageType,
    pub day_period: Period,
    pub day_sub_period: SubPeriod,
    /// Matches recorded per character class. Read-only once built.
    #[serde(default)]
    pub counters: HashMap<Counter, CounterMatches>,
}

impl Message {
    /// Create a default message with every counter present and empty.
    ///
    /// Day period and sub-period are derived from the clock; loaders that
    /// classify differently overwrite them with [`Message::with_period`] and
    /// [`Message::with_sub_period`].
    pub fn new(actor: impl Into<String>, created_at: NaiveDateTime) -> Self {
        let hour = created_at.hour();
        Self {
            actor: actor.into(),
            created_at,
            message_type: MessageType::Default,
            day_period: Period::from_hour(hour),
            day_sub_period: SubPeriod::from_hour(hour),
            counters: Counter::ALL
                .iter()
                .map(|c| (*c, CounterMatches::default()))
                .collect(),
        }
    }

    pub fn with_type(mut self, message_type: MessageType) -> Self {
        self.message_type = message_type;
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.day_period = period;
        self
    }

    pub fn with_sub_period(mut self, sub_period: SubPeriod) -> Self {
        self.day_sub_period = sub_period;
        self
    }

    pub fn with_counter(mut self, counter: Counter, matches: impl Into<CounterMatches>) -> Self {
        self.counters.insert(counter, matches.into());
        self
    }

    /// Look up the matches for one counter.
    pub fn counter(&self, counter: Counter) -> Option<&CounterMatches> {
        self.counters.get(&counter)
    }

    pub fn weekday(&self) -> Weekday {
        self.created_at.weekday()
    }

    /// Calendar month label, e.g. `March 2021`.
    pub fn month_label(&self) -> String {
        self.created_at.format("%B %Y").to_string()
    }
}

/// A chat participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub display_name: String,
}

impl Actor {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Default,
    /// Administrative event (joins, leaves, subject changes, ...).
    System,
}

impl MessageType {
    pub const ALL: [MessageType; 2] = [MessageType::Default, MessageType::System];

    pub fn label(self) -> &'static str {
        match self {
            MessageType::Default => "default",
            MessageType::System => "system",
        }
    }
}

/// Coarse time-of-day classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Dawn,
    Morning,
    Evening,
    Night,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Dawn, Period::Morning, Period::Evening, Period::Night];

    pub fn label(self) -> &'static str {
        match self {
            Period::Dawn => "Dawn",
            Period::Morning => "Morning",
            Period::Evening => "Evening",
            Period::Night => "Night",
        }
    }

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => Period::Dawn,
            6..=11 => Period::Morning,
            12..=17 => Period::Evening,
            _ => Period::Night,
        }
    }
}

/// Fine-grained time-of-day classification around a working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubPeriod {
    Resting,
    MorningTransport,
    MorningWork,
    Lunch,
    EveningWork,
    EveningTransport,
    SecondOfficeHour,
}

impl SubPeriod {
    pub const ALL: [SubPeriod; 7] = [
        SubPeriod::Resting,
        SubPeriod::MorningTransport,
        SubPeriod::MorningWork,
        SubPeriod::Lunch,
        SubPeriod::EveningWork,
        SubPeriod::EveningTransport,
        SubPeriod::SecondOfficeHour,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SubPeriod::Resting => "Resting",
            SubPeriod::MorningTransport => "Transport (morning)",
            SubPeriod::MorningWork => "Work (morning)",
            SubPeriod::Lunch => "Lunch",
            SubPeriod::EveningWork => "Work (evening)",
            SubPeriod::EveningTransport => "Transport (evening)",
            SubPeriod::SecondOfficeHour => "Second Office Hour",
        }
    }

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=7 => SubPeriod::MorningTransport,
            8..=11 => SubPeriod::MorningWork,
            12..=13 => SubPeriod::Lunch,
            14..=17 => SubPeriod::EveningWork,
            18..=19 => SubPeriod::EveningTransport,
            20..=21 => SubPeriod::SecondOfficeHour,
            _ => SubPeriod::Resting,
        }
    }
}

/// Closed set of character classes counted on every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Counter {
    /// Message content without the sender/timestamp prefix.
    #[serde(rename = "Qty_char_net")]
    Net,
    /// Content with emoji, links, and other fabrications removed.
    #[serde(rename = "Qty_char_text")]
    Text,
    #[serde(rename = "Qty_char_emoji")]
    Emoji,
    #[serde(rename = "Qty_char_links")]
    Links,
    #[serde(rename = "Qty_char_emails")]
    Emails,
    #[serde(rename = "Qty_char_mentions")]
    Mentions,
    #[serde(rename = "Qty_char_laughs")]
    Laughs,
    #[serde(rename = "Qty_char_marks")]
    Marks,
    #[serde(rename = "Qty_char_numbers")]
    Numbers,
    #[serde(rename = "Qty_char_!")]
    Exclamation,
    #[serde(rename = "Qty_char_?")]
    Question,
}

impl Counter {
    pub const ALL: [Counter; 11] = [
        Counter::Net,
        Counter::Text,
        Counter::Emoji,
        Counter::Links,
        Counter::Emails,
        Counter::Mentions,
        Counter::Laughs,
        Counter::Marks,
        Counter::Numbers,
        Counter::Exclamation,
        Counter::Question,
    ];

    /// Short name used to build column names.
    pub fn slug(self) -> &'static str {
        match self {
            Counter::Net => "net",
            Counter::Text => "text",
            Counter::Emoji => "emoji",
            Counter::Links => "links",
            Counter::Emails => "emails",
            Counter::Mentions => "mentions",
            Counter::Laughs => "laughs",
            Counter::Marks => "marks",
            Counter::Numbers => "numbers",
            Counter::Exclamation => "!",
            Counter::Question => "?",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Qty_char_{}", self.slug())
    }
}

/// Substrings matched on one message for one counter.
///
/// Exports store the net and text counters as a single string and every
/// other counter as a list; both deserialize into this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawMatches")]
pub struct CounterMatches(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMatches {
    One(String),
    Many(Vec<String>),
}

impl From<RawMatches> for CounterMatches {
    fn from(raw: RawMatches) -> Self {
        match raw {
            RawMatches::One(s) => Self(vec![s]),
            RawMatches::Many(v) => Self(v),
        }
    }
}

impl CounterMatches {
    pub fn new(matches: Vec<String>) -> Self {
        Self(matches)
    }

    /// Total characters across all matches.
    pub fn char_len(&self) -> usize {
        self.0.iter().map(|m| m.chars().count()).sum()
    }

    /// Number of recorded matches, empty ones included.
    pub fn occurrences(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for CounterMatches {
    fn from(s: &str) -> Self {
        Self(vec![s.to_string()])
    }
}

impl From<String> for CounterMatches {
    fn from(s: String) -> Self {
        Self(vec![s])
    }
}

impl From<Vec<String>> for CounterMatches {
    fn from(v: Vec<String>) -> Self {
        Self(v)
    }
}

impl From<Vec<&str>> for CounterMatches {
    fn from(v: Vec<&str>) -> Self {
        Self(v.into_iter().map(String::from).collect())
    }
}
