//! Interaction-speed classification of gaps between consecutive messages.
//!
//! Two distinct measures exist:
//! - [`classify_intervals`]: gaps within one sequence. Applied to an actor's
//!   own messages this measures how quickly they follow up on themselves.
//! - [`classify_responses`]: for one actor, the gap to whichever chat message
//!   came right before theirs, from any sender.

use chatlens_core::Message;
use chrono::Duration;
use serde::Serialize;

/// Upper bound (inclusive) of a super-fast interaction, in seconds.
pub const SUPER_FAST_SECS: i64 = 30;
/// Upper bound (inclusive) of a fast interaction, in seconds.
pub const FAST_SECS: i64 = 60;
/// Upper bound (inclusive) of a regular interaction, in seconds.
pub const REGULAR_SECS: i64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
    SuperFast,
    Fast,
    Regular,
    Late,
}

impl Speed {
    pub const ALL: [Speed; 4] = [Speed::SuperFast, Speed::Fast, Speed::Regular, Speed::Late];

    /// Column name used in tables.
    pub fn column(self) -> &'static str {
        match self {
            Speed::SuperFast => "Super Fast Interactions",
            Speed::Fast => "Fast Interactions",
            Speed::Regular => "Regular Interactions",
            Speed::Late => "Late Interactions",
        }
    }

    pub fn classify(delta: Duration) -> Self {
        if delta <= Duration::seconds(SUPER_FAST_SECS) {
            Speed::SuperFast
        } else if delta <= Duration::seconds(FAST_SECS) {
            Speed::Fast
        } else if delta <= Duration::seconds(REGULAR_SECS) {
            Speed::Regular
        } else {
            Speed::Late
        }
    }
}

/// Number of gaps per speed class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IntervalCounts {
    pub super_fast: u64,
    pub fast: u64,
    pub regular: u64,
    pub late: u64,
}

impl IntervalCounts {
    pub fn record(&mut self, speed: Speed) {
        match speed {
            Speed::SuperFast => self.super_fast += 1,
            Speed::Fast => self.fast += 1,
            Speed::Regular => self.regular += 1,
            Speed::Late => self.late += 1,
        }
    }

    pub fn get(&self, speed: Speed) -> u64 {
        match speed {
            Speed::SuperFast => self.super_fast,
            Speed::Fast => self.fast,
            Speed::Regular => self.regular,
            Speed::Late => self.late,
        }
    }

    pub fn total(&self) -> u64 {
        self.super_fast + self.fast + self.regular + self.late
    }

    /// Counts in [`Speed::ALL`] order.
    pub fn to_row(&self) -> Vec<u64> {
        Speed::ALL.iter().map(|s| self.get(*s)).collect()
    }
}

/// Classify the gap between every adjacent pair of `messages`.
pub fn classify_intervals<'a, I>(messages: I) -> IntervalCounts
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut counts = IntervalCounts::default();
    let mut previous: Option<&Message> = None;

    for msg in messages {
        if let Some(prev) = previous {
            counts.record(Speed::classify(msg.created_at - prev.created_at));
        }
        previous = Some(msg);
    }

    counts
}

/// Classify, for each of `actor`'s messages, the gap to the chat message
/// immediately before it.
pub fn classify_responses(messages: &[Message], actor: &str) -> IntervalCounts {
    let mut counts = IntervalCounts::default();

    for pair in messages.windows(2) {
        if pair[1].actor == actor {
            counts.record(Speed::classify(pair[1].created_at - pair[0].created_at));
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn msg_at(actor: &str, offset_ms: i64) -> Message {
        Message::new(actor, base() + Duration::milliseconds(offset_ms))
    }

    #[test]
    fn test_boundaries_are_exact() {
        let cases = [
            (30_000, Speed::SuperFast),
            (30_100, Speed::Fast),
            (60_000, Speed::Fast),
            (60_001, Speed::Regular),
            (120_000, Speed::Regular),
            (120_100, Speed::Late),
            (0, Speed::SuperFast),
        ];
        for (ms, expected) in cases {
            assert_eq!(
                Speed::classify(Duration::milliseconds(ms)),
                expected,
                "{} ms",
                ms
            );
        }
    }

    #[test]
    fn test_three_message_scenario() {
        // 09:00:00, 09:00:25, 09:02:10
        let messages = vec![msg_at("a", 0), msg_at("a", 25_000), msg_at("a", 130_000)];
        let counts = classify_intervals(&messages);
        assert_eq!(counts.to_row(), vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_counts_partition_pairs() {
        let offsets = [0, 10_000, 50_000, 140_000, 400_000, 400_500, 460_500];
        let messages: Vec<Message> = offsets.iter().map(|o| msg_at("a", *o)).collect();
        let counts = classify_intervals(&messages);
        assert_eq!(counts.total(), messages.len() as u64 - 1);
        assert_eq!(counts.to_row(), vec![2, 2, 1, 1]);
    }

    #[test]
    fn test_short_sequences_are_zero() {
        let empty: Vec<Message> = Vec::new();
        assert_eq!(classify_intervals(&empty), IntervalCounts::default());
        assert_eq!(classify_intervals(&[msg_at("a", 0)]), IntervalCounts::default());
    }

    #[test]
    fn test_actor_local_and_chat_adjacent_differ() {
        // a at 0s, b at 90s, a at 100s
        let messages = vec![msg_at("a", 0), msg_at("b", 90_000), msg_at("a", 100_000)];

        let own: Vec<&Message> = messages.iter().filter(|m| m.actor == "a").collect();
        let local = classify_intervals(own);
        assert_eq!(local.to_row(), vec![0, 0, 1, 0]);

        let responses = classify_responses(&messages, "a");
        assert_eq!(responses.to_row(), vec![1, 0, 0, 0]);

        let b_responses = classify_responses(&messages, "b");
        assert_eq!(b_responses.to_row(), vec![0, 0, 1, 0]);
    }
}
