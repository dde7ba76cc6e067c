//! Reduction of one bucket into a row of numbers.

use crate::intervals::{classify_intervals, IntervalCounts};
use crate::metrics::{Metric, MetricSpec};
use crate::table::Row;
use chatlens_core::{AnalyticsError, Counter, CounterMatches, Message, Result};

/// Compute one cell per metric of `spec` over `messages`.
///
/// An empty bucket yields a row of zeros. Buckets are reduced independently;
/// interval metrics only see the gaps inside `messages`.
pub fn reduce(messages: &[&Message], spec: &MetricSpec) -> Result<Row> {
    let intervals = spec
        .needs_intervals()
        .then(|| classify_intervals(messages.iter().copied()));

    spec.metrics()
        .iter()
        .map(|metric| cell(metric, messages, intervals.as_ref()))
        .collect()
}

fn cell(metric: &Metric, messages: &[&Message], intervals: Option<&IntervalCounts>) -> Result<u64> {
    let value = match *metric {
        Metric::CharLength(counter) => sum_counter(messages, counter, CounterMatches::char_len)?,
        Metric::Occurrences(counter) => sum_counter(messages, counter, CounterMatches::occurrences)?,
        Metric::Messages => messages.len() as u64,
        Metric::Period(period) => count(messages, |m| m.day_period == period),
        Metric::SubPeriod(sub) => count(messages, |m| m.day_sub_period == sub),
        Metric::Weekday(weekday) => count(messages, |m| m.weekday() == weekday),
        Metric::MessageType(kind) => count(messages, |m| m.message_type == kind),
        Metric::Interval(speed) => intervals.map_or(0, |counts| counts.get(speed)),
    };
    Ok(value)
}

fn sum_counter(
    messages: &[&Message],
    counter: Counter,
    measure: fn(&CounterMatches) -> usize,
) -> Result<u64> {
    messages.iter().try_fold(0u64, |total, msg| {
        let matches = msg
            .counter(counter)
            .ok_or(AnalyticsError::MissingCounter {
                counter,
                at: msg.created_at,
            })?;
        Ok(total + measure(matches) as u64)
    })
}

fn count(messages: &[&Message], predicate: impl Fn(&Message) -> bool) -> u64 {
    messages.iter().filter(|m| predicate(**m)).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intervals::Speed;
    use chatlens_core::{MessageType, Period};
    use chrono::{Duration, NaiveDate, NaiveDateTime, Weekday};

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn sample() -> Vec<Message> {
        vec![
            Message::new("a", base())
                .with_counter(Counter::Net, "hello")
                .with_counter(Counter::Laughs, vec!["kkk", "haha"]),
            Message::new("b", base() + Duration::seconds(25))
                .with_counter(Counter::Net, "hey")
                .with_counter(Counter::Emoji, vec!["😀"]),
            Message::new("a", base() + Duration::seconds(130))
                .with_counter(Counter::Net, "see you!")
                .with_type(MessageType::System)
                .with_period(Period::Night),
        ]
    }

    #[test]
    fn test_sums_lengths_and_occurrences() {
        let messages = sample();
        let refs: Vec<&Message> = messages.iter().collect();
        let spec = MetricSpec::new(vec![
            Metric::CharLength(Counter::Net),
            Metric::CharLength(Counter::Laughs),
            Metric::Occurrences(Counter::Laughs),
            Metric::Occurrences(Counter::Emoji),
            Metric::Messages,
        ])
        .unwrap();

        assert_eq!(reduce(&refs, &spec).unwrap(), vec![16, 7, 2, 1, 3]);
    }

    #[test]
    fn test_enumeration_counts() {
        let messages = sample();
        let refs: Vec<&Message> = messages.iter().collect();
        let spec = MetricSpec::new(vec![
            Metric::Period(Period::Morning),
            Metric::Period(Period::Night),
            Metric::MessageType(MessageType::System),
            Metric::Weekday(Weekday::Mon),
            Metric::Weekday(Weekday::Sun),
        ])
        .unwrap();

        assert_eq!(reduce(&refs, &spec).unwrap(), vec![2, 1, 1, 3, 0]);
    }

    #[test]
    fn test_interval_metrics() {
        let messages = sample();
        let refs: Vec<&Message> = messages.iter().collect();
        let spec = MetricSpec::new(
            Speed::ALL
                .iter()
                .map(|s| Metric::Interval(*s))
                .chain([Metric::Messages])
                .collect(),
        )
        .unwrap();

        assert_eq!(reduce(&refs, &spec).unwrap(), vec![1, 0, 1, 0, 3]);
    }

    #[test]
    fn test_empty_bucket_is_zero_row() {
        let spec = MetricSpec::new(vec![
            Metric::CharLength(Counter::Net),
            Metric::Messages,
            Metric::Interval(Speed::Fast),
        ])
        .unwrap();
        assert_eq!(reduce(&[], &spec).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_order_within_bucket_does_not_change_sums() {
        let messages = sample();
        let forward: Vec<&Message> = messages.iter().collect();
        let backward: Vec<&Message> = messages.iter().rev().collect();
        let spec = MetricSpec::new(vec![
            Metric::CharLength(Counter::Net),
            Metric::Occurrences(Counter::Laughs),
            Metric::Messages,
        ])
        .unwrap();

        assert_eq!(
            reduce(&forward, &spec).unwrap(),
            reduce(&backward, &spec).unwrap()
        );
    }

    #[test]
    fn test_missing_counter_is_an_error() {
        let mut msg = Message::new("a", base());
        msg.counters.remove(&Counter::Links);
        let spec = MetricSpec::new(vec![Metric::CharLength(Counter::Links)]).unwrap();

        let err = reduce(&[&msg], &spec).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::MissingCounter {
                counter: Counter::Links,
                ..
            }
        ));
    }
}
