//! Aggregation engine: bucket a chat, reduce every bucket, assemble a table.

use crate::bucketing::{bucket_chat, Dimension};
use crate::intervals::{classify_responses, Speed};
use crate::metrics::{MetricSpec, MESSAGES_COLUMN};
use crate::ranking::rank;
use crate::reducer::reduce;
use crate::table::Table;
use chatlens_core::{AnalyticsError, Chat, Message, Result};
use serde::{Deserialize, Serialize};

/// Display hint for the rendering side: which columns are bars, which are lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartHint {
    pub bars: Vec<String>,
    pub lines: Vec<String>,
}

impl ChartHint {
    pub fn new<S: AsRef<str>>(bars: &[S], lines: &[S]) -> Self {
        Self {
            bars: bars.iter().map(|s| s.as_ref().to_string()).collect(),
            lines: lines.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

/// Zero-based `[start, end)` slice of ranked rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankWindow {
    pub start: usize,
    pub end: usize,
}

impl RankWindow {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Where a report's rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSource {
    /// Bucket along a dimension and reduce each bucket with a metric spec.
    Buckets {
        dimension: Dimension,
        metrics: MetricSpec,
    },
    /// Per actor, speed classes of the gap to the preceding chat message.
    ActorResponses,
}

impl ReportSource {
    pub fn columns(&self) -> Vec<String> {
        match self {
            ReportSource::Buckets { metrics, .. } => metrics.columns(),
            ReportSource::ActorResponses => response_columns(),
        }
    }

    pub fn is_actor_scoped(&self) -> bool {
        match self {
            ReportSource::Buckets { dimension, .. } => *dimension == Dimension::Actor,
            ReportSource::ActorResponses => true,
        }
    }
}

/// A named, declarative aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSpec {
    pub name: String,
    pub title: String,
    pub source: ReportSource,
    pub chart: ChartHint,
    /// Rank and slice rows; actor-scoped reports only.
    pub window: Option<RankWindow>,
}

impl ReportSpec {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        dimension: Dimension,
        metrics: MetricSpec,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            source: ReportSource::Buckets { dimension, metrics },
            chart: ChartHint::default(),
            window: None,
        }
    }

    pub fn actor_responses(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            source: ReportSource::ActorResponses,
            chart: ChartHint::default(),
            window: None,
        }
    }

    pub fn with_chart(mut self, chart: ChartHint) -> Self {
        self.chart = chart;
        self
    }

    pub fn with_window(mut self, window: RankWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Check the chart hint and rank window against the report's columns.
    pub fn validate(&self) -> Result<()> {
        if self.window.is_some() && !self.source.is_actor_scoped() {
            return Err(AnalyticsError::InvalidReport(format!(
                "{}: ranking applies to actor reports only",
                self.name
            )));
        }

        let columns = self.source.columns();
        if let Some(unknown) = self
            .chart
            .bars
            .iter()
            .chain(&self.chart.lines)
            .find(|c| !columns.contains(c))
        {
            return Err(AnalyticsError::InvalidReport(format!(
                "{}: chart refers to unknown column '{}'",
                self.name, unknown
            )));
        }

        Ok(())
    }

    /// Build the report's table from `chat`.
    pub fn run(&self, chat: &Chat) -> Result<Report> {
        self.validate()?;

        let table = match &self.source {
            ReportSource::Buckets { dimension, metrics } => aggregate(chat, *dimension, metrics)?,
            ReportSource::ActorResponses => actor_responses(chat)?,
        };
        let table = match self.window {
            Some(window) => rank(&table, window.start, window.end),
            None => table,
        };

        tracing::debug!("Report {}: {} rows", self.name, table.len());

        Ok(Report {
            name: self.name.clone(),
            title: self.title.clone(),
            chart: self.chart.clone(),
            table,
        })
    }
}

/// A built report, handed to rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub name: String,
    pub title: String,
    pub chart: ChartHint,
    pub table: Table,
}

/// Fail if any message precedes the one before it.
pub fn validate_chronological<'a, I>(messages: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut previous: Option<&Message> = None;
    for (index, msg) in messages.into_iter().enumerate() {
        if let Some(prev) = previous {
            if msg.created_at < prev.created_at {
                return Err(AnalyticsError::UnorderedInput {
                    index,
                    previous: prev.created_at,
                    current: msg.created_at,
                });
            }
        }
        previous = Some(msg);
    }
    Ok(())
}

/// Bucket `chat` along `dimension` and reduce every bucket with `metrics`.
pub fn aggregate(chat: &Chat, dimension: Dimension, metrics: &MetricSpec) -> Result<Table> {
    validate_chronological(&chat.messages)?;

    let buckets = bucket_chat(chat, dimension)?;
    let mut index = Vec::with_capacity(buckets.len());
    let mut rows = Vec::with_capacity(buckets.len());

    for bucket in buckets {
        rows.push(reduce(&bucket.messages, metrics)?);
        index.push(bucket.label);
    }

    let table = Table::assemble(index, rows, metrics.columns())?;
    tracing::debug!(
        "Aggregated {} messages by {} into {} rows x {} columns",
        chat.messages.len(),
        dimension,
        table.len(),
        metrics.len()
    );
    Ok(table)
}

fn response_columns() -> Vec<String> {
    Speed::ALL
        .iter()
        .map(|s| s.column().to_string())
        .chain([MESSAGES_COLUMN.to_string()])
        .collect()
}

/// Per actor: response speed classes against the preceding chat message,
/// plus the actor's message count. Rows follow the chat's actor order.
pub fn actor_responses(chat: &Chat) -> Result<Table> {
    validate_chronological(&chat.messages)?;
    chat.check_actors()?;

    if let Some(stranger) = chat.messages.iter().find(|m| chat.actor(&m.actor).is_none()) {
        return Err(AnalyticsError::UnexpectedKey(stranger.actor.clone()));
    }

    let mut index = Vec::with_capacity(chat.actors.len());
    let mut rows = Vec::with_capacity(chat.actors.len());

    for actor in &chat.actors {
        let mut row = classify_responses(&chat.messages, &actor.id).to_row();
        row.push(chat.messages.iter().filter(|m| m.actor == actor.id).count() as u64);
        rows.push(row);
        index.push(actor.display_name.clone());
    }

    Table::assemble(index, rows, response_columns())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metric;
    use chatlens_core::{Actor, Counter};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn net(actor: &str, when: NaiveDateTime, text: &str) -> Message {
        Message::new(actor, when)
            .with_counter(Counter::Net, text)
            .with_counter(Counter::Text, text)
    }

    fn interval_spec() -> MetricSpec {
        MetricSpec::new(
            Speed::ALL
                .iter()
                .map(|s| Metric::Interval(*s))
                .chain([Metric::Messages])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_three_message_month_scenario() {
        let chat = Chat::from_messages(vec![
            net("ana", at(2021, 3, 1, 9, 0, 0), "hello"),
            net("ana", at(2021, 3, 1, 9, 0, 25), "hey"),
            net("ana", at(2021, 3, 1, 9, 2, 10), "goodbye!"),
        ]);

        let spec = MetricSpec::new(vec![
            Metric::CharLength(Counter::Net),
            Metric::Messages,
        ])
        .unwrap();
        let table = aggregate(&chat, Dimension::Month, &spec).unwrap();
        assert_eq!(table.index(), ["March 2021".to_string()]);
        assert_eq!(table.cell("March 2021", "Qty_messages"), Some(3));
        assert_eq!(table.cell("March 2021", "Qty_char_net"), Some(16));

        let intervals = aggregate(&chat, Dimension::Actor, &interval_spec()).unwrap();
        assert_eq!(intervals.row("ana"), Some(&[1, 0, 1, 0, 3][..]));
    }

    #[test]
    fn test_weekday_table_has_seven_rows() {
        // Monday and Friday only.
        let chat = Chat::from_messages(vec![
            net("ana", at(2021, 3, 1, 9, 0, 0), "oi"),
            net("bia", at(2021, 3, 5, 9, 0, 0), "tchau"),
        ]);
        let spec = MetricSpec::new(vec![
            Metric::CharLength(Counter::Net),
            Metric::CharLength(Counter::Text),
            Metric::Messages,
        ])
        .unwrap();
        let table = aggregate(&chat, Dimension::Weekday, &spec).unwrap();

        assert_eq!(table.len(), 7);
        let zero_rows = table
            .rows()
            .iter()
            .filter(|r| r.iter().all(|c| *c == 0))
            .count();
        assert_eq!(zero_rows, 5);
        assert_eq!(table.row("Monday"), Some(&[2, 2, 1][..]));
        assert_eq!(table.row("Friday"), Some(&[5, 5, 1][..]));
    }

    #[test]
    fn test_empty_chat() {
        let chat = Chat::default();
        let spec = MetricSpec::new(vec![Metric::Messages]).unwrap();

        let months = aggregate(&chat, Dimension::Month, &spec).unwrap();
        assert!(months.is_empty());

        let weekdays = aggregate(&chat, Dimension::Weekday, &spec).unwrap();
        assert_eq!(weekdays.len(), 7);
        assert!(weekdays.rows().iter().flatten().all(|c| *c == 0));

        assert!(actor_responses(&chat).unwrap().is_empty());
    }

    #[test]
    fn test_months_are_chronological() {
        let chat = Chat::from_messages(vec![
            net("ana", at(2020, 12, 31, 23, 0, 0), "a"),
            net("ana", at(2021, 1, 1, 0, 0, 0), "b"),
            net("ana", at(2021, 2, 1, 0, 0, 0), "c"),
        ]);
        let spec = MetricSpec::new(vec![Metric::Messages]).unwrap();
        let table = aggregate(&chat, Dimension::Month, &spec).unwrap();
        assert_eq!(
            table.index(),
            ["December 2020", "January 2021", "February 2021"].map(String::from)
        );
    }

    #[test]
    fn test_unordered_input_fails_fast() {
        let chat = Chat::from_messages(vec![
            net("ana", at(2021, 3, 1, 9, 0, 0), "a"),
            net("ana", at(2021, 3, 1, 8, 0, 0), "b"),
        ]);
        let spec = MetricSpec::new(vec![Metric::Messages]).unwrap();
        let err = aggregate(&chat, Dimension::Month, &spec).unwrap_err();
        assert!(matches!(err, AnalyticsError::UnorderedInput { index: 1, .. }));
    }

    #[test]
    fn test_equal_timestamps_are_ordered() {
        let when = at(2021, 3, 1, 9, 0, 0);
        assert!(validate_chronological(&[net("a", when, "x"), net("b", when, "y")]).is_ok());
    }

    #[test]
    fn test_actor_responses_table() {
        let base = at(2021, 3, 1, 9, 0, 0);
        let chat = Chat::new(
            vec![
                Actor::new("ana").with_display_name("Ana"),
                Actor::new("bia").with_display_name("Bia"),
            ],
            vec![
                net("ana", base, "a"),
                net("bia", base + Duration::seconds(90), "b"),
                net("ana", base + Duration::seconds(100), "c"),
            ],
        );
        let table = actor_responses(&chat).unwrap();
        assert_eq!(table.row("Ana"), Some(&[1, 0, 0, 0, 2][..]));
        assert_eq!(table.row("Bia"), Some(&[0, 0, 1, 0, 1][..]));

        // The actor-local measure of the same chat differs.
        let local = aggregate(&chat, Dimension::Actor, &interval_spec()).unwrap();
        assert_eq!(local.row("Ana"), Some(&[0, 0, 1, 0, 2][..]));
    }

    #[test]
    fn test_actor_responses_reject_unknown_actor() {
        let chat = Chat::new(
            vec![Actor::new("ana")],
            vec![net("zed", at(2021, 3, 1, 9, 0, 0), "a")],
        );
        assert!(matches!(
            actor_responses(&chat),
            Err(AnalyticsError::UnexpectedKey(_))
        ));
    }

    #[test]
    fn test_repeated_actor_ids_are_rejected_by_both_actor_views() {
        let chat = Chat::new(
            vec![Actor::new("ana"), Actor::new("ana").with_display_name("Ana 2")],
            vec![net("ana", at(2021, 3, 1, 9, 0, 0), "a")],
        );
        let spec = MetricSpec::new(vec![Metric::Messages]).unwrap();

        assert!(matches!(
            aggregate(&chat, Dimension::Actor, &spec),
            Err(AnalyticsError::DuplicateActor(id)) if id == "ana"
        ));
        assert!(matches!(
            actor_responses(&chat),
            Err(AnalyticsError::DuplicateActor(id)) if id == "ana"
        ));
        // Non-actor dimensions do not depend on the actor list.
        assert!(aggregate(&chat, Dimension::Month, &spec).is_ok());
    }

    #[test]
    fn test_report_run_ranks_actor_rows() {
        let base = at(2021, 3, 1, 9, 0, 0);
        let chat = Chat::from_messages(vec![
            net("ana", base, "a"),
            net("bia", base + Duration::seconds(1), "bbbb"),
            net("caio", base + Duration::seconds(2), "cc"),
        ]);
        let spec = ReportSpec::new(
            "actors.by_activity",
            "Amount by Actor",
            Dimension::Actor,
            MetricSpec::new(vec![Metric::CharLength(Counter::Net), Metric::Messages]).unwrap(),
        )
        .with_chart(ChartHint::new(&["Qty_char_net"], &["Qty_messages"]))
        .with_window(RankWindow::new(0, 2));

        let report = spec.run(&chat).unwrap();
        assert_eq!(report.table.index(), ["bia", "caio"].map(String::from));
        assert_eq!(report.chart.bars, vec!["Qty_char_net"]);
    }

    #[test]
    fn test_validate_rejects_bad_reports() {
        let spec = MetricSpec::new(vec![Metric::Messages]).unwrap();

        let ranked_month = ReportSpec::new("m", "M", Dimension::Month, spec.clone())
            .with_window(RankWindow::new(0, 5));
        assert!(matches!(
            ranked_month.validate(),
            Err(AnalyticsError::InvalidReport(_))
        ));

        let bad_chart = ReportSpec::new("w", "W", Dimension::Weekday, spec)
            .with_chart(ChartHint::new(&["Qty_char_emoji"], &[]));
        assert!(matches!(
            bad_chart.run(&Chat::default()),
            Err(AnalyticsError::InvalidReport(_))
        ));
    }
}
