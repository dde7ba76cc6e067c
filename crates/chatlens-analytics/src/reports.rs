//! Named report catalog.
//!
//! Built-in reports cover the month, weekday and actor views of a chat.
//! Extra reports can be declared in the config file as a dimension plus a list
//! of column names.

use crate::bucketing::{Dimension, WEEKDAYS};
use crate::engine::{ChartHint, RankWindow, Report, ReportSpec};
use crate::intervals::Speed;
use crate::metrics::{Metric, MetricSpec, MESSAGES_COLUMN};
use chatlens_core::config::CustomReportConfig;
use chatlens_core::{
    AnalyticsError, AppConfig, Chat, Counter, MessageType, Period, Result, SubPeriod,
};

const BY_MONTH: &str = "Amount by Month";
const BY_WEEKDAY: &str = "Amount by Weekday";
const BY_ACTOR: &str = "Amount by Actor";

/// Every report the CLI can run, in listing order.
#[derive(Debug, Clone)]
pub struct ReportCatalog {
    reports: Vec<ReportSpec>,
}

impl ReportCatalog {
    /// The built-in reports, with `window` applied to the actor reports.
    pub fn builtin(window: RankWindow) -> Self {
        Self {
            reports: builtin_reports(window),
        }
    }

    /// Built-in reports plus the custom reports of `config`.
    ///
    /// A custom report that cannot be built is skipped with a warning. A
    /// custom report reusing an existing name is an error.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let window = RankWindow::new(config.ranking.start, config.ranking.end);
        let mut catalog = Self::builtin(window);

        for custom in &config.reports {
            if catalog.get(&custom.name).is_some() {
                return Err(AnalyticsError::Config(format!(
                    "report '{}' is defined more than once",
                    custom.name
                )));
            }
            match custom_report(custom, window) {
                Ok(spec) => {
                    tracing::debug!("Registered custom report: {}", spec.name);
                    catalog.reports.push(spec);
                }
                Err(e) => tracing::warn!("Skipping report {}: {}", custom.name, e),
            }
        }

        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&ReportSpec> {
        self.reports.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.reports.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReportSpec> {
        self.reports.iter()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Run one report by name.
    pub fn run(&self, chat: &Chat, name: &str) -> Result<Report> {
        self.get(name)
            .ok_or_else(|| AnalyticsError::UnknownReport(name.to_string()))?
            .run(chat)
    }

    /// Run every report, in listing order.
    pub fn run_all(&self, chat: &Chat) -> Result<Vec<Report>> {
        self.reports.iter().map(|spec| spec.run(chat)).collect()
    }
}

impl Default for ReportCatalog {
    fn default() -> Self {
        Self::builtin(RankWindow::new(0, 10))
    }
}

/// Build a report from its config entry. Actor reports get `default_window`
/// unless the entry sets its own bounds.
pub fn custom_report(custom: &CustomReportConfig, default_window: RankWindow) -> Result<ReportSpec> {
    let dimension: Dimension = custom.dimension.parse()?;
    let metrics = MetricSpec::parse(custom.metrics.as_slice())?;
    if metrics.is_empty() {
        return Err(AnalyticsError::InvalidReport(format!(
            "{}: no metrics",
            custom.name
        )));
    }

    let title = custom.title.clone().unwrap_or_else(|| match dimension {
        Dimension::Month => BY_MONTH.to_string(),
        Dimension::Weekday => BY_WEEKDAY.to_string(),
        Dimension::Actor => BY_ACTOR.to_string(),
        other => format!("Amount by {}", other),
    });

    let mut spec = ReportSpec::new(custom.name.clone(), title, dimension, metrics)
        .with_chart(ChartHint::new(custom.bars.as_slice(), custom.lines.as_slice()));

    if custom.start.is_some() || custom.end.is_some() {
        spec = spec.with_window(RankWindow::new(
            custom.start.unwrap_or(default_window.start),
            custom.end.unwrap_or(default_window.end),
        ));
    } else if dimension == Dimension::Actor {
        spec = spec.with_window(default_window);
    }

    spec.validate()?;
    Ok(spec)
}

fn chars(counters: &[Counter]) -> Vec<Metric> {
    counters.iter().map(|c| Metric::CharLength(*c)).collect()
}

fn with_messages(mut metrics: Vec<Metric>) -> MetricSpec {
    metrics.push(Metric::Messages);
    MetricSpec::from_unique(metrics)
}

fn columns(metrics: &[Metric]) -> Vec<String> {
    metrics.iter().map(Metric::column).collect()
}

fn chart(bars: &[Metric], lines: &[Metric]) -> ChartHint {
    ChartHint {
        bars: columns(bars),
        lines: columns(lines),
    }
}

fn speeds() -> Vec<Metric> {
    Speed::ALL.iter().map(|s| Metric::Interval(*s)).collect()
}

fn builtin_reports(window: RankWindow) -> Vec<ReportSpec> {
    let net_text = chars(&[Counter::Net, Counter::Text]);
    let fabrications = chars(&[Counter::Laughs, Counter::Marks, Counter::Emoji, Counter::Numbers]);
    let laminations = chars(&[Counter::Links, Counter::Emails, Counter::Mentions]);
    let punctuation = chars(&[Counter::Exclamation, Counter::Question]);
    let weekdays: Vec<Metric> = WEEKDAYS.iter().map(|w| Metric::Weekday(*w)).collect();
    let periods: Vec<Metric> = Period::ALL.iter().map(|p| Metric::Period(*p)).collect();
    let sub_periods: Vec<Metric> = SubPeriod::ALL.iter().map(|s| Metric::SubPeriod(*s)).collect();
    let types: Vec<Metric> = MessageType::ALL.iter().map(|t| Metric::MessageType(*t)).collect();
    let messages = [Metric::Messages];
    let net = [Metric::CharLength(Counter::Net)];
    let text = [Metric::CharLength(Counter::Text)];

    let mut punctuation_lines = text.to_vec();
    punctuation_lines.push(Metric::Messages);

    let actor_fabrications =
        chars(&[Counter::Numbers, Counter::Emoji, Counter::Marks, Counter::Laughs]);
    let emoji = [Metric::Occurrences(Counter::Emoji)];

    vec![
        // Month.
        ReportSpec::new(
            "messages.per_month",
            BY_MONTH,
            Dimension::Month,
            with_messages(net_text.clone()),
        )
        .with_chart(chart(&net_text, &messages)),
        ReportSpec::new(
            "messages.weekdays_per_month",
            BY_MONTH,
            Dimension::Month,
            MetricSpec::from_unique(weekdays.iter().chain(&net).copied().collect()),
        )
        .with_chart(chart(&weekdays, &net)),
        ReportSpec::new(
            "messages.fabrications",
            BY_MONTH,
            Dimension::Month,
            with_messages(fabrications.clone()),
        )
        .with_chart(chart(&fabrications, &messages)),
        ReportSpec::new(
            "messages.laminations",
            BY_MONTH,
            Dimension::Month,
            with_messages(laminations.clone()),
        )
        .with_chart(chart(&laminations, &messages)),
        ReportSpec::new(
            "messages.by_periods",
            BY_MONTH,
            Dimension::Month,
            with_messages(periods.clone()),
        )
        .with_chart(chart(&periods, &messages)),
        ReportSpec::new(
            "messages.by_sub_periods",
            BY_MONTH,
            Dimension::Month,
            with_messages(sub_periods.clone()),
        )
        .with_chart(chart(&sub_periods, &messages)),
        ReportSpec::new(
            "messages.by_punctuation_marks",
            BY_MONTH,
            Dimension::Month,
            MetricSpec::from_unique(
                punctuation.iter().chain(&punctuation_lines).copied().collect(),
            ),
        )
        .with_chart(chart(&punctuation, &punctuation_lines)),
        ReportSpec::new(
            "messages.by_message_type",
            BY_MONTH,
            Dimension::Month,
            with_messages(types.clone()),
        )
        .with_chart(chart(&types, &messages)),
        ReportSpec::new(
            "time.interaction_interval",
            BY_MONTH,
            Dimension::Month,
            with_messages(speeds()),
        )
        .with_chart(chart(&speeds(), &messages)),
        // Weekday.
        ReportSpec::new(
            "messages.per_weekday",
            BY_WEEKDAY,
            Dimension::Weekday,
            with_messages(net_text.clone()),
        )
        .with_chart(chart(&net_text, &messages)),
        ReportSpec::new(
            "time.interaction_interval_per_weekday",
            BY_WEEKDAY,
            Dimension::Weekday,
            with_messages(speeds()),
        )
        .with_chart(chart(&speeds(), &messages)),
        // Actor.
        ReportSpec::new(
            "actors.fabrications",
            BY_ACTOR,
            Dimension::Actor,
            with_messages(actor_fabrications.clone()),
        )
        .with_chart(chart(&actor_fabrications, &messages))
        .with_window(window),
        ReportSpec::new(
            "actors.laminations",
            BY_ACTOR,
            Dimension::Actor,
            with_messages(laminations.clone()),
        )
        .with_chart(chart(&laminations, &messages))
        .with_window(window),
        ReportSpec::new(
            "actors.by_activity",
            BY_ACTOR,
            Dimension::Actor,
            with_messages(net_text.clone()),
        )
        .with_chart(chart(&net_text, &messages))
        .with_window(window),
        ReportSpec::new(
            "actors.by_punctuation_marks",
            BY_ACTOR,
            Dimension::Actor,
            with_messages(punctuation.clone()),
        )
        .with_chart(chart(&punctuation, &messages))
        .with_window(window),
        ReportSpec::new(
            "actors.interaction_interval",
            BY_ACTOR,
            Dimension::Actor,
            with_messages(speeds()),
        )
        .with_chart(chart(&speeds(), &messages))
        .with_window(window),
        ReportSpec::actor_responses("actors.response_interval", BY_ACTOR)
            .with_chart(ChartHint {
                bars: columns(&speeds()),
                lines: vec![MESSAGES_COLUMN.to_string()],
            })
            .with_window(window),
        ReportSpec::new(
            "emojis.per_user",
            BY_ACTOR,
            Dimension::Actor,
            with_messages(emoji.to_vec()),
        )
        .with_chart(chart(&emoji, &[]))
        .with_window(window),
    ]
}
