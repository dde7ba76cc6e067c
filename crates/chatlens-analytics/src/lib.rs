//! Aggregation and reporting over annotated chats.
//!
//! Groups messages into buckets (month, weekday, actor, day period, ...),
//! reduces each bucket into a row of counts, and assembles the rows into
//! tables. Named reports, markdown rendering, and word extraction sit on top.

pub mod bucketing;
pub mod engine;
pub mod intervals;
pub mod markdown;
pub mod metrics;
pub mod ranking;
pub mod reducer;
pub mod reports;
pub mod table;
pub mod words;

pub use bucketing::{bucket, bucket_chat, Bucket, Buckets, Dimension};
pub use engine::{
    actor_responses, aggregate, validate_chronological, ChartHint, RankWindow, Report,
    ReportSource, ReportSpec,
};
pub use intervals::{classify_intervals, classify_responses, IntervalCounts, Speed};
pub use metrics::{Metric, MetricSpec, MESSAGES_COLUMN};
pub use ranking::rank;
pub use reducer::reduce;
pub use reports::ReportCatalog;
pub use table::{Row, Table};
