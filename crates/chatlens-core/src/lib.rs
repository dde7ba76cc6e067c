pub mod chat;
pub mod config;
pub mod error;
pub mod tagger;
pub mod types;

pub use chat::Chat;
pub use config::AppConfig;
pub use error::{AnalyticsError, Result};
pub use tagger::{LexiconTagger, PartOfSpeech, Tagger, Token};
pub use types::{Actor, Counter, CounterMatches, Message, MessageType, Period, SubPeriod};
