use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level application configuration, loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub ranking: RankingConfig,
    /// Extra reports composed from metric column names.
    pub reports: Vec<CustomReportConfig>,
}

impl AppConfig {
    /// Load configuration from default path (~/.config/chatlens/config.toml),
    /// falling back to defaults if the file doesn't exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Write current configuration to the default path.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Write current configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chatlens")
            .join("config.toml")
    }
}

/// How reports are printed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Markdown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Markdown,
    Json,
}

/// Default row window for actor-ranked reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// First ranked row to keep (zero-based).
    pub start: usize,
    /// One past the last ranked row to keep.
    pub end: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { start: 0, end: 10 }
    }
}

/// A report defined in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomReportConfig {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    /// One of `month`, `weekday`, `actor`, `period`, `sub_period`, `message_type`.
    pub dimension: String,
    /// Column names, e.g. `Qty_char_emoji` or `Super Fast Interactions`.
    pub metrics: Vec<String>,
    #[serde(default)]
    pub bars: Vec<String>,
    #[serde(default)]
    pub lines: Vec<String>,
    /// Rank window; actor reports only. Missing bounds fall back to [`RankingConfig`].
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub end: Option<usize>,
}
