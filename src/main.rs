use anyhow::{Context, Result};
use chatlens_analytics::{markdown, words, RankWindow, Report, ReportCatalog};
use chatlens_core::config::{AppConfig, OutputFormat};
use chatlens_core::{Chat, LexiconTagger, PartOfSpeech};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "chatlens",
    about = "Bucketed statistics and rankings for annotated chat exports",
    version,
    author
)]
struct Cli {
    /// Path to config file (default: ~/.config/chatlens/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available reports
    List,

    /// Run one report
    Report {
        /// Report name, e.g. messages.per_month
        name: String,
        /// Chat export (JSON)
        #[arg(long)]
        chat: PathBuf,
        /// First ranked row to keep (actor reports)
        #[arg(long)]
        start: Option<usize>,
        /// One past the last ranked row to keep (actor reports)
        #[arg(long)]
        end: Option<usize>,
        /// Output format (default from config)
        #[arg(short, long)]
        format: Option<Format>,
    },

    /// Run every report
    All {
        /// Chat export (JSON)
        #[arg(long)]
        chat: PathBuf,
        /// Output format (default from config)
        #[arg(short, long)]
        format: Option<Format>,
    },

    /// Print the nouns or verbs of a chat as one text blob
    Words {
        /// Chat export (JSON)
        #[arg(long)]
        chat: PathBuf,
        /// Lexicon file mapping words to "noun", "verb" or "other"
        #[arg(long)]
        lexicon: PathBuf,
        #[arg(long, value_enum, default_value_t = Pos::Noun)]
        pos: Pos,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Initialize default configuration file
    Init,
    /// Print config file path
    Path,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => OutputFormat::Markdown,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Pos {
    Noun,
    Verb,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "chatlens=info,warn".into()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config.
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    match cli.command {
        Commands::List => {
            let catalog = ReportCatalog::from_config(&config)?;
            for spec in catalog.iter() {
                println!("{:<40} {}", spec.name, spec.title);
            }
        }
        Commands::Report {
            name,
            chat,
            start,
            end,
            format,
        } => {
            let catalog = ReportCatalog::from_config(&config)?;
            let chat = load_chat(&chat)?;

            let mut spec = catalog
                .get(&name)
                .cloned()
                .with_context(|| format!("Unknown report: {} (see `chatlens list`)", name))?;
            if start.is_some() || end.is_some() {
                let current = spec
                    .window
                    .unwrap_or(RankWindow::new(config.ranking.start, config.ranking.end));
                spec = spec.with_window(RankWindow::new(
                    start.unwrap_or(current.start),
                    end.unwrap_or(current.end),
                ));
            }

            let report = spec.run(&chat)?;
            print_reports(&[report], output_format(format, &config))?;
        }
        Commands::All { chat, format } => {
            let catalog = ReportCatalog::from_config(&config)?;
            let chat = load_chat(&chat)?;
            let reports = catalog.run_all(&chat)?;
            print_reports(&reports, output_format(format, &config))?;
        }
        Commands::Words { chat, lexicon, pos } => {
            let chat = load_chat(&chat)?;
            let tagger = LexiconTagger::load_from(&lexicon)
                .with_context(|| format!("Failed to load lexicon {}", lexicon.display()))?;
            let pos = match pos {
                Pos::Noun => PartOfSpeech::Noun,
                Pos::Verb => PartOfSpeech::Verb,
            };
            println!("{}", words::word_blob(&chat, &tagger, pos)?);
        }
        Commands::Config { action } => {
            handle_config_command(action, &config)?;
        }
    }

    Ok(())
}

fn load_chat(path: &Path) -> Result<Chat> {
    let chat = Chat::load_from(path)
        .with_context(|| format!("Failed to load chat {}", path.display()))?;
    tracing::info!(
        "Loaded {} messages from {} actors",
        chat.messages.len(),
        chat.actors.len()
    );
    Ok(chat)
}

fn output_format(format: Option<Format>, config: &AppConfig) -> OutputFormat {
    format.map(OutputFormat::from).unwrap_or(config.output.format)
}

fn print_reports(reports: &[Report], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Markdown => {
            let rendered: Vec<String> = reports.iter().map(markdown::render_report).collect();
            print!("{}", rendered.join("\n"));
        }
        OutputFormat::Json => {
            let json = match reports {
                [report] => serde_json::to_string_pretty(report)?,
                _ => serde_json::to_string_pretty(reports)?,
            };
            println!("{}", json);
        }
    }
    Ok(())
}

fn handle_config_command(action: Option<ConfigAction>, config: &AppConfig) -> Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{}", toml_str);
        }
        Some(ConfigAction::Init) => {
            let path = AppConfig::default_path();
            if path.exists() {
                println!("Config already exists at: {}", path.display());
            } else {
                config.save()?;
                println!("Created default config at: {}", path.display());
            }
        }
        Some(ConfigAction::Path) => {
            println!("{}", AppConfig::default_path().display());
        }
    }
    Ok(())
}
