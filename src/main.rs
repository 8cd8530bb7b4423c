// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use doctrans::app_config::{self, Config};
use doctrans::app_controller::{Controller, RunOutcome};
use doctrans::translation::{Granularity, RenderMode};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for Granularity
#[derive(Debug, Clone, ValueEnum)]
enum CliGranularity {
    Paragraph,
    Sentence,
}

impl From<CliGranularity> for Granularity {
    fn from(cli: CliGranularity) -> Self {
        match cli {
            CliGranularity::Paragraph => Granularity::Paragraph,
            CliGranularity::Sentence => Granularity::Sentence,
        }
    }
}

/// CLI Wrapper for RenderMode
#[derive(Debug, Clone, ValueEnum)]
enum CliRenderMode {
    Simple,
    Complex,
}

impl From<CliRenderMode> for RenderMode {
    fn from(cli: CliRenderMode) -> Self {
        match cli {
            CliRenderMode::Simple => RenderMode::Simple,
            CliRenderMode::Complex => RenderMode::Complex,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for doctrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// doctrans - translate Word documents into HTML
///
/// Extracts the text of a document, translates every unique segment through
/// the configured endpoint and writes a translated HTML page.
#[derive(Parser, Debug)]
#[command(name = "doctrans")]
#[command(version)]
#[command(about = "Translate .docx documents into HTML pages")]
#[command(long_about = "doctrans extracts the text of Word documents, translates it segment by segment and renders an HTML page.

EXAMPLES:
    doctrans report.docx                      # Translate using default config
    doctrans -f report.docx                   # Overwrite an existing page
    doctrans -s uk -t en report.docx          # Translate from Ukrainian to English
    doctrans -m simple -g paragraph notes.txt # Plain paragraphs, one unit per line
    doctrans --log-level debug ./documents/   # Process every .docx below a directory
    doctrans completions bash > doctrans.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input document or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Source language code (e.g., 'uk', 'de', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Unit size sent for translation
    #[arg(short, long, value_enum)]
    granularity: Option<CliGranularity>,

    /// Output flavour
    #[arg(short, long, value_enum)]
    mode: Option<CliRenderMode>,

    /// Directory receiving the HTML pages
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

impl CommandLineOptions {
    /// Apply command line overrides on top of the loaded configuration
    fn apply_to(&self, config: &mut Config) {
        if let Some(source_lang) = &self.source_language {
            config.source_language = source_lang.clone();
        }
        if let Some(target_lang) = &self.target_language {
            config.target_language = target_lang.clone();
        }
        if let Some(granularity) = &self.granularity {
            config.granularity = granularity.clone().into();
        }
        if let Some(mode) = &self.mode {
            config.render_mode = mode.clone().into();
        }
        if let Some(output_dir) = &self.output_dir {
            // Images follow the pages so relative sources keep working
            config.rendering.media_dir = output_dir.join(&config.rendering.image_base);
            config.rendering.output_dir = output_dir.clone();
        }
        if let Some(log_level) = &self.log_level {
            config.log_level = log_level.clone().into();
        }
    }
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the configuration says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "doctrans", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let input_path = cli
        .input_path
        .clone()
        .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

    let mut config = Config::load_or_create(&cli.config_path)?;
    cli.apply_to(&mut config);
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    info!(
        "Translating {} ({}, {:?} mode)",
        input_path.display(),
        config.language_pair(),
        config.render_mode
    );

    let controller = Controller::with_config(config)?;

    if input_path.is_file() {
        match controller.run(input_path, cli.force_overwrite).await? {
            RunOutcome::Written(path) => info!("Success: {}", path.display()),
            RunOutcome::Skipped(path) => info!("Unchanged: {}", path.display()),
        }
    } else if input_path.is_dir() {
        let summary = controller.run_folder(input_path, cli.force_overwrite).await?;
        if summary.errors > 0 {
            return Err(anyhow!("{} documents failed", summary.errors));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}
