// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use paratrans::app_config::{self, Config};
use paratrans::translation::{paragraphs_from_plain_text, split_into_batches, BatchTranslator, Paragraph};
use paratrans::TranslationService;

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate the paragraphs of a plain-text file
    Translate(TranslateArgs),

    /// Generate shell completions for paratrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Plain-text input; paragraphs are separated by blank lines
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Target language code or name (e.g., 'zh-hans', 'fr', 'German')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Output file (defaults to <input>_bilingual.txt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Paragraphs per request
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// paratrans - batch paragraph translation
///
/// Sends numbered batches of paragraphs to a chat completion service and
/// writes a bilingual copy of the input, one translation per paragraph.
#[derive(Parser, Debug)]
#[command(name = "paratrans")]
#[command(version)]
#[command(about = "Batch paragraph translation with a chat completion service")]
#[command(long_about = "paratrans translates the paragraphs of a text file in numbered batches and keeps
the output aligned with the input, one translation per paragraph.

EXAMPLES:
    paratrans translate book.txt -t zh-hans          # Translate to Simplified Chinese
    paratrans translate book.txt -t fr -b 5          # Five paragraphs per request
    paratrans translate book.txt -o out.txt          # Choose the output file
    paratrans completions bash > paratrans.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created. API keys may also come from OPENAI_API_KEY
    (comma-separated for several keys); PARATRANS_USER_MSG_TEMPLATE and
    PARATRANS_SYS_MSG override the prompt templates.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger itself accepts everything; the max level filters
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
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
            let _ = writeln!(
                std::io::stderr(),
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
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "paratrans", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    if let Some(level) = &options.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level((&level).into());
    }

    let mut config = Config::load_or_create(&options.config_path)?;
    config.apply_env_overrides(|key| std::env::var(key).ok());
    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(batch_size) = options.batch_size {
        config.translation.batch_size = batch_size;
    }
    if let Some(level) = &options.log_level {
        config.log_level = level.clone().into();
    }
    config.validate().context("Configuration validation failed")?;
    log::set_max_level((&config.log_level).into());

    let input = std::fs::read_to_string(&options.input_file)
        .with_context(|| format!("Failed to read input file: {}", options.input_file.display()))?;
    let paragraphs = paragraphs_from_plain_text(&input);
    if paragraphs.is_empty() {
        warn!("No paragraphs found in {}", options.input_file.display());
        return Ok(());
    }

    let batches = split_into_batches(&paragraphs, config.translation.batch_size);
    let service = TranslationService::from_config(&config)?;
    let translator = BatchTranslator::from_config(service, &config.translation);
    info!(
        "Translating {} paragraphs in {} batches to {}",
        paragraphs.len(),
        batches.len(),
        translator.service().language()
    );

    let progress_bar = ProgressBar::new(batches.len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({percent}%) {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));

    let pb = progress_bar.clone();
    let results = translator
        .translate_batches(&batches, move |done, _total| pb.set_position(done as u64))
        .await;
    progress_bar.finish_and_clear();

    let mut failed = 0;
    let mut misaligned = 0;
    let mut output = String::new();
    for (batch, result) in batches.iter().zip(results) {
        let translations = match result {
            Ok(outcome) => {
                if !outcome.is_aligned() {
                    misaligned += 1;
                }
                outcome.translations
            }
            Err(e) => {
                error!("Keeping batch starting at paragraph {} untranslated: {}", batch[0].index, e);
                failed += 1;
                Vec::new()
            }
        };
        write_bilingual(&mut output, batch, &translations);
    }

    let output_path = options.output.unwrap_or_else(|| bilingual_path(&options.input_file));
    std::fs::write(&output_path, output)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    info!("{}", translator.service().ledger().summary());
    if misaligned > 0 {
        warn!("{} batch(es) could not be fully aligned; see the diagnostic log", misaligned);
    }
    info!("Wrote {}", output_path.display());

    if failed > 0 {
        return Err(anyhow!("{} of {} batches failed", failed, batches.len()));
    }
    Ok(())
}

/// Append each paragraph followed by its translation, when there is one
fn write_bilingual(output: &mut String, batch: &[Paragraph], translations: &[String]) {
    for (i, paragraph) in batch.iter().enumerate() {
        output.push_str(paragraph.text.trim());
        output.push_str("\n\n");
        if let Some(translated) = translations.get(i) {
            output.push_str(translated);
            output.push_str("\n\n");
        }
    }
}

fn bilingual_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    input.with_file_name(format!("{}_bilingual.txt", stem))
}
