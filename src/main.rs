// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use jp2subs::app_config::{Config, LogLevel};
use jp2subs::progress::format_clock;
use jp2subs::{
    display_label, Document, Glossary, ProgressEvent, ProviderHooks, ProviderRegistry, Translator,
};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate the Japanese segments of a document
    Translate(TranslateArgs),

    /// Generate shell completions for jp2subs
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Segment document (JSON) to translate
    #[arg(value_name = "DOCUMENT")]
    document: PathBuf,

    /// Output path (default: <stem>.translated.json next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target language code, repeatable (e.g. '-t en -t fr')
    #[arg(short, long = "target-language")]
    target_language: Vec<String>,

    /// Provider name: echo, local or api
    #[arg(short, long)]
    provider: Option<String>,

    /// Translation mode: llm or draft+postedit
    #[arg(long)]
    mode: Option<String>,

    /// Segments per provider call
    #[arg(long)]
    block_size: Option<usize>,

    /// Honorific handling: keep or drop
    #[arg(long)]
    honorifics: Option<String>,

    /// Verbal tic handling: keep or light
    #[arg(long)]
    tics: Option<String>,

    /// Glossary file (JSON object of source -> target terms)
    #[arg(short, long)]
    glossary: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,
}

/// jp2subs - Japanese subtitle translation
///
/// Translates the Japanese segments of a subtitle document into one or more
/// languages using a local model binary, a remote endpoint or the echo
/// provider.
#[derive(Parser, Debug)]
#[command(name = "jp2subs")]
#[command(version)]
#[command(about = "Japanese subtitle translation tool")]
#[command(long_about = "jp2subs translates the Japanese segments of a subtitle document block by block.

EXAMPLES:
    jp2subs translate episode.json                      # Translate using default config
    jp2subs translate -t en -t fr episode.json          # Translate into English and French
    jp2subs translate -p local --mode draft+postedit x.json
    jp2subs translate -g glossary.json -f episode.json  # Enforce a glossary, overwrite output
    jp2subs completions bash > jp2subs.bash             # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created. Provider settings can be overridden with
    JP2SUBS_LLAMA_BINARY, JP2SUBS_LLAMA_MODEL, JP2SUBS_API_URL and JP2SUBS_API_KEY.

SUPPORTED PROVIDERS:
    echo   - Returns the Japanese text unchanged (default)
    local  - llama.cpp style binary run once per block
    api    - HTTP JSON endpoint (requires JP2SUBS_API_URL or providers.api.endpoint)")]
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
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and prefix for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", ""),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let now = chrono::Local::now().format("%H:%M:%S.%3f");
        let (color, prefix) = Self::style_for_level(record.level());
        let _ = writeln!(
            std::io::stderr(),
            "\x1B[{}m{} {}{}\x1B[0m",
            color,
            now,
            prefix,
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config or --log-level says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "jp2subs", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
    }
}

/// Default output path: `<stem>.translated.json` beside the input
fn default_output_path(document: &Path) -> PathBuf {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    document.with_file_name(format!("{}.translated.json", stem))
}

/// Load the config file, creating a default one when it does not exist
fn load_or_create_config(config_path: &Path) -> Result<Config> {
    if config_path.exists() {
        return Config::load(config_path);
    }
    warn!(
        "Config file not found at '{}', creating default config.",
        config_path.display()
    );
    let config = Config::default();
    config.save(config_path)?;
    Ok(config)
}

fn load_glossary(path: &Path) -> Result<Glossary> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to open glossary file: {}", path.display()))?;
    serde_json::from_str(&content)
        .context(format!("Failed to parse glossary file: {}", path.display()))
}

/// Apply command line overrides on top of the loaded configuration
fn apply_cli_overrides(config: &mut Config, args: &TranslateArgs) -> Result<()> {
    let translation = &mut config.translation;
    if !args.target_language.is_empty() {
        translation.target_languages = args.target_language.clone();
    }
    if let Some(provider) = &args.provider {
        translation.provider = provider.clone();
    }
    if let Some(mode) = &args.mode {
        translation.mode = mode.clone();
    }
    if let Some(block_size) = args.block_size {
        translation.block_size = block_size;
    }
    if let Some(honorifics) = &args.honorifics {
        translation.honorifics = honorifics.clone();
    }
    if let Some(tics) = &args.tics {
        translation.tics = tics.clone();
    }
    if let Some(path) = &args.glossary {
        // File entries extend the configured glossary and win on conflicts
        for (source, target) in load_glossary(path)?.iter() {
            translation.glossary.insert(source, target);
        }
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone().into();
    }
    Ok(())
}

fn create_progress_bar() -> ProgressBar {
    let progress_bar = ProgressBar::new(100);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {percent}% {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));
    progress_bar
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    if let Some(cli_level) = &args.log_level {
        log::set_max_level(LogLevel::from(cli_level.clone()).to_level_filter());
    }

    let mut config = load_or_create_config(Path::new(&args.config_path))?;
    config.providers.apply_env_overrides();
    apply_cli_overrides(&mut config, &args)?;

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.document));
    if output_path.exists() && !args.force_overwrite {
        warn!(
            "Output file already exists: {}. Use -f to force overwrite.",
            output_path.display()
        );
        return Ok(());
    }

    let mut document = Document::load(&args.document)
        .context(format!("Failed to load document: {}", args.document.display()))?;

    // Ctrl-C flips the flag; providers check it and kill in-flight processes
    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = Arc::clone(&cancelled);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling translation…");
                cancelled.store(true, Ordering::SeqCst);
            }
        });
    }
    let hooks = {
        let cancelled = Arc::clone(&cancelled);
        ProviderHooks::new()
            .with_cancel_check(Arc::new(move || cancelled.load(Ordering::SeqCst)))
            .with_process_registrar(Arc::new(|pid: u32| debug!("Provider process started: pid {}", pid)))
    };

    let translator = Translator::new(ProviderRegistry::new(config.providers.clone()))
        .with_hooks(hooks)
        .with_source_language(&config.source_language);
    let options = config.translation.to_options();

    let labels: Vec<String> = options.target_langs.iter().map(|l| display_label(l)).collect();
    info!(
        "jp2subs: {} segments, provider {} -> {}",
        document.len(),
        options.provider,
        labels.join(", ")
    );

    let started = Instant::now();
    let progress_bar = create_progress_bar();
    let pb = progress_bar.clone();
    let on_progress = move |event: ProgressEvent| {
        pb.set_position(u64::from(event.percent));
        pb.set_message(event.detail.unwrap_or(event.message));
    };

    let summary = match translator
        .translate_document(&mut document, &options, Some(&on_progress))
        .await
    {
        Ok(summary) => {
            progress_bar.finish_with_message("Translation complete");
            summary
        }
        Err(e) if e.is_cancelled() => {
            progress_bar.abandon_with_message("Cancelled");
            return Err(anyhow!("Translation cancelled"));
        }
        Err(e) => {
            progress_bar.abandon_with_message("Failed");
            return Err(e.into());
        }
    };

    info!(
        "Translated {} block(s) with {} provider call(s) in {}",
        summary.blocks,
        summary.provider_calls,
        format_clock(started.elapsed().as_secs_f64())
    );
    if summary.unresolved > 0 {
        warn!(
            "{} segment translation(s) were left empty after retries",
            summary.unresolved
        );
    }

    document
        .save(&output_path)
        .context(format!("Failed to write output: {}", output_path.display()))?;
    info!("Success: {}", output_path.display());

    Ok(())
}
