use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use drbo_acquire::types::{
    BOOK_NAME_SELECTOR, CHAPTER_NAME_SELECTOR, PARAGRAPH_SELECTOR, SECONDARY_SELECTOR,
};
use drbo_acquire::{ChapterRef, Edition, FetchOptions, HtmlSource, Selectors};
use drbo_typeset::TypesetConfig;

#[derive(Parser)]
#[command(name = "drbo")]
#[command(about = "Typeset a Latin/English parallel chapter from drbo.org into LaTeX")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long)]
    utc: bool,

    /// Chapter page URL (overrides --edition/--book/--chapter)
    #[arg(long, env = "DRBO_URL", conflicts_with = "html")]
    url: Option<String>,

    /// Read the chapter page from a saved HTML file instead of fetching it
    #[arg(long, env = "DRBO_HTML")]
    html: Option<PathBuf>,

    /// Which rendition of the chapter to fetch
    #[arg(long, env = "DRBO_EDITION", value_enum, default_value = "parallel")]
    edition: EditionArg,

    /// Book number as used in drbo.org page ids (47 = Matthew)
    #[arg(long, env = "DRBO_BOOK", default_value_t = 47,
          value_parser = clap::value_parser!(u16).range(1..=99))]
    book: u16,

    /// Chapter number within the book
    #[arg(long, env = "DRBO_CHAPTER", default_value_t = 1,
          value_parser = clap::value_parser!(u16).range(1..=999))]
    chapter: u16,

    /// Directory containing the .tex templates
    #[arg(short, long, env = "DRBO_TEMPLATES_DIR", default_value = "templates")]
    templates_dir: PathBuf,

    /// Output path for the rendered document
    #[arg(short, long, env = "DRBO_OUTPUT", default_value = "output/drbo.tex")]
    output: PathBuf,

    /// Give up on the fetch after this many seconds
    #[arg(long, env = "DRBO_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Retries for transient fetch failures (5xx, 429, connection errors)
    #[arg(long, env = "DRBO_RETRIES", default_value_t = 2,
          value_parser = clap::value_parser!(u32).range(0..=10))]
    retries: u32,

    /// Normalize extracted text to Unicode NFC
    #[arg(long, env = "DRBO_NFC")]
    nfc: bool,

    /// Selector for the book title cell
    #[arg(long, env = "DRBO_BOOK_SELECTOR", default_value = BOOK_NAME_SELECTOR)]
    book_selector: String,

    /// Selector for the chapter title cell
    #[arg(long, env = "DRBO_CHAPTER_SELECTOR", default_value = CHAPTER_NAME_SELECTOR)]
    chapter_selector: String,

    /// Selector for the text paragraphs
    #[arg(long, env = "DRBO_PARAGRAPH_SELECTOR", default_value = PARAGRAPH_SELECTOR)]
    paragraph_selector: String,

    /// Selector for the Latin span inside a paragraph
    #[arg(long, env = "DRBO_SECONDARY_SELECTOR", default_value = SECONDARY_SELECTOR)]
    secondary_selector: String,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum EditionArg {
    /// Latin Vulgate alongside the Douay-Rheims English
    Parallel,
    /// Douay-Rheims English only
    DouayRheims,
}

impl From<EditionArg> for Edition {
    fn from(arg: EditionArg) -> Self {
        match arg {
            EditionArg::Parallel => Edition::Parallel,
            EditionArg::DouayRheims => Edition::DouayRheims,
        }
    }
}

impl Cli {
    fn source(&self) -> HtmlSource {
        if let Some(path) = &self.html {
            return HtmlSource::File(path.clone());
        }
        if let Some(url) = &self.url {
            return HtmlSource::Url(url.clone());
        }
        ChapterRef {
            edition: self.edition.into(),
            book: self.book,
            chapter: self.chapter,
        }
        .into()
    }

    fn config(&self) -> TypesetConfig {
        TypesetConfig {
            source: self.source(),
            selectors: Selectors {
                book_name: self.book_selector.clone(),
                chapter_name: self.chapter_selector.clone(),
                paragraph: self.paragraph_selector.clone(),
                secondary: self.secondary_selector.clone(),
            },
            fetch: FetchOptions {
                timeout: Duration::from_secs(self.timeout_secs),
                retries: self.retries,
                ..FetchOptions::default()
            },
            templates_dir: self.templates_dir.clone(),
            output: self.output.clone(),
            nfc: self.nfc,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn,hyper_util=info",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn,hyper_util=info",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    let config = cli.config();
    tracing::info!(
        source = %config.source,
        templates = %config.templates_dir.display(),
        output = %config.output.display(),
        "Typesetting chapter"
    );

    let report = drbo_typeset::build(&config).await.map_err(|e| {
        let stage = e.stage();
        anyhow::Error::new(e).context(format!("{stage} stage failed"))
    })?;

    tracing::info!(
        book = %report.book_name.trim(),
        chapter = %report.chapter_name.trim(),
        paragraphs = report.paragraphs,
        runs = report.runs,
        bilingual_runs = report.bilingual_runs,
        bytes = report.bytes,
        path = %report.output.display(),
        "Done"
    );

    Ok(())
}
