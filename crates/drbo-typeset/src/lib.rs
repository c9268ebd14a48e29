use std::path::PathBuf;

use drbo_acquire::{ChapterRef, FetchOptions, HtmlSource, Selectors};
use drbo_model::{group_runs, Result};

pub mod output;
pub mod render;
pub mod templates;

pub use templates::{TemplateName, TemplateSet};

/// Everything one typesetting run needs.
#[derive(Debug, Clone)]
pub struct TypesetConfig {
    pub source: HtmlSource,
    pub selectors: Selectors,
    pub fetch: FetchOptions,
    pub templates_dir: PathBuf,
    pub output: PathBuf,
    /// Normalize extracted text to Unicode NFC.
    pub nfc: bool,
}

impl Default for TypesetConfig {
    fn default() -> Self {
        Self {
            source: ChapterRef::default().into(),
            selectors: Selectors::default(),
            fetch: FetchOptions::default(),
            templates_dir: PathBuf::from("templates"),
            output: PathBuf::from("output/drbo.tex"),
            nfc: false,
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub book_name: String,
    pub chapter_name: String,
    pub paragraphs: usize,
    pub runs: usize,
    pub bilingual_runs: usize,
    pub output: PathBuf,
    pub bytes: usize,
}

/// Fetch, extract, group, render and write one chapter.
///
/// The document is fully rendered before anything touches the output path,
/// so any failure leaves no output file behind.
pub async fn build(config: &TypesetConfig) -> Result<BuildReport> {
    let templates = TemplateSet::load_dir(&config.templates_dir)?;

    let chapter =
        drbo_acquire::acquire(&config.source, &config.selectors, &config.fetch, config.nfc)
            .await?;
    let paragraphs = chapter.paragraphs.len();

    let runs = group_runs(chapter.paragraphs);
    let bilingual_runs = runs.iter().filter(|r| r.bilingual).count();
    tracing::info!(
        runs = runs.len(),
        bilingual = bilingual_runs,
        monolingual = runs.len() - bilingual_runs,
        "Grouped paragraphs"
    );

    let document = render::render_document(&runs, &templates)?;
    output::write_atomic(&config.output, &document)?;

    Ok(BuildReport {
        book_name: chapter.book_name,
        chapter_name: chapter.chapter_name,
        paragraphs,
        runs: runs.len(),
        bilingual_runs,
        output: config.output.clone(),
        bytes: document.len(),
    })
}
