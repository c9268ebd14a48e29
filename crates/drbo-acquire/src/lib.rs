pub mod decode;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod source;
pub mod types;

pub use fetch::FetchOptions;
pub use source::{ChapterRef, Edition, HtmlSource};
pub use types::{ExtractedChapter, Selectors};

use drbo_model::Result;

/// Load a chapter page and extract its book name, chapter name and paragraphs.
///
/// When `nfc` is set, all extracted text is normalized to Unicode NFC.
pub async fn acquire(
    source: &HtmlSource,
    selectors: &Selectors,
    fetch_options: &FetchOptions,
    nfc: bool,
) -> Result<ExtractedChapter> {
    let html = source.load(fetch_options).await?;

    let mut chapter = extract::extract_chapter(&html, selectors)?;
    if nfc {
        chapter = normalize::normalize_chapter(chapter);
    }

    tracing::info!(
        book = %chapter.book_name.trim(),
        chapter = %chapter.chapter_name.trim(),
        paragraphs = chapter.paragraphs.len(),
        bilingual = chapter.bilingual_count(),
        "Extracted chapter"
    );

    Ok(chapter)
}
