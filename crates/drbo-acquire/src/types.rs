use drbo_model::Paragraph;

/// Default selectors matching the drbo.org chapter page layout.
pub const BOOK_NAME_SELECTOR: &str = "td.bookname";
pub const CHAPTER_NAME_SELECTOR: &str = "td.chapname";
pub const PARAGRAPH_SELECTOR: &str = "td.textarea > p";
/// The Latin text is wrapped in a `<font>` element inside each paragraph.
pub const SECONDARY_SELECTOR: &str = "font";

/// CSS selectors locating the parts of a chapter page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    pub book_name: String,
    pub chapter_name: String,
    pub paragraph: String,
    /// Matched against each paragraph's descendants; the first hit is the
    /// secondary-language span.
    pub secondary: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            book_name: BOOK_NAME_SELECTOR.to_string(),
            chapter_name: CHAPTER_NAME_SELECTOR.to_string(),
            paragraph: PARAGRAPH_SELECTOR.to_string(),
            secondary: SECONDARY_SELECTOR.to_string(),
        }
    }
}

/// Everything pulled out of one chapter page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedChapter {
    /// Full text of the first book-name match, untrimmed.
    pub book_name: String,
    /// Full text of the first chapter-name match, untrimmed.
    pub chapter_name: String,
    /// Paragraphs in document order.
    pub paragraphs: Vec<Paragraph>,
}

impl ExtractedChapter {
    pub fn bilingual_count(&self) -> usize {
        self.paragraphs.iter().filter(|p| p.is_bilingual()).count()
    }
}
