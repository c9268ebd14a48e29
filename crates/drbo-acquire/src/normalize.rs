use unicode_normalization::UnicodeNormalization;

use crate::types::ExtractedChapter;

/// Normalize text to NFC.
///
/// Latin text on the source pages sometimes carries decomposed accents
/// (e + U+0301); LaTeX fonts handle the precomposed forms more reliably.
/// Whitespace is left untouched.
pub fn normalize_text(input: &str) -> String {
    input.nfc().collect()
}

/// Apply [`normalize_text`] to every string in an extracted chapter.
pub fn normalize_chapter(chapter: ExtractedChapter) -> ExtractedChapter {
    ExtractedChapter {
        book_name: normalize_text(&chapter.book_name),
        chapter_name: normalize_text(&chapter.chapter_name),
        paragraphs: chapter
            .paragraphs
            .into_iter()
            .map(|mut p| {
                p.primary_text = normalize_text(&p.primary_text);
                p.secondary_text = p.secondary_text.as_deref().map(normalize_text);
                p
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drbo_model::Paragraph;

    #[test]
    fn test_normalize_nfc() {
        let decomposed = "Iesu\u{0301}";
        assert_eq!(normalize_text(decomposed), "Iesú");
    }

    #[test]
    fn test_whitespace_preserved() {
        assert_eq!(normalize_text("  a \n b  "), "  a \n b  ");
    }

    #[test]
    fn test_normalize_chapter() {
        let chapter = ExtractedChapter {
            book_name: "Ge\u{0301}nesis".into(),
            chapter_name: "Chapter 1".into(),
            paragraphs: vec![
                Paragraph::bilingual("cre\u{0301}ated", "cre\u{0301}avit"),
                Paragraph::monolingual("plain"),
            ],
        };
        let normalized = normalize_chapter(chapter);
        assert_eq!(normalized.book_name, "Génesis");
        assert_eq!(
            normalized.paragraphs,
            vec![
                Paragraph::bilingual("créated", "créavit"),
                Paragraph::monolingual("plain"),
            ]
        );
    }
}
