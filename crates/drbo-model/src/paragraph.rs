/// One paragraph of a chapter page.
///
/// `secondary_text` holds the Latin span when the source paragraph carried
/// one; `primary_text` is whatever text remains once that span is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub primary_text: String,
    pub secondary_text: Option<String>,
}

impl Paragraph {
    /// A paragraph with no secondary-language span.
    pub fn monolingual(primary: impl Into<String>) -> Self {
        Self {
            primary_text: primary.into(),
            secondary_text: None,
        }
    }

    /// A paragraph carrying both languages.
    pub fn bilingual(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary_text: primary.into(),
            secondary_text: Some(secondary.into()),
        }
    }

    pub fn is_bilingual(&self) -> bool {
        self.secondary_text.is_some()
    }
}

/// A maximal stretch of consecutive paragraphs with the same classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub bilingual: bool,
    pub paragraphs: Vec<Paragraph>,
}

impl Run {
    /// Primary texts of the run, in paragraph order.
    pub fn primary_texts(&self) -> impl Iterator<Item = &str> {
        self.paragraphs.iter().map(|p| p.primary_text.as_str())
    }

    /// Secondary texts of the run, in paragraph order.
    ///
    /// Paragraphs without a secondary span contribute an empty string, so a
    /// bilingual run always yields exactly one entry per paragraph.
    pub fn secondary_texts(&self) -> impl Iterator<Item = &str> {
        self.paragraphs
            .iter()
            .map(|p| p.secondary_text.as_deref().unwrap_or(""))
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// Partition paragraphs into runs of equal classification.
///
/// Order is preserved and every paragraph lands in exactly one run. Two
/// adjacent runs never share the same `bilingual` flag.
pub fn group_runs(paragraphs: impl IntoIterator<Item = Paragraph>) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();

    for paragraph in paragraphs {
        let bilingual = paragraph.is_bilingual();
        match runs.last_mut() {
            Some(run) if run.bilingual == bilingual => run.paragraphs.push(paragraph),
            _ => runs.push(Run {
                bilingual,
                paragraphs: vec![paragraph],
            }),
        }
    }

    runs
}
