use drbo_model::{DrboError, Paragraph, Result};
use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node, Selector};
use std::ops::Deref;

use crate::types::{ExtractedChapter, Selectors};

/// Parse a chapter page into book name, chapter name and paragraphs.
///
/// Book and chapter names come from the first element matching their
/// selectors; either missing is a `MissingField` error. A page with no
/// matching paragraphs yields an empty list.
pub fn extract_chapter(html: &str, selectors: &Selectors) -> Result<ExtractedChapter> {
    let book_sel = parse_selector(&selectors.book_name)?;
    let chapter_sel = parse_selector(&selectors.chapter_name)?;
    let paragraph_sel = parse_selector(&selectors.paragraph)?;
    let secondary_sel = parse_selector(&selectors.secondary)?;

    let document = Html::parse_document(html);

    let book_name = first_text(&document, &book_sel, &selectors.book_name)?;
    let chapter_name = first_text(&document, &chapter_sel, &selectors.chapter_name)?;

    let paragraphs: Vec<Paragraph> = document
        .select(&paragraph_sel)
        .enumerate()
        .map(|(index, p)| {
            let paragraph = split_paragraph(p, &secondary_sel);
            tracing::debug!(
                index,
                bilingual = paragraph.is_bilingual(),
                chars = paragraph.primary_text.chars().count(),
                "Classified paragraph"
            );
            paragraph
        })
        .collect();

    Ok(ExtractedChapter {
        book_name,
        chapter_name,
        paragraphs,
    })
}

/// Split one paragraph element into primary text and optional secondary span.
///
/// The secondary span's subtree is left out of the primary text entirely.
pub fn split_paragraph(paragraph: ElementRef, secondary: &Selector) -> Paragraph {
    match paragraph.select(secondary).next() {
        Some(span) => {
            let secondary_text = subtree_text(*span, None);
            let primary_text = subtree_text(*paragraph, Some(span.id()));
            Paragraph {
                primary_text,
                secondary_text: Some(secondary_text),
            }
        }
        None => Paragraph {
            primary_text: subtree_text(*paragraph, None),
            secondary_text: None,
        },
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| DrboError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn first_text(document: &Html, selector: &Selector, source: &str) -> Result<String> {
    document
        .select(selector)
        .next()
        .map(|el| subtree_text(*el, None))
        .ok_or_else(|| DrboError::MissingField {
            selector: source.to_string(),
        })
}

/// Concatenate every text node under `node`, skipping the subtree rooted at `excluded`.
fn subtree_text(node: NodeRef<Node>, excluded: Option<NodeId>) -> String {
    let mut text = String::new();
    collect_text(node, excluded, &mut text);
    text
}

fn collect_text(node: NodeRef<Node>, excluded: Option<NodeId>, out: &mut String) {
    for child in node.children() {
        if Some(child.id()) == excluded {
            continue;
        }
        match child.value() {
            Node::Text(t) => out.push_str(t.deref()),
            Node::Element(_) => collect_text(child, excluded, out),
            _ => {}
        }
    }
}
