use drbo_model::{Result, Run};

use crate::templates::{TemplateName, TemplateSet};

/// Render runs into body fragments, in run order.
///
/// A bilingual run becomes five fragments: the start-parallel template, the
/// Latin texts joined by between-paragraphs, the between-languages template,
/// the English texts joined the same way, and end-parallel. A monolingual
/// run contributes each paragraph's text as its own fragment.
pub fn render_runs(runs: &[Run], templates: &TemplateSet) -> Result<Vec<String>> {
    let mut fragments = Vec::new();

    for run in runs {
        if run.bilingual {
            let between = templates.get(TemplateName::BetweenParagraphs)?;
            fragments.push(templates.get(TemplateName::StartParallel)?.to_string());
            fragments.push(run.secondary_texts().collect::<Vec<_>>().join(between));
            fragments.push(templates.get(TemplateName::BetweenLanguages)?.to_string());
            fragments.push(run.primary_texts().collect::<Vec<_>>().join(between));
            fragments.push(templates.get(TemplateName::EndParallel)?.to_string());
        } else {
            fragments.extend(run.primary_texts().map(str::to_string));
        }
    }

    Ok(fragments)
}

/// Render the complete document: preamble, body fragments, end, newline-joined.
pub fn render_document(runs: &[Run], templates: &TemplateSet) -> Result<String> {
    let preamble = templates.get(TemplateName::Preamble)?;
    let end = templates.get(TemplateName::End)?;
    let body = render_runs(runs, templates)?;

    let mut document = Vec::with_capacity(body.len() + 2);
    document.push(preamble);
    document.extend(body.iter().map(String::as_str));
    document.push(end);

    Ok(document.join("\n"))
}
