// Template loading.
//
// Templates are plain files in one directory, keyed by file stem. Contents
// are kept byte for byte, trailing newline included.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use drbo_model::{DrboError, Result};

/// Only files with this extension are loaded.
pub const TEMPLATE_EXTENSION: &str = "tex";

/// The templates the renderer knows how to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateName {
    Preamble,
    End,
    StartParallel,
    EndParallel,
    BetweenLanguages,
    BetweenParagraphs,
}

impl TemplateName {
    pub const ALL: [TemplateName; 6] = [
        TemplateName::Preamble,
        TemplateName::End,
        TemplateName::StartParallel,
        TemplateName::EndParallel,
        TemplateName::BetweenLanguages,
        TemplateName::BetweenParagraphs,
    ];

    pub fn stem(self) -> &'static str {
        match self {
            TemplateName::Preamble => "preamble",
            TemplateName::End => "end",
            TemplateName::StartParallel => "start-parallel",
            TemplateName::EndParallel => "end-parallel",
            TemplateName::BetweenLanguages => "between-languages",
            TemplateName::BetweenParagraphs => "between-paragraphs",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.{TEMPLATE_EXTENSION}", self.stem())
    }
}

/// Immutable set of template strings keyed by file stem.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: HashMap<String, String>,
}

impl TemplateSet {
    /// Load every `.tex` file in `dir`.
    ///
    /// Templates the renderer never asks for are allowed to be absent; the
    /// error is raised at lookup time instead.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|e| DrboError::filesystem(dir, e))?;

        let mut templates = HashMap::new();
        for entry in entries {
            let path = entry.map_err(|e| DrboError::filesystem(dir, e))?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!(path = %path.display(), "Skipping template with non UTF-8 name");
                continue;
            };

            let contents =
                fs::read_to_string(&path).map_err(|e| DrboError::filesystem(&path, e))?;
            tracing::debug!(name = stem, bytes = contents.len(), "Loaded template");
            templates.insert(stem.to_string(), contents);
        }

        let set = Self { templates };
        let missing = set.missing();
        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(|n| n.file_name()).collect();
            tracing::warn!(missing = %names.join(", "), "Template directory is incomplete");
        }
        tracing::info!(dir = %dir.display(), templates = set.len(), "Loaded templates");

        Ok(set)
    }

    /// Build a set from in-memory `(stem, contents)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            templates: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: TemplateName) -> Result<&str> {
        self.templates
            .get(name.stem())
            .map(String::as_str)
            .ok_or_else(|| DrboError::MissingTemplate {
                name: name.file_name(),
            })
    }

    /// Known templates not present in this set.
    pub fn missing(&self) -> Vec<TemplateName> {
        TemplateName::ALL
            .into_iter()
            .filter(|n| !self.templates.contains_key(n.stem()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
