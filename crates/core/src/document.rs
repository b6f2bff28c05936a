//! Document kind enumeration shared by projects and the export renderers.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The kind of deliverable a project produces. Fixed at project creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    /// A prose document (exports to Word / plain text).
    Document,
    /// A slide deck (exports to PowerPoint).
    Presentation,
}

impl DocKind {
    /// The string stored in `projects.doc_kind`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocKind::Document => "document",
            DocKind::Presentation => "presentation",
        }
    }

    /// Human-readable label used inside generation prompts.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            DocKind::Document => "written document",
            DocKind::Presentation => "slide presentation",
        }
    }

    /// Parse a stored or user-supplied kind string.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "document" => Ok(DocKind::Document),
            "presentation" => Ok(DocKind::Presentation),
            other => Err(CoreError::Validation(format!(
                "Unknown document kind: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for DocKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
