//! Export renderers: turn a project's ordered sections into downloadable
//! document bytes. Rendering never mutates state.

pub mod docx;
pub mod pptx;
pub mod text;

use authorly_db::models::comment::Comment;
use authorly_db::models::project::Project;
use authorly_db::models::revision::Revision;
use authorly_db::models::section::Section;

use crate::error::AppError;

/// Everything a renderer needs, fetched up front by the handler.
/// `comments` and `revisions` are empty unless the caller asked for them.
pub struct ExportData<'a> {
    pub project: &'a Project,
    /// Ordered by `idx` ascending.
    pub sections: &'a [Section],
    pub comments: &'a [Comment],
    pub revisions: &'a [Revision],
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Docx,
    Pptx,
    Txt,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "docx" => Some(ExportFormat::Docx),
            "pptx" => Some(ExportFormat::Pptx),
            "txt" => Some(ExportFormat::Txt),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            ExportFormat::Txt => "text/plain; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Docx => "docx",
            ExportFormat::Pptx => "pptx",
            ExportFormat::Txt => "txt",
        }
    }
}

/// A rendered export ready to stream to the client.
pub struct Rendered {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

/// Failures while assembling an export package.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Zip packaging error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error while packaging export: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::InternalError(format!("Export rendering failed: {err}"))
    }
}

/// Render the project into the requested format.
pub fn render(format: ExportFormat, data: &ExportData<'_>) -> Result<Rendered, ExportError> {
    let bytes = match format {
        ExportFormat::Docx => docx::render(data)?,
        ExportFormat::Pptx => pptx::render(data)?,
        ExportFormat::Txt => text::render(data).into_bytes(),
    };

    Ok(Rendered {
        bytes,
        content_type: format.content_type(),
        filename: format!("{}.{}", safe_filename(&data.project.title), format.extension()),
    })
}

/// Reduce a project title to a filesystem- and header-safe file stem.
fn safe_filename(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "export".to_string()
    } else {
        stem
    }
}

/// Escape text for embedding in OOXML part bodies.
pub(crate) fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing() {
        assert_eq!(ExportFormat::parse("docx"), Some(ExportFormat::Docx));
        assert_eq!(ExportFormat::parse("pptx"), Some(ExportFormat::Pptx));
        assert_eq!(ExportFormat::parse("txt"), Some(ExportFormat::Txt));
        assert_eq!(ExportFormat::parse("pdf"), None);
    }

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(safe_filename("Q3 Report: Final!"), "Q3_Report__Final_");
        assert_eq!(safe_filename(""), "export");
        assert_eq!(safe_filename("plain-name_1"), "plain-name_1");
    }

    #[test]
    fn xml_escaping_covers_special_characters() {
        assert_eq!(
            xml_escape(r#"<a & "b's">"#),
            "&lt;a &amp; &quot;b&apos;s&quot;&gt;"
        );
        assert_eq!(xml_escape("plain"), "plain");
    }
}
