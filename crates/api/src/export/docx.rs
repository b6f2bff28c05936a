//! Word (docx) export.
//!
//! Emits a minimal WordprocessingML package: content types, the package
//! relationship, and `word/document.xml`. Word supplies default styling for
//! anything not specified.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::{xml_escape, ExportData, ExportError};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

/// Render the project as a docx package.
pub fn render(data: &ExportData<'_>) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(PACKAGE_RELS.as_bytes())?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(document_xml(data).as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Build the main document part: a bold title paragraph, then a heading and
/// body paragraphs per section, plus any requested comments and revision
/// history.
fn document_xml(data: &ExportData<'_>) -> String {
    let mut body = String::new();

    body.push_str(&title_paragraph(&data.project.title, 48));

    for section in data.sections {
        body.push_str(&title_paragraph(&section.title, 32));

        for line in section
            .content
            .as_deref()
            .unwrap_or("(no content)")
            .lines()
        {
            body.push_str(&text_paragraph(line, false));
        }

        let comments: Vec<_> = data
            .comments
            .iter()
            .filter(|c| c.section_id == section.id)
            .collect();
        if !comments.is_empty() {
            body.push_str(&text_paragraph("Comments:", true));
            for comment in comments {
                body.push_str(&text_paragraph(&format!("- {}", comment.body), false));
            }
        }

        let revisions: Vec<_> = data
            .revisions
            .iter()
            .filter(|r| r.section_id == section.id)
            .collect();
        if !revisions.is_empty() {
            body.push_str(&text_paragraph("Revision history:", true));
            for revision in revisions {
                body.push_str(&text_paragraph(
                    &format!(
                        "[{}] {}",
                        revision.created_at.format("%Y-%m-%d %H:%M"),
                        revision.prompt
                    ),
                    false,
                ));
            }
        }
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{body}</w:body>
</w:document>"#
    )
}

/// A bold paragraph at the given half-point font size.
fn title_paragraph(text: &str, half_points: u32) -> String {
    format!(
        "<w:p><w:r><w:rPr><w:b/><w:sz w:val=\"{half_points}\"/></w:rPr><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        xml_escape(text)
    )
}

/// A plain (optionally bold) body paragraph.
fn text_paragraph(text: &str, bold: bool) -> String {
    let run_props = if bold { "<w:rPr><w:b/></w:rPr>" } else { "" };
    format!(
        "<w:p><w:r>{run_props}<w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        xml_escape(text)
    )
}
