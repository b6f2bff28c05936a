//! Plain-text export.

use super::ExportData;

/// Render the project as plain text: title banner, one block per section in
/// order, then any requested comments and revision history.
pub fn render(data: &ExportData<'_>) -> String {
    let mut out = String::new();

    out.push_str(&data.project.title);
    out.push('\n');
    out.push_str(&"=".repeat(data.project.title.chars().count().max(4)));
    out.push_str("\n\n");

    for section in data.sections {
        out.push_str(&section.title);
        out.push('\n');
        out.push_str(&"-".repeat(section.title.chars().count().max(4)));
        out.push('\n');
        out.push_str(section.content.as_deref().unwrap_or("(no content)"));
        out.push_str("\n\n");

        let comments: Vec<_> = data
            .comments
            .iter()
            .filter(|c| c.section_id == section.id)
            .collect();
        if !comments.is_empty() {
            out.push_str("Comments:\n");
            for comment in comments {
                out.push_str(&format!("  - {}\n", comment.body));
            }
            out.push('\n');
        }

        let revisions: Vec<_> = data
            .revisions
            .iter()
            .filter(|r| r.section_id == section.id)
            .collect();
        if !revisions.is_empty() {
            out.push_str("Revision history:\n");
            for revision in revisions {
                out.push_str(&format!(
                    "  [{}] {}\n",
                    revision.created_at.format("%Y-%m-%d %H:%M"),
                    revision.prompt
                ));
            }
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use authorly_db::models::project::Project;
    use authorly_db::models::section::Section;

    use super::*;

    fn project() -> Project {
        Project {
            id: 1,
            user_id: 1,
            title: "My Report".to_string(),
            doc_kind: "document".to_string(),
            topic_prompt: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn section(id: i64, idx: i32, title: &str, content: Option<&str>) -> Section {
        Section {
            id,
            project_id: 1,
            idx,
            title: title.to_string(),
            content: content.map(str::to_string),
            initial_generated: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn renders_title_and_sections_in_order() {
        let sections = vec![
            section(1, 0, "Intro", Some("First words.")),
            section(2, 1, "Body", None),
        ];
        let data = ExportData {
            project: &project(),
            sections: &sections,
            comments: &[],
            revisions: &[],
        };

        let text = render(&data);
        assert!(text.starts_with("My Report\n========="));
        let intro_pos = text.find("Intro").unwrap();
        let body_pos = text.find("Body").unwrap();
        assert!(intro_pos < body_pos);
        assert!(text.contains("First words."));
        assert!(text.contains("(no content)"));
    }
}
