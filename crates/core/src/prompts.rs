//! Deterministic prompt composition for the generation orchestrator.
//!
//! Every prompt sent to the LLM capability is built here from entity state,
//! so generation behaviour is reproducible and unit-testable without a
//! backend. The model's replies are treated as untrusted free text end to
//! end; [`parse_outline`] is the best-effort recovery layer that turns an
//! outline reply into exactly the requested number of section titles.

use crate::document::DocKind;

/// Sampling temperature used for outline generation. Lower than content
/// generation since outlines benefit from structural consistency.
pub const OUTLINE_TEMPERATURE: f64 = 0.5;
/// Output cap for outline generation.
pub const OUTLINE_MAX_TOKENS: i32 = 500;
/// Sampling temperature used for initial section content.
pub const SECTION_TEMPERATURE: f64 = 0.7;
/// Output cap for initial section content.
pub const SECTION_MAX_TOKENS: i32 = 1000;

/// Fallback title for outline slot `n` (1-based) when the model returned
/// fewer titles than requested.
pub fn default_section_title(n: usize) -> String {
    format!("Section {n}")
}

/// Build the outline-generation prompt.
///
/// `topic` should already have the fallback applied (topic prompt if set,
/// otherwise the project title). The trailing instruction pins the reply
/// format to one title per line so [`parse_outline`] can recover structure.
pub fn outline_prompt(
    kind: DocKind,
    topic: &str,
    num_sections: usize,
    outline_format: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Generate a detailed outline for a {} about \"{}\".\n\n\
         The outline should have {} main sections.",
        kind.prompt_label(),
        topic,
        num_sections
    );

    if let Some(format) = outline_format {
        prompt.push_str(&format!(
            "\nUse the following format for the outline: {format}"
        ));
    }

    prompt.push_str("\n\nReturn just the outline with each section title on a new line, with no extra commentary.");
    prompt
}

/// Parse an outline reply into exactly `num_sections` titles.
///
/// Splits on line breaks, trims each line, and drops empties. Short replies
/// are padded with synthetic `"Section N"` titles; long replies are truncated
/// to the requested count. This is deliberate best-effort recovery, not a
/// hard failure: the caller always gets exactly `num_sections` titles.
pub fn parse_outline(response: &str, num_sections: usize) -> Vec<String> {
    let mut titles: Vec<String> = response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if titles.len() < num_sections {
        for n in titles.len()..num_sections {
            titles.push(default_section_title(n + 1));
        }
    } else {
        titles.truncate(num_sections);
    }

    titles
}

/// Build the prompt for generating one section of the initial content pass.
pub fn initial_section_prompt(
    kind: DocKind,
    topic: &str,
    section_title: &str,
    section_number: usize,
    total_sections: usize,
) -> String {
    let mut prompt = format!(
        "Write a detailed section for a {}.\n\n\
         Document Topic: {topic}\n\
         Section Title: {section_title}\n\
         Section {section_number} of {total_sections}\n\n\
         Write comprehensive content for this section. Include relevant details, \
         examples, and explanations as appropriate for the topic.",
        kind.prompt_label()
    );

    if kind == DocKind::Presentation {
        prompt.push_str(
            "\n\nSince this is for a presentation, structure the content in a way that \
             would work well on slides. Use bullet points and keep paragraphs concise.",
        );
    }

    prompt
}

/// Build the prompt for regenerating a single section from a user instruction.
pub fn section_generation_prompt(
    kind: DocKind,
    document_title: &str,
    section_title: &str,
    current_content: Option<&str>,
    user_prompt: &str,
) -> String {
    let mut prompt = format!(
        "You are an AI assistant helping to write content for a document.\n\n\
         Document Title: {document_title}\n\
         Section Title: {section_title}\n\n\
         User's instructions: {user_prompt}\n\n\
         Current section content:\n{}\n\n\
         Please generate high-quality content for this section based on the above information.",
        current_content.unwrap_or("(empty)")
    );

    if kind == DocKind::Presentation {
        prompt.push_str(
            "\n\nNote: This is for a presentation slide. Please keep the content concise and \
             suitable for bullet points. Use clear, impactful language.",
        );
    }

    prompt
}

/// Build the prompt for refining a section's existing content.
pub fn section_refinement_prompt(
    kind: DocKind,
    document_title: &str,
    section_title: &str,
    current_content: Option<&str>,
    refine_instruction: &str,
    preserve_formatting: bool,
) -> String {
    let mut prompt = format!(
        "You are an AI editor helping to refine content for a document.\n\n\
         Document Title: {document_title}\n\
         Section Title: {section_title}\n\n\
         Current section content:\n{}\n\n\
         Refinement instructions: {refine_instruction}\n\n\
         Please refine the content based on these instructions.",
        current_content.unwrap_or("(empty)")
    );

    if preserve_formatting {
        prompt.push_str(
            "\nPlease preserve the existing formatting, markdown, and structure where possible.",
        );
    }

    if kind == DocKind::Presentation {
        prompt.push_str(
            "\n\nNote: This is for a presentation slide. Please keep the content concise and \
             suitable for bullet points. Use clear, impactful language.",
        );
    }

    prompt
}
