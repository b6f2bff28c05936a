//! Content generation: request types and the orchestrator that coordinates
//! prompt composition, the provider capability, and transactional persistence.

pub mod orchestrator;

use serde::Deserialize;
use validator::Validate;

pub use orchestrator::Orchestrator;

fn default_num_sections() -> i32 {
    5
}

fn default_include_outline() -> bool {
    true
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> i32 {
    1000
}

fn default_preserve_formatting() -> bool {
    true
}

/// Request body for `POST /projects/{id}/generate`.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateProjectRequest {
    /// Number of sections to generate.
    #[serde(default = "default_num_sections")]
    #[validate(range(min = 1, max = 20))]
    pub num_sections: i32,
    /// Whether to ask the backend for an outline first. When `false`, the
    /// sections get synthetic `"Section N"` titles.
    #[serde(default = "default_include_outline")]
    pub include_outline: bool,
    /// Optional outline notation hint (e.g. `"I. A. 1."`).
    #[validate(length(max = 50))]
    pub outline_format: Option<String>,
}

/// Request body for `POST .../sections/{id}/generate`.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateSectionRequest {
    /// Prompt for content generation. Stored verbatim on the revision.
    #[validate(length(min = 10, max = 1000))]
    pub prompt: String,
    /// Creativity level (0.0 to 1.0).
    #[serde(default = "default_temperature")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub temperature: f64,
    /// Maximum number of tokens to generate.
    #[serde(default = "default_max_tokens")]
    #[validate(range(min = 100, max = 4000))]
    pub max_tokens: i32,
}

/// Request body for `POST .../sections/{id}/refine`.
#[derive(Debug, Deserialize, Validate)]
pub struct RefineSectionRequest {
    /// Instructions for refining the content. Stored verbatim on the revision.
    #[validate(length(min = 10, max = 1000))]
    pub refine_instruction: String,
    /// Whether to ask the backend to preserve existing formatting.
    #[serde(default = "default_preserve_formatting")]
    pub preserve_formatting: bool,
    #[serde(default = "default_temperature")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    #[validate(range(min = 100, max = 4000))]
    pub max_tokens: i32,
}
