//! The generation orchestrator.
//!
//! Every operation follows the same skeleton: load and authorize the owning
//! entities (an ownership failure is a `NotFound`, never a `Forbidden`, so
//! foreign resources stay unobservable), fail fast when no provider is
//! configured, compose the prompt deterministically, invoke the capability,
//! then persist content and revision history in one transaction. A provider
//! failure happens before any database write, so a failed generation leaves
//! content and the revision log untouched.
//!
//! Concurrent generation calls against the same section are not coordinated:
//! both revisions land in the audit log and the last commit wins on content.

use std::sync::Arc;

use authorly_core::document::DocKind;
use authorly_core::error::CoreError;
use authorly_core::prompts;
use authorly_core::types::DbId;
use authorly_db::models::project::Project;
use authorly_db::models::revision::CreateRevision;
use authorly_db::models::section::{CreateSection, Section};
use authorly_db::repositories::{ProjectRepo, RevisionRepo, SectionRepo};
use authorly_db::DbPool;
use authorly_llm::{GenerationParams, LlmProvider};

use crate::error::{AppError, AppResult};
use crate::generation::{GenerateProjectRequest, GenerateSectionRequest, RefineSectionRequest};

/// Coordinates prompt composition, the provider capability, and persistence.
///
/// Owned by the request-handling layer; holds the process-wide provider
/// handle selected at startup.
#[derive(Clone)]
pub struct Orchestrator {
    pool: DbPool,
    provider: Option<Arc<dyn LlmProvider>>,
}

impl Orchestrator {
    pub fn new(pool: DbPool, provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { pool, provider }
    }

    /// The configured provider, or a 503 if generation is unavailable.
    fn provider(&self) -> AppResult<&Arc<dyn LlmProvider>> {
        self.provider.as_ref().ok_or(AppError::LlmUnavailable)
    }

    /// Generate the initial sections for a project: an optional outline call
    /// to pick titles, one content call per section, then a single
    /// transaction inserting every section and bumping the project.
    pub async fn generate_initial_content(
        &self,
        project_id: DbId,
        user_id: DbId,
        request: &GenerateProjectRequest,
    ) -> AppResult<Vec<Section>> {
        let project = self.load_project(project_id, user_id).await?;
        let provider = self.provider()?;
        let kind = project_kind(&project)?;
        let topic = project
            .topic_prompt
            .as_deref()
            .unwrap_or(&project.title)
            .to_string();

        let num_sections = request.num_sections as usize;

        // Pick section titles: ask the backend for an outline, or fall back
        // to synthetic titles.
        let titles = if request.include_outline {
            let prompt = prompts::outline_prompt(
                kind,
                &topic,
                num_sections,
                request.outline_format.as_deref(),
            );
            let params = GenerationParams::new(
                prompts::OUTLINE_MAX_TOKENS,
                prompts::OUTLINE_TEMPERATURE,
            );
            let response = provider
                .generate_text(&prompt, &params)
                .await
                .map_err(generation_failed)?;
            prompts::parse_outline(&response, num_sections)
        } else {
            (1..=num_sections)
                .map(prompts::default_section_title)
                .collect()
        };

        // Generate content for every section before touching the database,
        // so a backend failure midway leaves no partial project state.
        let params =
            GenerationParams::new(prompts::SECTION_MAX_TOKENS, prompts::SECTION_TEMPERATURE);
        let mut contents = Vec::with_capacity(titles.len());
        for (i, title) in titles.iter().enumerate() {
            let prompt =
                prompts::initial_section_prompt(kind, &topic, title, i + 1, num_sections);
            let content = provider
                .generate_text(&prompt, &params)
                .await
                .map_err(generation_failed)?;
            contents.push(content);
        }

        let mut tx = self.pool.begin().await?;
        let mut sections = Vec::with_capacity(titles.len());
        for (i, (title, content)) in titles.into_iter().zip(contents).enumerate() {
            let section = SectionRepo::create(
                &mut *tx,
                &CreateSection {
                    project_id,
                    idx: i as i32,
                    title,
                    content: Some(content),
                    initial_generated: true,
                },
            )
            .await?;
            sections.push(section);
        }
        ProjectRepo::touch(&mut *tx, project_id).await?;
        tx.commit().await?;

        tracing::info!(
            project_id,
            sections = sections.len(),
            provider = self.provider.as_ref().map(|p| p.name()).unwrap_or("none"),
            "Generated initial project content"
        );

        Ok(sections)
    }

    /// Generate content for one section from a user prompt.
    pub async fn generate_section_content(
        &self,
        project_id: DbId,
        section_id: DbId,
        user_id: DbId,
        request: &GenerateSectionRequest,
    ) -> AppResult<Section> {
        let (project, section) = self.load_section(project_id, section_id, user_id).await?;
        let provider = self.provider()?;
        let kind = project_kind(&project)?;

        let prompt = prompts::section_generation_prompt(
            kind,
            &project.title,
            &section.title,
            section.content.as_deref(),
            &request.prompt,
        );

        let params = GenerationParams::new(request.max_tokens, request.temperature);
        let content = provider
            .generate_text(&prompt, &params)
            .await
            .map_err(generation_failed)?;

        // The revision records the caller's raw prompt, not the composed one.
        self.commit_generated_content(&section, user_id, &request.prompt, &content)
            .await
    }

    /// Refine a section's existing content from a refinement instruction.
    pub async fn refine_section_content(
        &self,
        project_id: DbId,
        section_id: DbId,
        user_id: DbId,
        request: &RefineSectionRequest,
    ) -> AppResult<Section> {
        let (project, section) = self.load_section(project_id, section_id, user_id).await?;
        let provider = self.provider()?;
        let kind = project_kind(&project)?;

        let prompt = prompts::section_refinement_prompt(
            kind,
            &project.title,
            &section.title,
            section.content.as_deref(),
            &request.refine_instruction,
            request.preserve_formatting,
        );

        let params = GenerationParams::new(request.max_tokens, request.temperature);
        let content = provider
            .generate_text(&prompt, &params)
            .await
            .map_err(generation_failed)?;

        self.commit_generated_content(&section, user_id, &request.refine_instruction, &content)
            .await
    }

    // -----------------------------------------------------------------------
    // Shared steps
    // -----------------------------------------------------------------------

    async fn load_project(&self, project_id: DbId, user_id: DbId) -> AppResult<Project> {
        ProjectRepo::find_for_user(&self.pool, project_id, user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }))
    }

    async fn load_section(
        &self,
        project_id: DbId,
        section_id: DbId,
        user_id: DbId,
    ) -> AppResult<(Project, Section)> {
        let project = self.load_project(project_id, user_id).await?;
        let section = SectionRepo::find_for_user(&self.pool, section_id, project_id, user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Section",
                id: section_id,
            }))?;
        Ok((project, section))
    }

    /// Persist a successful generation: content write, one revision append,
    /// and the project `updated_at` bump, all in one transaction.
    async fn commit_generated_content(
        &self,
        section: &Section,
        user_id: DbId,
        revision_prompt: &str,
        content: &str,
    ) -> AppResult<Section> {
        let mut tx = self.pool.begin().await?;
        SectionRepo::set_content(&mut *tx, section.id, content).await?;
        RevisionRepo::create(
            &mut *tx,
            &CreateRevision {
                section_id: section.id,
                user_id,
                prompt: revision_prompt.to_string(),
                generated_content: content.to_string(),
            },
        )
        .await?;
        ProjectRepo::touch(&mut *tx, section.project_id).await?;
        tx.commit().await?;

        // Re-read outside the transaction so the caller sees the committed row.
        SectionRepo::find_for_user(&self.pool, section.id, section.project_id, user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Section",
                id: section.id,
            }))
    }
}

/// Parse the stored document kind; an unparseable value means corrupt data.
fn project_kind(project: &Project) -> AppResult<DocKind> {
    DocKind::parse(&project.doc_kind).map_err(|_| {
        AppError::InternalError(format!(
            "Project {} has unknown doc_kind {:?}",
            project.id, project.doc_kind
        ))
    })
}

/// Log the raw provider error server-side and surface the generic failure.
fn generation_failed(err: authorly_llm::LlmError) -> AppError {
    tracing::warn!(error = %err, "LLM generation call failed");
    AppError::GenerationFailed
}
