//! Integration tests for the generation orchestrator: outline recovery,
//! transactional persistence of content + revisions, and failure behaviour.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, MockProvider};
use sqlx::PgPool;

use authorly_api::generation::{GenerateSectionRequest, Orchestrator};
use authorly_llm::{ChatMessage, GenerationParams, LlmError, LlmProvider};

async fn create_project(app: axum::Router, token: &str, kind: &str) -> i64 {
    let body = serde_json::json!({
        "title": "Field Guide",
        "doc_kind": kind,
        "topic_prompt": "Alpine wildflowers",
    });
    let response = post_json_auth(app, "/api/v1/projects", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn create_section(app: axum::Router, token: &str, project_id: i64) -> i64 {
    let body = serde_json::json!({ "title": "Habitats", "idx": 0 });
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{project_id}/sections"),
        body,
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_generation_without_provider_is_service_unavailable(pool: PgPool) {
    let app = common::build_test_app(pool, None);
    let (token, _) = common::register_user(app.clone(), "noprovider@test.com").await;
    let project_id = create_project(app.clone(), &token, "document").await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/generate"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "LLM_UNAVAILABLE");
}

// ---------------------------------------------------------------------------
// Initial content generation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_initial_generation_pads_short_outline(pool: PgPool) {
    // First reply is the outline (3 titles for 5 requested sections); the
    // rest become section bodies.
    let provider = MockProvider::with_replies(&[
        "Meadows\nScree slopes\nStream banks",
        "body 1",
        "body 2",
        "body 3",
        "body 4",
        "body 5",
    ]);
    let app = common::build_test_app(pool, Some(provider));
    let (token, _) = common::register_user(app.clone(), "outline@test.com").await;
    let project_id = create_project(app.clone(), &token, "document").await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/generate"),
        serde_json::json!({ "num_sections": 5 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let sections = body_json(response).await;
    let sections = sections.as_array().unwrap();
    assert_eq!(sections.len(), 5);

    let titles: Vec<&str> = sections
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Meadows",
            "Scree slopes",
            "Stream banks",
            "Section 4",
            "Section 5"
        ]
    );

    for (i, section) in sections.iter().enumerate() {
        assert_eq!(section["idx"].as_i64(), Some(i as i64));
        assert_eq!(section["initial_generated"], true);
        assert_eq!(section["content"], format!("body {}", i + 1));
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_initial_generation_without_outline_uses_synthetic_titles(pool: PgPool) {
    let app = common::build_test_app(pool, Some(MockProvider::succeeding()));
    let (token, _) = common::register_user(app.clone(), "synthetic@test.com").await;
    let project_id = create_project(app.clone(), &token, "document").await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{project_id}/generate"),
        serde_json::json!({ "num_sections": 2, "include_outline": false }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let sections = body_json(response).await;
    let titles: Vec<&str> = sections
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Section 1", "Section 2"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_initial_generation_failure_creates_nothing(pool: PgPool) {
    let app = common::build_test_app(pool.clone(), Some(MockProvider::failing()));
    let (token, _) = common::register_user(app.clone(), "nothing@test.com").await;
    let project_id = create_project(app.clone(), &token, "document").await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/generate"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "GENERATION_FAILED");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sections WHERE project_id = $1")
        .bind(project_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "a failed generation must create no sections");
}

// ---------------------------------------------------------------------------
// Section generation and refinement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_section_generation_writes_content_revision_and_timestamps(pool: PgPool) {
    let app = common::build_test_app(pool.clone(), Some(MockProvider::with_replies(&["Alpine flora thrives."])));
    let (token, _) = common::register_user(app.clone(), "generate@test.com").await;
    let project_id = create_project(app.clone(), &token, "document").await;
    let section_id = create_section(app.clone(), &token, project_id).await;

    let before: chrono::DateTime<chrono::Utc> =
        sqlx::query_scalar("SELECT updated_at FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_one(&pool)
            .await
            .unwrap();

    let user_prompt = "Describe the habitats in vivid detail.";
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/sections/{section_id}/generate"),
        serde_json::json!({ "prompt": user_prompt }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let section = body_json(response).await;
    assert_eq!(section["content"], "Alpine flora thrives.");

    // Exactly one revision, recording the raw caller prompt and the
    // backend's response.
    let response = get_auth(
        app,
        &format!("/api/v1/projects/{project_id}/sections/{section_id}/revisions"),
        &token,
    )
    .await;
    let revisions = body_json(response).await;
    let revisions = revisions.as_array().unwrap();
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0]["prompt"], user_prompt);
    assert_eq!(revisions[0]["generated_content"], "Alpine flora thrives.");

    let after: chrono::DateTime<chrono::Utc> =
        sqlx::query_scalar("SELECT updated_at FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(after > before, "project updated_at must be bumped");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_failed_generation_leaves_section_untouched(pool: PgPool) {
    let app = common::build_test_app(pool.clone(), Some(MockProvider::failing()));
    let (token, _) = common::register_user(app.clone(), "untouched@test.com").await;
    let project_id = create_project(app.clone(), &token, "document").await;
    let section_id = create_section(app.clone(), &token, project_id).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/sections/{section_id}/generate"),
        serde_json::json!({ "prompt": "This call is going to fail." }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "GENERATION_FAILED");
    // No backend detail leaks into the response.
    assert!(!json["error"].as_str().unwrap().contains("mock"));

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/sections/{section_id}"),
        &token,
    )
    .await;
    let section = body_json(response).await;
    assert_eq!(section["content"], serde_json::Value::Null);
    assert_eq!(section["revision_count"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_refinement_records_instruction_as_revision_prompt(pool: PgPool) {
    let app = common::build_test_app(
        pool,
        Some(MockProvider::with_replies(&["first draft", "tightened draft"])),
    );
    let (token, _) = common::register_user(app.clone(), "refine@test.com").await;
    let project_id = create_project(app.clone(), &token, "presentation").await;
    let section_id = create_section(app.clone(), &token, project_id).await;

    // Generate, then refine.
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/sections/{section_id}/generate"),
        serde_json::json!({ "prompt": "Write the habitats slide." }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let instruction = "Cut this down to three bullet points.";
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/sections/{section_id}/refine"),
        serde_json::json!({ "refine_instruction": instruction }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let section = body_json(response).await;
    assert_eq!(section["content"], "tightened draft");

    // Both revisions are in the log, newest first, with the raw inputs.
    let response = get_auth(
        app,
        &format!("/api/v1/projects/{project_id}/sections/{section_id}/revisions"),
        &token,
    )
    .await;
    let revisions = body_json(response).await;
    let revisions = revisions.as_array().unwrap();
    assert_eq!(revisions.len(), 2);
    assert_eq!(revisions[0]["prompt"], instruction);
    assert_eq!(revisions[0]["generated_content"], "tightened draft");
    assert_eq!(revisions[1]["generated_content"], "first draft");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_section_fetch_is_idempotent(pool: PgPool) {
    let app = common::build_test_app(pool, Some(MockProvider::succeeding()));
    let (token, _) = common::register_user(app.clone(), "idempotent@test.com").await;
    let project_id = create_project(app.clone(), &token, "document").await;
    let section_id = create_section(app.clone(), &token, project_id).await;

    post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/sections/{section_id}/generate"),
        serde_json::json!({ "prompt": "Write the habitats section." }),
        &token,
    )
    .await;

    let url = format!("/api/v1/projects/{project_id}/sections/{section_id}");
    let first = body_json(get_auth(app.clone(), &url, &token).await).await;
    let second = body_json(get_auth(app, &url, &token).await).await;
    assert_eq!(first, second, "reads without intervening writes must match");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_foreign_section_generation_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool, Some(MockProvider::succeeding()));
    let (owner_token, _) = common::register_user(app.clone(), "owner@test.com").await;
    let (stranger_token, _) = common::register_user(app.clone(), "stranger@test.com").await;
    let project_id = create_project(app.clone(), &owner_token, "document").await;
    let section_id = create_section(app.clone(), &owner_token, project_id).await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{project_id}/sections/{section_id}/generate"),
        serde_json::json!({ "prompt": "Try to write into someone else's doc." }),
        &stranger_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Mid-transaction failure
// ---------------------------------------------------------------------------

/// A provider that deletes the target section out from under the orchestrator
/// before returning, forcing the revision insert to fail mid-transaction.
#[derive(Debug)]
struct SabotageProvider {
    pool: PgPool,
    section_id: i64,
}

#[async_trait]
impl LlmProvider for SabotageProvider {
    fn name(&self) -> &'static str {
        "sabotage"
    }

    async fn generate_text(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, LlmError> {
        sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(self.section_id)
            .execute(&self.pool)
            .await
            .expect("sabotage delete should succeed");
        Ok("doomed content".to_string())
    }

    async fn generate_chat(
        &self,
        _messages: &[ChatMessage],
        _params: &GenerationParams,
    ) -> Result<String, LlmError> {
        unreachable!("chat is not used by the orchestrator")
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_mid_transaction_failure_rolls_back_everything(pool: PgPool) {
    let app = common::build_test_app(pool.clone(), None);
    let (token, user_id) = common::register_user(app.clone(), "rollback@test.com").await;
    let project_id = create_project(app.clone(), &token, "document").await;
    let section_id = create_section(app.clone(), &token, project_id).await;

    let provider: std::sync::Arc<dyn LlmProvider> = Arc::new(SabotageProvider {
        pool: pool.clone(),
        section_id,
    });
    let orchestrator = Orchestrator::new(pool.clone(), Some(provider));

    let request = GenerateSectionRequest {
        prompt: "Trigger the mid-transaction failure.".to_string(),
        temperature: 0.7,
        max_tokens: 1000,
    };
    let result = orchestrator
        .generate_section_content(project_id, section_id, user_id, &request)
        .await;
    assert!(result.is_err(), "the orphaned transaction must fail");

    // No revision survived the rollback.
    let revision_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM revisions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(revision_count, 0, "rollback must discard the revision");
}
