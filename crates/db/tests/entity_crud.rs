//! Integration tests for the repository layer against a real database:
//! hierarchy creation, ownership scoping, cascade deletes, filters, and the
//! feedback upsert.

use sqlx::PgPool;

use authorly_db::models::comment::CreateComment;
use authorly_db::models::feedback::UpsertFeedback;
use authorly_db::models::project::{CreateProject, UpdateProject};
use authorly_db::models::revision::CreateRevision;
use authorly_db::models::section::{CreateSection, UpdateSection};
use authorly_db::models::user::CreateUser;
use authorly_db::repositories::{
    CommentRepo, FeedbackRepo, ProjectRepo, RevisionRepo, SectionRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, email: &str) -> authorly_db::models::user::User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "$argon2id$fake-hash".to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}

async fn create_project(
    pool: &PgPool,
    user_id: i64,
    title: &str,
    kind: &str,
) -> authorly_db::models::project::Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            user_id,
            title: title.to_string(),
            doc_kind: kind.to_string(),
            topic_prompt: None,
        },
    )
    .await
    .expect("project creation should succeed")
}

async fn create_section(
    pool: &PgPool,
    project_id: i64,
    idx: i32,
    title: &str,
) -> authorly_db::models::section::Section {
    SectionRepo::create(
        pool,
        &CreateSection {
            project_id,
            idx,
            title: title.to_string(),
            content: None,
            initial_generated: false,
        },
    )
    .await
    .expect("section creation should succeed")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn create_full_hierarchy(pool: PgPool) {
    let user = create_user(&pool, "owner@test.com").await;
    let project = create_project(&pool, user.id, "My Doc", "document").await;
    let section = create_section(&pool, project.id, 0, "Intro").await;

    let revision = RevisionRepo::create(
        &pool,
        &CreateRevision {
            section_id: section.id,
            user_id: user.id,
            prompt: "write an intro".to_string(),
            generated_content: "Hello world".to_string(),
        },
    )
    .await
    .expect("revision creation should succeed");
    assert_eq!(revision.prompt, "write an intro");

    let comment = CommentRepo::create(
        &pool,
        &CreateComment {
            section_id: section.id,
            user_id: user.id,
            body: "looks good".to_string(),
        },
    )
    .await
    .expect("comment creation should succeed");
    assert_eq!(comment.section_id, section.id);

    let feedback = FeedbackRepo::upsert(
        &pool,
        &UpsertFeedback {
            section_id: section.id,
            user_id: user.id,
            liked: true,
        },
    )
    .await
    .expect("feedback upsert should succeed");
    assert!(feedback.liked);
}

#[sqlx::test]
async fn duplicate_email_violates_unique_constraint(pool: PgPool) {
    create_user(&pool, "dup@test.com").await;
    let result = UserRepo::create(
        &pool,
        &CreateUser {
            email: "dup@test.com".to_string(),
            password_hash: "hash".to_string(),
        },
    )
    .await;
    assert!(result.is_err(), "duplicate email must be rejected");
}

#[sqlx::test]
async fn project_lookup_is_scoped_to_owner(pool: PgPool) {
    let owner = create_user(&pool, "a@test.com").await;
    let stranger = create_user(&pool, "b@test.com").await;
    let project = create_project(&pool, owner.id, "Private", "document").await;

    let found = ProjectRepo::find_for_user(&pool, project.id, owner.id)
        .await
        .unwrap();
    assert!(found.is_some());

    let foreign = ProjectRepo::find_for_user(&pool, project.id, stranger.id)
        .await
        .unwrap();
    assert!(foreign.is_none(), "foreign project must look nonexistent");
}

#[sqlx::test]
async fn section_lookup_joins_project_ownership(pool: PgPool) {
    let owner = create_user(&pool, "a@test.com").await;
    let stranger = create_user(&pool, "b@test.com").await;
    let project = create_project(&pool, owner.id, "Doc", "document").await;
    let section = create_section(&pool, project.id, 0, "Intro").await;

    let found = SectionRepo::find_for_user(&pool, section.id, project.id, owner.id)
        .await
        .unwrap();
    assert!(found.is_some());

    let foreign = SectionRepo::find_for_user(&pool, section.id, project.id, stranger.id)
        .await
        .unwrap();
    assert!(foreign.is_none());
}

#[sqlx::test]
async fn deleting_project_cascades_to_children(pool: PgPool) {
    let user = create_user(&pool, "owner@test.com").await;
    let project = create_project(&pool, user.id, "Doomed", "document").await;
    let section = create_section(&pool, project.id, 0, "Body").await;
    RevisionRepo::create(
        &pool,
        &CreateRevision {
            section_id: section.id,
            user_id: user.id,
            prompt: "p".to_string(),
            generated_content: "c".to_string(),
        },
    )
    .await
    .unwrap();

    let deleted = ProjectRepo::delete(&pool, project.id, user.id).await.unwrap();
    assert!(deleted);

    let orphan = SectionRepo::find_for_user(&pool, section.id, project.id, user.id)
        .await
        .unwrap();
    assert!(orphan.is_none(), "sections must cascade");

    let revisions = RevisionRepo::list_for_section(&pool, section.id).await.unwrap();
    assert!(revisions.is_empty(), "revisions must cascade");
}

#[sqlx::test]
async fn update_project_applies_only_set_fields(pool: PgPool) {
    let user = create_user(&pool, "owner@test.com").await;
    let project = create_project(&pool, user.id, "Original", "presentation").await;

    let updated = ProjectRepo::update(
        &pool,
        project.id,
        user.id,
        &UpdateProject {
            title: Some("Renamed".to_string()),
            topic_prompt: None,
        },
    )
    .await
    .unwrap()
    .expect("project should exist");

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.doc_kind, "presentation", "kind must be immutable");
    assert_eq!(updated.topic_prompt, project.topic_prompt);
}

#[sqlx::test]
async fn list_projects_filters_by_search_and_kind(pool: PgPool) {
    let user = create_user(&pool, "owner@test.com").await;
    create_project(&pool, user.id, "Quarterly Report", "document").await;
    create_project(&pool, user.id, "Quarterly Review Deck", "presentation").await;
    create_project(&pool, user.id, "Notes", "document").await;

    let quarterly = ProjectRepo::list_for_user(&pool, user.id, Some("quarterly"), None, 10, 0)
        .await
        .unwrap();
    assert_eq!(quarterly.len(), 2);

    let decks = ProjectRepo::list_for_user(&pool, user.id, None, Some("presentation"), 10, 0)
        .await
        .unwrap();
    assert_eq!(decks.len(), 1);
    assert_eq!(decks[0].title, "Quarterly Review Deck");

    let total = ProjectRepo::count_for_user(&pool, user.id, None, None)
        .await
        .unwrap();
    assert_eq!(total, 3);
}

#[sqlx::test]
async fn sections_list_in_position_order(pool: PgPool) {
    let user = create_user(&pool, "owner@test.com").await;
    let project = create_project(&pool, user.id, "Doc", "document").await;
    // Insert out of order with a gap; the listing must sort by idx.
    create_section(&pool, project.id, 20, "Third").await;
    create_section(&pool, project.id, 0, "First").await;
    create_section(&pool, project.id, 5, "Second").await;

    let sections = SectionRepo::list_ordered(&pool, project.id).await.unwrap();
    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[sqlx::test]
async fn section_search_matches_title_or_content(pool: PgPool) {
    let user = create_user(&pool, "owner@test.com").await;
    let project = create_project(&pool, user.id, "Doc", "document").await;
    let section = create_section(&pool, project.id, 0, "Introduction").await;
    SectionRepo::update(
        &pool,
        section.id,
        &UpdateSection {
            content: Some("All about ferrets".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    create_section(&pool, project.id, 1, "Conclusion").await;

    let by_title = SectionRepo::list_for_project(&pool, project.id, Some("intro"), false, 10, 0)
        .await
        .unwrap();
    assert_eq!(by_title.len(), 1);

    let by_content = SectionRepo::list_for_project(&pool, project.id, Some("ferrets"), false, 10, 0)
        .await
        .unwrap();
    assert_eq!(by_content.len(), 1);
    assert_eq!(by_content[0].title, "Introduction");
}

#[sqlx::test]
async fn revisions_list_newest_first(pool: PgPool) {
    let user = create_user(&pool, "owner@test.com").await;
    let project = create_project(&pool, user.id, "Doc", "document").await;
    let section = create_section(&pool, project.id, 0, "Intro").await;

    for n in 1..=3 {
        RevisionRepo::create(
            &pool,
            &CreateRevision {
                section_id: section.id,
                user_id: user.id,
                prompt: format!("prompt {n}"),
                generated_content: format!("content {n}"),
            },
        )
        .await
        .unwrap();
    }

    let revisions = RevisionRepo::list_for_section(&pool, section.id).await.unwrap();
    assert_eq!(revisions.len(), 3);
    assert_eq!(revisions[0].prompt, "prompt 3");
    assert_eq!(revisions[2].prompt, "prompt 1");

    let count = RevisionRepo::count_for_section(&pool, section.id).await.unwrap();
    assert_eq!(count, 3);
}

#[sqlx::test]
async fn feedback_upsert_replaces_existing_record(pool: PgPool) {
    let user = create_user(&pool, "owner@test.com").await;
    let project = create_project(&pool, user.id, "Doc", "document").await;
    let section = create_section(&pool, project.id, 0, "Intro").await;

    let first = FeedbackRepo::upsert(
        &pool,
        &UpsertFeedback {
            section_id: section.id,
            user_id: user.id,
            liked: true,
        },
    )
    .await
    .unwrap();
    assert!(first.liked);

    let second = FeedbackRepo::upsert(
        &pool,
        &UpsertFeedback {
            section_id: section.id,
            user_id: user.id,
            liked: false,
        },
    )
    .await
    .unwrap();
    assert!(!second.liked);
    assert_eq!(second.id, first.id, "upsert must not create a second row");

    let stored = FeedbackRepo::find_for_section(&pool, section.id)
        .await
        .unwrap()
        .expect("feedback should exist");
    assert!(!stored.liked);
}
