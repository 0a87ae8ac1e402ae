mod common;

use action_service::repository::{CommentRepository, PostRepository};
use action_service::services::messages::*;
use action_service::services::ActionOutcome;
use action_service::validation::{
    CreateCommentForm, CreatePostForm, DeleteCommentForm, DeletePostForm, UpdatePostForm, REQUIRED,
};
use action_service::ActionError;
use common::Harness;
use uuid::Uuid;

fn create_form(caption: &str) -> CreatePostForm {
    CreatePostForm {
        file_url: Some("https://files.example.com/beach.jpg".to_string()),
        caption: Some(caption.to_string()),
        location: Some("Lisbon".to_string()),
    }
}

#[tokio::test]
async fn create_post_redirects_to_dashboard() {
    let h = Harness::new();
    let (_, session) = h.signed_in("alice").await;

    let outcome = h
        .service
        .create_post(Some(&session), create_form("Golden hour"))
        .await
        .unwrap();

    assert_eq!(outcome, ActionOutcome::Redirect(DASHBOARD_PATH.to_string()));
    assert_eq!(h.store.write_count(), 1);
    assert_eq!(h.invalidator.paths(), vec![DASHBOARD_PATH]);
}

#[tokio::test]
async fn create_post_without_caption_writes_nothing() {
    let h = Harness::new();
    let (_, session) = h.signed_in("alice").await;

    let form = CreatePostForm {
        caption: None,
        ..create_form("")
    };
    let err = h
        .service
        .create_post(Some(&session), form)
        .await
        .unwrap_err();

    match err {
        ActionError::Validation { errors, message } => {
            assert_eq!(message, CREATE_POST_INVALID);
            assert_eq!(errors["caption"], vec![REQUIRED.to_string()]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(h.store.write_count(), 0);
    assert!(h.invalidator.paths().is_empty());
}

#[tokio::test]
async fn create_post_rejects_bad_url() {
    let h = Harness::new();
    let (_, session) = h.signed_in("alice").await;

    let form = CreatePostForm {
        file_url: Some("not a url".to_string()),
        ..create_form("caption")
    };
    let err = h
        .service
        .create_post(Some(&session), form)
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::Validation { ref errors, .. } if errors.contains_key("fileUrl")));
    assert_eq!(h.store.write_count(), 0);
}

#[tokio::test]
async fn anonymous_create_is_unauthenticated() {
    let h = Harness::new();

    let err = h
        .service
        .create_post(None, create_form("hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::Unauthenticated));
    assert_eq!(h.store.write_count(), 0);
}

#[tokio::test]
async fn owner_can_update_post() {
    let h = Harness::new();
    let (alice, session) = h.signed_in("alice").await;
    let post = h.store.seed_post(alice.id, "draft").await;

    let outcome = h
        .service
        .update_post(
            Some(&session),
            UpdatePostForm {
                id: Some(post.id.to_string()),
                file_url: Some("https://files.example.com/final.jpg".to_string()),
                caption: Some("final".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome, ActionOutcome::Redirect(DASHBOARD_PATH.to_string()));
    let stored = h.store.get_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored.caption.as_deref(), Some("final"));
    assert_eq!(stored.file_url, "https://files.example.com/final.jpg");
}

#[tokio::test]
async fn update_of_foreign_post_is_not_found_and_leaves_it_unchanged() {
    let h = Harness::new();
    let alice = h.store.seed_user("alice").await;
    let (_, mallory) = h.signed_in("mallory").await;
    let post = h.store.seed_post(alice.id, "mine").await;

    let err = h
        .service
        .update_post(
            Some(&mallory),
            UpdatePostForm {
                id: Some(post.id.to_string()),
                file_url: Some("https://evil.example.com/x.png".to_string()),
                caption: Some("pwned".to_string()),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::NotFound(ref m) if m == POST_NOT_FOUND));
    let stored = h.store.get_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored, post);
    assert!(h.invalidator.paths().is_empty());
}

#[tokio::test]
async fn delete_post_removes_its_comments() {
    let h = Harness::new();
    let (alice, session) = h.signed_in("alice").await;
    let bob = h.store.seed_user("bob").await;
    let post = h.store.seed_post(alice.id, "bye").await;
    h.store.seed_comment(post.id, bob.id, "nice").await;

    let outcome = h
        .service
        .delete_post(Some(&session), DeletePostForm::new(post.id.to_string()))
        .await
        .unwrap();

    assert_eq!(outcome.message(), Some(POST_DELETED));
    assert!(!h.store.post_exists(post.id).await.unwrap());
    assert_eq!(h.store.comment_count(post.id).await, 0);
}

#[tokio::test]
async fn delete_of_foreign_or_missing_post_is_not_found() {
    let h = Harness::new();
    let alice = h.store.seed_user("alice").await;
    let (_, mallory) = h.signed_in("mallory").await;
    let post = h.store.seed_post(alice.id, "keep").await;

    for target in [post.id, Uuid::new_v4()] {
        let err = h
            .service
            .delete_post(Some(&mallory), DeletePostForm::new(target.to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::NotFound(ref m) if m == POST_NOT_FOUND));
    }
    assert!(h.store.post_exists(post.id).await.unwrap());
}

#[tokio::test]
async fn delete_post_store_failure_is_persistence_error() {
    let h = Harness::new();
    let (alice, session) = h.signed_in("alice").await;
    let post = h.store.seed_post(alice.id, "stuck").await;
    h.store.set_fail_writes(true);

    let err = h
        .service
        .delete_post(Some(&session), DeletePostForm::new(post.id.to_string()))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), DELETE_POST_FAILED);
    assert!(h.store.post_exists(post.id).await.unwrap());
}

#[tokio::test]
async fn comment_on_any_post_and_delete_own() {
    let h = Harness::new();
    let alice = h.store.seed_user("alice").await;
    let (bob, session) = h.signed_in("bob").await;
    let post = h.store.seed_post(alice.id, "view").await;

    let outcome = h
        .service
        .create_comment(
            Some(&session),
            CreateCommentForm {
                post_id: Some(post.id.to_string()),
                body: Some("Stunning".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.message(), Some(COMMENT_CREATED));
    assert_eq!(h.store.comment_count(post.id).await, 1);

    let comment = h.store.seed_comment(post.id, bob.id, "again").await;
    let outcome = h
        .service
        .delete_comment(Some(&session), DeleteCommentForm::new(comment.id.to_string()))
        .await
        .unwrap();
    assert_eq!(outcome.message(), Some(COMMENT_DELETED));
    assert!(h.store.get_comment(comment.id).await.unwrap().is_none());
}

#[tokio::test]
async fn comment_on_missing_post_is_not_found() {
    let h = Harness::new();
    let (_, session) = h.signed_in("bob").await;

    let err = h
        .service
        .create_comment(
            Some(&session),
            CreateCommentForm {
                post_id: Some(Uuid::new_v4().to_string()),
                body: Some("hello?".to_string()),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::NotFound(ref m) if m == POST_NOT_FOUND));
    assert_eq!(h.store.write_count(), 0);
}

#[tokio::test]
async fn empty_comment_is_rejected() {
    let h = Harness::new();
    let alice = h.store.seed_user("alice").await;
    let (_, session) = h.signed_in("bob").await;
    let post = h.store.seed_post(alice.id, "quiet").await;

    let err = h
        .service
        .create_comment(
            Some(&session),
            CreateCommentForm {
                post_id: Some(post.id.to_string()),
                body: Some(String::new()),
            },
        )
        .await
        .unwrap_err();

    match err {
        ActionError::Validation { errors, message } => {
            assert_eq!(message, CREATE_COMMENT_INVALID);
            assert!(errors.contains_key("body"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(h.store.comment_count(post.id).await, 0);
}

#[tokio::test]
async fn deleting_someone_elses_comment_is_not_found() {
    let h = Harness::new();
    let alice = h.store.seed_user("alice").await;
    let (_, mallory) = h.signed_in("mallory").await;
    let post = h.store.seed_post(alice.id, "thread").await;
    let comment = h.store.seed_comment(post.id, alice.id, "mine").await;

    let err = h
        .service
        .delete_comment(Some(&mallory), DeleteCommentForm::new(comment.id.to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::NotFound(ref m) if m == COMMENT_NOT_FOUND));
    assert!(h.store.get_comment(comment.id).await.unwrap().is_some());
}
