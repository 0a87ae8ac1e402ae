//! Persistence collaborators for the action layer.
//!
//! Each trait covers one table family. The Postgres implementations live next
//! to their trait; [`memory::MemoryStore`] implements all of them in process
//! for tests and local runs.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    Comment, NewComment, NewPost, Post, PostChanges, ProfileChanges, Relation, Session,
    ToggleWrite, User,
};

pub mod comments;
pub mod memory;
pub mod posts;
pub mod relations;
pub mod sessions;
pub mod users;

pub use comments::PgCommentRepository;
pub use memory::MemoryStore;
pub use posts::PgPostRepository;
pub use relations::PgRelationRepository;
pub use sessions::PgSessionStore;
pub use users::PgUserRepository;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation(db_err.message().to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, user_id: Uuid) -> StoreResult<Option<User>>;

    async fn user_exists(&self, user_id: Uuid) -> StoreResult<bool>;

    /// Apply the provided fields to the user's row. Returns false when no row matched.
    async fn update_profile(&self, user_id: Uuid, changes: &ProfileChanges) -> StoreResult<bool>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn get_post(&self, post_id: Uuid) -> StoreResult<Option<Post>>;

    async fn post_exists(&self, post_id: Uuid) -> StoreResult<bool>;

    async fn create_post(&self, post: &NewPost) -> StoreResult<Post>;

    /// Update a post only if `owner_id` owns it
    async fn update_owned_post(
        &self,
        post_id: Uuid,
        owner_id: Uuid,
        changes: &PostChanges,
    ) -> StoreResult<Option<Post>>;

    /// Delete a post only if `owner_id` owns it. Returns true if a row was removed.
    async fn delete_owned_post(&self, post_id: Uuid, owner_id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn get_comment(&self, comment_id: Uuid) -> StoreResult<Option<Comment>>;

    async fn create_comment(&self, comment: &NewComment) -> StoreResult<Comment>;

    /// Delete a comment only if `author_id` wrote it. Returns true if a row was removed.
    async fn delete_owned_comment(&self, comment_id: Uuid, author_id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait RelationRepository: Send + Sync {
    /// Flip presence of the (actor, target) row in one atomic operation
    async fn toggle(
        &self,
        relation: Relation,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> StoreResult<ToggleWrite>;

    async fn exists(&self, relation: Relation, actor_id: Uuid, target_id: Uuid)
        -> StoreResult<bool>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a live session by its token. Expired sessions resolve to `None`.
    async fn find_session(&self, session_token: &str) -> StoreResult<Option<Session>>;
}

/// Repository handles shared by the action layer
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub relations: Arc<dyn RelationRepository>,
}

impl Repositories {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            posts: Arc::new(PgPostRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            relations: Arc::new(PgRelationRepository::new(pool)),
        }
    }

    /// Use one store object for every table family
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + PostRepository + CommentRepository + RelationRepository + 'static,
    {
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            relations: store,
        }
    }
}
