use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - profile fields editable through the profile action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub website: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post entity - an uploaded image with caption, owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub caption: Option<String>,
    pub location: Option<String>,
    pub file_url: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment entity - a comment on a post, authored by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub body: String,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Presence-only relations keyed by (actor, target).
///
/// Likes and saved posts are keyed by (user_id, post_id); follows by
/// (follower_id, following_id) where the follower is the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Like,
    Bookmark,
    Follow,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Like => "like",
            Relation::Bookmark => "bookmark",
            Relation::Follow => "follow",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the persistence layer did for a single toggle statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleWrite {
    /// Row was absent and has been inserted
    Inserted,
    /// Row was present and has been deleted
    Deleted,
    /// Insert lost a race to a concurrent insert of the same key
    AlreadyPresent,
}

/// Caller-visible result of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggled {
    Added,
    Removed,
}

impl From<ToggleWrite> for Toggled {
    fn from(write: ToggleWrite) -> Self {
        match write {
            // The key is present either way; a lost insert race is not a failure.
            ToggleWrite::Inserted | ToggleWrite::AlreadyPresent => Toggled::Added,
            ToggleWrite::Deleted => Toggled::Removed,
        }
    }
}

/// Session as exposed by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<SessionUser>,
    pub expires: DateTime<Utc>,
}

/// Identity attached to a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl Session {
    /// Session for a known user id, used by stores and tests
    pub fn for_user(user_id: Uuid, expires: DateTime<Utc>) -> Self {
        Self {
            user: Some(SessionUser {
                id: Some(user_id),
                name: None,
                email: None,
                image: None,
            }),
            expires,
        }
    }
}

/// Insert payload for a post owned by `user_id`
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Uuid,
    pub file_url: String,
    pub caption: String,
    pub location: Option<String>,
}

/// Fields replaced by a post update
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub file_url: String,
    pub caption: String,
}

/// Insert payload for a comment authored by `user_id`
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
}

/// Profile update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub website: Option<String>,
    pub image: Option<String>,
}
