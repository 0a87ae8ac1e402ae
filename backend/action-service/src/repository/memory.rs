//! In-process store implementing every repository trait.
//!
//! Holds all tables behind one async mutex so each trait call is atomic, which
//! matches the guarantees the Postgres statements give. Writes can be made to
//! fail on demand, and every committed write is counted.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    CommentRepository, PostRepository, RelationRepository, SessionStore, StoreError, StoreResult,
    UserRepository,
};
use crate::domain::{
    Comment, NewComment, NewPost, Post, PostChanges, ProfileChanges, Relation, Session,
    ToggleWrite, User,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    /// (relation, actor, target)
    relations: HashSet<(Relation, Uuid, Uuid)>,
    sessions: HashMap<String, Session>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with `StoreError::Unavailable`
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of writes committed so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn begin_write(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }

    fn commit_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    // ------------------------------------------------------------------
    // Seeding helpers (not counted as writes)
    // ------------------------------------------------------------------

    pub async fn seed_user(&self, username: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: None,
            username: Some(username.to_string()),
            email: Some(format!("{}@example.com", username)),
            bio: None,
            gender: None,
            website: None,
            image: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.users.insert(user.id, user.clone());
        user
    }

    pub async fn seed_post(&self, owner_id: Uuid, caption: &str) -> Post {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            caption: Some(caption.to_string()),
            location: None,
            file_url: format!("https://files.example.com/{}.png", Uuid::new_v4()),
            user_id: owner_id,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.posts.insert(post.id, post.clone());
        post
    }

    pub async fn seed_comment(&self, post_id: Uuid, author_id: Uuid, body: &str) -> Comment {
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            body: body.to_string(),
            post_id,
            user_id: author_id,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .lock()
            .await
            .comments
            .insert(comment.id, comment.clone());
        comment
    }

    /// Register a session token for `user_id`, valid for one day
    pub async fn seed_session(&self, session_token: &str, user_id: Uuid) -> Session {
        let session = Session::for_user(user_id, Utc::now() + Duration::days(1));
        self.tables
            .lock()
            .await
            .sessions
            .insert(session_token.to_string(), session.clone());
        session
    }

    pub async fn comment_count(&self, post_id: Uuid) -> usize {
        self.tables
            .lock()
            .await
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .count()
    }

    pub async fn relation_count(&self, relation: Relation) -> usize {
        self.tables
            .lock()
            .await
            .relations
            .iter()
            .filter(|(r, _, _)| *r == relation)
            .count()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_user(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(&user_id).cloned())
    }

    async fn user_exists(&self, user_id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.lock().await.users.contains_key(&user_id))
    }

    async fn update_profile(&self, user_id: Uuid, changes: &ProfileChanges) -> StoreResult<bool> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;

        if let Some(username) = &changes.username {
            let taken = tables
                .users
                .values()
                .any(|u| u.id != user_id && u.username.as_deref() == Some(username.as_str()));
            if taken {
                return Err(StoreError::UniqueViolation("users_username_key".to_string()));
            }
        }

        let Some(user) = tables.users.get_mut(&user_id) else {
            return Ok(false);
        };

        fn apply(field: &mut Option<String>, value: &Option<String>) {
            if value.is_some() {
                *field = value.clone();
            }
        }
        apply(&mut user.name, &changes.name);
        apply(&mut user.username, &changes.username);
        apply(&mut user.bio, &changes.bio);
        apply(&mut user.gender, &changes.gender);
        apply(&mut user.website, &changes.website);
        apply(&mut user.image, &changes.image);
        user.updated_at = Utc::now();

        self.commit_write();
        Ok(true)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn get_post(&self, post_id: Uuid) -> StoreResult<Option<Post>> {
        Ok(self.tables.lock().await.posts.get(&post_id).cloned())
    }

    async fn post_exists(&self, post_id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.lock().await.posts.contains_key(&post_id))
    }

    async fn create_post(&self, post: &NewPost) -> StoreResult<Post> {
        self.begin_write()?;
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            caption: Some(post.caption.clone()),
            location: post.location.clone(),
            file_url: post.file_url.clone(),
            user_id: post.user_id,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.posts.insert(post.id, post.clone());
        self.commit_write();
        Ok(post)
    }

    async fn update_owned_post(
        &self,
        post_id: Uuid,
        owner_id: Uuid,
        changes: &PostChanges,
    ) -> StoreResult<Option<Post>> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;
        let Some(post) = tables
            .posts
            .get_mut(&post_id)
            .filter(|p| p.user_id == owner_id)
        else {
            return Ok(None);
        };

        post.file_url = changes.file_url.clone();
        post.caption = Some(changes.caption.clone());
        post.updated_at = Utc::now();
        let updated = post.clone();

        self.commit_write();
        Ok(Some(updated))
    }

    async fn delete_owned_post(&self, post_id: Uuid, owner_id: Uuid) -> StoreResult<bool> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;
        let owned = tables
            .posts
            .get(&post_id)
            .map(|p| p.user_id == owner_id)
            .unwrap_or(false);
        if !owned {
            return Ok(false);
        }

        tables.posts.remove(&post_id);
        tables.comments.retain(|_, c| c.post_id != post_id);
        tables.relations.retain(|(relation, _, target)| {
            !(matches!(relation, Relation::Like | Relation::Bookmark) && *target == post_id)
        });

        self.commit_write();
        Ok(true)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn get_comment(&self, comment_id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(self.tables.lock().await.comments.get(&comment_id).cloned())
    }

    async fn create_comment(&self, comment: &NewComment) -> StoreResult<Comment> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(StoreError::Database(
                "comments_post_id_fkey violated".to_string(),
            ));
        }

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            body: comment.body.clone(),
            post_id: comment.post_id,
            user_id: comment.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.comments.insert(comment.id, comment.clone());

        self.commit_write();
        Ok(comment)
    }

    async fn delete_owned_comment(&self, comment_id: Uuid, author_id: Uuid) -> StoreResult<bool> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;
        let owned = tables
            .comments
            .get(&comment_id)
            .map(|c| c.user_id == author_id)
            .unwrap_or(false);
        if !owned {
            return Ok(false);
        }

        tables.comments.remove(&comment_id);
        self.commit_write();
        Ok(true)
    }
}

#[async_trait]
impl RelationRepository for MemoryStore {
    async fn toggle(
        &self,
        relation: Relation,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> StoreResult<ToggleWrite> {
        self.begin_write()?;
        let key = (relation, actor_id, target_id);
        let mut tables = self.tables.lock().await;

        let write = if tables.relations.remove(&key) {
            ToggleWrite::Deleted
        } else {
            tables.relations.insert(key);
            ToggleWrite::Inserted
        };

        self.commit_write();
        Ok(write)
    }

    async fn exists(
        &self,
        relation: Relation,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> StoreResult<bool> {
        Ok(self
            .tables
            .lock()
            .await
            .relations
            .contains(&(relation, actor_id, target_id)))
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn find_session(&self, session_token: &str) -> StoreResult<Option<Session>> {
        let now = Utc::now();
        Ok(self
            .tables
            .lock()
            .await
            .sessions
            .get(session_token)
            .filter(|s| s.expires > now)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn toggle_flips_presence() {
        let store = MemoryStore::new();
        let (actor, target) = (Uuid::new_v4(), Uuid::new_v4());

        assert_eq!(
            store.toggle(Relation::Like, actor, target).await.unwrap(),
            ToggleWrite::Inserted
        );
        assert!(store.exists(Relation::Like, actor, target).await.unwrap());
        assert!(!store.exists(Relation::Bookmark, actor, target).await.unwrap());

        assert_eq!(
            store.toggle(Relation::Like, actor, target).await.unwrap(),
            ToggleWrite::Deleted
        );
        assert!(!store.exists(Relation::Like, actor, target).await.unwrap());
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn failed_writes_are_not_counted() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);

        let err = store
            .toggle(Relation::Follow, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn deleting_a_post_cascades() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner").await;
        let fan = store.seed_user("fan").await;
        let post = store.seed_post(owner.id, "hello").await;
        store.seed_comment(post.id, fan.id, "nice").await;
        store.toggle(Relation::Like, fan.id, post.id).await.unwrap();
        store.toggle(Relation::Follow, fan.id, owner.id).await.unwrap();

        assert!(store.delete_owned_post(post.id, owner.id).await.unwrap());
        assert_eq!(store.comment_count(post.id).await, 0);
        assert_eq!(store.relation_count(Relation::Like).await, 0);
        assert_eq!(store.relation_count(Relation::Follow).await, 1);
    }

    #[tokio::test]
    async fn expired_sessions_are_ignored() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        store.seed_session("live", user_id).await;
        store.tables.lock().await.sessions.insert(
            "stale".to_string(),
            Session::for_user(user_id, Utc::now() - Duration::minutes(1)),
        );

        assert!(store.find_session("live").await.unwrap().is_some());
        assert!(store.find_session("stale").await.unwrap().is_none());
        assert!(store.find_session("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn username_uniqueness_is_enforced() {
        let store = MemoryStore::new();
        store.seed_user("taken").await;
        let other = store.seed_user("other").await;

        let err = store
            .update_profile(
                other.id,
                &ProfileChanges {
                    username: Some("taken".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }
}
