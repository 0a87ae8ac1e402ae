/// Toggle engine shared by like, bookmark and follow
use uuid::Uuid;

use super::messages::*;
use super::{resolve_caller_id, ActionOutcome, ActionService};
use crate::domain::{Relation, Session, Toggled};
use crate::error::{ActionError, ActionResult};
use crate::validation::{BookmarkForm, FollowForm, LikeForm};

/// Per-relation wording
struct ToggleMessages {
    not_found: &'static str,
    added: &'static str,
    removed: &'static str,
    add_failed: &'static str,
    remove_failed: &'static str,
}

fn messages_for(relation: Relation) -> ToggleMessages {
    match relation {
        Relation::Like => ToggleMessages {
            not_found: POST_NOT_FOUND,
            added: POST_LIKED,
            removed: POST_UNLIKED,
            add_failed: LIKE_FAILED,
            remove_failed: UNLIKE_FAILED,
        },
        Relation::Bookmark => ToggleMessages {
            not_found: POST_NOT_FOUND,
            added: POST_BOOKMARKED,
            removed: POST_UNBOOKMARKED,
            add_failed: BOOKMARK_FAILED,
            remove_failed: UNBOOKMARK_FAILED,
        },
        Relation::Follow => ToggleMessages {
            not_found: USER_NOT_FOUND,
            added: USER_FOLLOWED,
            removed: USER_UNFOLLOWED,
            add_failed: FOLLOW_FAILED,
            remove_failed: UNFOLLOW_FAILED,
        },
    }
}

impl ActionService {
    /// Like or unlike a post
    pub async fn like_post(
        &self,
        session: Option<&Session>,
        raw: LikeForm,
    ) -> ActionResult<ActionOutcome> {
        let caller_id = resolve_caller_id(session)?;
        let post_id = self.parse(raw, LIKE_INVALID)?;
        self.toggle_relation(Relation::Like, caller_id, post_id).await
    }

    /// Bookmark or un-bookmark a post
    pub async fn bookmark_post(
        &self,
        session: Option<&Session>,
        raw: BookmarkForm,
    ) -> ActionResult<ActionOutcome> {
        let caller_id = resolve_caller_id(session)?;
        let post_id = self.parse(raw, BOOKMARK_INVALID)?;
        self.toggle_relation(Relation::Bookmark, caller_id, post_id)
            .await
    }

    /// Follow or unfollow a user. The caller is the follower.
    pub async fn follow_user(
        &self,
        session: Option<&Session>,
        raw: FollowForm,
    ) -> ActionResult<ActionOutcome> {
        let caller_id = resolve_caller_id(session)?;
        let user_id = self.parse(raw, FOLLOW_INVALID)?;
        self.toggle_relation(Relation::Follow, caller_id, user_id)
            .await
    }

    /// Flip presence of (caller, target) after checking the target exists
    async fn toggle_relation(
        &self,
        relation: Relation,
        caller_id: Uuid,
        target_id: Uuid,
    ) -> ActionResult<ActionOutcome> {
        let messages = messages_for(relation);

        let target_exists = match relation {
            Relation::Like | Relation::Bookmark => self.repos.posts.post_exists(target_id).await,
            Relation::Follow => self.repos.users.user_exists(target_id).await,
        }
        .map_err(|e| ActionError::persistence(messages.add_failed, e))?;

        if !target_exists {
            return Err(ActionError::not_found(messages.not_found));
        }

        // Only picks the failure wording; the toggle itself decides the outcome
        let was_present = self
            .repos
            .relations
            .exists(relation, caller_id, target_id)
            .await
            .map_err(|e| ActionError::persistence(messages.add_failed, e))?;
        let failed = if was_present {
            messages.remove_failed
        } else {
            messages.add_failed
        };

        let write = self
            .repos
            .relations
            .toggle(relation, caller_id, target_id)
            .await
            .map_err(|e| ActionError::persistence(failed, e))?;

        let state = Toggled::from(write);
        tracing::info!(
            %relation,
            caller_id = %caller_id,
            target_id = %target_id,
            ?write,
            "relation toggled"
        );

        self.invalidate(DASHBOARD_PATH).await;

        let message = match state {
            Toggled::Added => messages.added,
            Toggled::Removed => messages.removed,
        };
        Ok(ActionOutcome::Toggled {
            state,
            message: message.to_string(),
        })
    }
}
