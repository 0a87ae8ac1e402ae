/// Post actions - create, update and delete, scoped to the caller's own posts
use super::messages::*;
use super::{resolve_caller_id, ActionOutcome, ActionService};
use crate::domain::{NewPost, PostChanges, Session};
use crate::error::{ActionError, ActionResult};
use crate::validation::{CreatePostForm, DeletePostForm, UpdatePostForm};

impl ActionService {
    /// Create a post owned by the caller, then redirect to the dashboard
    pub async fn create_post(
        &self,
        session: Option<&Session>,
        raw: CreatePostForm,
    ) -> ActionResult<ActionOutcome> {
        let caller_id = resolve_caller_id(session)?;
        let input = self.parse(raw, CREATE_POST_INVALID)?;

        let post = self
            .repos
            .posts
            .create_post(&NewPost {
                user_id: caller_id,
                file_url: input.file_url,
                caption: input.caption,
                location: input.location,
            })
            .await
            .map_err(|e| ActionError::persistence(CREATE_POST_FAILED, e))?;

        tracing::info!(post_id = %post.id, user_id = %caller_id, "post created");

        self.invalidate(DASHBOARD_PATH).await;
        Ok(ActionOutcome::Redirect(DASHBOARD_PATH.to_string()))
    }

    /// Replace the image and caption of one of the caller's posts
    pub async fn update_post(
        &self,
        session: Option<&Session>,
        raw: UpdatePostForm,
    ) -> ActionResult<ActionOutcome> {
        let caller_id = resolve_caller_id(session)?;
        let input = self.parse(raw, UPDATE_POST_INVALID)?;

        let changes = PostChanges {
            file_url: input.file_url,
            caption: input.caption,
        };
        let updated = self
            .repos
            .posts
            .update_owned_post(input.id, caller_id, &changes)
            .await
            .map_err(|e| ActionError::persistence(UPDATE_POST_FAILED, e))?;

        // Someone else's post and a missing post look the same to the caller.
        if updated.is_none() {
            return Err(ActionError::not_found(POST_NOT_FOUND));
        }

        tracing::info!(post_id = %input.id, user_id = %caller_id, "post updated");

        self.invalidate(DASHBOARD_PATH).await;
        Ok(ActionOutcome::Redirect(DASHBOARD_PATH.to_string()))
    }

    /// Delete one of the caller's posts
    pub async fn delete_post(
        &self,
        session: Option<&Session>,
        raw: DeletePostForm,
    ) -> ActionResult<ActionOutcome> {
        let caller_id = resolve_caller_id(session)?;
        let post_id = self.parse(raw, DELETE_POST_INVALID)?;

        let deleted = self
            .repos
            .posts
            .delete_owned_post(post_id, caller_id)
            .await
            .map_err(|e| ActionError::persistence(DELETE_POST_FAILED, e))?;

        if !deleted {
            return Err(ActionError::not_found(POST_NOT_FOUND));
        }

        tracing::info!(%post_id, user_id = %caller_id, "post deleted");

        self.invalidate(DASHBOARD_PATH).await;
        Ok(ActionOutcome::Message(POST_DELETED.to_string()))
    }
}
