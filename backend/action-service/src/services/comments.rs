/// Comment actions - create on any existing post, delete own comments only
use super::messages::*;
use super::{resolve_caller_id, ActionOutcome, ActionService};
use crate::domain::{NewComment, Session};
use crate::error::{ActionError, ActionResult};
use crate::validation::{CreateCommentForm, DeleteCommentForm};

impl ActionService {
    pub async fn create_comment(
        &self,
        session: Option<&Session>,
        raw: CreateCommentForm,
    ) -> ActionResult<ActionOutcome> {
        let caller_id = resolve_caller_id(session)?;
        let input = self.parse(raw, CREATE_COMMENT_INVALID)?;

        let post_exists = self
            .repos
            .posts
            .post_exists(input.post_id)
            .await
            .map_err(|e| ActionError::persistence(CREATE_COMMENT_FAILED, e))?;
        if !post_exists {
            return Err(ActionError::not_found(POST_NOT_FOUND));
        }

        let comment = self
            .repos
            .comments
            .create_comment(&NewComment {
                post_id: input.post_id,
                user_id: caller_id,
                body: input.body,
            })
            .await
            .map_err(|e| ActionError::persistence(CREATE_COMMENT_FAILED, e))?;

        tracing::info!(
            comment_id = %comment.id,
            post_id = %comment.post_id,
            user_id = %caller_id,
            "comment created"
        );

        self.invalidate(DASHBOARD_PATH).await;
        Ok(ActionOutcome::Message(COMMENT_CREATED.to_string()))
    }

    pub async fn delete_comment(
        &self,
        session: Option<&Session>,
        raw: DeleteCommentForm,
    ) -> ActionResult<ActionOutcome> {
        let caller_id = resolve_caller_id(session)?;
        let comment_id = self.parse(raw, DELETE_COMMENT_INVALID)?;

        let deleted = self
            .repos
            .comments
            .delete_owned_comment(comment_id, caller_id)
            .await
            .map_err(|e| ActionError::persistence(DELETE_COMMENT_FAILED, e))?;

        if !deleted {
            return Err(ActionError::not_found(COMMENT_NOT_FOUND));
        }

        tracing::info!(%comment_id, user_id = %caller_id, "comment deleted");

        self.invalidate(DASHBOARD_PATH).await;
        Ok(ActionOutcome::Message(COMMENT_DELETED.to_string()))
    }
}
