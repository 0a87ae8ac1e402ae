/// Action handlers - one POST/PUT endpoint per mutation
///
/// Bodies are taken as raw bytes so the caller's identity is settled before
/// any decoding: an anonymous request is a 401 whatever it carries, and a
/// signed-in caller with an undecodable body gets the action's 422.
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::{ActionError, ActionResult};
use crate::metrics;
use crate::middleware::CurrentSession;
use crate::services::messages::*;
use crate::services::{resolve_caller_id, ActionOutcome, ActionService};
use crate::validation::{
    self, BookmarkForm, CreateCommentForm, CreatePostForm, DeleteCommentForm, DeletePostForm,
    FollowForm, LikeForm, UpdatePostForm, UpdateProfileForm,
};

/// Render a successful outcome
fn respond(outcome: ActionOutcome) -> HttpResponse {
    match outcome {
        ActionOutcome::Redirect(location) => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, location.clone()))
            .json(json!({ "location": location })),
        ActionOutcome::Message(message) => HttpResponse::Ok().json(json!({ "message": message })),
        ActionOutcome::Toggled { state, message } => {
            HttpResponse::Ok().json(json!({ "message": message, "state": state }))
        }
    }
}

/// Count the outcome, then render it or hand the error to `ResponseError`
fn finish(action: &str, result: ActionResult<ActionOutcome>) -> ActionResult<HttpResponse> {
    metrics::observe(action, &result);
    result.map(respond)
}

/// Check identity, then decode the body into the action's raw form
fn read_form<F: DeserializeOwned>(
    session: &CurrentSession,
    body: &[u8],
    invalid_message: &str,
) -> ActionResult<F> {
    resolve_caller_id(session.session())?;
    validation::decode(body).map_err(|errors| ActionError::validation(errors, invalid_message))
}

pub async fn create_post(
    service: web::Data<ActionService>,
    session: CurrentSession,
    body: web::Bytes,
) -> ActionResult<HttpResponse> {
    let result = match read_form::<CreatePostForm>(&session, &body, CREATE_POST_INVALID) {
        Ok(form) => service.create_post(session.session(), form).await,
        Err(e) => Err(e),
    };
    finish("create_post", result)
}

pub async fn update_post(
    service: web::Data<ActionService>,
    session: CurrentSession,
    body: web::Bytes,
) -> ActionResult<HttpResponse> {
    let result = match read_form::<UpdatePostForm>(&session, &body, UPDATE_POST_INVALID) {
        Ok(form) => service.update_post(session.session(), form).await,
        Err(e) => Err(e),
    };
    finish("update_post", result)
}

pub async fn delete_post(
    service: web::Data<ActionService>,
    session: CurrentSession,
    body: web::Bytes,
) -> ActionResult<HttpResponse> {
    let result = match read_form::<DeletePostForm>(&session, &body, DELETE_POST_INVALID) {
        Ok(form) => service.delete_post(session.session(), form).await,
        Err(e) => Err(e),
    };
    finish("delete_post", result)
}

pub async fn like_post(
    service: web::Data<ActionService>,
    session: CurrentSession,
    body: web::Bytes,
) -> ActionResult<HttpResponse> {
    let result = match read_form::<LikeForm>(&session, &body, LIKE_INVALID) {
        Ok(form) => service.like_post(session.session(), form).await,
        Err(e) => Err(e),
    };
    finish("like_post", result)
}

pub async fn bookmark_post(
    service: web::Data<ActionService>,
    session: CurrentSession,
    body: web::Bytes,
) -> ActionResult<HttpResponse> {
    let result = match read_form::<BookmarkForm>(&session, &body, BOOKMARK_INVALID) {
        Ok(form) => service.bookmark_post(session.session(), form).await,
        Err(e) => Err(e),
    };
    finish("bookmark_post", result)
}

pub async fn follow_user(
    service: web::Data<ActionService>,
    session: CurrentSession,
    body: web::Bytes,
) -> ActionResult<HttpResponse> {
    let result = match read_form::<FollowForm>(&session, &body, FOLLOW_INVALID) {
        Ok(form) => service.follow_user(session.session(), form).await,
        Err(e) => Err(e),
    };
    finish("follow_user", result)
}

pub async fn create_comment(
    service: web::Data<ActionService>,
    session: CurrentSession,
    body: web::Bytes,
) -> ActionResult<HttpResponse> {
    let result = match read_form::<CreateCommentForm>(&session, &body, CREATE_COMMENT_INVALID) {
        Ok(form) => service.create_comment(session.session(), form).await,
        Err(e) => Err(e),
    };
    finish("create_comment", result)
}

pub async fn delete_comment(
    service: web::Data<ActionService>,
    session: CurrentSession,
    body: web::Bytes,
) -> ActionResult<HttpResponse> {
    let result = match read_form::<DeleteCommentForm>(&session, &body, DELETE_COMMENT_INVALID) {
        Ok(form) => service.delete_comment(session.session(), form).await,
        Err(e) => Err(e),
    };
    finish("delete_comment", result)
}

pub async fn update_profile(
    service: web::Data<ActionService>,
    session: CurrentSession,
    body: web::Bytes,
) -> ActionResult<HttpResponse> {
    let result = match read_form::<UpdateProfileForm>(&session, &body, UPDATE_PROFILE_INVALID) {
        Ok(form) => service.update_profile(session.session(), form).await,
        Err(e) => Err(e),
    };
    finish("update_profile", result)
}
