/// Upload handler - raw image body in, public URL out
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::error::ActionResult;
use crate::metrics;
use crate::middleware::CurrentSession;
use crate::services::UploadService;

pub async fn upload_image(
    uploads: web::Data<UploadService>,
    session: CurrentSession,
    req: HttpRequest,
    body: web::Bytes,
) -> ActionResult<HttpResponse> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let result = uploads
        .upload_image(session.session(), content_type, body.to_vec())
        .await;
    metrics::observe("upload_image", &result);

    result.map(|receipt| HttpResponse::Created().json(receipt))
}
