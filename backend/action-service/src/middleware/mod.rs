/// HTTP middleware for action-service
///
/// Resolves the caller's session from a bearer token or the session cookie and
/// stores it in request extensions. Requests without a live session pass
/// through untouched; each action decides for itself that it needs a caller.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::domain::Session;
use crate::repository::SessionStore;

/// Actix middleware that attaches the caller's [`Session`], if any.
#[derive(Clone)]
pub struct SessionMiddleware {
    store: Arc<dyn SessionStore>,
    cookie_name: Arc<str>,
}

impl SessionMiddleware {
    pub fn new(store: Arc<dyn SessionStore>, cookie_name: impl AsRef<str>) -> Self {
        Self {
            store,
            cookie_name: Arc::from(cookie_name.as_ref()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service: Rc::new(service),
            store: self.store.clone(),
            cookie_name: self.cookie_name.clone(),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
    store: Arc<dyn SessionStore>,
    cookie_name: Arc<str>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let store = self.store.clone();
        let token = session_token(&req, &self.cookie_name);

        Box::pin(async move {
            if let Some(token) = token {
                match store.find_session(&token).await {
                    Ok(Some(session)) => {
                        req.extensions_mut().insert(session);
                    }
                    Ok(None) => {
                        tracing::debug!("session token did not match a live session");
                    }
                    // Lookup failure degrades to an anonymous request.
                    Err(err) => {
                        tracing::warn!("session lookup failed: {}", err);
                    }
                }
            }

            service.call(req).await
        })
    }
}

/// Bearer token first, then the session cookie
fn session_token(req: &ServiceRequest, cookie_name: &str) -> Option<String> {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    bearer.or_else(|| req.cookie(cookie_name).map(|c| c.value().to_string()))
}

/// The caller's session, or `None` for anonymous requests.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<Session>);

impl CurrentSession {
    pub fn session(&self) -> Option<&Session> {
        self.0.as_ref()
    }
}

impl FromRequest for CurrentSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(CurrentSession(req.extensions().get::<Session>().cloned())))
    }
}
