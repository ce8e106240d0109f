use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use log::warn;
use uuid::Uuid;

use crate::auth::extractors::AuthenticatedUserId;
use crate::error::AppError;
use crate::state::AppState;

/// Authentication gate for protected scopes.
///
/// Verifies the bearer token, resolves the user it names and stores an
/// [`AuthenticatedUserId`] in the request extensions. Any failure answers
/// `401` before the wrapped handler runs. The rejection is a response, not an
/// `Err`, so outer middleware (CORS, logging) still sees it.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(user_id) => {
                    req.extensions_mut().insert(AuthenticatedUserId(user_id));
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
        })
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

async fn authenticate(req: &ServiceRequest) -> Result<Uuid, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::InternalServerError("AppState is not registered".into()))?;

    let token = bearer_token(req).ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;
    let user_id = state.tokens.verify(&token).map_err(|e| {
        warn!("rejected token on {}: {}", req.path(), e);
        AppError::from(e)
    })?;

    // A valid token for a user that no longer exists is not a session.
    match state.users.find_by_id(user_id).await? {
        Some(user) => Ok(user.id),
        None => {
            warn!("token names unknown user {}", user_id);
            Err(AppError::Unauthorized("User no longer exists".into()))
        }
    }
}
