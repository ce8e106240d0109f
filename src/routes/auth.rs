use crate::{
    auth::{LoginRequest, RegisterRequest},
    error::AppError,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates a new account and returns the sanitized user with a bearer token.
///
/// ## Responses:
/// - `201 Created`: `{ "user": {...}, "token": "..." }`
/// - `400 Bad Request`: missing/invalid fields or email already registered.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.auth.register(register_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{ "user": {...}, "token": "..." }`
/// - `400 Bad Request`: missing fields.
/// - `401 Unauthorized`: unknown email or wrong password, indistinguishably.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.auth.login(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
