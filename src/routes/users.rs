use actix_web::{get, put, web, HttpResponse, Responder};

use crate::{auth::AuthenticatedUserId, error::AppError, models::ProfilePatch, state::AppState};

/// Returns the acting user's profile without the password hash.
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let profile = state.auth.get_profile(user_id.0).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Partially updates the acting user's profile.
///
/// Accepts any subset of `name`, `email`, `bio` and `password`.
/// `bio: ""` clears the bio; omitting it leaves it as is.
///
/// ## Responses:
/// - `200 OK`: the updated, sanitized user.
/// - `400 Bad Request`: `email_taken`, `weak_password` or `validation_error`.
/// - `401 Unauthorized`, `404 Not Found`.
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
    patch: web::Json<ProfilePatch>,
) -> Result<impl Responder, AppError> {
    let profile = state
        .auth
        .update_profile(user_id.0, patch.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}
