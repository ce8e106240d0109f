use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::state::AppState;

/// Health check endpoint
///
/// Probes the credential store with a lookup that can never match, and answers
/// `503` when the store cannot be reached.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    match state.users.find_by_id(Uuid::nil()).await {
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "timestamp": Utc::now()
        })),
        Err(e) => {
            log::error!("health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "timestamp": Utc::now()
            }))
        }
    }
}
