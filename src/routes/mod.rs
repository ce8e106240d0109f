pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use actix_cors::Cors;
use actix_web::{error, http::header, web, HttpResponse};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route. Shared state (`web::Data<AppState>`) is added by the caller.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(health::health)
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .service(auth::register)
                        .service(auth::login),
                )
                .service(
                    web::scope("/user")
                        .wrap(AuthMiddleware)
                        .service(users::get_profile)
                        .service(users::update_profile),
                )
                .service(
                    web::scope("/tasks")
                        .wrap(AuthMiddleware)
                        .service(tasks::get_tasks)
                        .service(tasks::create_task)
                        .service(tasks::get_task)
                        .service(tasks::update_task)
                        .service(tasks::delete_task),
                ),
        );
}

const LOCAL_CLIENT: &str = "http://localhost:3000";

/// CORS policy for the browser client: the local dev origin plus `client_url`.
pub fn cors(client_url: Option<&str>) -> Cors {
    let mut cors = Cors::default()
        .allowed_origin(LOCAL_CLIENT)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600);
    if let Some(origin) = client_url {
        cors = cors.allowed_origin(origin);
    }
    cors
}

/// Fallback for unknown routes; install with `App::default_service`.
pub async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("Route not found".into()))
}

// Bodies that fail to deserialize (missing fields, unknown enum values,
// bad JSON) are validation errors with the usual response shape.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

// Only task ids live in paths; one that is not a UUID cannot name a task.
fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err: error::PathError, _req| AppError::NotFound("Task not found".into()).into())
}
