use std::io;
use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{info, warn};
use sqlx::postgres::PgPoolOptions;

use workpilot::config::Config;
use workpilot::routes;
use workpilot::state::AppState;
use workpilot::store::{CredentialStore, MemoryStore, PgStore, TaskStore};

fn io_error(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

async fn build_stores(
    config: &Config,
) -> io::Result<(Arc<dyn CredentialStore>, Arc<dyn TaskStore>)> {
    match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .map_err(io_error)?;
            let store = PgStore::new(pool);
            store.migrate().await.map_err(io_error)?;
            info!("using postgres store");
            Ok((Arc::new(store.clone()), Arc::new(store)))
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory store, data is lost on restart");
            let store = MemoryStore::new();
            Ok((Arc::new(store.clone()), Arc::new(store)))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(io_error)?;
    let (users, tasks) = build_stores(&config).await?;
    let state = web::Data::new(AppState::from_config(&config, users, tasks));

    info!("Starting WorkPilot server at {}", config.server_url());
    let client_url = config.client_url.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(routes::cors(client_url.as_deref()))
            .wrap(Logger::default())
            .configure(routes::config)
            .default_service(web::route().to(routes::not_found))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
