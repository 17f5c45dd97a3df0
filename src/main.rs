use actix_web::{HttpServer, middleware};

use usulan::app::{AppState, build_app};
use usulan::auth::credentials::DemoCredentials;
use usulan::auth::rate_limit::RateLimiter;
use usulan::config::{self, AppConfig};
use usulan::db;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env();

    if config.jwt_secret_is_fallback {
        log::warn!("No JWT_SECRET set, signing tokens with the built-in fallback key (INSECURE)");
    }

    // Demo account: only the argon2 hash is kept in memory
    let credentials = DemoCredentials::new(
        &config.demo_email,
        &config.demo_password,
        config::DEMO_USER_ID,
        config::DEMO_ROLE,
    )
    .expect("Failed to hash demo password");

    let store = db::connect_store(&config).await;

    let bind_addr = config.bind_addr.clone();
    log::info!("Starting server at {} (listening on {bind_addr})", config.public_base_url);

    let state = AppState::new(config, store, credentials, RateLimiter::default());

    HttpServer::new(move || build_app(state.clone()).wrap(middleware::Logger::default()))
        .bind(bind_addr)?
        .run()
        .await
}
