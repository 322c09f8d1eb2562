//! QR Access API server binary
//!
//! Wires the Redis token store, the MySQL profile repository, and the
//! enrollment backend into the actix-web application.

use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::{info, warn};
use std::sync::Arc;

use qr_api::app::create_app;
use qr_api::routes::AppState;
use qr_core::services::entry::EntryConfig;
use qr_core::services::{
    AccessTokenService, CourseEnrollment, EntryService, NoOpCourseEnrollment,
    RegistrationService, TokenServiceConfig,
};
use qr_infra::cache::{RedisClient, RedisTokenStore};
use qr_infra::database::{DatabasePool, MySqlProfileRepository};
use qr_infra::enrollment::{EnrollmentConfig, HttpCourseEnrollment};
use qr_infra::InfrastructureError;
use qr_shared::config::access::AccessConfig;
use qr_shared::config::cache::CacheConfig;
use qr_shared::config::database::DatabaseConfig;
use qr_shared::config::server::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting QR Access API Server");

    let server_config = ServerConfig::from_env();
    let access_config = AccessConfig::from_env();
    let cache_config = CacheConfig::from_env();
    let database_config = DatabaseConfig::from_env();

    if access_config.signing_secret.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "QR_SIGNING_SECRET must be set",
        ));
    }
    if access_config.admin_api_key.is_empty() {
        warn!("QR_ADMIN_API_KEY not set, issuance endpoints are disabled");
    }

    let redis_client = RedisClient::new(&cache_config).await.map_err(to_io_error)?;
    let token_store = Arc::new(RedisTokenStore::new(
        redis_client,
        cache_config.key_prefix.clone(),
    ));

    let database_pool = DatabasePool::new(&database_config)
        .await
        .map_err(to_io_error)?;
    let profiles = Arc::new(MySqlProfileRepository::new(
        database_pool.get_pool().clone(),
    ));

    let enrollment: Box<dyn CourseEnrollment> = match EnrollmentConfig::from_env() {
        Some(config) => Box::new(HttpCourseEnrollment::new(config).map_err(to_io_error)?),
        None => {
            info!("No enrollment backend configured, access grants will only be logged");
            Box::new(NoOpCourseEnrollment::new())
        }
    };

    let token_service = Arc::new(AccessTokenService::new(
        token_store,
        TokenServiceConfig::from(&access_config),
    ));
    let entry_service = Arc::new(EntryService::new(
        token_service.clone(),
        Arc::new(enrollment),
        profiles.clone(),
        EntryConfig {
            public_url: server_config.public_url.clone(),
            login_url: server_config.login_url.clone(),
        },
    ));
    let registration_service = Arc::new(RegistrationService::new(
        profiles,
        access_config.require_consent,
    ));

    let bind_address = server_config.bind_address();
    info!("Server will bind to: {}", bind_address);

    let app_state = web::Data::new(AppState {
        token_service,
        entry_service,
        registration_service,
        access_config,
        server_config,
    });

    HttpServer::new(move || create_app(app_state.clone()))
        .bind(&bind_address)?
        .run()
        .await
}

fn to_io_error(e: InfrastructureError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}
