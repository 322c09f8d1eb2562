//! Application factory
//!
//! Builds the Actix-web application with all routes and middleware wired
//! to the shared application state.

use actix_web::{middleware::Logger, web, App, HttpResponse};

use crate::middleware::cors::create_cors;
use crate::routes::hooks::{login::login_succeeded, registration};
use crate::routes::{access, entry::entry, AppState};

use qr_core::repositories::{ProfileRepository, TokenStore};
use qr_core::services::CourseEnrollment;

/// Create and configure the application with all dependencies
pub fn create_app<S, E, P>(
    app_state: web::Data<AppState<S, E, P>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: TokenStore + 'static,
    E: CourseEnrollment + 'static,
    P: ProfileRepository + 'static,
{
    let cors = create_cors();

    App::new()
        // Add application state
        .app_data(app_state)
        // Add middleware
        .wrap(Logger::default())
        .wrap(cors)
        // Public QR entry route
        .route("/", web::get().to(entry::<S, E, P>))
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/access")
                        .route("/issue", web::post().to(access::issue_access::<S, E, P>))
                        .route("/revoke", web::post().to(access::revoke_access::<S, E, P>)),
                )
                .service(
                    web::scope("/hooks")
                        .route("/login", web::post().to(login_succeeded::<S, E, P>))
                        .route(
                            "/registration/validate",
                            web::post().to(registration::validate_registration::<S, E, P>),
                        )
                        .route(
                            "/registration/created",
                            web::post().to(registration::user_created::<S, E, P>),
                        ),
                ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "qr-access-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
