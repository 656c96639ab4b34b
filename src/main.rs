mod handlers;
mod middleware;
mod models;
mod routes;

use actix_cors::Cors;
use actix_identity::IdentityMiddleware;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{
    cookie::{Key, SameSite},
    middleware::Logger,
    web, App, HttpResponse, HttpServer,
};
use dotenvy::dotenv;
use handlers::clinic_api::ClinicApi;
use log::{error, info};
use middleware::{
    auth_middleware::AuthMiddleware, edge_guard::EdgeGuard, request_logger::RequestLogger,
    session_refresh_middleware::SessionRefreshMiddleware,
};
use routes::{
    consultations::config_consultation_routes,
    departments::config_department_routes,
    navigation::config_navigation_routes,
    patients::config_patient_routes,
    remissions::config_remission_routes,
    user_auth::{config_protected_auth_routes, config_user_auth_routes},
    workers::config_worker_routes,
};
use std::env;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    // Log startup message
    info!("=== Polyclinic Dashboard Starting ===");

    // Get required secrets with proper error handling
    let session_secret = match env::var("SESSION_SECRET") {
        Ok(secret) => secret,
        Err(_) => {
            error!("SESSION_SECRET not found in environment");
            return Err(anyhow::anyhow!("Session secret not found"));
        }
    };

    // Create a secret key for cookies
    let secret_key = Key::from(session_secret.as_bytes());

    // The token validation secret shared with the clinic API
    if env::var("JWT_SECRET").is_err() {
        error!("JWT_SECRET not found in environment");
        return Err(anyhow::anyhow!("JWT secret not found"));
    }

    // Initialize the clinic API client
    let api = match ClinicApi::from_env() {
        Ok(api) => {
            info!("Clinic API client initialized successfully");
            api
        }
        Err(e) => {
            error!("Failed to initialize clinic API client: {}", e);
            return Err(anyhow::anyhow!("Clinic API initialization failed: {}", e));
        }
    };

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    info!("Starting Polyclinic Dashboard on {}", bind_addr);

    HttpServer::new(move || {
        // Configure CORS to be permissive for the dashboard frontend
        let cors = Cors::default()
            .allowed_origin_fn(|_origin, _req_head| true)
            .allow_any_method()
            .allow_any_header()
            .expose_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(api.clone()))
            .service(
                web::scope("/api")
                    .service(web::scope("/public").configure(config_user_auth_routes))
                    .service(
                        web::scope("/protected")
                            .wrap(AuthMiddleware)
                            .configure(config_protected_auth_routes)
                            .configure(config_navigation_routes)
                            .configure(config_department_routes)
                            .configure(config_worker_routes)
                            .configure(config_patient_routes)
                            .configure(config_consultation_routes)
                            .configure(config_remission_routes),
                    ),
            )
            .route(
                "/",
                web::get().to(|| async { HttpResponse::Ok().body("Polyclinic Dashboard") }),
            )
            .route(
                "/login",
                web::get().to(|| async {
                    HttpResponse::Ok().body("Sign in to the Polyclinic Dashboard")
                }),
            )
            .route(
                "/unauthorized",
                web::get().to(|| async {
                    HttpResponse::Forbidden().body("You do not have access to this page")
                }),
            )
            .wrap(SessionRefreshMiddleware::new(30 * 60))
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(true)
                    .cookie_http_only(true)
                    .cookie_same_site(SameSite::None)
                    .cookie_name("clinic_session".to_string())
                    .cookie_path("/".to_string())
                    .build(),
            )
            .wrap(cors)
            .wrap(RequestLogger)
            .wrap(EdgeGuard)
            .wrap(Logger::new(
                "%t [%s] \"%r\" %b %D ms \"%{Referer}i\" \"%{User-Agent}i\" %a",
            ))
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
