use crate::handlers::auth::{validate_jwt, Claims, SESSION_TTL_HOURS};
use crate::handlers::clinic_api::{ClinicApi, RegisterRequest};
use crate::handlers::guard::LOGIN_PATH;
use crate::handlers::session::{clear_edge_cookie, edge_cookie, restore, TOKEN_SESSION_KEY};
use crate::models::all_models::Role;
use actix_identity::Identity;
use actix_session::Session;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse, Responder};
use chrono::{Duration, Utc};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::to_string;
use uuid::Uuid;

//Login Request
#[derive(Deserialize, Serialize)]
pub struct LoginRequest {
    pub account: String,
    pub secret: String,
}

//Login Response
#[derive(Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub account: String,
    pub display_name: String,
    pub role: Role,
    pub home_route: &'static str,
    pub token: String,
}

//Login
//Login Input: LoginRequest
//Login Output: LoginResponse (home_route is the navigation target)
pub async fn login(
    req: HttpRequest,
    session: Session,
    api: web::Data<ClinicApi>,
    payload: web::Json<LoginRequest>,
) -> impl Responder {
    // Authenticate against the clinic API
    let token = match api.login(&payload.account, &payload.secret).await {
        Ok(response) => response.token,
        Err(e) => return e.to_response("Login failed"),
    };

    // Decode the returned token to extract identity and role
    let claims = match validate_jwt(&token) {
        Ok(claims) => claims,
        Err(e) => {
            error!("Clinic API issued an unusable token: {}", e);
            return HttpResponse::BadGateway().body("Received an invalid token");
        }
    };

    // Serialize claims to JSON string
    let claims_str = match to_string(&claims) {
        Ok(s) => s,
        Err(_) => return HttpResponse::InternalServerError().body("Failed to serialize session data"),
    };

    // Dual persistence: identity session, token key, and the edge cookie
    if Identity::login(&req.extensions(), claims_str).is_err() {
        return HttpResponse::InternalServerError().body("Failed to create session");
    }
    if session.insert(TOKEN_SESSION_KEY, &token).is_err() {
        return HttpResponse::InternalServerError().body("Failed to persist session token");
    }

    let response = LoginResponse {
        user_id: claims.id,
        account: claims.account,
        display_name: claims.display_name,
        role: claims.role,
        home_route: claims.role.home_route(),
        token: token.clone(),
    };

    HttpResponse::Ok().cookie(edge_cookie(&token)).json(response)
}

//Register Response
#[derive(Serialize)]
pub struct RegisterResponse {
    pub account: String,
    pub next: &'static str,
}

//Register
//Register Input: RegisterRequest
//Register Output: RegisterResponse (next is the login view; no session is established)
pub async fn register(
    api: web::Data<ClinicApi>,
    payload: web::Json<RegisterRequest>,
) -> impl Responder {
    match api.register(&payload).await {
        Ok(created) => HttpResponse::Ok().json(RegisterResponse {
            account: created.account,
            next: LOGIN_PATH,
        }),
        Err(e) => e.to_response("Registration failed"),
    }
}

//Logout
//Logout Input: none (idempotent; succeeds with or without a session)
//Logout Output: confirmation, with local state cleared even if the remote call fails
pub async fn logout(
    identity: Option<Identity>,
    session: Session,
    api: web::Data<ClinicApi>,
) -> impl Responder {
    if let Ok(Some(token)) = session.get::<String>(TOKEN_SESSION_KEY) {
        if let Err(e) = api.invalidate(&token).await {
            warn!("Remote session invalidation failed: {}", e);
        }
    }

    if let Some(identity) = identity {
        identity.logout();
    }
    session.purge();

    HttpResponse::Ok()
        .cookie(clear_edge_cookie())
        .json("Logged out successfully")
}

//Current Session
//Current Session Input: cookie-backed session state
//Current Session Output: AuthSession, or 204 when nothing restorable exists
pub async fn current_session(identity: Option<Identity>, session: Session) -> impl Responder {
    let claims_json = identity.and_then(|identity| identity.id().ok());
    match restore(claims_json, &session) {
        Some(auth) => HttpResponse::Ok().json(auth),
        None => HttpResponse::NoContent().finish(),
    }
}

// Refresh session endpoint
pub async fn refresh_session(req: HttpRequest) -> impl Responder {
    if let Some(identity) = req.extensions().get::<Identity>() {
        match identity.id() {
            Ok(claims_str) => match serde_json::from_str::<Claims>(&claims_str) {
                Ok(mut claims) => {
                    let expiration = Utc::now() + Duration::hours(SESSION_TTL_HOURS);
                    claims.exp = expiration.timestamp() as usize;

                    let updated_claims_str = match to_string(&claims) {
                        Ok(s) => s,
                        Err(_) => {
                            return HttpResponse::InternalServerError()
                                .body("Failed to serialize session data")
                        }
                    };

                    if Identity::login(&req.extensions(), updated_claims_str).is_err() {
                        return HttpResponse::InternalServerError().body("Failed to refresh session");
                    }

                    return HttpResponse::Ok().json("Session refreshed successfully");
                }
                Err(_) => return HttpResponse::BadRequest().body("Invalid session data"),
            },
            Err(_) => return HttpResponse::Unauthorized().body("Session expired or invalid"),
        }
    }

    HttpResponse::Unauthorized().body("Not authenticated")
}

//Config User Auth Routes
// POST /auth/register
// POST /auth/login
// POST /auth/logout
// GET  /auth/session
pub fn config_user_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/session", web::get().to(current_session)),
    );
}

//Config Protected Auth Routes
// POST /auth/refresh
pub fn config_protected_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").route("/refresh", web::post().to(refresh_session)));
}
