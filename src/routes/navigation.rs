use crate::handlers::guard::ensure_session;
use crate::models::all_models::{NavEntry, Role, ROLE_NAVIGATION};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Serialize;

//Navigation Response
#[derive(Serialize)]
pub struct NavigationResponse {
    pub role: Role,
    pub home: &'static str,
    pub entries: Vec<NavEntry>,
}

//Get Navigation
//Get Navigation Input: authenticated session
//Get Navigation Output: NavigationResponse for the session's role
pub async fn get_navigation(req: HttpRequest) -> impl Responder {
    let session = match ensure_session(&req) {
        Ok(session) => session,
        Err(response) => return response,
    };

    let entries = ROLE_NAVIGATION
        .get(&session.role)
        .cloned()
        .unwrap_or_default();

    HttpResponse::Ok().json(NavigationResponse {
        role: session.role,
        home: session.role.home_route(),
        entries,
    })
}

//Config Navigation Routes
// GET /navigation
pub fn config_navigation_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/navigation", web::get().to(get_navigation));
}
