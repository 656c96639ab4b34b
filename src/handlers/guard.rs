use crate::handlers::session::AuthSession;
use crate::models::all_models::Role;
use actix_web::{http::header, HttpMessage, HttpRequest, HttpResponse};

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const DASHBOARD_ROOT: &str = "/";

//Session State
/// Restoration result attached to each authenticated request.
#[derive(Debug, Clone)]
pub enum SessionState {
    Anonymous,
    Active(AuthSession),
}

//Guard Outcome
/// Decision for a page request given the session state and the page's
/// allowed roles. `Pending` means the session has not been restored yet and
/// nothing may be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    Pending,
    LoginRedirect,
    UnauthorizedRedirect,
    Grant,
}

/// Evaluates the guard decision. `state` is None while restoration has not
/// happened for this request.
pub fn evaluate(state: Option<&SessionState>, allowed: &[Role]) -> GuardOutcome {
    match state {
        None => GuardOutcome::Pending,
        Some(SessionState::Anonymous) => GuardOutcome::LoginRedirect,
        Some(SessionState::Active(session)) => {
            if allowed.contains(&session.role) {
                GuardOutcome::Grant
            } else {
                GuardOutcome::UnauthorizedRedirect
            }
        }
    }
}

/// Role check helper: resolves the request's session state and either hands
/// back the session or the response that ends the request. Runs before any
/// upstream fetch.
pub fn ensure_roles(req: &HttpRequest, allowed: &[Role]) -> Result<AuthSession, HttpResponse> {
    let extensions = req.extensions();
    match evaluate(extensions.get::<SessionState>(), allowed) {
        GuardOutcome::Grant => match extensions.get::<SessionState>() {
            Some(SessionState::Active(session)) => Ok(session.clone()),
            _ => Err(redirect(LOGIN_PATH)),
        },
        GuardOutcome::Pending => Err(HttpResponse::NoContent().finish()),
        GuardOutcome::LoginRedirect => Err(redirect(LOGIN_PATH)),
        GuardOutcome::UnauthorizedRedirect => Err(redirect(UNAUTHORIZED_PATH)),
    }
}

/// Like [`ensure_roles`] but admits any authenticated role.
pub fn ensure_session(req: &HttpRequest) -> Result<AuthSession, HttpResponse> {
    match req.extensions().get::<SessionState>() {
        Some(SessionState::Active(session)) => Ok(session.clone()),
        Some(SessionState::Anonymous) => Err(redirect(LOGIN_PATH)),
        None => Err(HttpResponse::NoContent().finish()),
    }
}

pub fn redirect(target: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, target))
        .finish()
}
