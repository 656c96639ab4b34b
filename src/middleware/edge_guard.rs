use crate::handlers::guard::{DASHBOARD_ROOT, LOGIN_PATH};
use crate::handlers::session::{edge_token_is_valid, EDGE_TOKEN_COOKIE};
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header,
    Error, HttpResponse,
};
use futures_util::future::{ok, Ready};
use std::{
    future::Future,
    pin::Pin,
    rc::Rc,
};

/// Path prefix under which every request needs a valid token cookie.
pub const PROTECTED_PREFIX: &str = "/api/protected";

//Edge Decision
/// The two-rule table applied before any route code: protected paths need a
/// valid token cookie, and the login view bounces already-authenticated
/// visitors back to the dashboard root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeDecision {
    PassThrough,
    RedirectLogin,
    RedirectDashboard,
}

pub fn edge_decision(path: &str, token_is_valid: bool) -> EdgeDecision {
    if is_protected(path) && !token_is_valid {
        return EdgeDecision::RedirectLogin;
    }
    if path == LOGIN_PATH && token_is_valid {
        return EdgeDecision::RedirectDashboard;
    }
    EdgeDecision::PassThrough
}

fn is_protected(path: &str) -> bool {
    path == DASHBOARD_ROOT || path.starts_with(PROTECTED_PREFIX)
}

/// Middleware applying [`edge_decision`] from the raw token cookie. Runs
/// outside the session machinery, which it cannot read.
pub struct EdgeGuard;

impl<S, B> Transform<S, ServiceRequest> for EdgeGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = EdgeGuardMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(EdgeGuardMiddleware {
            service: Rc::new(service),
        })
    }
}

pub struct EdgeGuardMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for EdgeGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        let token_is_valid = req
            .cookie(EDGE_TOKEN_COOKIE)
            .map(|cookie| edge_token_is_valid(cookie.value()))
            .unwrap_or(false);
        let decision = edge_decision(req.path(), token_is_valid);

        Box::pin(async move {
            let target = match decision {
                EdgeDecision::PassThrough => return service.call(req).await,
                EdgeDecision::RedirectLogin => LOGIN_PATH,
                EdgeDecision::RedirectDashboard => DASHBOARD_ROOT,
            };
            let redirect = HttpResponse::Found()
                .insert_header((header::LOCATION, target))
                .finish();
            Err(InternalError::from_response("Edge guard redirect", redirect).into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_path_without_token_goes_to_login() {
        assert_eq!(
            edge_decision("/api/protected/workers", false),
            EdgeDecision::RedirectLogin
        );
        assert_eq!(edge_decision("/", false), EdgeDecision::RedirectLogin);
    }

    #[test]
    fn protected_path_with_token_passes() {
        assert_eq!(
            edge_decision("/api/protected/workers", true),
            EdgeDecision::PassThrough
        );
        assert_eq!(edge_decision("/", true), EdgeDecision::PassThrough);
    }

    #[test]
    fn login_with_token_goes_to_dashboard_root() {
        assert_eq!(edge_decision("/login", true), EdgeDecision::RedirectDashboard);
    }

    #[test]
    fn login_without_token_passes() {
        assert_eq!(edge_decision("/login", false), EdgeDecision::PassThrough);
    }

    #[test]
    fn public_paths_always_pass() {
        assert_eq!(
            edge_decision("/api/public/auth/login", false),
            EdgeDecision::PassThrough
        );
        assert_eq!(edge_decision("/unauthorized", false), EdgeDecision::PassThrough);
        assert_eq!(edge_decision("/unauthorized", true), EdgeDecision::PassThrough);
    }
}
