use crate::handlers::guard::{SessionState, LOGIN_PATH};
use crate::handlers::session;
use actix_identity::Identity;
use actix_session::SessionExt;
use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header,
    Error, HttpMessage, HttpResponse,
};
use futures_util::future::{ok, Ready};
use std::{
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
};

/// Middleware restoring the session for protected routes. Requests without a
/// restorable session are redirected to the login view before any handler
/// runs; everything else proceeds with the session in request extensions.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareMiddleware {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareMiddleware<S> {
    pub service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            // Serialized claims from the identity, if one exists
            let claims_json = req
                .extensions()
                .get::<Identity>()
                .and_then(|identity| identity.id().ok());

            let store = req.get_session();
            match session::restore(claims_json, &store) {
                Some(auth) => {
                    req.extensions_mut().insert(SessionState::Active(auth));
                    service.call(req).await
                }
                None => {
                    let redirect = HttpResponse::Found()
                        .insert_header((header::LOCATION, LOGIN_PATH))
                        .finish();
                    Err(InternalError::from_response("No restorable session", redirect).into())
                }
            }
        })
    }
}
