use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::database::MongoDB;
use crate::services::auth_service;

/// Verifies the bearer token, rejects blacklisted (logged-out) tokens and
/// injects the verified `Claims` into request extensions so handlers can
/// take `web::ReqData<Claims>`.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(|token| token.to_string());

            let token = match token {
                Some(token) => token,
                None => {
                    return Err(actix_web::error::ErrorUnauthorized(
                        "Missing authorization token",
                    ))
                }
            };

            let claims = auth_service::verify_token(&token)
                .map_err(|e| actix_web::error::ErrorUnauthorized(e.to_string()))?;

            let db = req
                .app_data::<web::Data<MongoDB>>()
                .cloned()
                .ok_or_else(|| {
                    actix_web::error::ErrorInternalServerError("Database not configured")
                })?;

            match auth_service::is_blacklisted(&db, &token).await {
                Ok(false) => {}
                Ok(true) => {
                    return Err(actix_web::error::ErrorUnauthorized("Token has been revoked"))
                }
                Err(e) => {
                    log::error!("Blacklist lookup failed: {}", e);
                    return Err(actix_web::error::ErrorInternalServerError(
                        "Token validation failed",
                    ));
                }
            }

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}
