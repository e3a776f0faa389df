//! Request logging middleware.
//!
//! One line when a request arrives and one when it completes, under the
//! `api` target. Uploads log their declared body size; redirects after a
//! save log the item they point at. Client errors are logged as warnings
//! and server errors as errors.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::{StatusCode, header};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::time::Instant;
use tracing::{error, info, warn};

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

/// Short label for how a request ended.
fn outcome(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "server error"
    } else if status.is_client_error() {
        "client error"
    } else if status.is_redirection() {
        "redirect"
    } else {
        "completed"
    }
}

fn header_str(headers: &header::HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let remote_addr = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();
        let body_size = header_str(req.headers(), header::CONTENT_LENGTH);

        info!(
            target: "api",
            method = %method,
            path = %path,
            remote_addr = %remote_addr,
            body_size = %body_size,
            "→ {} {}", method, path
        );

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let status = res.status();
            let elapsed_ms = start.elapsed().as_millis();
            let location = header_str(res.headers(), header::LOCATION);
            let label = outcome(status);

            match status.as_u16() {
                500.. => error!(
                    target: "api",
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    duration_ms = %elapsed_ms,
                    "← {}", label
                ),
                400..=499 => warn!(
                    target: "api",
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    duration_ms = %elapsed_ms,
                    "← {}", label
                ),
                _ => info!(
                    target: "api",
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    location = %location,
                    duration_ms = %elapsed_ms,
                    "← {}", label
                ),
            }

            Ok(res)
        })
    }
}
