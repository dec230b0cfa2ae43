use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::domains::auth::{authorize, Principal, RoutePolicy};
use crate::server::error::ApiError;

/// Apply the access policy gate to a route group.
///
/// Runs after `jwt_auth_middleware` has attached the Principal, if any.
pub async fn require_policy(policy: RoutePolicy, request: Request, next: Next) -> Response {
    let principal = request.extensions().get::<Principal>();
    if let Err(e) = authorize(principal, &policy) {
        return ApiError(e).into_response();
    }
    next.run(request).await
}
