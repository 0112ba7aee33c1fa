//! The served application: routes, rate limits, and the middleware stack.
//!
//! Serve with `into_make_service_with_connect_info::<SocketAddr>()` so the
//! rate limiters can key direct connections by peer address.

use axum::{Router, middleware as axum_middleware};
use tower_http::trace::TraceLayer;

use crate::middleware;
use crate::routes;
use crate::state::AppState;

/// Build the full application around `state`.
pub fn app(state: AppState) -> Router {
    let api_limiter = middleware::api_rate_limiter();

    Router::new()
        .merge(routes::health_routes())
        .nest(
            "/api/auth",
            routes::auth_routes().layer(middleware::auth_rate_limiter()),
        )
        .nest(
            "/api/vendors",
            routes::vendor_routes().layer(api_limiter.clone()),
        )
        .nest("/api/cart", routes::cart_routes().layer(api_limiter))
        .layer(axum_middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::SocketAddr;

    use axum::{
        body::Body,
        extract::ConnectInfo,
        http::{HeaderMap, Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::CookieConfig;

    fn test_app() -> Router {
        app(AppState::unreachable_db(CookieConfig::default()))
    }

    /// A request as it arrives on a direct connection from `peer`.
    fn direct(method: Method, uri: &str, peer: [u8; 4]) -> Request<Body> {
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((peer, 51000))));
        request
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    #[tokio::test]
    async fn test_logout_over_direct_connection() {
        let (status, headers, body) = send(
            test_app(),
            direct(Method::POST, "/api/auth/logout", [127, 0, 0, 1]),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get_all(header::SET_COOKIE).iter().count(), 2);
        assert!(headers.contains_key("x-request-id"));
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(
            body,
            json!({"success": true, "data": {"message": "Logged out successfully"}})
        );
    }

    #[tokio::test]
    async fn test_cart_validation_over_direct_connection() {
        let mut request = direct(Method::POST, "/api/cart/validate/update", [127, 0, 0, 1]);
        request
            .headers_mut()
            .insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        *request.body_mut() = Body::from(r#"{"quantity": 3}"#);

        let (status, _, body) = send(test_app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "data": {"quantity": 3}}));
    }

    #[tokio::test]
    async fn test_logout_is_throttled_with_envelope() {
        let app = test_app();

        for _ in 0..5 {
            let (status, _, _) = send(
                app.clone(),
                direct(Method::POST, "/api/auth/logout", [198, 51, 100, 4]),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, headers, body) = send(
            app.clone(),
            direct(Method::POST, "/api/auth/logout", [198, 51, 100, 4]),
        )
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert!(headers.contains_key("retry-after"));
        assert!(headers.contains_key("x-request-id"));
        assert_eq!(body, json!({"success": false, "error": "Too many requests"}));

        // The auth budget is separate from the rest of the API
        let (status, _, _) = send(
            app,
            direct(Method::GET, "/api/vendors/Not_A_Slug", [198, 51, 100, 4]),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unidentified_client_gets_envelope() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/auth/logout")
            .body(Body::empty())
            .unwrap();

        let (status, headers, body) = send(test_app(), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(headers.contains_key("x-request-id"));
        assert_eq!(
            body,
            json!({"success": false, "error": "Internal server error"})
        );
    }

    #[tokio::test]
    async fn test_health_is_not_rate_limited() {
        let app = test_app();

        for _ in 0..10 {
            let request = Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}
