use super::app::AppState;
use crate::config::Users;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use std::sync::Arc;

pub async fn require_basic_auth(
    State(app): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(users) = app.users() {
        let credentials = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        if !check_basic_auth(credentials, users) {
            tracing::info!("rejecting unauthenticated request to {}", request.uri());
            return (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"mpris-remote\"")],
                Json(json!({ "message": "Unauthorized" })),
            )
                .into_response();
        }
    }
    next.run(request).await
}

fn check_basic_auth(header: Option<&str>, users: &Users) -> bool {
    let Some(encoded) = header.and_then(|header| header.strip_prefix("Basic ")) else {
        return false;
    };
    let Some(decoded) = STANDARD
        .decode(encoded.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
    else {
        return false;
    };
    decoded
        .split_once(':')
        .and_then(|(user, password)| users.get(user).map(|expected| expected == password))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::{router, send, RecordingBackend};
    use axum::http::Method;

    fn users() -> Users {
        Users::from([("user".to_owned(), "password".to_owned())])
    }

    fn basic(credentials: &str) -> String {
        format!("Basic {}", STANDARD.encode(credentials))
    }

    #[test]
    fn checks_credentials() {
        let users = users();
        assert!(check_basic_auth(Some(&basic("user:password")), &users));
        assert!(!check_basic_auth(Some(&basic("user:wrong")), &users));
        assert!(!check_basic_auth(Some(&basic("other:password")), &users));
        assert!(!check_basic_auth(Some(&basic("userpassword")), &users));
        assert!(!check_basic_auth(Some("Bearer abc"), &users));
        assert!(!check_basic_auth(Some("Basic !!!"), &users));
        assert!(!check_basic_auth(None, &users));
    }

    #[tokio::test]
    async fn rejects_missing_credentials() {
        let backend = Arc::new(RecordingBackend::default());
        let router = router(backend.clone(), Some(users()));

        let (status, body) = send(&router, Method::POST, "/api/player/play", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "Unauthorized" }));

        let wrong = basic("user:nope");
        let (status, _) =
            send(&router, Method::POST, "/api/player/play", None, Some(&wrong)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn accepts_valid_credentials() {
        let backend = Arc::new(RecordingBackend::default());
        let router = router(backend.clone(), Some(users()));
        let auth = basic("user:password");
        let (status, body) =
            send(&router, Method::POST, "/api/player/play", None, Some(&auth)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": true }));
        assert_eq!(backend.calls(), ["play"]);
    }

    #[tokio::test]
    async fn disabled_auth_lets_everything_through() {
        let backend = Arc::new(RecordingBackend::default());
        let router = router(backend.clone(), None);
        let (status, _) = send(&router, Method::POST, "/api/player/play", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
