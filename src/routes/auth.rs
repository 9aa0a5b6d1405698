use axum::{
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    response::Json,
    routing::post,
    Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::services::auth::{Credentials, Session};
use crate::utils::config::AppState;

/// Extractor for routes that need a signed-in dashboard user.
pub struct RequireSession(pub Session);

fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let session = state
            .sessions
            .get(&token)
            .await
            .filter(Session::is_authenticated)
            .ok_or(AppError::Unauthorized)?;
        Ok(RequireSession(session))
    }
}

pub async fn login_handler(
    State(app_state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> AppResult<Json<Value>> {
    tracing::info!("Sign-in attempt for {}", credentials.email);

    let session = Session::SignedOut
        .sign_in(&credentials, app_state.authenticator.as_ref())
        .map_err(|e| {
            tracing::warn!("Sign-in rejected for {}", credentials.email);
            e
        })?;
    app_state.sessions.insert(session.clone()).await;

    tracing::info!("✅ {} signed in", credentials.email);
    Ok(Json(json!({
        "success": true,
        "message": "Signed in",
        "data": session
    })))
}

pub async fn logout_handler(
    State(app_state): State<AppState>,
    RequireSession(session): RequireSession,
) -> AppResult<Json<Value>> {
    if let Some(token) = session.token() {
        app_state.sessions.remove(&token).await;
    }
    let session = session.sign_out();

    Ok(Json(json!({
        "success": true,
        "message": "Signed out",
        "data": session
    })))
}

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::Config;
    use axum::http::Request;

    fn state() -> AppState {
        AppState::new(Config {
            dashboard_email: Some("owner@example.com".to_string()),
            dashboard_password: Some("hunter2".to_string()),
            ..Config::default()
        })
        .unwrap()
    }

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/dashboard/overview");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    async fn sign_in(app_state: &AppState) -> Uuid {
        let Json(body) = login_handler(
            State(app_state.clone()),
            Json(Credentials {
                email: "owner@example.com".to_string(),
                password: "hunter2".to_string(),
            }),
        )
        .await
        .unwrap();
        Uuid::parse_str(body["data"]["token"].as_str().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_login_then_access() {
        let app_state = state();
        let token = sign_in(&app_state).await;

        let mut parts = parts(Some(&format!("Bearer {}", token)));
        let RequireSession(session) = RequireSession::from_request_parts(&mut parts, &app_state)
            .await
            .unwrap();
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_rejects_missing_or_unknown_token() {
        let app_state = state();

        let mut missing = parts(None);
        assert!(RequireSession::from_request_parts(&mut missing, &app_state).await.is_err());

        let mut unknown = parts(Some(&format!("Bearer {}", Uuid::new_v4())));
        assert!(RequireSession::from_request_parts(&mut unknown, &app_state).await.is_err());

        let mut garbage = parts(Some("Bearer nope"));
        assert!(RequireSession::from_request_parts(&mut garbage, &app_state).await.is_err());
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let err = login_handler(
            State(state()),
            Json(Credentials {
                email: "owner@example.com".to_string(),
                password: "wrong".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_logout_forgets_session() {
        let app_state = state();
        let token = sign_in(&app_state).await;
        let session = app_state.sessions.get(&token).await.unwrap();

        let Json(body) = logout_handler(State(app_state.clone()), RequireSession(session))
            .await
            .unwrap();
        assert_eq!(body["data"]["state"], "signed_out");

        let mut parts = parts(Some(&format!("Bearer {}", token)));
        assert!(RequireSession::from_request_parts(&mut parts, &app_state).await.is_err());
    }
}
