use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::auth;
use crate::errors::AppError;
use crate::state::AppState;

// POST /api/login
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let token = {
        let db = state.db()?;
        auth::login(&db, &state.config, &body.password)?
    };

    let cookie = auth::session_cookie(&token, &state.config)?;
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({"ok": true})),
    )
        .into_response())
}

// POST /api/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    {
        let db = state.db()?;
        auth::logout(&db, &headers)?;
    }

    let cookie = auth::expired_session_cookie(&state.config);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({"ok": true})),
    )
        .into_response())
}
