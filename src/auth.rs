use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use rusqlite::Connection;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "admin_session";
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Who is calling, as far as this request is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub is_admin: bool,
}

impl AuthContext {
    pub fn require_admin(self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

/// Extractor that only succeeds for an authenticated admin. Put it before any
/// body extractor so unauthorized calls are refused before validation.
#[derive(Debug, Clone, Copy)]
pub struct Admin;

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Constant-time check against the configured password. An empty configured
/// password matches nothing.
pub fn password_matches(config: &AppConfig, candidate: &str) -> bool {
    let expected = config.admin_password.as_bytes();
    !expected.is_empty() && bool::from(expected.ct_eq(candidate.as_bytes()))
}

pub fn resolve(headers: &HeaderMap, conn: &Connection, config: &AppConfig) -> Result<AuthContext, AppError> {
    let key_matches = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|key| password_matches(config, key));
    if key_matches {
        return Ok(AuthContext { is_admin: true });
    }

    let is_admin = match session_token(headers) {
        Some(token) => queries::is_session_valid(conn, &token)?,
        None => false,
    };
    Ok(AuthContext { is_admin })
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let db = state.db()?;
        resolve(&parts.headers, &db, &state.config)
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_request_parts(parts, state).await?;
        ctx.require_admin()?;
        Ok(Admin)
    }
}

/// Checks the shared admin password and opens a session. Returns the token.
pub fn login(conn: &Connection, config: &AppConfig, password: &str) -> Result<String, AppError> {
    if !password_matches(config, password) {
        tracing::warn!("failed admin login attempt");
        return Err(AppError::Unauthorized);
    }

    let token = Uuid::new_v4().to_string();
    let expires_at = Duration::try_hours(config.session_ttl_hours)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| {
            AppError::Internal(format!(
                "session ttl of {} hours is out of range",
                config.session_ttl_hours
            ))
        })?;
    queries::create_session(conn, &token, &expires_at)?;

    tracing::info!("admin session opened");
    Ok(token)
}

pub fn logout(conn: &Connection, headers: &HeaderMap) -> Result<(), AppError> {
    if let Some(token) = session_token(headers) {
        queries::delete_session(conn, &token)?;
        tracing::info!("admin session closed");
    }
    Ok(())
}

pub fn session_cookie(token: &str, config: &AppConfig) -> Result<String, AppError> {
    let max_age = config.session_ttl_hours.checked_mul(3600).ok_or_else(|| {
        AppError::Internal(format!(
            "session ttl of {} hours is out of range",
            config.session_ttl_hours
        ))
    })?;
    let secure = if config.cookie_secure { "; Secure" } else { "" };
    Ok(format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}{secure}"
    ))
}

pub fn expired_session_cookie(config: &AppConfig) -> String {
    let secure = if config.cookie_secure { "; Secure" } else { "" };
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{secure}")
}
