use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::Admin;
use crate::errors::AppError;
use crate::models::{Booking, ContactMessage, Member};
use crate::services::inbox;
use crate::services::ledger::{self, AdminEntry};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ItemsResponse<T> {
    ok: bool,
    items: Vec<T>,
}

impl<T> ItemsResponse<T> {
    fn new(items: Vec<T>) -> Json<Self> {
        Json(Self { ok: true, items })
    }
}

fn ok() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true}))
}

fn path_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    let Path(id) = path.map_err(|e| AppError::Validation(e.body_text()))?;
    Ok(id)
}

// GET /api/admin/bookings
pub async fn list_bookings(
    _admin: Admin,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ItemsResponse<Booking>>, AppError> {
    let bookings = {
        let db = state.db()?;
        ledger::list_all(&db)?
    };
    Ok(ItemsResponse::new(bookings))
}

// POST /api/admin/add
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct AddBookingRequest {
    pub title: String,
    pub start: String,
    pub end: Option<String>,
}

pub async fn add_booking(
    _admin: Admin,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let booking = {
        let db = state.db()?;
        ledger::admin_add(
            &db,
            &AdminEntry {
                title: body.title,
                start: body.start,
                end: body.end,
            },
        )?
    };

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"ok": true, "id": booking.id})),
    ))
}

// POST /api/admin/set-status
#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub id: i64,
    pub status: String,
}

pub async fn set_status(
    _admin: Admin,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SetStatusRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    if body.id <= 0 {
        return Err(AppError::Validation(format!("invalid booking id {}", body.id)));
    }

    {
        let db = state.db()?;
        ledger::set_status(&db, body.id, &body.status)?;
    }
    Ok(ok())
}

// DELETE /api/admin/bookings/:id
pub async fn delete_booking(
    _admin: Admin,
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = path_id(path)?;
    {
        let db = state.db()?;
        ledger::delete(&db, id)?;
    }
    Ok(ok())
}

// GET /api/admin/messages
pub async fn list_messages(
    _admin: Admin,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ItemsResponse<ContactMessage>>, AppError> {
    let messages = {
        let db = state.db()?;
        inbox::list_contact_messages(&db)?
    };
    Ok(ItemsResponse::new(messages))
}

// DELETE /api/admin/messages/:id
pub async fn delete_message(
    _admin: Admin,
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = path_id(path)?;
    {
        let db = state.db()?;
        inbox::delete_contact_message(&db, id)?;
    }
    Ok(ok())
}

// GET /api/admin/members
pub async fn list_members(
    _admin: Admin,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ItemsResponse<Member>>, AppError> {
    let members = {
        let db = state.db()?;
        inbox::list_members(&db)?
    };
    Ok(ItemsResponse::new(members))
}

// DELETE /api/admin/members/:id
pub async fn delete_member(
    _admin: Admin,
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = path_id(path)?;
    {
        let db = state.db()?;
        inbox::delete_member(&db, id)?;
    }
    Ok(ok())
}
