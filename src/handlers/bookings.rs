use std::sync::Arc;

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::CalendarEvent;
use crate::services::ledger::{self, DirectRequest, PendingRequest, MISSING_FIELDS};
use crate::services::notify::{dispatch, Notification};
use crate::state::AppState;

use super::ack_page;

// GET /api/bookings
#[derive(Serialize)]
pub struct EventsResponse {
    ok: bool,
    events: Vec<CalendarEvent>,
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EventsResponse>, AppError> {
    let events = {
        let db = state.db()?;
        ledger::list_public_events(&db).map_err(|e| {
            tracing::error!(error = %e, "failed to load public calendar");
            AppError::Internal("could not load bookings".to_string())
        })?
    };

    Ok(Json(EventsResponse { ok: true, events }))
}

// POST /api/booking (form)
#[derive(Deserialize)]
pub struct BookingRequestForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "type", alias = "booking_type")]
    pub booking_type: Option<String>,
    pub message: Option<String>,
}

pub async fn request_booking(
    State(state): State<Arc<AppState>>,
    form: Result<Form<BookingRequestForm>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            return ack_page(
                StatusCode::BAD_REQUEST,
                "Oj!",
                &format!("Formuläret kunde inte läsas ({}).", e.body_text()),
                "/boka.html",
            )
        }
    };

    let request = PendingRequest {
        name: form.name,
        email: form.email,
        phone: form.phone,
        date: form.date,
        booking_type: form.booking_type,
        message: form.message,
    };

    let stored = state
        .db()
        .and_then(|db| ledger::submit_pending(&db, &request));

    match stored {
        Ok(booking) => {
            dispatch(
                state.notifier.as_ref(),
                Notification::BookingRequest {
                    id: booking.id,
                    name: booking.name.unwrap_or_default(),
                    email: booking.email.unwrap_or_default(),
                    phone: booking.phone,
                    date: booking.start,
                    booking_type: request.booking_type,
                    message: booking.message,
                },
            )
            .await;

            ack_page(
                StatusCode::OK,
                "Tack!",
                "Bokningsförfrågan är mottagen. Vi bekräftar via e-post.",
                "/boka.html",
            )
        }
        Err(AppError::Validation(msg)) => {
            let text = if msg.starts_with(MISSING_FIELDS) {
                format!("Du måste fylla i namn, e-post och datum ({msg}).")
            } else {
                format!("Förfrågan kunde inte tas emot ({msg}).")
            };
            ack_page(StatusCode::BAD_REQUEST, "Oj!", &text, "/boka.html")
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to store booking request");
            ack_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Oj!",
                "Något gick fel när vi skulle spara förfrågan.",
                "/boka.html",
            )
        }
    }
}

// POST /api/book (JSON)
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct DirectBookingBody {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date: String,
    pub booking_type: String,
    pub time_slot: Option<String>,
}

#[derive(Serialize)]
pub struct DirectBookingResponse {
    ok: bool,
    id: i64,
    message: String,
}

pub async fn book_direct(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DirectBookingBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let request = DirectRequest {
        name: body.name,
        email: body.email,
        phone: body.phone,
        date: body.date,
        booking_type: body.booking_type,
        time_slot: body.time_slot,
    };

    let booking = {
        let mut db = state.db()?;
        ledger::book_direct(&mut db, &request)?
    };

    dispatch(
        state.notifier.as_ref(),
        Notification::DirectBooking {
            id: booking.id,
            title: booking.title.clone(),
            start: booking.start.clone(),
            end: booking.end.clone(),
            email: booking.email.clone().unwrap_or_default(),
        },
    )
    .await;

    let response = DirectBookingResponse {
        ok: true,
        id: booking.id,
        message: format!("Bokning bekräftad: {}", booking.title),
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}
