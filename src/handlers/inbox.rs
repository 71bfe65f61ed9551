use std::sync::Arc;

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::{Form, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::inbox;
use crate::services::notify::{dispatch, Notification};
use crate::state::AppState;

use super::ack_page;

// POST /api/contact (form)
#[derive(Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    form: Result<Form<ContactForm>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            return ack_page(
                StatusCode::BAD_REQUEST,
                "Oj!",
                &format!("Formuläret kunde inte läsas ({}).", e.body_text()),
                "/kontakt.html",
            )
        }
    };

    let stored = state
        .db()
        .and_then(|db| inbox::submit_contact(&db, &form.name, &form.email, &form.message));

    match stored {
        Ok(message) => {
            dispatch(
                state.notifier.as_ref(),
                Notification::ContactMessage {
                    id: message.id,
                    name: message.name,
                    email: message.email,
                    message: message.message,
                },
            )
            .await;

            ack_page(
                StatusCode::OK,
                "Tack!",
                "Ditt meddelande är mottaget. Vi återkommer så snart vi kan.",
                "/kontakt.html",
            )
        }
        Err(AppError::Validation(msg)) => ack_page(
            StatusCode::BAD_REQUEST,
            "Oj!",
            &format!("Formuläret är inte komplett ({msg})."),
            "/kontakt.html",
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to store contact message");
            ack_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Oj!",
                "Något gick fel när vi skulle spara meddelandet.",
                "/kontakt.html",
            )
        }
    }
}

// POST /api/members (JSON)
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct MemberBody {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

pub async fn sign_up_member(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MemberBody>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let member = {
        let db = state.db()?;
        inbox::sign_up_member(&db, &body.name, &body.email, body.phone.as_deref())?
    };

    dispatch(
        state.notifier.as_ref(),
        Notification::MembershipSignup {
            id: member.id,
            name: member.name,
            email: member.email,
            phone: member.phone,
        },
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"ok": true, "id": member.id})),
    ))
}
