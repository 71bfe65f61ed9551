pub mod admin;
pub mod bookings;
pub mod health;
pub mod inbox;
pub mod session;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health::health))
        .route("/api/bookings", get(bookings::list_events))
        .route("/api/booking", post(bookings::request_booking))
        .route("/api/book", post(bookings::book_direct))
        .route("/api/contact", post(inbox::submit_contact))
        .route("/api/members", post(inbox::sign_up_member))
        .route("/api/login", post(session::login))
        .route("/api/logout", post(session::logout))
        .route("/api/admin/bookings", get(admin::list_bookings))
        .route("/api/admin/bookings/:id", delete(admin::delete_booking))
        .route("/api/admin/add", post(admin::add_booking))
        .route("/api/admin/set-status", post(admin::set_status))
        .route("/api/admin/messages", get(admin::list_messages))
        .route("/api/admin/messages/:id", delete(admin::delete_message))
        .route("/api/admin/members", get(admin::list_members))
        .route("/api/admin/members/:id", delete(admin::delete_member))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Small acknowledgement page for the plain HTML forms on the site.
pub(crate) fn ack_page(
    status: StatusCode,
    heading: &str,
    text: &str,
    back: &str,
) -> (StatusCode, Html<String>) {
    let page = format!(
        "<!doctype html>\n<html lang=\"sv\"><head><meta charset=\"utf-8\"><title>{heading}</title></head>\n\
         <body style=\"font-family:system-ui;padding:2rem\">\n\
         <h1>{heading}</h1>\n<p>{text}</p>\n<p><a href=\"{back}\">Tillbaka</a></p>\n\
         </body></html>\n",
        heading = escape_html(heading),
        text = escape_html(text),
        back = escape_html(back),
    );
    (status, Html(page))
}
