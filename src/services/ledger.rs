//! The booking ledger: every read and write of the `bookings` table that the
//! HTTP layer performs goes through here.

use rusqlite::{Connection, TransactionBehavior};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, BookingType, CalendarEvent, NewBooking};
use crate::services::scheduling::{self, CalendarPoint};

#[derive(Debug, Clone, Default)]
pub struct PendingRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date: String,
    pub booking_type: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DirectRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date: String,
    pub booking_type: String,
    pub time_slot: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AdminEntry {
    pub title: String,
    pub start: String,
    pub end: Option<String>,
}

pub const MISSING_FIELDS: &str = "missing required fields";

/// Fails with one validation error naming every blank field.
pub fn require_fields(fields: &[(&str, &str)]) -> Result<(), AppError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{MISSING_FIELDS}: {}",
            missing.join(", ")
        )))
    }
}

/// Trims an optional field, treating blank as absent.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_booking_type(raw: &str) -> Result<BookingType, AppError> {
    BookingType::parse(raw).ok_or_else(|| {
        AppError::Validation(format!(
            "unknown booking type '{}', expected 2h, heldag or helg",
            raw.trim()
        ))
    })
}

pub fn list_public_events(conn: &Connection) -> Result<Vec<CalendarEvent>, AppError> {
    let bookings = queries::get_approved_bookings(conn)?;
    Ok(bookings.into_iter().map(CalendarEvent::from).collect())
}

pub fn list_all(conn: &Connection) -> Result<Vec<Booking>, AppError> {
    Ok(queries::get_all_bookings(conn)?)
}

/// Stores a non-binding request for admin review. Never checks availability.
pub fn submit_pending(conn: &Connection, req: &PendingRequest) -> Result<Booking, AppError> {
    require_fields(&[
        ("name", req.name.as_str()),
        ("email", req.email.as_str()),
        ("date", req.date.as_str()),
    ])?;

    let date = req.date.trim();

    // free text from the form; only the known tags are kept on the row
    let booking_type = non_blank(req.booking_type.as_deref()).and_then(|raw| {
        let parsed = BookingType::parse(&raw);
        if parsed.is_none() {
            tracing::warn!(
                booking_type = %raw,
                %date,
                "unknown booking type on request, storing none"
            );
        }
        parsed
    });

    let booking = queries::insert_booking(
        conn,
        &NewBooking {
            status: BookingStatus::Pending,
            title: format!("Request: {date}"),
            start: date.to_string(),
            end: None,
            booking_type,
            name: Some(req.name.trim().to_string()),
            email: Some(req.email.trim().to_string()),
            phone: non_blank(req.phone.as_deref()),
            message: non_blank(req.message.as_deref()),
        },
    )?;

    tracing::info!(booking_id = booking.id, %date, "booking request stored as pending");
    Ok(booking)
}

/// Books directly as approved if nothing approved overlaps the request.
///
/// The approved set is read and the new row written inside one IMMEDIATE
/// transaction, so a concurrent writer cannot slip in between the check and
/// the insert.
pub fn book_direct(conn: &mut Connection, req: &DirectRequest) -> Result<Booking, AppError> {
    require_fields(&[
        ("name", req.name.as_str()),
        ("email", req.email.as_str()),
        ("date", req.date.as_str()),
        ("booking_type", req.booking_type.as_str()),
    ])?;

    let booking_type = parse_booking_type(&req.booking_type)?;
    let date = scheduling::parse_date(&req.date)?;
    let name = req.name.trim();
    let planned = scheduling::plan_direct_booking(
        name,
        date,
        booking_type,
        req.time_slot.as_deref(),
    )?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let approved = queries::get_approved_bookings(&tx)?;
    if let Err(e) = scheduling::check_availability(&planned, &approved) {
        tracing::info!(
            start = %planned.start,
            booking_type = booking_type.as_str(),
            "direct booking rejected: {e:?}"
        );
        return Err(e.into());
    }

    let booking = queries::insert_booking(
        &tx,
        &NewBooking {
            status: BookingStatus::Approved,
            title: planned.title,
            start: planned.start,
            end: planned.end,
            booking_type: Some(booking_type),
            name: Some(name.to_string()),
            email: Some(req.email.trim().to_string()),
            phone: non_blank(req.phone.as_deref()),
            message: None,
        },
    )?;

    tx.commit()?;

    tracing::info!(
        booking_id = booking.id,
        start = %booking.start,
        booking_type = booking_type.as_str(),
        "direct booking approved"
    );
    Ok(booking)
}

/// Admin status change. Any status may follow any other.
pub fn set_status(conn: &Connection, id: i64, status: &str) -> Result<(), AppError> {
    let status = BookingStatus::parse(status).ok_or_else(|| {
        AppError::Validation(format!(
            "invalid status '{}', expected approved, pending or denied",
            status.trim()
        ))
    })?;

    if !queries::update_booking_status(conn, id, status)? {
        return Err(AppError::NotFound(format!("booking {id}")));
    }

    tracing::info!(booking_id = id, status = status.as_str(), "booking status changed");
    Ok(())
}

pub fn delete(conn: &Connection, id: i64) -> Result<(), AppError> {
    if !queries::delete_booking(conn, id)? {
        return Err(AppError::NotFound(format!("booking {id}")));
    }

    tracing::info!(booking_id = id, "booking deleted");
    Ok(())
}

/// Manual entry by an admin: approved straight away and not checked against
/// other bookings.
pub fn admin_add(conn: &Connection, entry: &AdminEntry) -> Result<Booking, AppError> {
    require_fields(&[("title", entry.title.as_str()), ("start", entry.start.as_str())])?;

    let start = CalendarPoint::parse(&entry.start).ok_or_else(|| {
        AppError::Validation(format!("invalid start '{}'", entry.start.trim()))
    })?;

    let end = match non_blank(entry.end.as_deref()) {
        Some(raw) => {
            let end = CalendarPoint::parse(&raw)
                .ok_or_else(|| AppError::Validation(format!("invalid end '{raw}'")))?;
            if end.instant() <= start.instant() {
                return Err(AppError::Validation("end must be after start".to_string()));
            }
            Some(end.to_stored())
        }
        None => None,
    };

    let booking = queries::insert_booking(
        conn,
        &NewBooking {
            status: BookingStatus::Approved,
            title: entry.title.trim().to_string(),
            start: start.to_stored(),
            end,
            ..Default::default()
        },
    )?;

    tracing::info!(booking_id = booking.id, start = %booking.start, "admin booking added");
    Ok(booking)
}
