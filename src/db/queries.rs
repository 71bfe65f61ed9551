use anyhow::Context;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingStatus, BookingType, ContactMessage, Member, NewBooking};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const BOOKING_COLUMNS: &str =
    "id, status, title, start, \"end\", name, email, phone, booking_type, message, created_at";

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(s: &str) -> anyhow::Result<DateTime<Utc>> {
    let ts = DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("invalid stored timestamp: {s}"))?;
    Ok(ts.with_timezone(&Utc))
}

// ── Bookings ──

pub fn insert_booking(conn: &Connection, booking: &NewBooking) -> anyhow::Result<Booking> {
    let created_at = Utc::now();

    conn.execute(
        "INSERT INTO bookings (status, title, start, \"end\", name, email, phone, booking_type, message, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.status.as_str(),
            booking.title,
            booking.start,
            booking.end,
            booking.name,
            booking.email,
            booking.phone,
            booking.booking_type.map(|t| t.as_str()),
            booking.message,
            format_timestamp(&created_at),
        ],
    )?;

    Ok(Booking {
        id: conn.last_insert_rowid(),
        status: booking.status,
        title: booking.title.clone(),
        start: booking.start.clone(),
        end: booking.end.clone(),
        booking_type: booking.booking_type,
        name: booking.name.clone(),
        email: booking.email.clone(),
        phone: booking.phone.clone(),
        message: booking.message.clone(),
        created_at,
    })
}

/// Approved bookings in calendar order. `start` is fixed-width ISO text, so
/// ordering by the string is chronological.
pub fn get_approved_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE status = 'approved' ORDER BY start ASC, id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_all_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC, id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: i64) -> anyhow::Result<Option<Booking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_booking_row(row)));

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_booking_status(
    conn: &Connection,
    id: i64,
    status: BookingStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let status_str: String = row.get(1)?;
    let booking_type_str: Option<String> = row.get(8)?;
    let created_at_str: String = row.get(10)?;

    let status = BookingStatus::parse(&status_str)
        .with_context(|| format!("unknown booking status: {status_str}"))?;

    Ok(Booking {
        id: row.get(0)?,
        status,
        title: row.get(2)?,
        start: row.get(3)?,
        end: row.get(4)?,
        // Legacy requests may carry free-text types; those read back as untyped.
        booking_type: booking_type_str.as_deref().and_then(BookingType::parse),
        name: row.get(5)?,
        email: row.get(6)?,
        phone: row.get(7)?,
        message: row.get(9)?,
        created_at: parse_timestamp(&created_at_str)?,
    })
}

// ── Contact messages ──

pub fn insert_contact_message(
    conn: &Connection,
    name: &str,
    email: &str,
    message: &str,
) -> anyhow::Result<ContactMessage> {
    let created_at = Utc::now();
    conn.execute(
        "INSERT INTO contact_messages (name, email, message, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![name, email, message, format_timestamp(&created_at)],
    )?;

    Ok(ContactMessage {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
        created_at,
    })
}

pub fn get_contact_messages(conn: &Connection) -> anyhow::Result<Vec<ContactMessage>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, message, created_at FROM contact_messages ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map([], |row| Ok(parse_contact_row(row)))?;

    let mut messages = vec![];
    for row in rows {
        messages.push(row??);
    }
    Ok(messages)
}

fn parse_contact_row(row: &rusqlite::Row) -> anyhow::Result<ContactMessage> {
    let created_at_str: String = row.get(4)?;
    Ok(ContactMessage {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        message: row.get(3)?,
        created_at: parse_timestamp(&created_at_str)?,
    })
}

pub fn delete_contact_message(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM contact_messages WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Members ──

pub fn insert_member(
    conn: &Connection,
    name: &str,
    email: &str,
    phone: Option<&str>,
) -> anyhow::Result<Member> {
    let created_at = Utc::now();
    conn.execute(
        "INSERT INTO members (name, email, phone, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![name, email, phone, format_timestamp(&created_at)],
    )?;

    Ok(Member {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.map(str::to_string),
        created_at,
    })
}

pub fn get_members(conn: &Connection) -> anyhow::Result<Vec<Member>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, phone, created_at FROM members ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map([], |row| Ok(parse_member_row(row)))?;

    let mut members = vec![];
    for row in rows {
        members.push(row??);
    }
    Ok(members)
}

fn parse_member_row(row: &rusqlite::Row) -> anyhow::Result<Member> {
    let created_at_str: String = row.get(4)?;
    Ok(Member {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        created_at: parse_timestamp(&created_at_str)?,
    })
}

pub fn delete_member(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM members WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Admin sessions ──

pub fn create_session(
    conn: &Connection,
    token: &str,
    expires_at: &DateTime<Utc>,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO admin_sessions (token, created_at, expires_at) VALUES (?1, ?2, ?3)",
        params![token, format_timestamp(&Utc::now()), format_timestamp(expires_at)],
    )?;
    Ok(())
}

pub fn is_session_valid(conn: &Connection, token: &str) -> anyhow::Result<bool> {
    let now = format_timestamp(&Utc::now());
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM admin_sessions WHERE token = ?1 AND expires_at > ?2",
        params![token, now],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn delete_session(conn: &Connection, token: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM admin_sessions WHERE token = ?1", params![token])?;
    Ok(count > 0)
}

pub fn purge_expired_sessions(conn: &Connection) -> anyhow::Result<usize> {
    let now = format_timestamp(&Utc::now());
    let count = conn.execute("DELETE FROM admin_sessions WHERE expires_at <= ?1", params![now])?;
    Ok(count)
}
