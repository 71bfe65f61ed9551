use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{ContactMessage, Member};
use crate::services::ledger::{non_blank, require_fields};

pub fn submit_contact(
    conn: &Connection,
    name: &str,
    email: &str,
    message: &str,
) -> Result<ContactMessage, AppError> {
    require_fields(&[("name", name), ("email", email), ("message", message)])?;

    let stored = queries::insert_contact_message(conn, name.trim(), email.trim(), message.trim())?;
    tracing::info!(message_id = stored.id, "contact message stored");
    Ok(stored)
}

pub fn list_contact_messages(conn: &Connection) -> Result<Vec<ContactMessage>, AppError> {
    Ok(queries::get_contact_messages(conn)?)
}

pub fn delete_contact_message(conn: &Connection, id: i64) -> Result<(), AppError> {
    if !queries::delete_contact_message(conn, id)? {
        return Err(AppError::NotFound(format!("message {id}")));
    }
    Ok(())
}

pub fn sign_up_member(
    conn: &Connection,
    name: &str,
    email: &str,
    phone: Option<&str>,
) -> Result<Member, AppError> {
    require_fields(&[("name", name), ("email", email)])?;

    let phone = non_blank(phone);
    let member = queries::insert_member(conn, name.trim(), email.trim(), phone.as_deref())?;
    tracing::info!(member_id = member.id, "membership sign-up stored");
    Ok(member)
}

pub fn list_members(conn: &Connection) -> Result<Vec<Member>, AppError> {
    Ok(queries::get_members(conn)?)
}

pub fn delete_member(conn: &Connection, id: i64) -> Result<(), AppError> {
    if !queries::delete_member(conn, id)? {
        return Err(AppError::NotFound(format!("member {id}")));
    }
    Ok(())
}
