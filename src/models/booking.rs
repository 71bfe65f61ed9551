use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub status: BookingStatus,
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub booking_type: Option<BookingType>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A row about to be inserted. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewBooking {
    pub status: BookingStatus,
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub booking_type: Option<BookingType>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// What the public calendar sees of an approved booking.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_type: Option<BookingType>,
}

impl From<Booking> for CalendarEvent {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            title: b.title,
            start: b.start,
            end: b.end,
            booking_type: b.booking_type,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Approved,
    #[default]
    Pending,
    Denied,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Approved => "approved",
            BookingStatus::Pending => "pending",
            BookingStatus::Denied => "denied",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "approved" => Some(BookingStatus::Approved),
            "pending" => Some(BookingStatus::Pending),
            "denied" => Some(BookingStatus::Denied),
            _ => None,
        }
    }
}

/// Shape of a direct booking. The wire tags are the Swedish ones the site uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingType {
    /// One of the fixed two-hour slots.
    #[serde(rename = "2h")]
    TwoHours,
    /// A whole calendar day ("heldag").
    #[serde(rename = "heldag")]
    FullDay,
    /// Two consecutive days starting on the booked date ("helg").
    #[serde(rename = "helg")]
    Weekend,
}

impl BookingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::TwoHours => "2h",
            BookingType::FullDay => "heldag",
            BookingType::Weekend => "helg",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "2h" => Some(BookingType::TwoHours),
            "heldag" => Some(BookingType::FullDay),
            "helg" => Some(BookingType::Weekend),
            _ => None,
        }
    }
}
