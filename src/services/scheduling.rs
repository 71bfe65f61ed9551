//! Date arithmetic behind direct bookings.
//!
//! Every approved booking is normalized to a half-open span `[start, end)` and
//! a request is refused when its own span overlaps any of them. A bare date
//! covers the whole day, a weekend covers two days, and a two-hour slot covers
//! exactly its slot, so one overlap test yields all the per-type rules.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::{Booking, BookingType};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const DATE_TIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// The bookable two-hour slots, as (start hour, end hour).
pub const TIME_SLOTS: [(u32, u32); 4] = [(9, 11), (12, 14), (15, 17), (18, 20)];

#[derive(Debug, PartialEq)]
pub enum SchedulingError {
    InvalidDate(String),
    InvalidSlot(String),
    Conflict { title: String },
}

impl std::fmt::Display for SchedulingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulingError::InvalidDate(raw) => {
                write!(f, "invalid date '{raw}', expected YYYY-MM-DD")
            }
            SchedulingError::InvalidSlot(raw) => {
                write!(
                    f,
                    "invalid time slot '{raw}', choose one of {}",
                    TIME_SLOTS
                        .iter()
                        .map(|(s, e)| format!("{s:02}:00-{e:02}:00"))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            SchedulingError::Conflict { .. } => {
                write!(f, "the selected date or time slot is already booked")
            }
        }
    }
}

impl std::error::Error for SchedulingError {}

/// A stored `start`/`end` value: either a calendar date or a wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarPoint {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// Stored dates must keep the fixed-width `YYYY-MM-DD` prefix so that text
/// order is chronological. chrono alone also accepts signed extended years.
fn has_plain_year(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 5 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-'
}

impl CalendarPoint {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if !has_plain_year(s) {
            return None;
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
            return Some(CalendarPoint::Date(date));
        }
        DATE_TIME_INPUT_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(CalendarPoint::DateTime)
    }

    /// The instant this point begins at; a date begins at midnight.
    pub fn instant(self) -> NaiveDateTime {
        match self {
            CalendarPoint::Date(date) => date.and_time(NaiveTime::MIN),
            CalendarPoint::DateTime(dt) => dt,
        }
    }

    /// Canonical fixed-width text, so stored values sort chronologically.
    pub fn to_stored(self) -> String {
        match self {
            CalendarPoint::Date(date) => date.format(DATE_FORMAT).to_string(),
            CalendarPoint::DateTime(dt) => dt.format(DATE_TIME_FORMAT).to_string(),
        }
    }
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Span {
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    fn days(date: NaiveDate, days: i64) -> Option<Self> {
        let start = date.and_time(NaiveTime::MIN);
        let end = start.checked_add_signed(Duration::days(days))?;
        Some(Span { start, end })
    }
}

/// Span covered by a stored booking. A missing end (or one not after the
/// start) means "the whole day" for a date and "that minute" for a time.
pub fn stored_span(start: &str, end: Option<&str>) -> Option<Span> {
    let start = CalendarPoint::parse(start)?;
    let begin = start.instant();

    let explicit_end = end
        .and_then(CalendarPoint::parse)
        .map(CalendarPoint::instant)
        .filter(|e| *e > begin);

    let end = match explicit_end {
        Some(end) => end,
        None => match start {
            CalendarPoint::Date(_) => begin.checked_add_signed(Duration::days(1))?,
            CalendarPoint::DateTime(_) => begin.checked_add_signed(Duration::minutes(1))?,
        },
    };

    Some(Span { start: begin, end })
}

/// Whole day named by the leading `YYYY-MM-DD` of a stored value that is
/// otherwise unreadable, such as `2024-06-01T10:00:00.000Z`.
fn day_prefix_span(start: &str) -> Option<Span> {
    let prefix = start.trim().get(..10)?;
    let date = parse_date(prefix).ok()?;
    Span::days(date, 1)
}

/// Resolves a slot given either as its start ("09:00") or as the full range
/// ("09:00-11:00" or "09:00–11:00").
pub fn parse_time_slot(raw: &str) -> Result<(u32, u32), SchedulingError> {
    let normalized = raw.trim().replace('–', "-").replace(' ', "");
    TIME_SLOTS
        .iter()
        .copied()
        .find(|(start, end)| {
            normalized == format!("{start:02}:00")
                || normalized == format!("{start:02}:00-{end:02}:00")
        })
        .ok_or_else(|| SchedulingError::InvalidSlot(raw.trim().to_string()))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, SchedulingError> {
    let raw = raw.trim();
    if !has_plain_year(raw) {
        return Err(SchedulingError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| SchedulingError::InvalidDate(raw.to_string()))
}

/// The row a direct booking would write, plus the span it occupies.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedBooking {
    pub booking_type: BookingType,
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub span: Span,
}

pub fn plan_direct_booking(
    name: &str,
    date: NaiveDate,
    booking_type: BookingType,
    time_slot: Option<&str>,
) -> Result<PlannedBooking, SchedulingError> {
    match booking_type {
        BookingType::TwoHours => {
            let raw_slot = time_slot.unwrap_or("");
            let (start_hour, end_hour) = parse_time_slot(raw_slot)?;
            let (start, end) = match (
                date.and_hms_opt(start_hour, 0, 0),
                date.and_hms_opt(end_hour, 0, 0),
            ) {
                (Some(s), Some(e)) => (s, e),
                _ => return Err(SchedulingError::InvalidSlot(raw_slot.to_string())),
            };

            Ok(PlannedBooking {
                booking_type,
                title: format!("{name} ({start_hour:02}:00–{end_hour:02}:00)"),
                start: start.format(DATE_TIME_FORMAT).to_string(),
                end: Some(end.format(DATE_TIME_FORMAT).to_string()),
                span: Span { start, end },
            })
        }
        BookingType::FullDay => Ok(PlannedBooking {
            booking_type,
            title: format!("{name} (heldag)"),
            start: date.format(DATE_FORMAT).to_string(),
            end: None,
            span: Span::days(date, 1).ok_or_else(|| out_of_range(date))?,
        }),
        BookingType::Weekend => {
            let span = Span::days(date, 2)
                .filter(|span| span.end.year() <= 9999)
                .ok_or_else(|| out_of_range(date))?;
            Ok(PlannedBooking {
                booking_type,
                title: format!("{name} (helhelg)"),
                start: date.format(DATE_FORMAT).to_string(),
                end: Some(span.end.date().format(DATE_FORMAT).to_string()),
                span,
            })
        }
    }
}

fn out_of_range(date: NaiveDate) -> SchedulingError {
    SchedulingError::InvalidDate(date.format(DATE_FORMAT).to_string())
}

/// First booking whose span overlaps `requested`. Callers pass approved
/// bookings only.
///
/// A row whose values cannot be read still blocks the whole day its `start`
/// begins with. Rows without any leading date are skipped.
pub fn find_conflict<'a>(requested: &Span, existing: &'a [Booking]) -> Option<&'a Booking> {
    existing.iter().find(|booking| {
        let span = stored_span(&booking.start, booking.end.as_deref()).or_else(|| {
            let fallback = day_prefix_span(&booking.start);
            tracing::warn!(
                booking_id = booking.id,
                start = %booking.start,
                blocks_day = fallback.is_some(),
                "booking with unreadable start in collision check"
            );
            fallback
        });
        span.is_some_and(|span| span.overlaps(requested))
    })
}

/// Rejects `planned` if it collides with any of `existing`.
pub fn check_availability(
    planned: &PlannedBooking,
    existing: &[Booking],
) -> Result<(), SchedulingError> {
    match find_conflict(&planned.span, existing) {
        Some(booking) => Err(SchedulingError::Conflict {
            title: booking.title.clone(),
        }),
        None => Ok(()),
    }
}
