pub mod booking;
pub mod inbox;

pub use booking::{Booking, BookingStatus, BookingType, CalendarEvent, NewBooking};
pub use inbox::{ContactMessage, Member};
