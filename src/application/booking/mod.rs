mod booking_query;
mod booking_service;
mod details;
mod errors;
mod item_bookings;

pub use booking_query::{list_booker_bookings, list_owner_bookings};
pub use booking_service::{
    ServiceDependencies, create_booking, decide_booking, get_booking, has_conflict,
};
pub use details::{BookerSummary, BookingDetails, ItemSummary};
pub use errors::{BookingApplicationError, Result};
pub use item_bookings::{
    BookingSlot, ItemBookingSummary, has_completed_booking, item_booking_summary,
};
