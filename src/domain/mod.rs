pub mod availability;
pub mod booking;
pub mod booking_query;
pub mod commands;
pub mod errors;
pub mod value_objects;

pub use booking::*;
pub use booking_query::*;
pub use errors::*;
pub use value_objects::*;
