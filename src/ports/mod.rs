pub mod booking_repository;
pub mod item_directory;
pub mod user_directory;

pub use booking_repository::{BookingRepository, InsertOutcome};
pub use item_directory::{ItemDirectory, ItemRecord};
pub use user_directory::{UserDirectory, UserRecord};
