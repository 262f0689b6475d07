pub mod booking_repository;
pub mod item_directory;
pub mod user_directory;

pub use booking_repository::BookingRepository;
pub use item_directory::ItemDirectory;
pub use user_directory::UserDirectory;
