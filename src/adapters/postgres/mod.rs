pub mod booking_repository;
pub mod item_directory;
pub mod user_directory;

// パブリックに型を再エクスポート
pub use booking_repository::BookingRepository as PostgresBookingRepository;
pub use item_directory::ItemDirectory as PostgresItemDirectory;
pub use user_directory::UserDirectory as PostgresUserDirectory;
