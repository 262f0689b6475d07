use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_booking, decide_booking, get_booking, get_item_booking_summary,
    list_bookings_on_my_items, list_my_bookings,
};

/// Creates the API router with all booking endpoints
///
/// Every endpoint except /health expects the `X-Sharer-User-Id` header.
///
/// Command endpoints:
/// - POST /bookings - Request a booking
/// - PATCH /bookings/:id?approved=true|false - Approve or reject a booking
///
/// Query endpoints:
/// - GET /bookings - Bookings made by the caller
/// - GET /bookings/owner - Bookings on the caller's items
/// - GET /bookings/:id - Booking details
/// - GET /items/:id/bookings/summary - Last and next approved booking of an item
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/bookings", post(create_booking).get(list_my_bookings))
        .route("/bookings/owner", get(list_bookings_on_my_items))
        .route("/bookings/:id", get(get_booking).patch(decide_booking))
        .route("/items/:id/bookings/summary", get(get_item_booking_summary))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
