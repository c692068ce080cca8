// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::post,
    middleware,
};

use shared_utils::extractor::identity_middleware;

use crate::handlers;
use crate::services::BookingLedger;

pub fn appointment_routes(ledger: Arc<BookingLedger>) -> Router {
    // Every caller must come through the gateway, patients included
    let protected_routes = Router::new()
        .route("/", post(handlers::book_appointment))
        .layer(middleware::from_fn(identity_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(ledger)
}
