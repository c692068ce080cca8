use std::sync::Arc;

use axum::{
    Router,
    routing::get,
    middleware,
};

use shared_utils::extractor::identity_middleware;

use crate::handlers;
use crate::services::ScheduleQueryService;

pub fn schedule_routes(schedule: Arc<ScheduleQueryService>) -> Router {
    let protected_routes = Router::new()
        .route("/doctors/{doctor_id}/free", get(handlers::get_free_slots))
        .route("/doctors/{doctor_id}/booked", get(handlers::get_booked_appointments))
        .route("/appointments", get(handlers::get_clinic_appointments))
        .layer(middleware::from_fn(identity_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(schedule)
}
