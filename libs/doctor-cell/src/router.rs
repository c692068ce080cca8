use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, delete},
    middleware,
};

use shared_utils::extractor::identity_middleware;

use crate::handlers;
use crate::services::DirectoryService;

pub fn doctor_routes(directory: Arc<DirectoryService>) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/lookup", get(handlers::lookup_doctor))
        .route("/{doctor_id}", get(handlers::get_doctor));

    // Admin only; the role is checked in each handler
    let protected_routes = Router::new()
        .route("/", post(handlers::register_doctor))
        .route("/by-name/{name}", delete(handlers::delete_doctor))
        .layer(middleware::from_fn(identity_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(directory)
}
