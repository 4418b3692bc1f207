//! Route definitions for the Hotel Stock Management Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - inventory items
        .nest("/items", item_routes())
        // Protected routes - stock requests
        .nest("/requests", request_routes())
        // Protected routes - movement ledger
        .nest("/movements", movement_routes())
        // Protected routes - fulfillment actions
        .merge(fulfillment_routes())
        // Protected routes - purchase posting
        .nest("/purchases", purchase_routes())
        // Protected routes - reconciliation
        .nest("/reconciliation", reconciliation_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Inventory item routes (protected)
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_items).post(handlers::create_item))
        .route("/low-stock", get(handlers::list_low_stock))
        .route(
            "/:item_id",
            get(handlers::get_item).delete(handlers::retire_item),
        )
        .route("/:item_id/balance", get(handlers::get_item_balance))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock request routes (protected)
fn request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_requests).post(handlers::create_request),
        )
        .route(
            "/:request_id",
            get(handlers::get_request).delete(handlers::delete_request),
        )
        .route("/:request_id/approve", post(handlers::approve_request))
        .route("/:request_id/reject", post(handlers::reject_request))
        .route(
            "/:request_id/archive",
            post(handlers::toggle_archive_request),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Movement ledger routes (protected)
fn movement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_movements))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Fulfillment action routes (protected)
fn fulfillment_routes() -> Router<AppState> {
    Router::new()
        .route("/distributions", post(handlers::record_distribution))
        .route("/damages", post(handlers::record_damage))
        .route("/adjustments", post(handlers::record_adjustment))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase posting routes (protected)
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchase_lines).post(handlers::create_purchase_line),
        )
        .route("/:line_id", get(handlers::get_purchase_line))
        .route("/:line_id/post", post(handlers::post_delivery))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reconciliation routes (protected)
fn reconciliation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::run_reconciliation))
        .route_layer(middleware::from_fn(auth_middleware))
}
