//! Route definitions for the Wholesale Storefront Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{
    handlers,
    middleware::{auth_middleware, csrf_middleware, require_admin},
    AppState,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public + protected profile)
        .nest("/auth", auth_routes())
        // Back-office routes (admin session + CSRF on unsafe methods)
        .nest("/admin", admin_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn(auth_middleware));

    Router::new()
        .route("/login", post(handlers::login))
        .route("/csrf", get(handlers::issue_csrf_token))
        .merge(protected)
}

/// Back-office routes (admin only)
///
/// Layers run top-down at request time: token validation, admin gate, then
/// CSRF on unsafe methods, so authorization failures short-circuit first.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .nest("/inventory", inventory_routes())
        .nest("/purchases", purchase_routes())
        .nest("/suppliers", supplier_routes())
        .nest("/products", product_routes())
        .route("/quick-purchase", post(handlers::quick_purchase))
        .route("/bulk-purchase", post(handlers::bulk_purchase))
        .route_layer(middleware::from_fn(csrf_middleware))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Inventory replenishment routes
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reorder",
            get(handlers::get_reorder_products).post(handlers::generate_reorder_orders),
        )
        .route("/low-stock", get(handlers::get_low_stock_products))
        .route("/calculate", post(handlers::calculate_suggestions))
        .route("/update-metrics", post(handlers::update_demand_metrics))
}

/// Purchase order routes
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_purchases))
        .route(
            "/:order_id",
            get(handlers::get_purchase).delete(handlers::delete_purchase),
        )
        .route("/:order_id/receive", post(handlers::receive_purchase))
}

/// Supplier routes
fn supplier_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_suppliers).post(handlers::create_supplier),
    )
}

/// Product catalog routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/:product_id", get(handlers::get_product))
}
