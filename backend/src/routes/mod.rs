//! Route definitions for the Flour Mill Management Platform

use axum::{
    middleware,
    routing::{get, post, put},
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
        // Protected routes - product catalog
        .nest("/products", product_routes())
        // Protected routes - warehouses
        .nest("/warehouses", warehouse_routes())
        // Protected routes - suppliers and customers
        .nest("/parties", party_routes())
        // Protected routes - stock ledger
        .nest("/inventory", inventory_routes())
        // Protected routes - purchases
        .nest("/purchases", purchase_routes())
        // Protected routes - sales
        .nest("/sales", sale_routes())
        // Protected routes - milling batches
        .nest("/production", production_routes())
        // Protected routes - employees and attendance
        .nest("/employees", employee_routes())
        // Protected routes - dashboard and reports
        .nest("/reports", reporting_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Product catalog routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Warehouse routes (protected)
fn warehouse_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_warehouses).post(handlers::create_warehouse))
        .route(
            "/:warehouse_id",
            get(handlers::get_warehouse)
                .put(handlers::update_warehouse)
                .delete(handlers::delete_warehouse),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Supplier and customer routes (protected)
fn party_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_parties).post(handlers::create_party))
        .route(
            "/:party_id",
            get(handlers::get_party)
                .put(handlers::update_party)
                .delete(handlers::delete_party),
        )
        .route("/:party_id/balance", get(handlers::get_party_balance))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock ledger routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        // Items
        .route("/items", get(handlers::list_items).post(handlers::get_or_create_item))
        .route("/items/:item_id", get(handlers::get_item))
        .route("/items/:item_id/movements", get(handlers::get_item_movements))
        // Movements
        .route("/movements", get(handlers::list_recent_movements).post(handlers::record_movement))
        // Maintenance (owner/manager only, enforced in the handlers)
        .route("/recalculate", post(handlers::recalculate_all))
        .route("/audit", get(handlers::audit_consistency))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase routes (protected)
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_purchases).post(handlers::create_purchase))
        .route("/:purchase_id", get(handlers::get_purchase))
        .route("/:purchase_id/payments", post(handlers::record_payment))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Sale routes (protected)
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route("/:sale_id", get(handlers::get_sale))
        .route("/:sale_id/receipts", post(handlers::record_receipt))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Milling batch routes (protected)
fn production_routes() -> Router<AppState> {
    Router::new()
        .route("/batches", get(handlers::list_batches).post(handlers::create_batch))
        .route("/batches/:batch_id", get(handlers::get_batch))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Employee and attendance routes (protected)
fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_employees).post(handlers::create_employee))
        .route(
            "/:employee_id",
            get(handlers::get_employee).put(handlers::update_employee),
        )
        .route("/attendance", put(handlers::mark_attendance))
        .route("/attendance/daily", get(handlers::daily_sheet))
        .route("/attendance/monthly", get(handlers::monthly_summary))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Dashboard and reporting routes (protected)
fn reporting_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/stock", get(handlers::get_stock_report))
        .route("/purchases", get(handlers::get_purchase_summary))
        .route("/sales", get(handlers::get_sales_summary))
        .route("/movements", get(handlers::get_movement_report))
        .route_layer(middleware::from_fn(auth_middleware))
}
