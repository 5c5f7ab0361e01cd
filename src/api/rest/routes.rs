//! # REST Routes
//!
//! Router assembly for the `/api/v1` surface.

use crate::api::rest::handlers::{self, AppState};
use axum::Router;
use axum::routing::{get, patch, post, put};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builds the API router with tracing and permissive CORS.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        // Transfers
        .route("/transfers", post(handlers::create_transfer))
        .route("/transfers/fee", get(handlers::quote_transfer_fee))
        .route("/transfers/{id}", get(handlers::get_transfer))
        .route("/users/{id}/transfers", get(handlers::list_user_transfers))
        // Sell queue
        .route(
            "/sell-orders",
            get(handlers::list_sell_queue).post(handlers::place_sell_order),
        )
        .route("/sell-orders/process", post(handlers::process_buybacks))
        .route(
            "/sell-orders/{id}",
            patch(handlers::modify_sell_order).delete(handlers::cancel_sell_order),
        )
        // Allocation
        .route(
            "/allocation-rules",
            get(handlers::list_allocation_rules).post(handlers::save_allocation_rule),
        )
        .route("/allocations", post(handlers::allocate_funds))
        .route("/sub-wallets", get(handlers::list_sub_wallets))
        // Back office
        .route("/profiles", post(handlers::register_profile))
        .route("/profiles/{id}", get(handlers::get_profile))
        .route("/shares", post(handlers::list_share))
        .route("/shares/{id}", get(handlers::get_share))
        .route("/shares/{id}/price", put(handlers::set_share_price))
        .route("/holdings", post(handlers::issue_shares))
        .route("/users/{id}/holdings", get(handlers::list_user_holdings))
        .route("/users/{id}/wallets/{currency}", get(handlers::get_wallet))
        .route("/wallets/deposits", post(handlers::deposit_funds));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
