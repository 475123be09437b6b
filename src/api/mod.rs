//! API 模块
//!
//! 提供表单页面和 REST API 支持。

pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;
pub mod view;

use crate::api::app_state::AppState;
use crate::observability::metrics_middleware;
use crate::security::middleware::security_headers_middleware;
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new().merge(routes::affirmation_routes::create_affirmation_router());

    Router::new()
        .merge(routes::page_routes::create_page_router())
        .nest("/api/v1", api)
        // Add security headers middleware to all routes
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn_with_state(
            app_state.metrics.clone(),
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
