//! Page Routes
//!
//! 表单页面路由。

use crate::api::handlers::page_handler::*;
use axum::{Router, routing::get};

use crate::api::app_state::AppState;

/// 创建页面路由器
pub fn create_page_router() -> Router<AppState> {
    Router::new().route("/", get(show_page).post(submit_feeling))
}
