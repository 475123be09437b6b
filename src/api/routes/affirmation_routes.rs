//! Affirmation Routes
//!
//! 定义肯定语相关的 JSON API 路由。

use crate::api::handlers::affirmation_handler::*;
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;

/// 创建肯定语路由器
pub fn create_affirmation_router() -> Router<AppState> {
    Router::new()
        .route("/affirmations", post(create_affirmation))
        .route("/affirmations/week", get(get_weekly_log))
        .route("/affirmations/history", get(get_history))
        .route("/affirmations/:date", get(get_affirmation))
}
