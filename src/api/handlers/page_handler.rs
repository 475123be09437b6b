use axum::{
    Form,
    extract::State,
    response::Html,
};
use tracing::debug;

use crate::{
    api::{
        app_state::AppState,
        dto::affirmation_dto::FeelingForm,
        view::PageView,
    },
    error::AppError,
};

/// 显示页面和本周日志
pub async fn show_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let today = state.clock.today();
    let week = state.session.lock().await.weekly_log(today);

    let html = state.renderer.render(&PageView::idle(week))?;
    Ok(Html(html))
}

/// 处理表单提交并重新渲染页面
pub async fn submit_feeling(
    State(state): State<AppState>,
    Form(form): Form<FeelingForm>,
) -> Result<Html<String>, AppError> {
    debug!("Received feeling submission ({} bytes)", form.feeling.len());

    let today = state.clock.today();
    let mut session = state.session.lock().await;
    let outcome = session.submit(&form.feeling, today).await?;
    state.metrics.record_submission(&outcome);
    let week = session.weekly_log(today);
    drop(session);

    let view = PageView::from_outcome(form.feeling, outcome, week);
    let html = state.renderer.render(&view)?;
    Ok(Html(html))
}
