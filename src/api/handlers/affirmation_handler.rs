use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{
        app_state::AppState,
        dto::affirmation_dto::*,
        view::EMPTY_INPUT_WARNING,
    },
    error::AppError,
    models::affirmation::{date_key, week_dates},
    services::SubmissionOutcome,
};

pub async fn create_affirmation(
    State(state): State<AppState>,
    Json(request): Json<CreateAffirmationRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Creating affirmations via API");

    let today = state.clock.today();
    let outcome = state
        .session
        .lock()
        .await
        .submit(&request.feeling, today)
        .await?;
    state.metrics.record_submission(&outcome);

    match outcome {
        SubmissionOutcome::EmptyInput => Err(AppError::Validation(EMPTY_INPUT_WARNING.to_string())),
        SubmissionOutcome::Failed(detail) => Err(AppError::Generation(detail)),
        SubmissionOutcome::Generated(entry) => Ok((
            StatusCode::CREATED,
            Json(AffirmationResponse::from(entry)),
        )),
    }
}

pub async fn get_weekly_log(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let today = state.clock.today();
    let dates = week_dates(today);
    let entries = state.session.lock().await.weekly_log(today);

    debug!("Weekly log has {} entries", entries.len());

    Ok(Json(WeeklyLogResponse {
        week_start: date_key(dates[0]),
        week_end: date_key(dates[6]),
        entries,
    }))
}

pub async fn get_history(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let history = state.session.lock().await.history().clone();
    Ok(Json(history))
}

pub async fn get_affirmation(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting affirmations for {}", date);

    let entry = state
        .session
        .lock()
        .await
        .history()
        .get(&date)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("No affirmations for {}", date)))?;

    Ok(Json(AffirmationResponse::from(entry)))
}
