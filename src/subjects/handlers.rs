use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{
        AddSubjectRequest, AddSubjectResponse, CalculatorView, RemovedSubjectResponse,
        SavedGpaResponse, StudentDashboardView,
    },
    services,
};
use crate::{
    auth::{AuthUser, User},
    error::AppResult,
    state::AppState,
};

pub fn subject_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/add_subject", post(add_subject))
        .route("/gpa_calculator", get(gpa_calculator).post(save_gpa))
        .route(
            "/delete_subject/:id",
            post(delete_subject).delete(delete_subject),
        )
        .route("/student_dashboard", get(student_dashboard))
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Response> {
    // token may outlive the account
    let Some(user) = User::find_by_id(&state.db, user_id).await? else {
        warn!(user_id, "session refers to a missing user");
        return Ok(Redirect::to("/login").into_response());
    };
    let view = services::dashboard(&state.db, &user).await?;
    Ok(Json(view).into_response())
}

#[instrument(skip(state, payload))]
pub async fn add_subject(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddSubjectRequest>,
) -> AppResult<(StatusCode, Json<AddSubjectResponse>)> {
    let credit = match services::parse_credit(&payload.credit) {
        Ok(c) => c,
        Err(e) => {
            warn!(user_id, credit = ?payload.credit, "credit rejected");
            return Err(e);
        }
    };

    let subject = services::add_subject(
        &state.db,
        user_id,
        &payload.subject_name,
        credit,
        &payload.grade,
    )
    .await?;

    let message = format!("Subject '{}' added successfully!", subject.subject_name);
    Ok((
        StatusCode::CREATED,
        Json(AddSubjectResponse {
            subject,
            message,
            redirect: "/dashboard".into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn gpa_calculator(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<CalculatorView>> {
    Ok(Json(services::calculator(&state.db, user_id).await?))
}

#[instrument(skip(state))]
pub async fn save_gpa(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<SavedGpaResponse>> {
    let summary = services::recompute_and_save(&state.db, user_id).await?;
    Ok(Json(SavedGpaResponse {
        gpa: summary.gpa,
        message: services::saved_message(&summary),
        redirect: "/gpa_calculator".into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_subject(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<RemovedSubjectResponse>> {
    services::delete_subject(&state.db, user_id, id).await?;
    Ok(Json(RemovedSubjectResponse {
        message: "Subject removed.".into(),
        redirect: "/gpa_calculator".into(),
    }))
}

#[instrument(skip(state))]
pub async fn student_dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<StudentDashboardView>> {
    Ok(Json(services::student_dashboard(&state.db, user_id).await?))
}
