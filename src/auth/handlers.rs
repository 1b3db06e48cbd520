use axum::{
    extract::{FromRef, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, LogoutResponse, RegisterRequest, RegisterResponse},
        extractors::{cleared_session_cookie_header, session_cookie_header},
        jwt::JwtKeys,
        services,
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout).post(logout))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_string();

    if let Err(e) = services::validate_registration(&payload) {
        warn!(error = %e, "registration rejected");
        return Err(e);
    }

    let user = services::register(&state.db, &payload.username, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: user.into(),
            message: "Registration successful! Please login.".into(),
            redirect: "/login".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(HeaderMap, Json<LoginResponse>)> {
    let user = services::authenticate(&state.db, payload.username.trim(), &payload.password).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.username)?;

    let mut headers = HeaderMap::new();
    let cookie = HeaderValue::from_str(&session_cookie_header(&token, keys.ttl_secs()))
        .map_err(|e| AppError::Internal(e.into()))?;
    headers.insert(header::SET_COOKIE, cookie);

    info!(user_id = user.id, username = %user.username, "user logged in");
    let message = format!("Welcome {}!", user.username);
    Ok((
        headers,
        Json(LoginResponse {
            token,
            user: user.into(),
            message,
            redirect: "/dashboard".into(),
        }),
    ))
}

#[instrument]
pub async fn logout() -> AppResult<(HeaderMap, Json<LogoutResponse>)> {
    let mut headers = HeaderMap::new();
    let cookie = HeaderValue::from_str(&cleared_session_cookie_header())
        .map_err(|e| AppError::Internal(e.into()))?;
    headers.insert(header::SET_COOKIE, cookie);

    Ok((
        headers,
        Json(LogoutResponse {
            message: "You have been logged out.".into(),
            redirect: "/login".into(),
        }),
    ))
}
