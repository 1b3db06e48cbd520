use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::{
    dto::RegisterRequest,
    password::{hash_password, verify_password, MIN_PASSWORD_LEN},
    repo_types::User,
};
use crate::error::{AppError, AppResult};

pub const INVALID_CREDENTIALS: &str = "Invalid username or password!";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

/// Field checks that run before touching the store.
pub fn validate_registration(req: &RegisterRequest) -> AppResult<()> {
    if req.username.is_empty()
        || req.email.is_empty()
        || req.password.is_empty()
        || req.confirm_password.is_empty()
    {
        return Err(AppError::Validation("All fields are required.".into()));
    }
    if req.password != req.confirm_password {
        return Err(AppError::Validation("Passwords do not match.".into()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters.",
            MIN_PASSWORD_LEN
        )));
    }
    if !is_valid_email(&req.email) {
        return Err(AppError::Validation("Invalid email.".into()));
    }
    Ok(())
}

/// Create an account. Email is checked before username; a unique violation
/// raced in between the checks and the insert is still reported as a conflict.
pub async fn register(
    db: &SqlitePool,
    username: &str,
    email: &str,
    password: &str,
) -> AppResult<User> {
    if User::find_by_email(db, email).await?.is_some() {
        warn!(email, "email already registered");
        return Err(AppError::Conflict(
            "This email is already registered. Please login.".into(),
        ));
    }
    if User::find_by_username(db, username).await?.is_some() {
        warn!(username, "username already taken");
        return Err(AppError::Conflict(
            "Username already exists. Choose a different one.".into(),
        ));
    }

    let hash = hash_password(password)?;
    match User::create(db, username, email, &hash).await {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "user registered");
            Ok(user)
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
            "Email or Username already exists. Please login.".into(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Unknown user and wrong password fail identically.
pub async fn authenticate(db: &SqlitePool, username: &str, password: &str) -> AppResult<User> {
    let Some(user) = User::find_by_username(db, username).await? else {
        warn!(username, "login unknown user");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    }
    Ok(user)
}
