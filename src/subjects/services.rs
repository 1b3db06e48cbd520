use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use super::{
    dto::{CalculatorView, CreditInput, DashboardView, StudentDashboardView},
    repo,
    repo_types::Subject,
};
use crate::{
    auth::User,
    error::{AppError, AppResult},
    gpa::{self, GpaSummary},
};

pub const MIN_CREDIT: f64 = 1.0;
pub const MAX_CREDIT: f64 = 5.0;

pub fn parse_credit(input: &CreditInput) -> AppResult<f64> {
    let credit = match input {
        CreditInput::Number(n) => *n,
        CreditInput::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| AppError::Validation("Invalid credit value.".into()))?,
    };
    check_credit(credit)?;
    Ok(credit)
}

/// Inclusive range check; NaN fails it.
fn check_credit(credit: f64) -> AppResult<()> {
    if (MIN_CREDIT..=MAX_CREDIT).contains(&credit) {
        Ok(())
    } else {
        Err(AppError::Validation("Credit must be between 1 and 5.".into()))
    }
}

pub async fn list_subjects(db: &SqlitePool, user_id: i64) -> AppResult<Vec<Subject>> {
    Ok(repo::list_by_user(db, user_id).await?)
}

/// Validate and persist. No duplicate detection and no grade vocabulary check.
pub async fn add_subject(
    db: &SqlitePool,
    user_id: i64,
    subject_name: &str,
    credit: f64,
    grade: &str,
) -> AppResult<Subject> {
    if let Err(e) = check_credit(credit) {
        warn!(user_id, credit, "credit out of range");
        return Err(e);
    }
    if !gpa::is_known_grade(grade) {
        debug!(user_id, grade, "grade outside the table scores zero");
    }

    let subject = repo::insert(db, user_id, subject_name, credit, grade).await?;
    info!(user_id, subject_id = subject.id, subject_name, "subject added");
    Ok(subject)
}

/// Idempotent: deleting someone else's or a missing subject does nothing.
pub async fn delete_subject(db: &SqlitePool, user_id: i64, subject_id: i64) -> AppResult<()> {
    let removed = repo::delete_owned(db, user_id, subject_id).await?;
    if removed == 0 {
        debug!(user_id, subject_id, "delete matched no owned subject");
    } else {
        info!(user_id, subject_id, "subject removed");
    }
    Ok(())
}

/// Stored gpa of the user; 0 when the user record is gone.
pub async fn get_cached_gpa(db: &SqlitePool, user_id: i64) -> AppResult<f64> {
    Ok(User::cached_gpa(db, user_id).await?.unwrap_or(0.0))
}

pub async fn save_gpa(db: &SqlitePool, user_id: i64, gpa: f64) -> AppResult<()> {
    User::save_gpa(db, user_id, gpa).await?;
    info!(user_id, gpa, "gpa saved");
    Ok(())
}

pub async fn dashboard(db: &SqlitePool, user: &User) -> AppResult<DashboardView> {
    let subjects = list_subjects(db, user.id).await?;
    let live = gpa::calculate(&subjects).gpa;
    Ok(DashboardView {
        username: user.username.clone(),
        gpa: gpa::display_gpa(user.gpa, live),
        subjects,
    })
}

pub async fn calculator(db: &SqlitePool, user_id: i64) -> AppResult<CalculatorView> {
    let subjects = list_subjects(db, user_id).await?;
    let GpaSummary {
        gpa,
        total_credits,
        weak_count,
    } = gpa::calculate(&subjects);
    Ok(CalculatorView {
        gpa,
        total_credits,
        weak_count,
        subjects,
    })
}

/// Recompute from current subjects and store the result on the user.
pub async fn recompute_and_save(db: &SqlitePool, user_id: i64) -> AppResult<GpaSummary> {
    let subjects = list_subjects(db, user_id).await?;
    let summary = gpa::calculate(&subjects);
    save_gpa(db, user_id, summary.gpa).await?;
    Ok(summary)
}

/// Flash text after a save. A gpa computed from credits always shows a
/// decimal point (`4.0`); with no credits at all it is a bare `0`.
pub fn saved_message(summary: &GpaSummary) -> String {
    if summary.total_credits > 0.0 {
        format!("GPA saved: {:?}", summary.gpa)
    } else {
        "GPA saved: 0".to_string()
    }
}

pub async fn student_dashboard(db: &SqlitePool, user_id: i64) -> AppResult<StudentDashboardView> {
    let subjects = list_subjects(db, user_id).await?;
    let gpa = get_cached_gpa(db, user_id).await?;
    Ok(StudentDashboardView {
        subjects: subjects.into_iter().map(Into::into).collect(),
        gpa,
    })
}
