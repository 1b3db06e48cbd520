use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::gpa::Graded;

/// Subject row, always owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: i64,
    pub user_id: i64,
    pub subject_name: String,
    pub credit: f64,
    pub grade: String,
}

impl Graded for Subject {
    fn credit(&self) -> f64 {
        self.credit
    }

    fn grade(&self) -> &str {
        &self.grade
    }
}
