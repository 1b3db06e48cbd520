use serde::{Deserialize, Serialize};

use super::repo_types::Subject;

/// Credit as submitted: forms send text, JSON clients may send a number.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CreditInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AddSubjectRequest {
    pub subject_name: String,
    pub credit: CreditInput,
    pub grade: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddSubjectResponse {
    pub subject: Subject,
    pub message: String,
    pub redirect: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardView {
    pub username: String,
    pub subjects: Vec<Subject>,
    pub gpa: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalculatorView {
    pub gpa: f64,
    pub total_credits: f64,
    pub weak_count: usize,
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedGpaResponse {
    pub gpa: f64,
    pub message: String,
    pub redirect: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemovedSubjectResponse {
    pub message: String,
    pub redirect: String,
}

/// Read-only row: the student view leaves out ids.
#[derive(Debug, Serialize, Deserialize)]
pub struct StudentSubject {
    pub subject_name: String,
    pub credit: f64,
    pub grade: String,
}

impl From<Subject> for StudentSubject {
    fn from(s: Subject) -> Self {
        Self {
            subject_name: s.subject_name,
            credit: s.credit,
            grade: s.grade,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudentDashboardView {
    pub subjects: Vec<StudentSubject>,
    pub gpa: f64,
}
