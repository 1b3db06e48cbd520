//! Credit-weighted grade point average.
//!
//! The calculation is pure: callers load subjects, hand them in, and decide
//! what to do with the result (display it, or persist it on the user).

use serde::Serialize;

/// Anything that carries a credit weight and a letter grade.
pub trait Graded {
    fn credit(&self) -> f64;
    fn grade(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpaSummary {
    pub gpa: f64,
    pub total_credits: f64,
    pub weak_count: usize,
}

/// Points for a letter grade. Grades outside the table score 0.0.
pub fn grade_point(grade: &str) -> f64 {
    match grade {
        "A+" | "A" => 4.0,
        "A-" => 3.7,
        "B+" => 3.3,
        "B" => 3.0,
        "B-" => 2.7,
        "C+" => 2.3,
        "C" => 2.0,
        "D" => 1.0,
        _ => 0.0,
    }
}

/// Letter grades the point table knows about.
pub const GRADES: [&str; 10] = ["A+", "A", "A-", "B+", "B", "B-", "C+", "C", "D", "F"];

pub fn is_known_grade(grade: &str) -> bool {
    GRADES.contains(&grade)
}

pub fn is_weak(grade: &str) -> bool {
    matches!(grade, "D" | "F")
}

pub fn calculate<T: Graded>(subjects: &[T]) -> GpaSummary {
    let mut total_points = 0.0;
    let mut total_credits = 0.0;
    let mut weak_count = 0;

    for s in subjects {
        let credit = s.credit();
        total_points += grade_point(s.grade()) * credit;
        total_credits += credit;
        if is_weak(s.grade()) {
            weak_count += 1;
        }
    }

    let gpa = if total_credits > 0.0 {
        round2(total_points / total_credits)
    } else {
        0.0
    };

    GpaSummary {
        gpa,
        total_credits,
        weak_count,
    }
}

/// Dashboard rule: a saved gpa wins; otherwise show the live figure.
pub fn display_gpa(stored: f64, live: f64) -> f64 {
    if stored > 0.0 {
        stored
    } else {
        live
    }
}

/// Two decimals, exact halves go to the even neighbour.
fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}
