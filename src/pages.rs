use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::{gpa::GRADES, state::AppState};

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub name: &'static str,
    pub links: [&'static str; 3],
}

#[derive(Debug, Serialize)]
pub struct AboutPage {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub grades: [&'static str; 10],
    pub credit_range: [f64; 2],
}

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/health", get(|| async { "ok" }))
}

pub async fn home() -> Json<HomePage> {
    Json(HomePage {
        name: "GPA Tracker",
        links: ["/register", "/login", "/about"],
    })
}

pub async fn about() -> Json<AboutPage> {
    Json(AboutPage {
        name: "GPA Tracker",
        version: env!("CARGO_PKG_VERSION"),
        description: "Record subjects with credit hours and letter grades, \
                      and keep track of your credit-weighted grade point average.",
        grades: GRADES,
        credit_range: [
            crate::subjects::services::MIN_CREDIT,
            crate::subjects::services::MAX_CREDIT,
        ],
    })
}
