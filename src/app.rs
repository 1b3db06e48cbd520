use std::{net::SocketAddr, time::Duration};

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{field, info, info_span, warn, Span};

use crate::state::AppState;
use crate::{auth, pages, subjects};

pub fn build_app(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(request_span)
        .on_response(record_response);

    Router::new()
        .merge(pages::page_routes())
        .merge(auth::router())
        .merge(subjects::router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(trace)
}

fn request_span(req: &Request<Body>) -> Span {
    info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        status = field::Empty,
        latency_ms = field::Empty,
    )
}

/// Redirects to `/login` are the normal answer for a missing session, so only
/// server errors are raised above info.
fn record_response(res: &Response<Body>, latency: Duration, span: &Span) {
    let status = res.status();
    span.record("status", status.as_u16());
    span.record("latency_ms", latency.as_millis() as u64);
    if status.is_server_error() {
        tracing::error!(%status, "request failed");
    } else if status.is_client_error() {
        warn!(%status, "request rejected");
    } else {
        info!(%status, "request served");
    }
}

fn bind_addr(host: Option<String>, port: Option<String>) -> anyhow::Result<SocketAddr> {
    let host = host.unwrap_or_else(|| "0.0.0.0".into());
    let port = port.unwrap_or_else(|| "8080".into());
    format!("{}:{}", host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen address {}:{}: {}", host, port, e))
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr = bind_addr(std::env::var("APP_HOST").ok(), std::env::var("APP_PORT").ok())?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "gpa tracker listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", t));
        }
        let req = match body {
            Some(b) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(req).await.unwrap()
    }

    async fn json_body(res: Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register_and_login(app: &Router, username: &str) -> String {
        let res = call(
            app,
            Method::POST,
            "/register",
            None,
            Some(json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "secret1",
                "confirm_password": "secret1",
            })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = call(
            app,
            Method::POST,
            "/login",
            None,
            Some(json!({ "username": username, "password": "secret1" })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("gpa_session="));
        let body = json_body(res).await;
        assert_eq!(body["message"], format!("Welcome {}!", username));
        body["token"].as_str().unwrap().to_string()
    }

    #[test]
    fn listen_address_from_env_values() {
        let addr = bind_addr(None, None).unwrap();
        assert_eq!(addr.port(), 8080);
        let addr = bind_addr(Some("127.0.0.1".into()), Some("3000".into())).unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
        assert!(bind_addr(None, Some("http".into())).is_err());
    }

    #[tokio::test]
    async fn health_and_about_are_public() {
        let app = build_app(AppState::fake().await);
        let res = call(&app, Method::GET, "/health", None, None).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = call(&app, Method::GET, "/about", None, None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["grades"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn protected_routes_redirect_to_login() {
        let app = build_app(AppState::fake().await);
        for (method, uri) in [
            (Method::GET, "/dashboard"),
            (Method::GET, "/gpa_calculator"),
            (Method::POST, "/gpa_calculator"),
            (Method::GET, "/student_dashboard"),
            (Method::DELETE, "/delete_subject/1"),
        ] {
            let res = call(&app, method, uri, None, None).await;
            assert_eq!(res.status(), StatusCode::SEE_OTHER, "{}", uri);
            assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/login");
        }

        let res = call(&app, Method::GET, "/dashboard", Some("garbage"), None).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn session_cookie_authenticates() {
        let app = build_app(AppState::fake().await);
        let token = register_and_login(&app, "ada").await;

        let req = Request::builder()
            .uri("/dashboard")
            .header(header::COOKIE, format!("gpa_session={}", token))
            .body(Body::empty())
            .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await["username"], "ada");
    }

    #[tokio::test]
    async fn register_conflicts_and_bad_login() {
        let app = build_app(AppState::fake().await);
        register_and_login(&app, "ada").await;

        let res = call(
            &app,
            Method::POST,
            "/register",
            None,
            Some(json!({
                "username": "someone-else",
                "email": "ada@example.com",
                "password": "secret1",
                "confirm_password": "secret1",
            })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let res = call(
            &app,
            Method::POST,
            "/login",
            None,
            Some(json!({ "username": "ada", "password": "wrong-one" })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(res).await["error"], "Invalid username or password!");
    }

    #[tokio::test]
    async fn subject_lifecycle_and_gpa_display() {
        let app = build_app(AppState::fake().await);
        let ada = register_and_login(&app, "ada").await;
        let grace = register_and_login(&app, "grace").await;

        let res = call(
            &app,
            Method::POST,
            "/add_subject",
            Some(&ada),
            Some(json!({ "subject_name": "Calculus", "credit": "3", "grade": "A" })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let calculus_id = json_body(res).await["subject"]["id"].as_i64().unwrap();

        let res = call(
            &app,
            Method::POST,
            "/add_subject",
            Some(&ada),
            Some(json!({ "subject_name": "History", "credit": 4, "grade": "C" })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        for bad in [json!(0), json!(6), json!("lots")] {
            let res = call(
                &app,
                Method::POST,
                "/add_subject",
                Some(&ada),
                Some(json!({ "subject_name": "Bad", "credit": bad, "grade": "A" })),
            )
            .await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        }

        // nothing saved yet: live value
        let res = call(&app, Method::GET, "/dashboard", Some(&ada), None).await;
        let body = json_body(res).await;
        assert_eq!(body["gpa"], 2.86);
        assert_eq!(body["subjects"].as_array().unwrap().len(), 2);

        let res = call(&app, Method::POST, "/gpa_calculator", Some(&ada), None).await;
        assert_eq!(json_body(res).await["message"], "GPA saved: 2.86");

        // grace cannot remove ada's subject
        let uri = format!("/delete_subject/{}", calculus_id);
        let res = call(&app, Method::DELETE, &uri, Some(&grace), None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let res = call(&app, Method::GET, "/gpa_calculator", Some(&ada), None).await;
        assert_eq!(json_body(res).await["subjects"].as_array().unwrap().len(), 2);

        let res = call(&app, Method::POST, &uri, Some(&ada), None).await;
        assert_eq!(json_body(res).await["message"], "Subject removed.");

        let res = call(&app, Method::GET, "/gpa_calculator", Some(&ada), None).await;
        let body = json_body(res).await;
        assert_eq!(body["gpa"], 2.0);
        assert_eq!(body["total_credits"], 4.0);

        // saved value still wins on the dashboard
        let res = call(&app, Method::GET, "/dashboard", Some(&ada), None).await;
        assert_eq!(json_body(res).await["gpa"], 2.86);

        let res = call(&app, Method::GET, "/student_dashboard", Some(&ada), None).await;
        let body = json_body(res).await;
        assert_eq!(body["gpa"], 2.86);
        assert!(body["subjects"][0].get("id").is_none());
    }
}
