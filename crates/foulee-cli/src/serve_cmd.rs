use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use foulee_core::export::PlanDocument;
use foulee_core::{FieldErrors, PlanService, RawProfileInput, SubmitOutcome, TrainingPlan};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
    errors: Option<FieldErrors>,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
            errors: None,
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.into(),
            errors: None,
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.into(),
            errors: None,
        }
    }

    pub fn invalid(errors: FieldErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: errors.to_string(),
            errors: Some(errors),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = match self.errors {
            Some(errors) => serde_json::json!({ "error": self.message, "errors": errors }),
            None => serde_json::json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Shared handler state. `shutdown` is cancelled when the server stops, which
/// aborts submissions still waiting out their delay.
#[derive(Clone)]
pub struct AppState {
    pub service: PlanService,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(service: PlanService) -> Self {
        Self {
            service,
            shutdown: CancellationToken::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route(
            "/api/plan",
            get(current_plan).post(submit_plan).delete(clear_plan),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(service: PlanService, addr: SocketAddr) -> Result<()> {
    let delay_ms = u64::try_from(service.delay().as_millis()).unwrap_or(u64::MAX);
    let state = AppState::new(service);
    let shutdown = state.shutdown.clone();
    let app = build_router(state);
    tracing::info!(delay_ms, "foulee serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;
    tracing::info!("foulee serve shut down");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl+C: {e}");
    }
    shutdown.cancel();
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let body = match state.service.slot().current() {
        Some(plan) => plan_table(&plan),
        None => "<p>Entrez vos informations ci-dessus pour générer votre plan d'entraînement.</p>"
            .to_owned(),
    };

    Html(format!(
        "<!DOCTYPE html>\
<html><head><meta charset=\"utf-8\"><title>foulee</title></head><body>\
<h1>Plan marathon sur 16 semaines</h1>\
<p><a href=\"/api/plan\">/api/plan</a> | <a href=\"/api/health\">/api/health</a></p>\
{body}\
</body></html>"
    ))
}

fn plan_table(plan: &TrainingPlan) -> String {
    let rows = plan
        .iter()
        .map(|week| {
            let sessions = week
                .sessions()
                .iter()
                .map(|s| format!("<li>{s}</li>"))
                .collect::<String>();
            format!(
                "<tr><td>{title}</td><td>{phase}</td><td><ul>{sessions}</ul></td></tr>",
                title = week.title(),
                phase = week.phase().label(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("<table><tr><th>Semaine</th><th>Phase</th><th>Séances</th></tr>{rows}</table>")
}

async fn current_plan(
    State(state): State<AppState>,
) -> Result<axum::response::Response, AppError> {
    let plan = state
        .service
        .slot()
        .current()
        .ok_or_else(|| AppError::not_found("no plan has been generated"))?;
    Ok(Json(PlanDocument::new(&plan, None)).into_response())
}

async fn submit_plan(
    State(state): State<AppState>,
    Json(raw): Json<RawProfileInput>,
) -> Result<axum::response::Response, AppError> {
    let service = &state.service;
    match service.submit_with(&raw, service.delay(), &state.shutdown).await {
        SubmitOutcome::Committed(plan) => Ok(Json(PlanDocument::new(&plan, None)).into_response()),
        SubmitOutcome::Invalid(errors) => Err(AppError::invalid(errors)),
        SubmitOutcome::Superseded => Err(AppError::conflict(
            "superseded by a more recent submission",
        )),
        SubmitOutcome::Cancelled => Err(AppError::unavailable("server is shutting down")),
    }
}

async fn clear_plan(State(state): State<AppState>) -> StatusCode {
    state.service.slot().clear();
    tracing::info!("plan cleared");
    StatusCode::NO_CONTENT
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    use foulee_core::{PlanService, RawProfileInput};

    use super::AppState;
    use foulee_test_utils as fixtures;

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    fn state() -> AppState {
        AppState::new(PlanService::new(Duration::ZERO))
    }

    async fn send_request(app: axum::Router, method: Method, uri: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn post_profile(app: axum::Router, raw: &RawProfileInput) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/plan")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(raw).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_health() {
        let resp = send_request(super::build_router(state()), Method::GET, "/api/health").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_shows_placeholder_without_plan() {
        let resp = send_request(super::build_router(state()), Method::GET, "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp
            .headers()
            .get("content-type")
            .expect("should have content-type header")
            .to_str()
            .unwrap()
            .to_owned();
        assert!(
            content_type.contains("text/html"),
            "content-type should contain text/html, got: {content_type}"
        );
        let html = body_text(resp).await;
        assert!(html.contains("Entrez vos informations ci-dessus"));
    }

    #[tokio::test]
    async fn test_get_plan_404_when_empty() {
        let resp = send_request(super::build_router(state()), Method::GET, "/api/plan").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_json(resp).await.get("error").is_some());
    }

    #[tokio::test]
    async fn test_post_valid_profile_returns_plan() {
        let app = super::build_router(state());

        let resp = post_profile(app.clone(), &fixtures::young_light()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let weeks = json["weeks"].as_array().expect("weeks should be an array");
        assert_eq!(weeks.len(), 16);
        assert_eq!(weeks[15]["phase"], "race");

        let resp = send_request(app.clone(), Method::GET, "/api/plan").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["weeks"][0]["week"], 1);

        let html = body_text(send_request(app, Method::GET, "/").await).await;
        assert!(html.contains("Semaine 16"));
    }

    #[tokio::test]
    async fn test_post_invalid_profile_returns_field_errors_and_clears() {
        let app = super::build_router(state());
        post_profile(app.clone(), &fixtures::neutral()).await;

        let raw = RawProfileInput::new("autre", "35", "abc", "70", "3:30");
        let resp = post_profile(app.clone(), &raw).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        let errors = json["errors"].as_object().expect("errors object");
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("height"));
        assert_eq!(
            errors["goal_time"],
            "L'objectif de temps doit respecter le format HH:MM:SS."
        );

        let resp = send_request(app, Method::GET, "/api/plan").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_empty_body_reports_every_field() {
        let app = super::build_router(state());
        let resp = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/plan")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert_eq!(json["errors"].as_object().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_delete_clears_plan() {
        let app = super::build_router(state());
        post_profile(app.clone(), &fixtures::neutral()).await;

        let resp = send_request(app.clone(), Method::DELETE, "/api/plan").await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = send_request(app, Method::GET, "/api/plan").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test(start_paused = true)]
    async fn test_older_request_finishing_late_gets_conflict() {
        let app = super::build_router(AppState::new(PlanService::new(Duration::from_millis(500))));

        let first = {
            let app = app.clone();
            tokio::spawn(async move { post_profile(app, &fixtures::older_heavy()).await })
        };
        // Let the first request start its delay before the second arrives.
        tokio::time::sleep(Duration::from_millis(10)).await;

        let second = post_profile(app.clone(), &fixtures::young_light()).await;
        assert_eq!(second.status(), StatusCode::OK);

        let first = first.await.unwrap();
        assert_eq!(first.status(), StatusCode::CONFLICT);

        let json = body_json(send_request(app, Method::GET, "/api/plan").await).await;
        let week1 = json["weeks"][0]["sessions"].as_array().unwrap();
        assert!(week1.iter().any(|s| s["kind"] == "hills"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_during_shutdown_returns_unavailable() {
        let state = AppState::new(PlanService::new(Duration::from_millis(500)));
        state.shutdown.cancel();
        let app = super::build_router(state);

        let resp = post_profile(app.clone(), &fixtures::neutral()).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(body_json(resp).await["error"].as_str().unwrap().contains("shutting down"));

        let resp = send_request(app, Method::GET, "/api/plan").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
