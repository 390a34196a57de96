//! Read-only HTTP API over the query engine.
//!
//! | Route                              | Operation                         |
//! |------------------------------------|-----------------------------------|
//! | `GET /years`                       | configured years and active year  |
//! | `GET /organization?year=`          | organizations of a year           |
//! | `GET /organization/all`            | organizations grouped by year     |
//! | `GET /organization/{name}/{year}`  | one organization                  |
//! | `GET /task?year=&org=&student=&limit=&offset=` | task listing          |
//! | `GET /task/{key}`                  | one task                          |
//! | `GET /ranking/{name}/{year}`       | student ranking                   |
//! | `GET /categories?year=&org=&student=` | category counts                |
//! | `GET /student/{name}/{year}?org=`  | student stats                     |

mod error;
mod routes;

use std::net::SocketAddr;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::Result;
use crate::services::QueryEngine;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub engine: QueryEngine,
}

/// Build the API router.
pub fn router(engine: QueryEngine) -> Router {
    Router::new()
        .route("/years", get(routes::years_handler))
        .route("/organization", get(routes::organizations_handler))
        .route("/organization/all", get(routes::all_organizations_handler))
        .route("/organization/{name}/{year}", get(routes::organization_handler))
        .route("/task", get(routes::tasks_handler))
        .route("/task/{key}", get(routes::task_handler))
        .route("/ranking/{name}/{year}", get(routes::ranking_handler))
        .route("/categories", get(routes::categories_handler))
        .route("/student/{name}/{year}", get(routes::student_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { engine })
}

/// Serve the API until Ctrl+C.
pub async fn serve(engine: QueryEngine, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::models::ContestYears;
    use crate::storage::memory::fixtures::{YEARS, scenario_store};

    async fn app() -> Router {
        let years = ContestYears::new(YEARS.to_vec()).unwrap();
        router(QueryEngine::new(scenario_store().await, years))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .await
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_years() {
        let (status, body) = get_json("/years").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"years": [2011, 2012], "active": 2012}));
    }

    #[tokio::test]
    async fn test_organizations_default_to_active_year() {
        let (status, body) = get_json("/organization").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"name": "orga", "fullName": "Org A", "year": 2012},
                {"name": "orgb", "fullName": "Org B", "year": 2012},
            ])
        );

        let (_, body) = get_json("/organization?year=2011").await;
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_organizations_by_year() {
        let (status, body) = get_json("/organization/all").await;
        assert_eq!(status, StatusCode::OK);
        let groups = body.as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().any(|g| g["year"] == 2011 && g["orgs"].as_array().unwrap().len() == 3));
    }

    #[tokio::test]
    async fn test_single_organization_is_a_list() {
        let (status, body) = get_json("/organization/orga/2011").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"name": "orga", "fullName": "Org A", "year": 2011}]));

        let (status, body) = get_json("/organization/nope/2011").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_task_listing_with_paging() {
        let (status, body) = get_json("/task?org=orga&year=2012&limit=1&offset=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{
                "id": 2,
                "title": "Task 2",
                "orgName": "orga",
                "year": 2012,
                "student": "Student A",
                "categories": ["Code"],
            }])
        );
    }

    #[tokio::test]
    async fn test_task_listing_has_no_wildcard() {
        let (status, body) = get_json("/task?org=all&year=2012").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_task_lookup() {
        let (status, body) = get_json("/task/5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["orgName"], "orgc");
        assert_eq!(body["year"], 2011);
    }

    #[tokio::test]
    async fn test_missing_task_is_404() {
        let (status, body) = get_json("/task/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({
                "message": "Task 999 not found",
                "error": {"name": "ResourceNotFound: TaskNotFound", "code": 10},
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_parameters_are_rejected() {
        let (status, _) = get_json("/task/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json("/task?limit=many").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ranking() {
        let (status, body) = get_json("/ranking/all/2012").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"student": "Student A", "tasks": 2},
                {"student": "Student B", "tasks": 1},
                {"student": "Student C", "tasks": 1},
            ])
        );
    }

    #[tokio::test]
    async fn test_categories() {
        let (status, body) = get_json("/categories?year=2012&org=orgb").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"Outreach": 1, "Code": 1}));
    }

    #[tokio::test]
    async fn test_student_stats() {
        let (status, body) = get_json("/student/Student%20A/2012?org=orga").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Student A");
        assert_eq!(body["tasks"].as_array().unwrap().len(), 2);
        assert_eq!(body["categories"], json!({"Code": 2, "Documentation": 1}));
    }

    #[tokio::test]
    async fn test_cors_header_present() {
        let response = app()
            .await
            .oneshot(
                Request::builder()
                    .uri("/years")
                    .header("Origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
