//! Route handlers. Each one parses its parameters and forwards to the
//! query engine.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::error::Result;
use crate::models::{
    CategoryCounts, OrganizationView, RankEntry, StudentStats, TaskView, YearOrganizations,
    YearsInfo,
};
use crate::server::AppState;
use crate::services::{CategoryQuery, TaskQuery};

#[derive(Debug, Deserialize)]
pub struct YearParam {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct OrgParam {
    pub org: Option<String>,
}

pub async fn years_handler(State(state): State<AppState>) -> Json<YearsInfo> {
    Json(state.engine.years().info())
}

pub async fn organizations_handler(
    State(state): State<AppState>,
    Query(params): Query<YearParam>,
) -> Result<Json<Vec<OrganizationView>>> {
    Ok(Json(state.engine.list_organizations(params.year).await?))
}

pub async fn all_organizations_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<YearOrganizations>>> {
    Ok(Json(state.engine.list_organizations_by_year().await?))
}

pub async fn organization_handler(
    State(state): State<AppState>,
    Path((name, year)): Path<(String, i32)>,
) -> Result<Json<Vec<OrganizationView>>> {
    Ok(Json(state.engine.organization(&name, year).await?))
}

pub async fn tasks_handler(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Vec<TaskView>>> {
    Ok(Json(state.engine.list_tasks(&query).await?))
}

pub async fn task_handler(
    State(state): State<AppState>,
    Path(key): Path<u64>,
) -> Result<Json<TaskView>> {
    Ok(Json(state.engine.task(key).await?))
}

pub async fn ranking_handler(
    State(state): State<AppState>,
    Path((name, year)): Path<(String, i32)>,
) -> Result<Json<Vec<RankEntry>>> {
    Ok(Json(state.engine.ranking(&name, year).await?))
}

pub async fn categories_handler(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<CategoryCounts>> {
    Ok(Json(state.engine.category_stats(&query).await?))
}

pub async fn student_handler(
    State(state): State<AppState>,
    Path((name, year)): Path<(String, i32)>,
    Query(params): Query<OrgParam>,
) -> Result<Json<StudentStats>> {
    Ok(Json(
        state
            .engine
            .student_stats(&name, year, params.org.as_deref())
            .await?,
    ))
}
