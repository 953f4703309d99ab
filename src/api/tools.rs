//! Tool catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::tool::{CreateTool, Tool, ToolQuery, UpdateTool},
};

use super::PaginatedResponse;

/// Delete query parameters
#[derive(Deserialize)]
pub struct DeleteToolQuery {
    pub force: Option<bool>,
}

/// List tools with search and pagination
#[utoipa::path(
    get,
    path = "/tools",
    tag = "tools",
    params(
        ("name" = Option<String>, Query, description = "Search in tool name"),
        ("category" = Option<i16>, Query, description = "Filter by category code"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<i64>, Query, description = "Items per page (default: 20)")
    ),
    responses(
        (status = 200, description = "List of tools", body = PaginatedResponse<Tool>)
    )
)]
pub async fn list_tools(
    State(state): State<crate::AppState>,
    Query(query): Query<ToolQuery>,
) -> AppResult<Json<PaginatedResponse<Tool>>> {
    let (items, total) = state.services.tools.list(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Get tool details by ID
#[utoipa::path(
    get,
    path = "/tools/{id}",
    tag = "tools",
    params(
        ("id" = i32, Path, description = "Tool ID")
    ),
    responses(
        (status = 200, description = "Tool details", body = Tool),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn get_tool(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Tool>> {
    let tool = state.services.tools.get(id).await?;
    Ok(Json(tool))
}

/// Create a new tool
#[utoipa::path(
    post,
    path = "/tools",
    tag = "tools",
    request_body = CreateTool,
    responses(
        (status = 201, description = "Tool created", body = Tool),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_tool(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateTool>,
) -> AppResult<(StatusCode, Json<Tool>)> {
    let created = state.services.tools.create(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a tool
#[utoipa::path(
    put,
    path = "/tools/{id}",
    tag = "tools",
    params(
        ("id" = i32, Path, description = "Tool ID")
    ),
    request_body = UpdateTool,
    responses(
        (status = 200, description = "Tool updated", body = Tool),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn update_tool(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(data): Json<UpdateTool>,
) -> AppResult<Json<Tool>> {
    let updated = state.services.tools.update(id, data).await?;
    Ok(Json(updated))
}

/// Delete a tool
#[utoipa::path(
    delete,
    path = "/tools/{id}",
    tag = "tools",
    params(
        ("id" = i32, Path, description = "Tool ID"),
        ("force" = Option<bool>, Query, description = "Delete even with active reservations")
    ),
    responses(
        (status = 204, description = "Tool deleted"),
        (status = 404, description = "Tool not found"),
        (status = 422, description = "Tool has active reservations")
    )
)]
pub async fn delete_tool(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Query(query): Query<DeleteToolQuery>,
) -> AppResult<StatusCode> {
    state
        .services
        .tools
        .delete(id, query.force.unwrap_or(false))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
