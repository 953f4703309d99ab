//! Tool catalog service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::tool::{CreateTool, Tool, ToolQuery, UpdateTool},
    repository::Repository,
};

#[derive(Clone)]
pub struct ToolsService {
    repository: Repository,
}

impl ToolsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List tools with filters and pagination
    pub async fn list(&self, query: &ToolQuery) -> AppResult<(Vec<Tool>, i64)> {
        self.repository.tools.list(query).await
    }

    /// Get a tool by ID
    pub async fn get(&self, id: i32) -> AppResult<Tool> {
        self.repository.tools.get_by_id(id).await
    }

    /// Create a tool
    pub async fn create(&self, data: CreateTool) -> AppResult<Tool> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.tools.create(&data).await
    }

    /// Update a tool
    pub async fn update(&self, id: i32, data: UpdateTool) -> AppResult<Tool> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.tools.update(id, &data).await
    }

    /// Delete a tool
    pub async fn delete(&self, id: i32, force: bool) -> AppResult<()> {
        self.repository.tools.delete(id, force).await
    }
}
