//! Tools repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::tool::{CreateTool, Tool, ToolQuery, UpdateTool},
};

#[derive(Clone)]
pub struct ToolsRepository {
    pool: Pool<Postgres>,
}

impl ToolsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get tool by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Tool> {
        sqlx::query_as::<_, Tool>("SELECT * FROM tools WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tool {} not found", id)))
    }

    /// List tools with filters and pagination
    pub async fn list(&self, query: &ToolQuery) -> AppResult<(Vec<Tool>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let name_pattern = query.name.as_ref().map(|n| format!("%{}%", n));

        let tools = sqlx::query_as::<_, Tool>(
            r#"
            SELECT * FROM tools
            WHERE ($1::text IS NULL OR name ILIKE $1)
              AND ($2::smallint IS NULL OR category = $2)
            ORDER BY name
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&name_pattern)
        .bind(query.category)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tools
            WHERE ($1::text IS NULL OR name ILIKE $1)
              AND ($2::smallint IS NULL OR category = $2)
            "#,
        )
        .bind(&name_pattern)
        .bind(query.category)
        .fetch_one(&self.pool)
        .await?;

        Ok((tools, total))
    }

    /// Create a tool
    pub async fn create(&self, data: &CreateTool) -> AppResult<Tool> {
        let tool = sqlx::query_as::<_, Tool>(
            r#"
            INSERT INTO tools (name, description, category, stock, is_available, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.category)
        .bind(data.stock)
        .bind(data.is_available.unwrap_or(true))
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(tool)
    }

    /// Update a tool (partial)
    pub async fn update(&self, id: i32, data: &UpdateTool) -> AppResult<Tool> {
        let now = Utc::now();
        let mut sets = vec!["modif_date = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.description, "description");
        add_field!(data.category, "category");
        add_field!(data.stock, "stock");
        add_field!(data.is_available, "is_available");
        add_field!(data.notes, "notes");

        let query = format!("UPDATE tools SET {} WHERE id = {} RETURNING *", sets.join(", "), id);

        let mut builder = sqlx::query_as::<_, Tool>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.description);
        bind_field!(data.category);
        bind_field!(data.stock);
        bind_field!(data.is_available);
        bind_field!(data.notes);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tool {} not found", id)))
    }

    /// Delete a tool. Refused while reservations that still consume stock
    /// exist, unless forced.
    pub async fn delete(&self, id: i32, force: bool) -> AppResult<()> {
        if !force {
            let has_blocking: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM reservations
                    WHERE tool_id = $1 AND status IN (0, 1, 2)
                )
                "#,
            )
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

            if has_blocking {
                return Err(AppError::BusinessRule(
                    "Tool has active reservations; use force=true to delete anyway".to_string(),
                ));
            }
        }

        let result = sqlx::query("DELETE FROM tools WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Tool {} not found", id)));
        }
        Ok(())
    }

    /// List every tool (calendar grid)
    pub async fn list_all(&self) -> AppResult<Vec<Tool>> {
        let tools = sqlx::query_as::<_, Tool>("SELECT * FROM tools ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(tools)
    }

    /// Count tools (for stats)
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tools")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Sum of stock over all tools (for stats)
    pub async fn total_stock(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(stock), 0)::bigint FROM tools")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
