use sqlx::PgPool;
use tracing::info;

use crate::database::models::{ProtocolStatus, StatusInput};
use crate::database::Repository;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::require_text;

/// The status registry. The transition engine reads it; only this service writes it.
#[derive(Clone)]
pub struct StatusService {
    pool: PgPool,
}

impl StatusService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> Repository<ProtocolStatus> {
        Repository::new("protocol_statuses", "status_id", self.pool.clone())
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<ProtocolStatus>> {
        self.repo().select_all(None).await
    }

    pub async fn get_by_id(&self, status_id: i32) -> ServiceResult<ProtocolStatus> {
        self.repo().select_404(status_id).await
    }

    pub async fn create(&self, input: StatusInput) -> ServiceResult<ProtocolStatus> {
        require_text("status_name", &input.status_name)?;

        let status = sqlx::query_as::<_, ProtocolStatus>(
            "INSERT INTO protocol_statuses (status_name, color, is_terminal) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&input.status_name)
        .bind(&input.color)
        .bind(input.is_terminal)
        .fetch_one(&self.pool)
        .await?;

        info!(status_id = status.status_id, terminal = status.is_terminal, "protocol status created");
        Ok(status)
    }

    pub async fn update(&self, status_id: i32, input: StatusInput) -> ServiceResult<ProtocolStatus> {
        require_text("status_name", &input.status_name)?;

        sqlx::query_as::<_, ProtocolStatus>(
            "UPDATE protocol_statuses SET status_name = $2, color = $3, is_terminal = $4 \
             WHERE status_id = $1 RETURNING *",
        )
        .bind(status_id)
        .bind(&input.status_name)
        .bind(&input.color)
        .bind(input.is_terminal)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("protocol status {} not found", status_id)))
    }

    /// Conflict while any protocol or history row still references the status
    pub async fn delete(&self, status_id: i32) -> ServiceResult<()> {
        self.repo().delete(status_id).await
    }
}
