use sqlx::PgPool;
use tracing::info;

use crate::database::models::{AttachmentView, NewAttachment, ProtocolAttachment};
use crate::database::{AttachmentQuery, Repository};
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::{ensure_protocol, require_text};

/// Attachment metadata. Only the record is stored here; file bytes are handled elsewhere.
#[derive(Clone)]
pub struct AttachmentService {
    pool: PgPool,
}

impl AttachmentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest first, each with its uploading agent
    pub async fn for_protocol(&self, protocol_id: i32) -> ServiceResult<Vec<AttachmentView>> {
        ensure_protocol(&self.pool, protocol_id).await?;
        Ok(AttachmentQuery::new().for_protocol(protocol_id).fetch_all(&self.pool).await?)
    }

    pub async fn get_by_id(&self, attachment_id: i32) -> ServiceResult<AttachmentView> {
        AttachmentQuery::new()
            .by_id(attachment_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("attachment {} not found", attachment_id)))
    }

    pub async fn create(&self, protocol_id: i32, input: NewAttachment) -> ServiceResult<AttachmentView> {
        require_text("file_name", &input.file_name)?;
        require_text("file_path", &input.file_path)?;
        if input.file_size < 0 {
            return Err(ServiceError::invalid_argument("file_size must not be negative"));
        }
        ensure_protocol(&self.pool, protocol_id).await?;

        let attachment = sqlx::query_as::<_, ProtocolAttachment>(
            "INSERT INTO protocol_attachments \
             (protocol_id, file_name, file_path, file_size, content_type, description, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(protocol_id)
        .bind(&input.file_name)
        .bind(&input.file_path)
        .bind(input.file_size)
        .bind(&input.content_type)
        .bind(&input.description)
        .bind(input.uploaded_by)
        .fetch_one(&self.pool)
        .await?;

        info!(attachment_id = attachment.attachment_id, protocol_id, "attachment registered");
        self.get_by_id(attachment.attachment_id).await
    }

    pub async fn delete(&self, attachment_id: i32) -> ServiceResult<()> {
        Repository::<ProtocolAttachment>::new("protocol_attachments", "attachment_id", self.pool.clone())
            .delete(attachment_id)
            .await
    }
}
