pub mod attachment_service;
pub mod directory_service;
pub mod error;
pub mod history_service;
pub mod protocol_service;
pub mod reminder_service;
pub mod status_service;
pub mod user_service;

pub use attachment_service::AttachmentService;
pub use directory_service::{BranchService, CustomerService, PersonnelService, ProtocolTypeService};
pub use error::{ServiceError, ServiceResult};
pub use history_service::HistoryService;
pub use protocol_service::ProtocolService;
pub use reminder_service::ReminderService;
pub use status_service::StatusService;
pub use user_service::{Credentials, LoginResult, Registration, UserService};

use sqlx::PgPool;

/// NotFound unless a protocol with this id exists
pub(crate) async fn ensure_protocol(pool: &PgPool, protocol_id: i32) -> ServiceResult<()> {
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM protocols WHERE protocol_id = $1)")
        .bind(protocol_id)
        .fetch_one(pool)
        .await?;

    if !exists {
        return Err(ServiceError::not_found(format!("protocol {} not found", protocol_id)));
    }
    Ok(())
}

pub(crate) fn require_text(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::invalid_argument(format!("{} must not be empty", field)));
    }
    Ok(())
}
