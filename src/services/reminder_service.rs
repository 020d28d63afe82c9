use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::database::models::{NewReminder, ProtocolReminder, ReminderPatch, ReminderView};
use crate::database::{ReminderQuery, Repository};
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::{ensure_protocol, require_text};

const MAX_UPCOMING_HOURS: i64 = 24 * 366;

/// `[now, now + hours]`, rejecting windows that are empty or longer than a year
pub fn upcoming_window(now: DateTime<Utc>, hours: i64) -> ServiceResult<(DateTime<Utc>, DateTime<Utc>)> {
    if !(1..=MAX_UPCOMING_HOURS).contains(&hours) {
        return Err(ServiceError::invalid_argument(format!(
            "hours must be between 1 and {}, got {}",
            MAX_UPCOMING_HOURS, hours
        )));
    }
    Ok((now, now + Duration::hours(hours)))
}

#[derive(Clone)]
pub struct ReminderService {
    pool: PgPool,
    default_window_hours: i64,
}

impl ReminderService {
    pub fn new(pool: PgPool, default_window_hours: i64) -> Self {
        Self {
            pool,
            default_window_hours,
        }
    }

    fn repo(&self) -> Repository<ProtocolReminder> {
        Repository::new("protocol_reminders", "reminder_id", self.pool.clone())
    }

    /// Reminders of one protocol, soonest first
    pub async fn for_protocol(&self, protocol_id: i32) -> ServiceResult<Vec<ReminderView>> {
        ensure_protocol(&self.pool, protocol_id).await?;
        Ok(ReminderQuery::new().for_protocol(protocol_id).fetch_all(&self.pool).await?)
    }

    pub async fn get_by_id(&self, reminder_id: i32) -> ServiceResult<ReminderView> {
        ReminderQuery::new()
            .by_id(reminder_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("reminder {} not found", reminder_id)))
    }

    /// Unsent reminders falling due within the next `hours` (configured default when None)
    pub async fn upcoming(&self, hours: Option<i64>) -> ServiceResult<Vec<ReminderView>> {
        let (from, until) = upcoming_window(Utc::now(), hours.unwrap_or(self.default_window_hours))?;
        Ok(ReminderQuery::new().due_unsent(from, until).fetch_all(&self.pool).await?)
    }

    pub async fn create(&self, protocol_id: i32, input: NewReminder) -> ServiceResult<ReminderView> {
        require_text("reminder_text", &input.reminder_text)?;
        ensure_protocol(&self.pool, protocol_id).await?;

        let reminder = sqlx::query_as::<_, ProtocolReminder>(
            "INSERT INTO protocol_reminders (protocol_id, reminder_text, reminder_message, reminder_date, created_by) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(protocol_id)
        .bind(&input.reminder_text)
        .bind(&input.reminder_message)
        .bind(input.reminder_date)
        .bind(input.created_by)
        .fetch_one(&self.pool)
        .await?;

        info!(reminder_id = reminder.reminder_id, protocol_id, "reminder scheduled");
        self.get_by_id(reminder.reminder_id).await
    }

    pub async fn update(&self, reminder_id: i32, patch: ReminderPatch) -> ServiceResult<ReminderView> {
        if patch.is_empty() {
            return Err(ServiceError::invalid_argument("no reminder fields to update"));
        }
        if let Some(text) = &patch.reminder_text {
            require_text("reminder_text", text)?;
        }

        let updated = sqlx::query_as::<_, ProtocolReminder>(
            "UPDATE protocol_reminders SET \
             reminder_text = COALESCE($2, reminder_text), \
             reminder_message = COALESCE($3, reminder_message), \
             reminder_date = COALESCE($4, reminder_date), \
             is_completed = COALESCE($5, is_completed), \
             is_sent = COALESCE($6, is_sent) \
             WHERE reminder_id = $1 RETURNING *",
        )
        .bind(reminder_id)
        .bind(patch.reminder_text)
        .bind(patch.reminder_message)
        .bind(patch.reminder_date)
        .bind(patch.is_completed)
        .bind(patch.is_sent)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("reminder {} not found", reminder_id)))?;

        self.get_by_id(updated.reminder_id).await
    }

    pub async fn mark_sent(&self, reminder_id: i32) -> ServiceResult<ReminderView> {
        self.update(
            reminder_id,
            ReminderPatch {
                is_sent: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete(&self, reminder_id: i32) -> ServiceResult<()> {
        self.repo().delete(reminder_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestClock;

    #[test]
    fn window_spans_the_requested_hours() {
        let now = TestClock::now();
        let (from, until) = upcoming_window(now, 24).unwrap();
        assert_eq!(from, now);
        assert_eq!(until - from, Duration::hours(24));
    }

    #[test]
    fn window_rejects_nonpositive_and_huge_ranges() {
        let now = TestClock::now();
        assert!(matches!(upcoming_window(now, 0), Err(ServiceError::InvalidArgument(_))));
        assert!(matches!(upcoming_window(now, -3), Err(ServiceError::InvalidArgument(_))));
        assert!(upcoming_window(now, MAX_UPCOMING_HOURS).is_ok());
        assert!(upcoming_window(now, MAX_UPCOMING_HOURS + 1).is_err());
    }
}
