use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::database::manager::DatabaseError;
use crate::database::models::{NewHistoryEntry, Protocol, ProtocolHistory, ProtocolStatus};
use crate::workflow::changeset::{ProtocolChangeSet, ProtocolDraft};
use crate::workflow::numbering::NEXT_SEQUENCE_SQL;

/// A protocol row ready to insert: the resolved draft plus engine-derived columns
#[derive(Debug, Clone, PartialEq)]
pub struct NewProtocolRecord {
    pub protocol_number: String,
    pub draft: ProtocolDraft,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// Storage operations the transition engine needs, all running inside one unit of work.
/// Nothing is visible to other readers until the implementor commits.
#[async_trait]
pub trait TransitionStore: Send {
    /// Load a protocol and hold it against concurrent transitions until commit
    async fn lock_protocol(&mut self, protocol_id: i32) -> Result<Option<Protocol>, DatabaseError>;

    async fn find_status(&mut self, status_id: i32) -> Result<Option<ProtocolStatus>, DatabaseError>;

    async fn append_history(&mut self, entry: NewHistoryEntry) -> Result<ProtocolHistory, DatabaseError>;

    /// Write every present field of `changes` plus `updated_at` in a single statement
    async fn write_protocol(
        &mut self,
        protocol_id: i32,
        changes: &ProtocolChangeSet,
        updated_at: DateTime<Utc>,
    ) -> Result<Protocol, DatabaseError>;

    async fn next_protocol_sequence(&mut self, year: i32) -> Result<i32, DatabaseError>;

    async fn insert_protocol(&mut self, record: &NewProtocolRecord) -> Result<Protocol, DatabaseError>;

    /// Remove a protocol with its attachments, reminders and history.
    /// Returns false when the protocol did not exist.
    async fn delete_protocol_tree(&mut self, protocol_id: i32) -> Result<bool, DatabaseError>;
}

/// Postgres unit of work; dropping it without `commit` rolls everything back
pub struct PgTransitionStore {
    tx: Transaction<'static, Postgres>,
}

impl PgTransitionStore {
    pub async fn begin(pool: &PgPool) -> Result<Self, DatabaseError> {
        Ok(Self { tx: pool.begin().await? })
    }

    pub async fn commit(self) -> Result<(), DatabaseError> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl TransitionStore for PgTransitionStore {
    async fn lock_protocol(&mut self, protocol_id: i32) -> Result<Option<Protocol>, DatabaseError> {
        let protocol = sqlx::query_as::<_, Protocol>("SELECT * FROM protocols WHERE protocol_id = $1 FOR UPDATE")
            .bind(protocol_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(protocol)
    }

    async fn find_status(&mut self, status_id: i32) -> Result<Option<ProtocolStatus>, DatabaseError> {
        let status = sqlx::query_as::<_, ProtocolStatus>("SELECT * FROM protocol_statuses WHERE status_id = $1")
            .bind(status_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(status)
    }

    async fn append_history(&mut self, entry: NewHistoryEntry) -> Result<ProtocolHistory, DatabaseError> {
        let history = sqlx::query_as::<_, ProtocolHistory>(
            "INSERT INTO protocol_history (protocol_id, old_status_id, new_status_id, notes, created_by) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(entry.protocol_id)
        .bind(entry.old_status_id)
        .bind(entry.new_status_id)
        .bind(entry.notes)
        .bind(entry.created_by)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(history)
    }

    async fn write_protocol(
        &mut self,
        protocol_id: i32,
        changes: &ProtocolChangeSet,
        updated_at: DateTime<Utc>,
    ) -> Result<Protocol, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE protocols SET updated_at = ");
        qb.push_bind(updated_at);

        if let Some(v) = &changes.title {
            qb.push(", title = ").push_bind(v.clone());
        }
        if let Some(v) = &changes.description {
            qb.push(", description = ").push_bind(v.clone());
        }
        if let Some(v) = changes.type_id {
            qb.push(", type_id = ").push_bind(v);
        }
        if let Some(v) = changes.status_id {
            qb.push(", status_id = ").push_bind(v);
        }
        if let Some(v) = changes.customer_id {
            qb.push(", customer_id = ").push_bind(v);
        }
        if let Some(v) = changes.branch_id {
            qb.push(", branch_id = ").push_bind(v);
        }
        if let Some(v) = changes.requestor_id {
            qb.push(", requestor_id = ").push_bind(v);
        }
        if let Some(v) = changes.assigned_to {
            qb.push(", assigned_to = ").push_bind(v);
        }
        if let Some(v) = changes.priority {
            qb.push(", priority = ").push_bind(v.as_str());
        }
        if let Some(v) = changes.deadline {
            qb.push(", deadline = ").push_bind(v);
        }
        if let Some(v) = changes.date_required {
            qb.push(", date_required = ").push_bind(v);
        }
        if let Some(v) = changes.expected_completion {
            qb.push(", expected_completion = ").push_bind(v);
        }
        if let Some(v) = changes.closed_at() {
            qb.push(", closed_at = ").push_bind(v);
        }

        qb.push(" WHERE protocol_id = ").push_bind(protocol_id);
        qb.push(" RETURNING *");

        let protocol = qb.build_query_as::<Protocol>().fetch_one(&mut *self.tx).await?;
        Ok(protocol)
    }

    async fn next_protocol_sequence(&mut self, year: i32) -> Result<i32, DatabaseError> {
        let (value,): (i32,) = sqlx::query_as(NEXT_SEQUENCE_SQL)
            .bind(year)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(value)
    }

    async fn insert_protocol(&mut self, record: &NewProtocolRecord) -> Result<Protocol, DatabaseError> {
        let d = &record.draft;
        let protocol = sqlx::query_as::<_, Protocol>(
            "INSERT INTO protocols (protocol_number, title, description, type_id, status_id, customer_id, \
             branch_id, requestor_id, assigned_to, created_by, priority, deadline, date_required, \
             expected_completion, created_at, updated_at, closed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15, $16) \
             RETURNING *",
        )
        .bind(&record.protocol_number)
        .bind(&d.title)
        .bind(&d.description)
        .bind(d.type_id)
        .bind(d.status_id)
        .bind(d.customer_id)
        .bind(d.branch_id)
        .bind(d.requestor_id)
        .bind(d.assigned_to)
        .bind(d.created_by)
        .bind(d.priority.as_str())
        .bind(d.deadline)
        .bind(d.date_required)
        .bind(d.expected_completion)
        .bind(record.created_at)
        .bind(record.closed_at)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(protocol)
    }

    async fn delete_protocol_tree(&mut self, protocol_id: i32) -> Result<bool, DatabaseError> {
        for table in ["protocol_attachments", "protocol_reminders", "protocol_history"] {
            let sql = format!("DELETE FROM {} WHERE protocol_id = $1", table);
            sqlx::query(&sql).bind(protocol_id).execute(&mut *self.tx).await?;
        }

        let result = sqlx::query("DELETE FROM protocols WHERE protocol_id = $1")
            .bind(protocol_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
