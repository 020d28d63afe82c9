use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

use crate::database::manager::DatabaseError;
use crate::database::models::{AttachmentView, HistoryEntry, ProtocolView, ReminderView};

/// Association of a protocol that a read may resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Include {
    Type,
    Status,
    Customer,
    Branch,
    Requestor,
    AssignedAgent,
    CreatedByAgent,
}

impl Include {
    pub const ALL: [Include; 7] = [
        Include::Type,
        Include::Status,
        Include::Customer,
        Include::Branch,
        Include::Requestor,
        Include::AssignedAgent,
        Include::CreatedByAgent,
    ];

    /// (result column, table alias, join clause)
    fn parts(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            Include::Type => ("rel_type", "t", "LEFT JOIN protocol_types t ON t.type_id = p.type_id"),
            Include::Status => ("rel_status", "s", "LEFT JOIN protocol_statuses s ON s.status_id = p.status_id"),
            Include::Customer => ("rel_customer", "c", "LEFT JOIN customers c ON c.customer_id = p.customer_id"),
            Include::Branch => ("rel_branch", "b", "LEFT JOIN insurance_branches b ON b.branch_id = p.branch_id"),
            Include::Requestor => (
                "rel_requestor",
                "rq",
                "LEFT JOIN sales_personnel rq ON rq.personnel_id = p.requestor_id",
            ),
            Include::AssignedAgent => (
                "rel_assigned_agent",
                "aa",
                "LEFT JOIN sales_personnel aa ON aa.personnel_id = p.assigned_to",
            ),
            Include::CreatedByAgent => (
                "rel_created_by_agent",
                "cb",
                "LEFT JOIN sales_personnel cb ON cb.personnel_id = p.created_by",
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProtocolFilter {
    Id(i32),
    Status(i32),
}

/// Read projection over `protocols`. Each include adds one join and one JSON column;
/// relations that were not requested come back as NULL.
#[derive(Debug, Clone, Default)]
pub struct ProtocolQuery {
    includes: Vec<Include>,
    filter: Option<ProtocolFilter>,
}

impl ProtocolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, include: Include) -> Self {
        if !self.includes.contains(&include) {
            self.includes.push(include);
        }
        self
    }

    pub fn include_all(self) -> Self {
        Include::ALL.into_iter().fold(self, |q, inc| q.include(inc))
    }

    pub fn by_id(mut self, protocol_id: i32) -> Self {
        self.filter = Some(ProtocolFilter::Id(protocol_id));
        self
    }

    pub fn by_status(mut self, status_id: i32) -> Self {
        self.filter = Some(ProtocolFilter::Status(status_id));
        self
    }

    pub fn to_sql(&self) -> String {
        let mut columns = vec!["p.*".to_string()];
        let mut joins = Vec::new();

        for include in Include::ALL {
            let (column, alias, join) = include.parts();
            if self.includes.contains(&include) {
                columns.push(format!("to_jsonb({}) AS {}", alias, column));
                joins.push(join);
            } else {
                columns.push(format!("NULL::jsonb AS {}", column));
            }
        }

        let mut sql = format!("SELECT {} FROM protocols p", columns.join(", "));
        for join in joins {
            sql.push(' ');
            sql.push_str(join);
        }

        match self.filter {
            Some(ProtocolFilter::Id(_)) => sql.push_str(" WHERE p.protocol_id = $1"),
            Some(ProtocolFilter::Status(_)) => sql.push_str(" WHERE p.status_id = $1"),
            None => {}
        }

        sql.push_str(" ORDER BY p.created_at DESC, p.protocol_id DESC");
        sql
    }

    fn param(&self) -> Option<i32> {
        match self.filter {
            Some(ProtocolFilter::Id(id)) | Some(ProtocolFilter::Status(id)) => Some(id),
            None => None,
        }
    }

    pub async fn fetch_all<'e, E>(self, executor: E) -> Result<Vec<ProtocolView>, DatabaseError>
    where
        E: PgExecutor<'e>,
    {
        let sql = self.to_sql();
        let mut q = sqlx::query_as::<_, ProtocolView>(&sql);
        if let Some(p) = self.param() {
            q = q.bind(p);
        }
        Ok(q.fetch_all(executor).await?)
    }

    pub async fn fetch_optional<'e, E>(self, executor: E) -> Result<Option<ProtocolView>, DatabaseError>
    where
        E: PgExecutor<'e>,
    {
        let sql = self.to_sql();
        let mut q = sqlx::query_as::<_, ProtocolView>(&sql);
        if let Some(p) = self.param() {
            q = q.bind(p);
        }
        Ok(q.fetch_optional(executor).await?)
    }
}

/// Ordering of ledger reads; the consumer decides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryOrder {
    #[default]
    Chronological,
    NewestFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryFilter {
    Id(i32),
    Protocol(i32),
}

/// Read projection over `protocol_history`, always resolving both statuses and the agent
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    filter: Option<HistoryFilter>,
    order: HistoryOrder,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(mut self, history_id: i32) -> Self {
        self.filter = Some(HistoryFilter::Id(history_id));
        self
    }

    pub fn for_protocol(mut self, protocol_id: i32) -> Self {
        self.filter = Some(HistoryFilter::Protocol(protocol_id));
        self
    }

    pub fn order(mut self, order: HistoryOrder) -> Self {
        self.order = order;
        self
    }

    pub fn to_sql(&self) -> String {
        let mut sql = String::from(
            "SELECT h.*, to_jsonb(ps) AS rel_previous_status, to_jsonb(ns) AS rel_new_status, \
             to_jsonb(cb) AS rel_created_by_agent \
             FROM protocol_history h \
             LEFT JOIN protocol_statuses ps ON ps.status_id = h.old_status_id \
             LEFT JOIN protocol_statuses ns ON ns.status_id = h.new_status_id \
             LEFT JOIN sales_personnel cb ON cb.personnel_id = h.created_by",
        );

        match self.filter {
            Some(HistoryFilter::Id(_)) => sql.push_str(" WHERE h.protocol_history_id = $1"),
            Some(HistoryFilter::Protocol(_)) => sql.push_str(" WHERE h.protocol_id = $1"),
            None => {}
        }

        match self.order {
            HistoryOrder::Chronological => sql.push_str(" ORDER BY h.created_at ASC, h.protocol_history_id ASC"),
            HistoryOrder::NewestFirst => sql.push_str(" ORDER BY h.created_at DESC, h.protocol_history_id DESC"),
        }
        sql
    }

    fn param(&self) -> Option<i32> {
        match self.filter {
            Some(HistoryFilter::Id(id)) | Some(HistoryFilter::Protocol(id)) => Some(id),
            None => None,
        }
    }

    pub async fn fetch_all<'e, E>(self, executor: E) -> Result<Vec<HistoryEntry>, DatabaseError>
    where
        E: PgExecutor<'e>,
    {
        let sql = self.to_sql();
        let mut q = sqlx::query_as::<_, HistoryEntry>(&sql);
        if let Some(p) = self.param() {
            q = q.bind(p);
        }
        Ok(q.fetch_all(executor).await?)
    }

    pub async fn fetch_optional<'e, E>(self, executor: E) -> Result<Option<HistoryEntry>, DatabaseError>
    where
        E: PgExecutor<'e>,
    {
        let sql = self.to_sql();
        let mut q = sqlx::query_as::<_, HistoryEntry>(&sql);
        if let Some(p) = self.param() {
            q = q.bind(p);
        }
        Ok(q.fetch_optional(executor).await?)
    }
}

/// Read projection over `protocol_attachments` with the uploading agent joined in
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachmentQuery {
    filter: Option<AttachmentFilter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttachmentFilter {
    Id(i32),
    Protocol(i32),
}

impl AttachmentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(mut self, attachment_id: i32) -> Self {
        self.filter = Some(AttachmentFilter::Id(attachment_id));
        self
    }

    pub fn for_protocol(mut self, protocol_id: i32) -> Self {
        self.filter = Some(AttachmentFilter::Protocol(protocol_id));
        self
    }

    pub fn to_sql(&self) -> String {
        let mut sql = String::from(
            "SELECT a.*, to_jsonb(ub) AS rel_uploaded_by_agent \
             FROM protocol_attachments a \
             LEFT JOIN sales_personnel ub ON ub.personnel_id = a.uploaded_by",
        );
        match self.filter {
            Some(AttachmentFilter::Id(_)) => sql.push_str(" WHERE a.attachment_id = $1"),
            Some(AttachmentFilter::Protocol(_)) => sql.push_str(" WHERE a.protocol_id = $1"),
            None => {}
        }
        sql.push_str(" ORDER BY a.uploaded_at DESC, a.attachment_id DESC");
        sql
    }

    fn param(&self) -> Option<i32> {
        match self.filter {
            Some(AttachmentFilter::Id(id)) | Some(AttachmentFilter::Protocol(id)) => Some(id),
            None => None,
        }
    }

    pub async fn fetch_all<'e, E>(self, executor: E) -> Result<Vec<AttachmentView>, DatabaseError>
    where
        E: PgExecutor<'e>,
    {
        let sql = self.to_sql();
        let mut q = sqlx::query_as::<_, AttachmentView>(&sql);
        if let Some(p) = self.param() {
            q = q.bind(p);
        }
        Ok(q.fetch_all(executor).await?)
    }

    pub async fn fetch_optional<'e, E>(self, executor: E) -> Result<Option<AttachmentView>, DatabaseError>
    where
        E: PgExecutor<'e>,
    {
        let sql = self.to_sql();
        let mut q = sqlx::query_as::<_, AttachmentView>(&sql);
        if let Some(p) = self.param() {
            q = q.bind(p);
        }
        Ok(q.fetch_optional(executor).await?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReminderFilter {
    Id(i32),
    Protocol(i32),
    /// Unsent reminders due inside the window
    DueUnsent(DateTime<Utc>, DateTime<Utc>),
}

/// Read projection over `protocol_reminders`, soonest first, with the creating agent joined in
#[derive(Debug, Clone, Copy, Default)]
pub struct ReminderQuery {
    filter: Option<ReminderFilter>,
}

impl ReminderQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(mut self, reminder_id: i32) -> Self {
        self.filter = Some(ReminderFilter::Id(reminder_id));
        self
    }

    pub fn for_protocol(mut self, protocol_id: i32) -> Self {
        self.filter = Some(ReminderFilter::Protocol(protocol_id));
        self
    }

    pub fn due_unsent(mut self, from: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.filter = Some(ReminderFilter::DueUnsent(from, until));
        self
    }

    pub fn to_sql(&self) -> String {
        let mut sql = String::from(
            "SELECT r.*, to_jsonb(cb) AS rel_created_by_agent \
             FROM protocol_reminders r \
             LEFT JOIN sales_personnel cb ON cb.personnel_id = r.created_by",
        );
        match self.filter {
            Some(ReminderFilter::Id(_)) => sql.push_str(" WHERE r.reminder_id = $1"),
            Some(ReminderFilter::Protocol(_)) => sql.push_str(" WHERE r.protocol_id = $1"),
            Some(ReminderFilter::DueUnsent(..)) => {
                sql.push_str(" WHERE r.is_sent = FALSE AND r.reminder_date BETWEEN $1 AND $2")
            }
            None => {}
        }
        sql.push_str(" ORDER BY r.reminder_date ASC, r.reminder_id ASC");
        sql
    }

    pub async fn fetch_all<'e, E>(self, executor: E) -> Result<Vec<ReminderView>, DatabaseError>
    where
        E: PgExecutor<'e>,
    {
        let sql = self.to_sql();
        let q = sqlx::query_as::<_, ReminderView>(&sql);
        let q = match self.filter {
            Some(ReminderFilter::Id(id)) | Some(ReminderFilter::Protocol(id)) => q.bind(id),
            Some(ReminderFilter::DueUnsent(from, until)) => q.bind(from).bind(until),
            None => q,
        };
        Ok(q.fetch_all(executor).await?)
    }

    pub async fn fetch_optional<'e, E>(self, executor: E) -> Result<Option<ReminderView>, DatabaseError>
    where
        E: PgExecutor<'e>,
    {
        let sql = self.to_sql();
        let q = sqlx::query_as::<_, ReminderView>(&sql);
        let q = match self.filter {
            Some(ReminderFilter::Id(id)) | Some(ReminderFilter::Protocol(id)) => q.bind(id),
            Some(ReminderFilter::DueUnsent(from, until)) => q.bind(from).bind(until),
            None => q,
        };
        Ok(q.fetch_optional(executor).await?)
    }
}
