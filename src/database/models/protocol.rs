use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, Row};
use std::fmt;
use std::str::FromStr;

use super::{Branch, Customer, ProtocolStatus, ProtocolType, SalesPersonnel};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid priority '{0}', expected one of: low, medium, high")]
pub struct InvalidPriority(pub String);

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(InvalidPriority(other.to_string())),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = InvalidPriority;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Current state of a tracked case, as stored in `protocols`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Protocol {
    pub protocol_id: i32,
    pub protocol_number: String,
    pub title: String,
    pub description: String,
    pub type_id: i32,
    pub status_id: i32,
    pub customer_id: i32,
    pub branch_id: Option<i32>,
    pub requestor_id: Option<i32>,
    pub assigned_to: Option<i32>,
    pub created_by: i32,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub deadline: Option<DateTime<Utc>>,
    pub date_required: Option<DateTime<Utc>>,
    pub expected_completion: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Protocol {
    /// Personnel credited with a change when the caller names nobody:
    /// the assignee, falling back to the creator.
    pub fn default_actor(&self) -> i32 {
        self.assigned_to.unwrap_or(self.created_by)
    }
}

/// A protocol together with whichever associations the query asked for.
/// Relations that were not included serialize as null.
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolView {
    #[serde(flatten)]
    pub protocol: Protocol,
    #[serde(rename = "type")]
    pub protocol_type: Option<ProtocolType>,
    pub status: Option<ProtocolStatus>,
    pub customer: Option<Customer>,
    pub branch: Option<Branch>,
    pub requestor: Option<SalesPersonnel>,
    pub assigned_agent: Option<SalesPersonnel>,
    pub created_by_agent: Option<SalesPersonnel>,
}

fn relation<T>(row: &PgRow, column: &str) -> Result<Option<T>, sqlx::Error>
where
    T: for<'de> Deserialize<'de>,
{
    let value: Option<Json<T>> = row.try_get(column)?;
    Ok(value.map(|j| j.0))
}

impl<'r> FromRow<'r, PgRow> for ProtocolView {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            protocol: Protocol::from_row(row)?,
            protocol_type: relation(row, "rel_type")?,
            status: relation(row, "rel_status")?,
            customer: relation(row, "rel_customer")?,
            branch: relation(row, "rel_branch")?,
            requestor: relation(row, "rel_requestor")?,
            assigned_agent: relation(row, "rel_assigned_agent")?,
            created_by_agent: relation(row, "rel_created_by_agent")?,
        })
    }
}
