//! Typed protocol changes.
//!
//! Request bodies arrive as [`ProtocolPatch`] / [`NewProtocol`], which keep raw
//! values (priority as text) so validation can report precise errors. They are
//! converted into [`ProtocolUpdate`] / [`ProtocolDraft`] before any I/O happens.
//! Nullable columns use `Option<Option<T>>`: outer `None` means "leave as is",
//! `Some(None)` means "set to NULL".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::database::models::Priority;
use crate::services::error::{ServiceError, ServiceResult};

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `PUT/PATCH /api/protocols/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProtocolPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub type_id: Option<i32>,
    pub status_id: Option<i32>,
    pub customer_id: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub branch_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub requestor_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_to: Option<Option<i32>>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub deadline: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub date_required: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub expected_completion: Option<Option<DateTime<Utc>>>,
    /// Note stored on the history entry when the status changes
    pub notes: Option<String>,
    /// Personnel credited on the history entry
    pub acting_personnel_id: Option<i32>,
}

/// Validated column changes for one protocol write
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProtocolChangeSet {
    pub title: Option<String>,
    pub description: Option<String>,
    pub type_id: Option<i32>,
    pub status_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub branch_id: Option<Option<i32>>,
    pub requestor_id: Option<Option<i32>>,
    pub assigned_to: Option<Option<i32>>,
    pub priority: Option<Priority>,
    pub deadline: Option<Option<DateTime<Utc>>>,
    pub date_required: Option<Option<DateTime<Utc>>>,
    pub expected_completion: Option<Option<DateTime<Utc>>>,
    closed_at: Option<DateTime<Utc>>,
}

impl ProtocolChangeSet {
    /// Set by the transition engine when the target status is terminal
    pub(crate) fn stage_closed_at(&mut self, at: DateTime<Utc>) {
        self.closed_at = Some(at);
    }

    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    pub fn is_empty(&self) -> bool {
        *self == ProtocolChangeSet::default()
    }
}

/// A validated update request: the column changes plus audit attribution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProtocolUpdate {
    pub changes: ProtocolChangeSet,
    pub notes: Option<String>,
    pub acting_personnel_id: Option<i32>,
}

fn parse_priority(raw: Option<String>) -> ServiceResult<Option<Priority>> {
    raw.map(|p| p.parse::<Priority>())
        .transpose()
        .map_err(|e| ServiceError::invalid_argument(e.to_string()))
}

fn check_title(title: &str) -> ServiceResult<()> {
    if title.trim().is_empty() {
        return Err(ServiceError::invalid_argument("title must not be empty"));
    }
    Ok(())
}

impl TryFrom<ProtocolPatch> for ProtocolUpdate {
    type Error = ServiceError;

    fn try_from(patch: ProtocolPatch) -> Result<Self, Self::Error> {
        let priority = parse_priority(patch.priority)?;
        if let Some(title) = &patch.title {
            check_title(title)?;
        }

        let changes = ProtocolChangeSet {
            title: patch.title,
            description: patch.description,
            type_id: patch.type_id,
            status_id: patch.status_id,
            customer_id: patch.customer_id,
            branch_id: patch.branch_id,
            requestor_id: patch.requestor_id,
            assigned_to: patch.assigned_to,
            priority,
            deadline: patch.deadline,
            date_required: patch.date_required,
            expected_completion: patch.expected_completion,
            closed_at: None,
        };

        if changes.is_empty() {
            return Err(ServiceError::invalid_argument("no protocol fields to update"));
        }

        Ok(Self {
            changes,
            notes: patch.notes,
            acting_personnel_id: patch.acting_personnel_id,
        })
    }
}

/// Body of `POST /api/protocols`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProtocol {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub type_id: Option<i32>,
    pub status_id: Option<i32>,
    pub customer_id: i32,
    pub branch_id: Option<i32>,
    pub requestor_id: Option<i32>,
    pub assigned_to: Option<i32>,
    pub created_by: Option<i32>,
    pub priority: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub date_required: Option<DateTime<Utc>>,
    pub expected_completion: Option<DateTime<Utc>>,
}

/// Values used when a draft leaves a field unset. Configured, never guessed from table contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolDefaults {
    pub initial_status_id: i32,
    pub type_id: Option<i32>,
}

impl From<&crate::config::ProtocolConfig> for ProtocolDefaults {
    fn from(config: &crate::config::ProtocolConfig) -> Self {
        Self {
            initial_status_id: config.initial_status_id,
            type_id: config.default_type_id,
        }
    }
}

/// A creation request with every default resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolDraft {
    pub title: String,
    pub description: String,
    pub type_id: i32,
    pub status_id: i32,
    pub customer_id: i32,
    pub branch_id: Option<i32>,
    pub requestor_id: Option<i32>,
    pub assigned_to: Option<i32>,
    pub created_by: i32,
    pub priority: Priority,
    pub deadline: Option<DateTime<Utc>>,
    pub date_required: Option<DateTime<Utc>>,
    pub expected_completion: Option<DateTime<Utc>>,
}

impl NewProtocol {
    pub fn resolve(self, defaults: &ProtocolDefaults) -> ServiceResult<ProtocolDraft> {
        check_title(&self.title)?;
        let priority = parse_priority(self.priority)?.unwrap_or_default();

        let type_id = self
            .type_id
            .or(defaults.type_id)
            .ok_or_else(|| ServiceError::invalid_argument("type_id is required (no default protocol type configured)"))?;

        let created_by = self
            .created_by
            .or(self.assigned_to)
            .ok_or_else(|| ServiceError::invalid_argument("created_by or assigned_to is required"))?;

        Ok(ProtocolDraft {
            title: self.title,
            description: self.description,
            type_id,
            status_id: self.status_id.unwrap_or(defaults.initial_status_id),
            customer_id: self.customer_id,
            branch_id: self.branch_id,
            requestor_id: self.requestor_id,
            assigned_to: self.assigned_to,
            created_by,
            priority,
            deadline: self.deadline,
            date_required: self.date_required,
            expected_completion: self.expected_completion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(value: serde_json::Value) -> ProtocolPatch {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn distinguishes_absent_from_null() {
        let p = patch(json!({ "assigned_to": null, "title": "Claim" }));
        assert_eq!(p.assigned_to, Some(None));
        assert_eq!(p.branch_id, None);

        let p = patch(json!({ "assigned_to": 4 }));
        assert_eq!(p.assigned_to, Some(Some(4)));
    }

    #[test]
    fn rejects_unknown_priority() {
        let err = ProtocolUpdate::try_from(patch(json!({ "priority": "urgent" }))).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(msg) if msg.contains("urgent")));
    }

    #[test]
    fn invalid_priority_rejects_the_whole_patch() {
        let err = ProtocolUpdate::try_from(patch(json!({ "priority": "urgent", "title": "ok", "status_id": 2 })));
        assert!(err.is_err());
    }

    #[test]
    fn rejects_blank_title_and_empty_patch() {
        assert!(ProtocolUpdate::try_from(patch(json!({ "title": "   " }))).is_err());
        assert!(ProtocolUpdate::try_from(patch(json!({ "notes": "only a note" }))).is_err());
    }

    #[test]
    fn carries_attribution_separately() {
        let update =
            ProtocolUpdate::try_from(patch(json!({ "status_id": 5, "notes": "done", "acting_personnel_id": 9 })))
                .unwrap();
        assert_eq!(update.changes.status_id, Some(5));
        assert_eq!(update.notes.as_deref(), Some("done"));
        assert_eq!(update.acting_personnel_id, Some(9));
        assert_eq!(update.changes.closed_at(), None);
    }

    fn draft() -> NewProtocol {
        NewProtocol {
            title: "Windshield claim".to_string(),
            customer_id: 3,
            ..Default::default()
        }
    }

    #[test]
    fn resolves_configured_defaults() {
        let defaults = ProtocolDefaults { initial_status_id: 1, type_id: Some(2) };
        let resolved = NewProtocol { assigned_to: Some(7), ..draft() }.resolve(&defaults).unwrap();
        assert_eq!(resolved.status_id, 1);
        assert_eq!(resolved.type_id, 2);
        assert_eq!(resolved.created_by, 7);
        assert_eq!(resolved.priority, Priority::Medium);
    }

    #[test]
    fn explicit_values_beat_defaults() {
        let defaults = ProtocolDefaults { initial_status_id: 1, type_id: Some(2) };
        let resolved = NewProtocol {
            status_id: Some(3),
            type_id: Some(4),
            created_by: Some(8),
            assigned_to: Some(7),
            priority: Some("high".to_string()),
            ..draft()
        }
        .resolve(&defaults)
        .unwrap();
        assert_eq!((resolved.status_id, resolved.type_id, resolved.created_by), (3, 4, 8));
        assert_eq!(resolved.priority, Priority::High);
    }

    #[test]
    fn missing_creator_or_type_is_invalid() {
        let defaults = ProtocolDefaults { initial_status_id: 1, type_id: None };
        let err = NewProtocol { assigned_to: Some(7), ..draft() }.resolve(&defaults).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(msg) if msg.contains("type_id")));

        let defaults = ProtocolDefaults { initial_status_id: 1, type_id: Some(1) };
        let err = draft().resolve(&defaults).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(msg) if msg.contains("created_by")));
    }
}
