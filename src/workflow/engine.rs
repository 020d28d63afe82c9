use chrono::{DateTime, Datelike, Utc};
use tracing::{debug, info};

use crate::database::models::{NewHistoryEntry, Protocol, ProtocolHistory};
use crate::services::error::{ServiceError, ServiceResult};
use crate::workflow::changeset::{ProtocolDraft, ProtocolUpdate};
use crate::workflow::numbering::format_protocol_number;
use crate::workflow::store::{NewProtocolRecord, TransitionStore};

/// What an applied update wrote
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    pub protocol: Protocol,
    /// Present only when the status actually changed
    pub history: Option<ProtocolHistory>,
}

/// Applies validated changes to a protocol inside the caller's unit of work.
///
/// The engine never commits: callers hand it an open [`TransitionStore`] and commit
/// only when it returns `Ok`, so a history entry and the field update it audits
/// land together or not at all.
pub struct TransitionEngine;

impl TransitionEngine {
    pub async fn apply_update<S>(
        store: &mut S,
        protocol_id: i32,
        update: ProtocolUpdate,
        now: DateTime<Utc>,
    ) -> ServiceResult<TransitionOutcome>
    where
        S: TransitionStore,
    {
        let ProtocolUpdate {
            mut changes,
            notes,
            acting_personnel_id,
        } = update;

        let current = store
            .lock_protocol(protocol_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("protocol {} not found", protocol_id)))?;

        let mut history = None;
        if let Some(target) = changes.status_id.filter(|s| *s != current.status_id) {
            let status = store
                .find_status(target)
                .await?
                .ok_or_else(|| ServiceError::not_found(format!("protocol status {} not found", target)))?;

            let entry = NewHistoryEntry {
                protocol_id,
                old_status_id: Some(current.status_id),
                new_status_id: target,
                notes: notes.unwrap_or_default(),
                created_by: acting_personnel_id.unwrap_or_else(|| current.default_actor()),
            };
            history = Some(store.append_history(entry).await?);

            if status.is_terminal {
                changes.stage_closed_at(now);
            }

            info!(
                protocol_id,
                from = current.status_id,
                to = target,
                terminal = status.is_terminal,
                "protocol status transition"
            );
        }

        let protocol = store.write_protocol(protocol_id, &changes, now).await?;
        debug!(protocol_id, "protocol fields written");

        Ok(TransitionOutcome { protocol, history })
    }

    pub async fn create<S>(store: &mut S, draft: ProtocolDraft, now: DateTime<Utc>) -> ServiceResult<Protocol>
    where
        S: TransitionStore,
    {
        let status = store
            .find_status(draft.status_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("protocol status {} not found", draft.status_id)))?;

        let year = now.year();
        let sequence = store.next_protocol_sequence(year).await?;

        let record = NewProtocolRecord {
            protocol_number: format_protocol_number(year, sequence),
            closed_at: status.is_terminal.then_some(now),
            created_at: now,
            draft,
        };
        let protocol = store.insert_protocol(&record).await?;

        store
            .append_history(NewHistoryEntry::creation(
                protocol.protocol_id,
                protocol.status_id,
                protocol.created_by,
            ))
            .await?;

        info!(
            protocol_id = protocol.protocol_id,
            number = %protocol.protocol_number,
            "protocol created"
        );
        Ok(protocol)
    }

    pub async fn delete<S>(store: &mut S, protocol_id: i32) -> ServiceResult<()>
    where
        S: TransitionStore,
    {
        if !store.delete_protocol_tree(protocol_id).await.map_err(ServiceError::from_delete)? {
            return Err(ServiceError::not_found(format!("protocol {} not found", protocol_id)));
        }
        info!(protocol_id, "protocol deleted");
        Ok(())
    }
}
