//! In-memory stand-ins for unit tests that exercise the transition engine without Postgres.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::database::manager::DatabaseError;
use crate::database::models::{NewHistoryEntry, Protocol, ProtocolHistory, ProtocolStatus};
use crate::workflow::changeset::ProtocolChangeSet;
use crate::workflow::store::{NewProtocolRecord, TransitionStore};

/// Fixed timestamps so assertions can compare exact values
pub struct TestClock;

impl TestClock {
    pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
    }

    pub fn now() -> DateTime<Utc> {
        Self::at(2024, 6, 1)
    }
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    statuses: BTreeMap<i32, ProtocolStatus>,
    protocols: BTreeMap<i32, Protocol>,
    history: Vec<ProtocolHistory>,
    sequences: HashMap<i32, i32>,
    /// Protocol ids of reminder and attachment rows
    children: Vec<i32>,
    next_protocol_id: i32,
    next_history_id: i32,
}

/// Committed state shared by every transaction opened from it
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn with_statuses(statuses: &[(i32, &str, bool)]) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            for (id, name, terminal) in statuses {
                state.statuses.insert(
                    *id,
                    ProtocolStatus {
                        status_id: *id,
                        status_name: name.to_string(),
                        color: String::new(),
                        is_terminal: *terminal,
                    },
                );
            }
        }
        store
    }

    /// Snapshot the committed state into a private working copy
    pub fn begin(&self) -> MemoryTx {
        MemoryTx {
            shared: Arc::clone(&self.state),
            working: self.state.lock().unwrap().clone(),
            writes: 0,
            fail_protocol_writes: false,
        }
    }

    pub fn protocol(&self, protocol_id: i32) -> Option<Protocol> {
        self.state.lock().unwrap().protocols.get(&protocol_id).cloned()
    }

    pub fn history_for(&self, protocol_id: i32) -> Vec<ProtocolHistory> {
        let state = self.state.lock().unwrap();
        state
            .history
            .iter()
            .filter(|h| h.protocol_id == protocol_id)
            .cloned()
            .collect()
    }

    pub fn add_reminder(&self, protocol_id: i32) {
        self.state.lock().unwrap().children.push(protocol_id);
    }

    pub fn add_attachment(&self, protocol_id: i32) {
        self.state.lock().unwrap().children.push(protocol_id);
    }

    pub fn children_of(&self, protocol_id: i32) -> usize {
        let state = self.state.lock().unwrap();
        state.children.iter().filter(|id| **id == protocol_id).count()
    }
}

/// Uncommitted unit of work. Dropping it discards every change.
pub struct MemoryTx {
    shared: Arc<Mutex<MemoryState>>,
    working: MemoryState,
    writes: usize,
    fail_protocol_writes: bool,
}

impl MemoryTx {
    pub fn commit(self) {
        *self.shared.lock().unwrap() = self.working;
    }

    /// Number of mutating calls made through this transaction
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn fail_protocol_writes(&mut self) {
        self.fail_protocol_writes = true;
    }
}

fn apply(protocol: &mut Protocol, changes: &ProtocolChangeSet, updated_at: DateTime<Utc>) {
    if let Some(v) = &changes.title {
        protocol.title = v.clone();
    }
    if let Some(v) = &changes.description {
        protocol.description = v.clone();
    }
    if let Some(v) = changes.type_id {
        protocol.type_id = v;
    }
    if let Some(v) = changes.status_id {
        protocol.status_id = v;
    }
    if let Some(v) = changes.customer_id {
        protocol.customer_id = v;
    }
    if let Some(v) = changes.branch_id {
        protocol.branch_id = v;
    }
    if let Some(v) = changes.requestor_id {
        protocol.requestor_id = v;
    }
    if let Some(v) = changes.assigned_to {
        protocol.assigned_to = v;
    }
    if let Some(v) = changes.priority {
        protocol.priority = v;
    }
    if let Some(v) = changes.deadline {
        protocol.deadline = v;
    }
    if let Some(v) = changes.date_required {
        protocol.date_required = v;
    }
    if let Some(v) = changes.expected_completion {
        protocol.expected_completion = v;
    }
    if let Some(v) = changes.closed_at() {
        protocol.closed_at = Some(v);
    }
    protocol.updated_at = updated_at;
}

#[async_trait]
impl TransitionStore for MemoryTx {
    async fn lock_protocol(&mut self, protocol_id: i32) -> Result<Option<Protocol>, DatabaseError> {
        Ok(self.working.protocols.get(&protocol_id).cloned())
    }

    async fn find_status(&mut self, status_id: i32) -> Result<Option<ProtocolStatus>, DatabaseError> {
        Ok(self.working.statuses.get(&status_id).cloned())
    }

    async fn append_history(&mut self, entry: NewHistoryEntry) -> Result<ProtocolHistory, DatabaseError> {
        self.writes += 1;
        self.working.next_history_id += 1;
        let row = ProtocolHistory {
            protocol_history_id: self.working.next_history_id,
            protocol_id: entry.protocol_id,
            old_status_id: entry.old_status_id,
            new_status_id: entry.new_status_id,
            notes: entry.notes,
            created_by: entry.created_by,
            created_at: TestClock::now(),
        };
        self.working.history.push(row.clone());
        Ok(row)
    }

    async fn write_protocol(
        &mut self,
        protocol_id: i32,
        changes: &ProtocolChangeSet,
        updated_at: DateTime<Utc>,
    ) -> Result<Protocol, DatabaseError> {
        if self.fail_protocol_writes {
            return Err(DatabaseError::ConnectionError("injected write failure".to_string()));
        }
        self.writes += 1;
        let protocol = self
            .working
            .protocols
            .get_mut(&protocol_id)
            .ok_or(DatabaseError::Sqlx(sqlx::Error::RowNotFound))?;
        apply(protocol, changes, updated_at);
        Ok(protocol.clone())
    }

    async fn next_protocol_sequence(&mut self, year: i32) -> Result<i32, DatabaseError> {
        self.writes += 1;
        let value = self.working.sequences.entry(year).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    async fn insert_protocol(&mut self, record: &NewProtocolRecord) -> Result<Protocol, DatabaseError> {
        self.writes += 1;
        self.working.next_protocol_id += 1;
        let d = record.draft.clone();
        let protocol = Protocol {
            protocol_id: self.working.next_protocol_id,
            protocol_number: record.protocol_number.clone(),
            title: d.title,
            description: d.description,
            type_id: d.type_id,
            status_id: d.status_id,
            customer_id: d.customer_id,
            branch_id: d.branch_id,
            requestor_id: d.requestor_id,
            assigned_to: d.assigned_to,
            created_by: d.created_by,
            priority: d.priority,
            deadline: d.deadline,
            date_required: d.date_required,
            expected_completion: d.expected_completion,
            created_at: record.created_at,
            updated_at: record.created_at,
            closed_at: record.closed_at,
        };
        self.working.protocols.insert(protocol.protocol_id, protocol.clone());
        Ok(protocol)
    }

    async fn delete_protocol_tree(&mut self, protocol_id: i32) -> Result<bool, DatabaseError> {
        self.writes += 1;
        self.working.children.retain(|id| *id != protocol_id);
        self.working.history.retain(|h| h.protocol_id != protocol_id);
        Ok(self.working.protocols.remove(&protocol_id).is_some())
    }
}
