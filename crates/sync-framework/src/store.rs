//! # Collection Store
//!
//! The authoritative local copy of one resource collection plus the status of its
//! most recently *initiated* fetch.
//!
//! ## Stale responses
//!
//! Every [`CollectionStore::begin_fetch`] issues a fresh [`RequestToken`] and
//! invalidates the previous one. [`CollectionStore::complete_fetch`] only applies a
//! result carrying the current token; anything older is dropped without touching
//! the store. This is the single rule that keeps a slow early response from
//! clobbering a fast later one.
//!
//! ## Mutations
//!
//! `apply_create`, `apply_update`, `apply_delete` and `apply_toggle` are synchronous
//! and never talk to the network. They are called only after the server confirmed
//! the change (see [`MutationCoordinator`](crate::MutationCoordinator)).
//!
//! Invariant: `items` never holds two records with the same id.

use crate::record::{Record, RecordId};
use crate::wire::FetchPage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::{self, Display};

/// Status of the most recently initiated fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FetchStatus::Idle => "idle",
            FetchStatus::Loading => "loading",
            FetchStatus::Succeeded => "succeeded",
            FetchStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Server-reported page metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

/// Handle identifying the most recently issued fetch of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What `complete_fetch` did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result matched the current token and was written to the store.
    Applied,
    /// A newer fetch was started after this one; the result was discarded.
    Stale,
}

/// In-memory list of one resource, its fetch status and optional pagination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionStore {
    items: Vec<Record>,
    status: FetchStatus,
    error: Option<String>,
    pagination: Option<Pagination>,
    current_token: Option<RequestToken>,
    issued: u64,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Record] {
        &self.items
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn current_token(&self) -> Option<RequestToken> {
        self.current_token
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: &RecordId) -> Option<&Record> {
        self.items.iter().find(|record| record.id() == id)
    }

    /// Marks the store as loading and issues a token that supersedes every earlier one.
    pub fn begin_fetch(&mut self) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.current_token = Some(token);
        self.status = FetchStatus::Loading;
        self.error = None;
        token
    }

    /// Applies a fetch result if `token` is still current.
    ///
    /// On failure the items are left as they were; only status and error change.
    pub fn complete_fetch(
        &mut self,
        token: RequestToken,
        result: Result<FetchPage, String>,
    ) -> FetchOutcome {
        if self.current_token != Some(token) {
            return FetchOutcome::Stale;
        }
        match result {
            Ok(page) => {
                self.items = dedup_by_id(page.records);
                if page.pagination.is_some() {
                    self.pagination = page.pagination;
                }
                self.status = FetchStatus::Succeeded;
            }
            Err(error) => {
                self.status = FetchStatus::Failed;
                self.error = Some(error);
            }
        }
        FetchOutcome::Applied
    }

    /// Idempotent upsert: appends a new record or replaces the one with the same id.
    pub fn apply_create(&mut self, record: Record) {
        match self.position(record.id()) {
            Some(index) => self.items[index] = record,
            None => self.items.push(record),
        }
    }

    /// Replaces the record with the same id. Returns `false` if it is not present.
    pub fn apply_update(&mut self, record: Record) -> bool {
        match self.position(record.id()) {
            Some(index) => {
                self.items[index] = record;
                true
            }
            None => false,
        }
    }

    /// Removes the record with `id`. Deleting an absent id is a no-op.
    pub fn apply_delete(&mut self, id: &RecordId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.items.remove(index);
        if let Some(pagination) = self.pagination.as_mut() {
            pagination.total_items = pagination.total_items.saturating_sub(1);
        }
        true
    }

    /// Flips a boolean field of the record with `id`, returning the new value.
    ///
    /// A missing or non-boolean field counts as `false` and becomes `true`.
    pub fn apply_toggle(&mut self, id: &RecordId, field: &str) -> Option<bool> {
        let index = self.position(id)?;
        let record = &mut self.items[index];
        let flipped = !record.get(field).and_then(Value::as_bool).unwrap_or(false);
        record.set(field, Value::Bool(flipped));
        Some(flipped)
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.items.iter().position(|record| record.id() == id)
    }
}

/// Collapses repeated ids, keeping the first position and the last value.
fn dedup_by_id(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::with_capacity(records.len());
    if records.iter().all(|record| seen.insert(record.id().clone())) {
        return records;
    }
    let mut unique: Vec<Record> = Vec::with_capacity(seen.len());
    for record in records {
        match unique.iter().position(|kept| kept.id() == record.id()) {
            Some(index) => unique[index] = record,
            None => unique.push(record),
        }
    }
    unique
}
