//! Tunables shared by every collection of a system.

use crate::projection::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Debounce window, page size and actor mailbox size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Quiet period after the last keystroke before a search fetch fires.
    pub debounce_ms: u64,
    /// Records per page for client-paginated resources.
    pub page_size: usize,
    /// Capacity of each collection actor's channel.
    pub buffer_size: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            page_size: DEFAULT_PAGE_SIZE,
            buffer_size: 32,
        }
    }
}

impl SyncSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
