//! Audit columns shared by every persisted entity.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Creation/modification stamps and the soft-delete flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub active: bool,
}

impl AuditInfo {
    /// Stamps a freshly created, active entity.
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            created_at: now,
            updated_at: now,
            active: true,
        }
    }

    /// Refreshes the modification stamp.
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.touch();
    }

    pub fn reactivate(&mut self) {
        self.active = true;
        self.touch();
    }
}

impl Default for AuditInfo {
    fn default() -> Self {
        Self::new()
    }
}
