use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::SequenceItem;

/// A saved show: the sequence-item list plus housekeeping metadata.
#[derive(Serialize, Deserialize, Clone)]
pub struct Show {
    pub name: String,
    pub created_at: SystemTime,
    pub modified_at: SystemTime,
    pub items: Vec<SequenceItem>,
    pub version: String, // Schema version for future compatibility
}

impl Show {
    pub fn new(name: String) -> Self {
        let now = SystemTime::now();
        Self {
            name,
            created_at: now,
            modified_at: now,
            items: Vec::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
