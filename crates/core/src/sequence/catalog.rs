use std::collections::HashMap;

use crate::{ItemKind, SequenceItem};

/// The immutable list of sequence items, loaded once before the sequencer
/// starts. Order is preserved and duplicate names are allowed; lookup by name
/// returns the first match, so the index only remembers the first occurrence
/// of each name.
pub struct SequenceCatalog {
    items: Vec<SequenceItem>,
    by_name: HashMap<String, usize>,
}

impl SequenceCatalog {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn append(&mut self, item: SequenceItem) {
        let index = self.items.len();
        self.by_name.entry(item.name.clone()).or_insert(index);
        self.items.push(item);
    }

    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, index: usize) -> &SequenceItem {
        &self.items[index]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SequenceItem> {
        self.items.iter()
    }

    /// Indices of every Start Sequence item, in catalog order.
    pub fn start_items(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.kind == ItemKind::StartSequence)
            .map(|(index, _)| index)
            .collect()
    }

    /// Check that every populated continuation label names a catalog item.
    /// Returns one message per dangling label; an empty result means the
    /// catalog is well formed.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for item in &self.items {
            for (field, label) in item.labels() {
                if self.find_by_name(label).is_none() {
                    problems.push(format!(
                        "Item {} names missing item {} in {}.",
                        item.name, label, field
                    ));
                }
            }
        }
        problems
    }
}

impl Default for SequenceCatalog {
    fn default() -> Self {
        Self::new()
    }
}
