//! The undo stack.

use serde::{Deserialize, Serialize};

use super::record::MoveRecord;

/// Committed records, oldest first.
///
/// A player record and the cascade records chained on top of it form one
/// undo unit; [`UndoStack::pop_unit`] removes a whole unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoStack {
    records: Vec<MoveRecord>,
}

impl UndoStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    /// Pop the most recent undo unit.
    ///
    /// Records come back in pop order (newest first), which is the order
    /// they must be reverted in. Empty when the stack is empty.
    pub fn pop_unit(&mut self) -> Vec<MoveRecord> {
        let mut unit = Vec::new();
        while let Some(record) = self.records.pop() {
            let chained = record.chained;
            unit.push(record);
            if !chained {
                break;
            }
        }
        unit
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record.
    #[must_use]
    pub fn last(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    /// Records oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MoveRecord> {
        self.records.iter()
    }
}
