use std::collections::HashSet;
use indexmap::IndexSet;

use super::value_objects::Label;

// ============================================================================
// Label Delta - what to add to and remove from an event
// ============================================================================
//
// Both sides only ever contain vocabulary labels, in vocabulary order and
// without duplicates.
//
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelDelta {
    pub add: Vec<Label>,
    pub remove: Vec<Label>,
}

impl LabelDelta {
    /// Remove every vocabulary label the event currently carries
    pub fn strip(vocabulary: &[Label], event_labels: &[Label]) -> Self {
        Self {
            add: Vec::new(),
            remove: intersect(vocabulary, event_labels),
        }
    }

    /// Add every vocabulary label the organizer carries
    pub fn copy_from_organizer(vocabulary: &[Label], organizer_labels: &[Label]) -> Self {
        Self {
            add: intersect(vocabulary, organizer_labels),
            remove: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

fn intersect(vocabulary: &[Label], candidates: &[Label]) -> Vec<Label> {
    let candidates: HashSet<&Label> = candidates.iter().collect();

    vocabulary
        .iter()
        .filter(|label| candidates.contains(label))
        .cloned()
        .collect::<IndexSet<Label>>()
        .into_iter()
        .collect()
}
