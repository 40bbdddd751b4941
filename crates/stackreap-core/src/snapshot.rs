use crate::{model::StatusFilter, types::StackSummary};

/// Read-only view of the provider's inventory, taken once per run.
/// The imperative shell is responsible for producing it; nothing re-fetches between
/// listing and deleting, so outcomes are judged against this possibly stale view.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    pub taken_at_unix: i64,
    pub filter: StatusFilter,
    pub stacks: Vec<StackSummary>,
}

impl Inventory {
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}
