use crate::{snapshot::Inventory, types::StackSummary};

/// Stacks whose name starts with `prefix`, in inventory order.
///
/// Literal, case-sensitive comparison. An empty prefix selects everything.
pub fn select<'a>(stacks: &'a [StackSummary], prefix: &str) -> Vec<&'a StackSummary> {
    stacks.iter().filter(|s| matches_prefix(s, prefix)).collect()
}

pub fn matches_prefix(stack: &StackSummary, prefix: &str) -> bool {
    stack.name.as_str().starts_with(prefix)
}

/// Splits an inventory into (selected, skipped), both in original order.
pub fn partition<'a>(inventory: &'a Inventory, prefix: &str) -> (Vec<&'a StackSummary>, Vec<&'a StackSummary>) {
    inventory.stacks.iter().partition(|s| matches_prefix(s, prefix))
}
