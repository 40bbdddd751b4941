use crate::{ids::*, types::*};

/// Outcomes of one deletion batch, in processing order.
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    pub batch_id: Option<BatchId>,
    pub outcomes: Vec<DeletionOutcome>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchCounts {
    pub succeeded: usize,
    pub already_gone: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn record(&mut self, outcome: DeletionOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn counts(&self) -> BatchCounts {
        let mut c = BatchCounts::default();
        for o in &self.outcomes {
            match o.result {
                DeletionResult::Succeeded => c.succeeded += 1,
                DeletionResult::AlreadyGone => c.already_gone += 1,
                DeletionResult::Failed(_) => c.failed += 1,
            }
        }
        c
    }

    pub fn failures(&self) -> impl Iterator<Item = (&StackName, &FailureReason)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            DeletionResult::Failed(reason) => Some((&o.stack_name, reason)),
            _ => None,
        })
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_success())
    }
}
