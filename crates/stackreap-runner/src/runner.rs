use anyhow::{Context, Result};
use tracing::{info, warn};

use stackreap_core::{partition, BatchReport, Inventory, StackSummary};
use stackreap_provider::StackProvider;

use crate::{delete_batch, log_batch_summary, log_selected, log_skipped, now_unix, RunConfig};

#[derive(Debug)]
pub enum RunOutcome {
    /// `--delete` was not given.
    ListedOnly,
    NothingToDelete,
    /// The operator did not answer `y`. No deletion request was sent.
    Cancelled,
    Deleted(BatchReport),
}

#[derive(Debug)]
pub struct RunSummary {
    pub inventory: Inventory,
    pub selected: Vec<StackSummary>,
    pub outcome: RunOutcome,
}

pub struct Runner<P> {
    pub cfg: RunConfig,
    pub provider: P,
}

impl<P: StackProvider> Runner<P> {
    pub fn new(cfg: RunConfig, provider: P) -> Self {
        Self { cfg, provider }
    }

    /// One listing per run; a failure here aborts the run.
    pub async fn take_inventory(&self) -> Result<Inventory> {
        let stacks = self
            .provider
            .list_stacks(&self.cfg.status_filter)
            .await
            .context("failed to list stacks")?;
        Ok(Inventory { taken_at_unix: now_unix(), filter: self.cfg.status_filter.clone(), stacks })
    }

    /// Stacks matching the configured prefix, logged as they are picked.
    pub fn select(&self, inventory: &Inventory) -> Vec<StackSummary> {
        let (selected, skipped) = partition(inventory, &self.cfg.prefix);
        for s in &skipped {
            log_skipped(s);
        }
        for s in &selected {
            log_selected(s);
        }
        selected.into_iter().cloned().collect()
    }

    /// List, select and, when enabled and confirmed, delete.
    ///
    /// `confirm` gets the number of selected stacks and the prefix and is only asked when
    /// there is something to delete.
    pub async fn run<C>(&self, confirm: C) -> Result<RunSummary>
    where
        C: FnOnce(usize, &str) -> Result<bool>,
    {
        let inventory = self.take_inventory().await?;
        let selected = self.select(&inventory);
        info!(listed = inventory.len(), matched = selected.len(), prefix = %self.cfg.prefix, "inventory taken");

        let outcome = if !self.cfg.delete_enabled {
            RunOutcome::ListedOnly
        } else if selected.is_empty() {
            info!("no stacks match; nothing to delete");
            RunOutcome::NothingToDelete
        } else if !confirm(selected.len(), &self.cfg.prefix)? {
            warn!("Stack deletion cancelled");
            RunOutcome::Cancelled
        } else {
            let report = delete_batch(&self.provider, &selected, &self.cfg.wait).await;
            log_batch_summary(&report);
            RunOutcome::Deleted(report)
        };

        Ok(RunSummary { inventory, selected, outcome })
    }
}
