use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use stackreap_core::{StackName, StackStatus, StackSummary, StatusFilter};

use crate::{ProviderError, StackProvider};

/// One scripted answer to `describe_stack`.
#[derive(Clone, Debug)]
pub enum DescribeStep {
    Status(StackStatus),
    NotFound,
    Error(String),
    /// Never answers; the caller's timeout has to fire.
    Hang,
}

/// In-memory provider for tests. Not a simulation of CloudFormation, just enough state to
/// script a run and inspect what the orchestrator asked for.
///
/// Describe answers come from a per-stack script. The last step repeats once the script is
/// exhausted. Without a script, a stack reports its listed status until deleted and
/// `NotFound` afterwards.
#[derive(Default)]
pub struct InMemoryProvider {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    stacks: Vec<StackSummary>,
    list_error: Option<String>,
    rejections: HashMap<StackName, (String, String)>,
    scripts: HashMap<StackName, VecDeque<DescribeStep>>,
    hung_deletes: Vec<StackName>,
    deleted: Vec<StackName>,
    delete_calls: Vec<StackName>,
    describe_calls: HashMap<StackName, u32>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stack(self, stack: StackSummary) -> Self {
        self.lock().stacks.push(stack);
        self
    }

    pub fn with_list_error(self, message: impl Into<String>) -> Self {
        self.lock().list_error = Some(message.into());
        self
    }

    /// `delete_stack` for `name` fails with `ProviderError::Rejected`.
    pub fn reject_delete(self, name: &str, code: &str, message: &str) -> Self {
        self.lock()
            .rejections
            .insert(StackName::from_str(name), (code.to_string(), message.to_string()));
        self
    }

    /// `delete_stack` for `name` never answers.
    pub fn hang_delete(self, name: &str) -> Self {
        self.lock().hung_deletes.push(StackName::from_str(name));
        self
    }

    pub fn script_describe(self, name: &str, steps: impl IntoIterator<Item = DescribeStep>) -> Self {
        self.lock().scripts.insert(StackName::from_str(name), steps.into_iter().collect());
        self
    }

    pub fn delete_calls(&self) -> Vec<StackName> {
        self.lock().delete_calls.clone()
    }

    pub fn describe_calls(&self, name: &str) -> u32 {
        self.lock().describe_calls.get(&StackName::from_str(name)).copied().unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking test thread must not hide the state from the assertions that follow.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_step(&self, name: &StackName) -> DescribeStep {
        let mut inner = self.lock();
        *inner.describe_calls.entry(name.clone()).or_default() += 1;

        if let Some(script) = inner.scripts.get_mut(name) {
            if script.len() > 1 {
                if let Some(step) = script.pop_front() {
                    return step;
                }
            }
            if let Some(step) = script.front() {
                return step.clone();
            }
        }

        if inner.deleted.contains(name) {
            return DescribeStep::NotFound;
        }
        match inner.stacks.iter().find(|s| &s.name == name) {
            Some(s) => DescribeStep::Status(s.status.clone()),
            None => DescribeStep::NotFound,
        }
    }
}

#[async_trait]
impl StackProvider for InMemoryProvider {
    async fn list_stacks(&self, filter: &StatusFilter) -> Result<Vec<StackSummary>, ProviderError> {
        let inner = self.lock();
        if let Some(msg) = &inner.list_error {
            return Err(ProviderError::Transport(msg.clone()));
        }
        Ok(inner
            .stacks
            .iter()
            .filter(|s| !inner.deleted.contains(&s.name) && filter.contains(&s.status))
            .cloned()
            .collect())
    }

    async fn delete_stack(&self, name: &StackName) -> Result<(), ProviderError> {
        let hang = {
            let mut inner = self.lock();
            inner.delete_calls.push(name.clone());
            if let Some((code, message)) = inner.rejections.get(name) {
                return Err(ProviderError::rejected(code.clone(), message.clone()));
            }
            inner.hung_deletes.contains(name)
        };
        if hang {
            return std::future::pending().await;
        }
        self.lock().deleted.push(name.clone());
        Ok(())
    }

    async fn describe_stack(&self, name: &StackName) -> Result<StackStatus, ProviderError> {
        match self.next_step(name) {
            DescribeStep::Status(status) => Ok(status),
            DescribeStep::NotFound => Err(ProviderError::NotFound(name.clone())),
            DescribeStep::Error(msg) => Err(ProviderError::Transport(msg)),
            DescribeStep::Hang => std::future::pending().await,
        }
    }
}
