use async_trait::async_trait;
use stackreap_core::{StackName, StackStatus, StackSummary, StatusFilter};

use crate::ProviderError;

/// Remote side of the tool: the deployment service that owns the stacks.
#[async_trait]
pub trait StackProvider: Send + Sync {
    /// All stacks whose status is in `filter`, in provider order.
    async fn list_stacks(&self, filter: &StatusFilter) -> Result<Vec<StackSummary>, ProviderError>;

    /// Starts deleting `name`. Returns once the provider accepted the request.
    async fn delete_stack(&self, name: &StackName) -> Result<(), ProviderError>;

    /// Current status of `name`, or `ProviderError::NotFound` once the record is gone.
    async fn describe_stack(&self, name: &StackName) -> Result<StackStatus, ProviderError>;
}

#[async_trait]
impl<P: StackProvider + ?Sized> StackProvider for &P {
    async fn list_stacks(&self, filter: &StatusFilter) -> Result<Vec<StackSummary>, ProviderError> {
        (**self).list_stacks(filter).await
    }

    async fn delete_stack(&self, name: &StackName) -> Result<(), ProviderError> {
        (**self).delete_stack(name).await
    }

    async fn describe_stack(&self, name: &StackName) -> Result<StackStatus, ProviderError> {
        (**self).describe_stack(name).await
    }
}
