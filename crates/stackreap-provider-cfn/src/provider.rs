use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudformation::config::Region;
use aws_sdk_cloudformation::Client;
use stackreap_core::{StackName, StackStatus, StackSummary, StatusFilter};
use stackreap_provider::{ProviderError, StackProvider};
use tracing::{debug, warn};

use crate::convert::{classify_error, status_from_cfn, status_to_cfn, summary_from_cfn};

pub struct CloudFormationProvider {
    client: Client,
    region: String,
}

impl CloudFormationProvider {
    /// Builds a client from the ambient AWS configuration (environment, profile, IMDS).
    /// `region` overrides whatever region that configuration resolves to.
    pub async fn from_env(region: Option<&str>) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(r) = region {
            loader = loader.region(Region::new(r.to_string()));
        }
        let sdk_config = loader.load().await;

        let region = sdk_config
            .region()
            .map(|r| r.to_string())
            .ok_or_else(|| anyhow!("no AWS region configured; pass --region or set AWS_REGION"))?;

        Ok(Self { client: Client::new(&sdk_config), region })
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl StackProvider for CloudFormationProvider {
    async fn list_stacks(&self, filter: &StatusFilter) -> Result<Vec<StackSummary>, ProviderError> {
        let statuses = filter.statuses().iter().map(status_to_cfn).collect();
        let items = self
            .client
            .list_stacks()
            .set_stack_status_filter(Some(statuses))
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(|e| classify_error(None, e))?;

        let mut stacks = Vec::with_capacity(items.len());
        for item in &items {
            match summary_from_cfn(item) {
                Some(s) => stacks.push(s),
                None => warn!(stack_id = ?item.stack_id(), "dropping stack summary without a name"),
            }
        }
        debug!(count = stacks.len(), region = %self.region, "listed stacks");
        Ok(stacks)
    }

    async fn delete_stack(&self, name: &StackName) -> Result<(), ProviderError> {
        self.client
            .delete_stack()
            .stack_name(name.as_str())
            .send()
            .await
            .map_err(|e| classify_error(Some(name), e))?;
        Ok(())
    }

    async fn describe_stack(&self, name: &StackName) -> Result<StackStatus, ProviderError> {
        let out = self
            .client
            .describe_stacks()
            .stack_name(name.as_str())
            .send()
            .await
            .map_err(|e| classify_error(Some(name), e))?;

        let stack = out.stacks().first().ok_or_else(|| ProviderError::NotFound(name.clone()))?;
        stack
            .stack_status()
            .map(status_from_cfn)
            .ok_or_else(|| ProviderError::Transport(format!("describe returned {name} without a status")))
    }
}
