// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! CloudFormation and Lambda backed collaborators.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_lambda::types::Environment;

use crate::config::EnvironmentMap;
use crate::error::BoxError;
use crate::{FunctionUpdater, ListResourcesRequest, ResourceLister, ResourcePage, StackResource};

/// Load the default credential chain, pinned to `region`.
pub async fn load_sdk_config(region: &str) -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await
}

/// Lists stack resources through `ListStackResources`.
#[derive(Debug, Clone)]
pub struct CloudFormationLister {
    client: aws_sdk_cloudformation::Client,
}

impl CloudFormationLister {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudformation::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl ResourceLister for CloudFormationLister {
    async fn list_stack_resources(
        &self,
        request: ListResourcesRequest,
    ) -> Result<ResourcePage, BoxError> {
        let output = self
            .client
            .list_stack_resources()
            .stack_name(request.stack_name)
            .set_next_token(request.next_token)
            .send()
            .await
            .map_err(|err| Box::new(err.into_service_error()) as BoxError)?;

        let mut resources = Vec::new();
        for summary in output.stack_resource_summaries() {
            match (summary.logical_resource_id(), summary.physical_resource_id()) {
                (Some(logical), Some(physical)) => {
                    resources.push(StackResource::new(logical, physical));
                }
                (logical, _) => {
                    tracing::debug!(?logical, "Skipping resource without a physical id");
                }
            }
        }

        Ok(ResourcePage {
            resources,
            next_token: output.next_token().map(str::to_string),
        })
    }
}

/// Replaces function environments through `UpdateFunctionConfiguration`.
#[derive(Debug, Clone)]
pub struct LambdaUpdater {
    client: aws_sdk_lambda::Client,
}

impl LambdaUpdater {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_lambda::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl FunctionUpdater for LambdaUpdater {
    async fn update_function_environment(
        &self,
        function_name: &str,
        environment: &EnvironmentMap,
    ) -> Result<String, BoxError> {
        let variables: HashMap<String, String> = environment
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let output = self
            .client
            .update_function_configuration()
            .function_name(function_name)
            .environment(Environment::builder().set_variables(Some(variables)).build())
            .send()
            .await
            .map_err(|err| Box::new(err.into_service_error()) as BoxError)?;

        Ok(output
            .function_name()
            .unwrap_or(function_name)
            .to_string())
    }
}
