// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! The full resolve, publish and write cycle run after a deployment.

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;

use crate::envfile::{Filesystem, ensure_output_dir, write_env_file};
use crate::{
    Deployment, EnvFileLocation, FunctionSpec, FunctionUpdater, ResourceLister, Selection,
    ServiceConfig, fetch_resources, map_resources, publish, select_for_function,
};

#[cfg(test)]
#[path = "./cycle_test.rs"]
mod cycle_test;

/// Options for a deploy cycle.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Push environments to the remote functions (false: write files only).
    pub publish: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self { publish: true }
    }
}

/// Everything known about one function before any side effect.
#[derive(Debug, Clone)]
pub struct FunctionPlan {
    pub function: FunctionSpec,
    pub remote_name: String,
    pub location: EnvFileLocation,
    pub selection: Selection,
}

/// Result of one function's publish and write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionOutcome {
    pub function: String,
    pub remote_name: String,
    pub published: bool,
    pub path: PathBuf,
    pub unmet: Vec<String>,
}

/// Result of a successful deploy cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub stack_name: String,
    pub resource_count: usize,
    pub outcomes: Vec<FunctionOutcome>,
}

/// Resolves stack resources for a service and distributes them.
///
/// Every collaborator is handed over at construction and held for the
/// lifetime of the value.
pub struct ResourceEnv {
    config: Arc<ServiceConfig>,
    deployment: Deployment,
    lister: Arc<dyn ResourceLister>,
    updater: Arc<dyn FunctionUpdater>,
    fs: Arc<dyn Filesystem>,
}

impl ResourceEnv {
    pub fn new(
        config: Arc<ServiceConfig>,
        deployment: Deployment,
        lister: Arc<dyn ResourceLister>,
        updater: Arc<dyn FunctionUpdater>,
        fs: Arc<dyn Filesystem>,
    ) -> Self {
        Self {
            config,
            deployment,
            lister,
            updater,
            fs,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    /// Discover the stack's resources and select each function's environment.
    ///
    /// Nothing is published or written.
    pub async fn resolve(&self) -> crate::Result<(usize, Vec<FunctionPlan>)> {
        let stack_name = self.deployment.stack_name();
        tracing::info!(
            stack = %stack_name,
            region = self.deployment.region(),
            "Resolving stack resources"
        );

        let resources = fetch_resources(self.lister.as_ref(), &stack_name).await?;
        let resource_map = map_resources(&resources);

        let plans = self
            .config
            .function_specs()
            .into_iter()
            .map(|function| {
                let selection = select_for_function(
                    &function,
                    &resource_map,
                    &self.config.provider.environment,
                );
                FunctionPlan {
                    remote_name: self.deployment.remote_function_name(&function),
                    location: EnvFileLocation::for_function(
                        &self.config,
                        &self.deployment,
                        &function,
                    ),
                    function,
                    selection,
                }
            })
            .collect();

        Ok((resources.len(), plans))
    }

    /// Run the whole cycle: resolve, then publish and write every function.
    ///
    /// Functions are handled concurrently and all of them run to completion;
    /// if any failed, the failures are returned together once every function
    /// has settled. Nothing already published or written is rolled back.
    pub async fn deploy(&self, options: &DeployOptions) -> crate::Result<CycleReport> {
        let (resource_count, plans) = self.resolve().await?;
        let stack_name = self.deployment.stack_name();

        if plans.is_empty() {
            tracing::info!(stack = %stack_name, "Service declares no functions");
            return Ok(CycleReport {
                stack_name,
                resource_count,
                outcomes: Vec::new(),
            });
        }

        ensure_output_dir(self.fs.as_ref(), &self.config.output_dir())?;

        let total = plans.len();
        let results = join_all(plans.into_iter().map(|plan| self.apply(plan, options))).await;

        let mut outcomes = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => failures.push(err),
            }
        }

        if !failures.is_empty() {
            tracing::error!(
                stack = %stack_name,
                failed = failures.len(),
                total,
                "Deploy cycle finished with failures"
            );
            return Err(crate::Error::CycleFailed {
                stack_name,
                total,
                failures,
            });
        }

        tracing::info!(stack = %stack_name, functions = total, "Deploy cycle complete");
        Ok(CycleReport {
            stack_name,
            resource_count,
            outcomes,
        })
    }

    async fn apply(
        &self,
        plan: FunctionPlan,
        options: &DeployOptions,
    ) -> crate::Result<FunctionOutcome> {
        let FunctionPlan {
            function,
            remote_name,
            location,
            selection,
        } = plan;

        if options.publish {
            publish(self.updater.as_ref(), &remote_name, &selection.environment).await?;
        }
        let path = write_env_file(self.fs.as_ref(), &location, &selection.environment)?;

        Ok(FunctionOutcome {
            function: function.name,
            remote_name,
            published: options.publish,
            path,
            unmet: selection.unmet,
        })
    }
}
