// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Stage, region and stack name resolution.

use crate::{FunctionSpec, ServiceConfig};

#[cfg(test)]
#[path = "./stage_test.rs"]
mod stage_test;

/// Stage used when nothing else names one.
pub const DEFAULT_STAGE: &str = "dev";

/// Region used when nothing else names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Stage and region sources that sit above the service file.
#[derive(Debug, Clone, Default)]
pub struct StageOptions {
    /// Explicit run-time stage option (from --stage).
    pub stage: Option<String>,

    /// Explicit run-time region option (from --region).
    pub region: Option<String>,

    /// Previously resolved stage (from RESENV_STAGE).
    pub cached_stage: Option<String>,

    /// Previously resolved region (from RESENV_REGION).
    pub cached_region: Option<String>,
}

impl StageOptions {
    /// Fill the cached values from the process environment.
    pub fn with_cached_from_env(mut self) -> Self {
        self.cached_stage = non_empty_var(crate::CACHED_STAGE_VAR);
        self.cached_region = non_empty_var(crate::CACHED_REGION_VAR);
        self
    }
}

/// The resolved target of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    service: String,
    stage: String,
    region: String,
}

impl Deployment {
    /// Resolve stage and region for `config`.
    ///
    /// The first source that has a value wins: explicit option, cached
    /// value, provider setting, hard-coded fallback.
    pub fn resolve(config: &ServiceConfig, options: &StageOptions) -> Self {
        let stage = first_of([
            options.stage.as_deref(),
            options.cached_stage.as_deref(),
            config.provider.stage.as_deref(),
        ])
        .unwrap_or(DEFAULT_STAGE);

        let region = first_of([
            options.region.as_deref(),
            options.cached_region.as_deref(),
            config.provider.region.as_deref(),
        ])
        .unwrap_or(DEFAULT_REGION);

        Self::new(&config.service, stage, region)
    }

    pub fn new(service: &str, stage: &str, region: &str) -> Self {
        Self {
            service: service.to_string(),
            stage: stage.to_string(),
            region: region.to_string(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Name of the infrastructure stack: `{service}-{stage}`.
    pub fn stack_name(&self) -> String {
        format!("{}-{}", self.service, self.stage)
    }

    /// Name of `function` on the remote side.
    pub fn remote_function_name(&self, function: &FunctionSpec) -> String {
        match &function.deployed_name {
            Some(name) => name.clone(),
            None => format!("{}-{}", self.stack_name(), function.name),
        }
    }
}

fn first_of<'a, const N: usize>(sources: [Option<&'a str>; N]) -> Option<&'a str> {
    sources.into_iter().flatten().find(|s| !s.is_empty())
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
