// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Per-function resource selection and environment merging.

use crate::config::EnvironmentMap;
use crate::{FunctionSpec, RESOURCE_KEY_PREFIX, ResourceMap};

#[cfg(test)]
#[path = "./select_test.rs"]
mod select_test;

/// Environment key for a logical resource id.
pub fn resource_key(logical_id: &str) -> String {
    format!("{RESOURCE_KEY_PREFIX}{logical_id}")
}

/// Outcome of selecting resources for one function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub function: String,

    /// Requested resources that were found, in request order.
    pub matched: EnvironmentMap,

    /// Final environment: matched, then provider, then function settings.
    pub environment: EnvironmentMap,

    /// Requested keys with no matching stack resource.
    pub unmet: Vec<String>,
}

impl Selection {
    pub fn has_unmet(&self) -> bool {
        !self.unmet.is_empty()
    }
}

/// Compute the environment of `function` from the discovered resources.
///
/// Later layers replace earlier ones on key collision. Missing resources
/// are reported in [`Selection::unmet`] and never given placeholder values.
pub fn select_for_function(
    function: &FunctionSpec,
    resources: &ResourceMap,
    provider_defaults: &EnvironmentMap,
) -> Selection {
    let mut matched = EnvironmentMap::new();
    let mut unmet = Vec::new();

    for logical_id in &function.requested_resource_keys {
        let key = resource_key(logical_id);
        match resources.get(&key) {
            Some(physical_id) => {
                matched.insert(key, physical_id.to_string());
            }
            None if !unmet.contains(&key) => unmet.push(key),
            None => {}
        }
    }

    if function.requested_resource_keys.is_empty() {
        tracing::info!(function = %function.name, "No resources configured");
    } else if !unmet.is_empty() {
        tracing::warn!(
            function = %function.name,
            missing = %unmet.join(", "),
            "Requested resources not found in stack"
        );
    }

    let mut environment = matched.clone();
    environment.extend(
        provider_defaults
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    environment.extend(
        function
            .static_environment
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );

    Selection {
        function: function.name.clone(),
        matched,
        environment,
        unmet,
    }
}
