// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Publishing a function's environment to the remote configuration endpoint.

use async_trait::async_trait;

use crate::config::EnvironmentMap;
use crate::error::BoxError;

#[cfg(test)]
#[path = "./publish_test.rs"]
mod publish_test;

/// Remote endpoint that replaces a function's environment variables.
#[async_trait]
pub trait FunctionUpdater: Send + Sync {
    /// Set `environment` as the complete variable set of `function_name`.
    ///
    /// Returns the function name echoed back by the remote side.
    async fn update_function_environment(
        &self,
        function_name: &str,
        environment: &EnvironmentMap,
    ) -> std::result::Result<String, BoxError>;
}

/// Replace the remote environment of `function_name` with `environment`.
///
/// The remote side does not merge: any variable missing from `environment`
/// is removed from the function.
pub async fn publish(
    updater: &dyn FunctionUpdater,
    function_name: &str,
    environment: &EnvironmentMap,
) -> crate::Result<()> {
    match updater
        .update_function_environment(function_name, environment)
        .await
    {
        Ok(updated) => {
            tracing::info!(
                function = %updated,
                variables = environment.len(),
                "Updated function environment"
            );
            Ok(())
        }
        Err(source) => {
            tracing::error!(function = function_name, error = %source, "Failed to update function environment");
            Err(crate::Error::RemoteUpdate {
                function: function_name.to_string(),
                source,
            })
        }
    }
}
