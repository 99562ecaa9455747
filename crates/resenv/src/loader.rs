// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Loading a previously written property file before a local invocation.

use std::path::{Path, PathBuf};

use crate::config::EnvironmentMap;
use crate::{Deployment, EnvFileLocation, ServiceConfig};

#[cfg(test)]
#[path = "./loader_test.rs"]
mod loader_test;

/// What a local load did to the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub path: PathBuf,
    /// Keys newly set from the file.
    pub loaded: Vec<String>,
    /// Keys already set externally and left untouched.
    pub preserved: Vec<String>,
}

/// Parse `KEY=VALUE` lines, splitting each at its first `=`.
///
/// Values are taken verbatim: no quoting, no comments, no `$VAR` expansion.
/// Empty lines are skipped and a repeated key keeps its last value.
pub fn parse_env_file(path: &Path, content: &str) -> crate::Result<EnvironmentMap> {
    let mut entries = EnvironmentMap::new();
    for (index, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let parse_failed = |reason: &str| crate::Error::ParseFailed {
            path: path.to_path_buf(),
            line: index + 1,
            reason: reason.to_string(),
        };
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| parse_failed("expected KEY=VALUE"))?;
        if key.is_empty() {
            return Err(parse_failed("empty key"));
        }
        entries.insert(key.to_string(), value.to_string());
    }
    Ok(entries)
}

/// Read and parse the property file at `path`, or `None` if there is no such file.
pub fn read_env_file(path: &Path) -> crate::Result<Option<EnvironmentMap>> {
    if !path.is_file() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|error| crate::Error::ReadFailed {
        path: path.to_path_buf(),
        error,
    })?;
    parse_env_file(path, &content).map(Some)
}

/// Load the property file of `function_name` into the process environment.
///
/// Variables that are already set keep their value. A missing file is not an
/// error: nothing has been deployed yet for this stage and region. A function
/// the service does not declare is `Error::UnknownFunction`.
pub fn load_local_env(
    config: &ServiceConfig,
    deployment: &Deployment,
    function_name: &str,
) -> crate::Result<Option<LoadReport>> {
    let function = config.function(function_name)?;
    let path = EnvFileLocation::for_function(config, deployment, &function).path();

    let Some(entries) = read_env_file(&path)? else {
        tracing::debug!(path = %path.display(), "No property file, nothing to load");
        return Ok(None);
    };

    let mut report = LoadReport {
        path: path.clone(),
        ..Default::default()
    };
    for (key, value) in &entries {
        if std::env::var_os(key).is_some() {
            report.preserved.push(key.clone());
            continue;
        }
        // SAFETY: called from the single-threaded setup of a local invocation,
        // before any command is spawned with the resulting environment.
        unsafe { std::env::set_var(key, value) };
        report.loaded.push(key.clone());
    }

    tracing::info!(
        function = function_name,
        path = %path.display(),
        loaded = report.loaded.len(),
        preserved = report.preserved.len(),
        "Loaded resource environment"
    );
    Ok(Some(report))
}
