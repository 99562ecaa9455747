// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Service file parsing and the per-function view used by the selector.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::DEFAULT_OUTPUT_DIR;

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

/// Static environment variables, kept in declaration order.
pub type EnvironmentMap = IndexMap<String, String>;

/// Provider-level settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Provider default stage, used when no option or cached value is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    /// Provider default region, used when no option or cached value is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Environment applied to every function.
    #[serde(
        default,
        deserialize_with = "scalar_map",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub environment: EnvironmentMap,
}

/// Service-level `custom:` block.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServiceCustom {
    /// Directory for property files, relative to the service root.
    #[serde(
        default,
        rename = "resource-output-dir",
        skip_serializing_if = "Option::is_none"
    )]
    pub resource_output_dir: Option<PathBuf>,
}

/// Function-level `custom:` block.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FunctionCustom {
    /// Logical resource ids this function wants exposed.
    #[serde(
        default,
        rename = "env-resources",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub env_resources: Vec<String>,

    /// Explicit property file name for this function.
    #[serde(
        default,
        rename = "resource-output-file",
        skip_serializing_if = "Option::is_none"
    )]
    pub resource_output_file: Option<String>,
}

/// One declared function as it appears in the service file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FunctionConfig {
    /// Deployed name, when it differs from `{service}-{stage}-{function}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(
        default,
        deserialize_with = "scalar_map",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub environment: EnvironmentMap,

    #[serde(default)]
    pub custom: FunctionCustom,
}

/// Main service configuration from a service file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service identifier, the first half of the stack name.
    #[serde(deserialize_with = "service_name")]
    pub service: String,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub custom: ServiceCustom,

    /// Declared functions, in file order.
    #[serde(default)]
    pub functions: IndexMap<String, FunctionConfig>,

    /// Path to the file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

/// Read-only view of one function handed to the selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: String,
    pub requested_resource_keys: Vec<String>,
    pub static_environment: EnvironmentMap,
    pub output_override: Option<String>,
    pub deployed_name: Option<String>,
}

impl ServiceConfig {
    /// Create a configuration for `service` with no functions.
    pub fn new<S: Into<String>>(service: S) -> Self {
        Self {
            service: service.into(),
            provider: ProviderConfig::default(),
            custom: ServiceCustom::default(),
            functions: IndexMap::new(),
            source_path: None,
        }
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml<S: Into<String>>(yaml: S) -> crate::Result<Self> {
        let yaml = yaml.into();
        let config: Self =
            serde_yaml::from_str(&yaml).map_err(|e| crate::Error::InvalidYaml {
                error: e,
                yaml_content: yaml.clone(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| crate::Error::ReadFailed {
            path: path.to_path_buf(),
            error: e,
        })?;

        let mut config = Self::from_yaml(yaml)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(&self) -> crate::Result<()> {
        if self.service.trim().is_empty() {
            return Err(crate::Error::ValidationFailed(
                "service name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory the service file lives in; relative paths resolve from here.
    pub fn service_root(&self) -> PathBuf {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent())
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    /// Directory that receives the per-function property files.
    pub fn output_dir(&self) -> PathBuf {
        let dir = self
            .custom
            .resource_output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        self.service_root().join(dir)
    }

    /// Every declared function, in declaration order.
    pub fn function_specs(&self) -> Vec<FunctionSpec> {
        self.functions
            .iter()
            .map(|(name, function)| function.to_spec(name))
            .collect()
    }

    /// The declared function called `name`.
    pub fn function(&self, name: &str) -> crate::Result<FunctionSpec> {
        self.functions
            .get(name)
            .map(|function| function.to_spec(name))
            .ok_or_else(|| crate::Error::UnknownFunction {
                name: name.to_string(),
                known: self.functions.keys().cloned().collect(),
            })
    }
}

impl FunctionConfig {
    fn to_spec(&self, name: &str) -> FunctionSpec {
        FunctionSpec {
            name: name.to_string(),
            requested_resource_keys: self.custom.env_resources.clone(),
            static_environment: self.environment.clone(),
            output_override: self.custom.resource_output_file.clone(),
            deployed_name: self.name.clone(),
        }
    }
}

/// Accept either `service: name` or `service: { name: ... }`.
fn service_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ServiceField {
        Name(String),
        Mapping { name: String },
    }

    Ok(match ServiceField::deserialize(deserializer)? {
        ServiceField::Name(name) | ServiceField::Mapping { name } => name,
    })
}

/// Stringify scalar environment values.
///
/// Anything else (`Ref`, `Fn::GetAtt`, `!Sub`, lists, nulls) is resolved by the
/// framework at deploy time and cannot be published as-is, so it is skipped.
fn scalar_map<'de, D>(deserializer: D) -> Result<EnvironmentMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<IndexMap<String, serde_yaml::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                other => {
                    tracing::warn!(
                        key = %key,
                        value = ?other,
                        "Skipping environment variable that is not a string, number or boolean"
                    );
                    return None;
                }
            };
            Some((key, value))
        })
        .collect())
}
