// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! resenv - Stack Resource Environment Resolver
//!
//! This crate discovers the resources created by a provisioned infrastructure
//! stack and distributes their physical identifiers to the functions of a
//! service, both as remote function environment variables and as local
//! property files used during local invocation.
//!
//! # Overview
//!
//! A deploy cycle resolves the active stage and region, derives the stack
//! name, lists every stack resource page by page, maps each logical id to a
//! `CF_`-prefixed key, selects the subset each function asks for, merges it
//! with static environment configuration, and then publishes and writes the
//! result for every function concurrently.
//!
//! # Example
//!
//! ```yaml
//! # serverless.yml
//! service: my-service
//! provider:
//!   stage: dev
//!   region: us-east-1
//! functions:
//!   hello:
//!     custom:
//!       env-resources:
//!         - UploadsBucket
//!         - JobsQueue
//! ```
//!
//! After a deploy of stage `dev`, the file
//! `.serverless-resources-env/.us-east-1_dev_hello` holds lines such as
//! `CF_UploadsBucket=my-service-dev-uploadsbucket-1x2y3z`.

#[cfg(feature = "aws")]
pub mod aws;
pub mod config;
pub mod cycle;
pub mod envfile;
pub mod error;
pub mod loader;
#[cfg(test)]
pub(crate) mod mock;
pub mod publish;
pub mod resources;
pub mod select;
pub mod stage;

pub use config::{FunctionConfig, FunctionSpec, ProviderConfig, ServiceConfig};
pub use cycle::{CycleReport, DeployOptions, FunctionOutcome, FunctionPlan, ResourceEnv};
pub use envfile::{
    EnvFileLocation, Filesystem, LocalFilesystem, ensure_output_dir, render_env_file,
    write_env_file,
};
pub use error::{Error, Result};
pub use loader::{LoadReport, load_local_env, parse_env_file, read_env_file};
pub use publish::{FunctionUpdater, publish};
pub use resources::{
    ListResourcesRequest, ResourceLister, ResourceMap, ResourcePage, StackResource,
    fetch_resources, map_resources,
};
pub use select::{Selection, resource_key, select_for_function};
pub use stage::{Deployment, StageOptions};

/// Prefix applied to every logical resource id to form an environment key.
pub const RESOURCE_KEY_PREFIX: &str = "CF_";

/// Default directory, relative to the service root, for property files.
pub const DEFAULT_OUTPUT_DIR: &str = ".serverless-resources-env";

/// Well-known filename for the service configuration.
pub const SERVICE_FILENAME: &str = "serverless.yml";

/// Environment variable holding a previously resolved stage.
pub const CACHED_STAGE_VAR: &str = "RESENV_STAGE";

/// Environment variable holding a previously resolved region.
pub const CACHED_REGION_VAR: &str = "RESENV_REGION";
