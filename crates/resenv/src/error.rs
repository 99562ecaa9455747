// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for resenv operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with resenv Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Opaque failure reported by a remote collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during resenv operations.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Listing the resources of a stack failed
    #[error("Failed to list resources of stack '{stack_name}'")]
    #[diagnostic(
        code(resenv::remote_fetch),
        help("Check that the stack has been deployed for this stage and region")
    )]
    RemoteFetch {
        stack_name: String,
        #[source]
        source: BoxError,
    },

    /// Publishing the environment of one function failed
    #[error("Failed to update environment of function '{function}'")]
    #[diagnostic(
        code(resenv::remote_update),
        help("An 'unrecognized field' error usually means the provider client is too old")
    )]
    RemoteUpdate {
        function: String,
        #[source]
        source: BoxError,
    },

    /// Output path exists but is not a directory
    #[error("Output path {0:?} exists and is not a directory")]
    #[diagnostic(
        code(resenv::not_a_directory),
        help("Remove the file or point 'custom.resource-output-dir' somewhere else")
    )]
    NotADirectory(PathBuf),

    /// Failed to write a property file or create its directory
    #[error("Failed to write {path:?}")]
    #[diagnostic(code(resenv::write_failed))]
    WriteFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(resenv::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Malformed property file
    #[error("Failed to parse property file {path:?} at line {line}: {reason}")]
    #[diagnostic(
        code(resenv::parse_failed),
        help("Run 'resenv deploy' again to regenerate the file")
    )]
    ParseFailed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Invalid YAML in service file
    #[error("Invalid service file: {error}")]
    #[diagnostic(
        code(resenv::invalid_yaml),
        help("Check YAML syntax and ensure a 'service' name is present")
    )]
    InvalidYaml {
        #[source]
        error: serde_yaml::Error,
        yaml_content: String,
    },

    /// Validation error
    #[error("Validation failed: {0}")]
    #[diagnostic(code(resenv::validation_failed))]
    ValidationFailed(String),

    /// Function not declared by the service
    #[error("Unknown function: {name}")]
    #[diagnostic(
        code(resenv::unknown_function),
        help("{}", suggestion_message(known))
    )]
    UnknownFunction { name: String, known: Vec<String> },

    /// One or more functions failed during a deploy cycle
    #[error(
        "{} of {total} function(s) of stack '{stack_name}' failed to resolve their environment",
        .failures.len()
    )]
    #[diagnostic(code(resenv::cycle_failed))]
    CycleFailed {
        stack_name: String,
        total: usize,
        #[related]
        failures: Vec<Error>,
    },

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(resenv::io_error))]
    Io(#[from] std::io::Error),
}

fn suggestion_message(known: &[String]) -> String {
    if known.is_empty() {
        "The service declares no functions".to_string()
    } else {
        format!("Declared functions: {}", known.join(", "))
    }
}
