// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Local property files: naming, directory safety and serialization.

use std::path::{Path, PathBuf};

use crate::config::EnvironmentMap;
use crate::{Deployment, FunctionSpec, ServiceConfig};

#[cfg(test)]
#[path = "./envfile_test.rs"]
mod envfile_test;

/// Permission bits for a newly created output directory.
pub const OUTPUT_DIR_MODE: u32 = 0o700;

/// The filesystem operations the writer needs.
pub trait Filesystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn create_dir(&self, path: &Path, mode: u32) -> std::io::Result<()>;
    fn write(&self, path: &Path, content: &str) -> std::io::Result<()>;
}

/// [`Filesystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir(&self, path: &Path, mode: u32) -> std::io::Result<()> {
        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;
        builder.create(path)
    }

    fn write(&self, path: &Path, content: &str) -> std::io::Result<()> {
        std::fs::write(path, content)
    }
}

/// Where the property file of one function lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFileLocation {
    pub directory: PathBuf,
    pub file_name: String,
}

impl EnvFileLocation {
    /// Location for `function` under the service's output directory.
    pub fn for_function(
        config: &ServiceConfig,
        deployment: &Deployment,
        function: &FunctionSpec,
    ) -> Self {
        Self {
            directory: config.output_dir(),
            file_name: Self::file_name(deployment, function),
        }
    }

    /// `.{region}_{stage}_{function}` unless the function overrides it.
    pub fn file_name(deployment: &Deployment, function: &FunctionSpec) -> String {
        match &function.output_override {
            Some(name) => name.clone(),
            None => format!(
                ".{}_{}_{}",
                deployment.region(),
                deployment.stage(),
                function.name
            ),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Serialize `environment` as `KEY=VALUE` lines in iteration order.
///
/// Values are written verbatim; a value holding `=` or a newline yields an
/// ambiguous file.
pub fn render_env_file(environment: &EnvironmentMap) -> String {
    let mut content = String::new();
    for (key, value) in environment {
        content.push_str(key);
        content.push('=');
        content.push_str(value);
        content.push('\n');
    }
    content
}

/// Make sure `directory` is usable for property files.
///
/// A missing directory is created; anything else at that path is fatal.
pub fn ensure_output_dir(fs: &dyn Filesystem, directory: &Path) -> crate::Result<()> {
    if fs.exists(directory) {
        if !fs.is_dir(directory) {
            return Err(crate::Error::NotADirectory(directory.to_path_buf()));
        }
        return Ok(());
    }

    tracing::debug!(path = %directory.display(), "Creating output directory");
    fs.create_dir(directory, OUTPUT_DIR_MODE)
        .map_err(|error| crate::Error::WriteFailed {
            path: directory.to_path_buf(),
            error,
        })
}

/// Write `environment` to `location`, replacing any previous file.
pub fn write_env_file(
    fs: &dyn Filesystem,
    location: &EnvFileLocation,
    environment: &EnvironmentMap,
) -> crate::Result<PathBuf> {
    ensure_output_dir(fs, &location.directory)?;

    let path = location.path();
    fs.write(&path, &render_env_file(environment))
        .map_err(|error| crate::Error::WriteFailed {
            path: path.clone(),
            error,
        })?;

    tracing::debug!(path = %path.display(), entries = environment.len(), "Wrote property file");
    Ok(path)
}
