// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! In-memory collaborators for unit tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::EnvironmentMap;
use crate::error::BoxError;
use crate::{
    Filesystem, FunctionUpdater, ListResourcesRequest, ResourceLister, ResourcePage,
    StackResource,
};

/// Serves a scripted sequence of pages and records every request.
#[derive(Default)]
pub struct MockLister {
    pages: Mutex<Vec<Result<ResourcePage, String>>>,
    requests: Mutex<Vec<ListResourcesRequest>>,
}

impl MockLister {
    /// Serve `pages` in order, chaining them with tokens `page-2`, `page-3`, ...
    pub fn with_pages(pages: Vec<Vec<(&str, &str)>>) -> Self {
        let count = pages.len();
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, resources)| {
                Ok(ResourcePage {
                    resources: resources
                        .into_iter()
                        .map(|(l, p)| StackResource::new(l, p))
                        .collect(),
                    next_token: (i + 1 < count).then(|| format!("page-{}", i + 2)),
                })
            })
            .collect();
        Self {
            pages: Mutex::new(pages),
            requests: Mutex::default(),
        }
    }

    /// Serve the given scripted responses as-is.
    pub fn with_responses(responses: Vec<Result<ResourcePage, String>>) -> Self {
        Self {
            pages: Mutex::new(responses),
            requests: Mutex::default(),
        }
    }

    pub fn requests(&self) -> Vec<ListResourcesRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceLister for MockLister {
    async fn list_stack_resources(
        &self,
        request: ListResourcesRequest,
    ) -> Result<ResourcePage, BoxError> {
        self.requests.lock().unwrap().push(request);
        let mut pages = self.pages.lock().unwrap();
        if pages.is_empty() {
            return Err("no more scripted pages".into());
        }
        pages.remove(0).map_err(BoxError::from)
    }
}

/// Records published environments; fails for selected function names.
#[derive(Default)]
pub struct MockUpdater {
    failing: BTreeSet<String>,
    published: Mutex<BTreeMap<String, EnvironmentMap>>,
}

impl MockUpdater {
    pub fn failing_for(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            published: Mutex::default(),
        }
    }

    pub fn published(&self) -> BTreeMap<String, EnvironmentMap> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl FunctionUpdater for MockUpdater {
    async fn update_function_environment(
        &self,
        function_name: &str,
        environment: &EnvironmentMap,
    ) -> Result<String, BoxError> {
        if self.failing.contains(function_name) {
            return Err(format!("Unrecognized field: Environment ({function_name})").into());
        }
        self.published
            .lock()
            .unwrap()
            .insert(function_name.to_string(), environment.clone());
        Ok(function_name.to_string())
    }
}

/// Filesystem held in memory; directories and files by path.
#[derive(Default)]
pub struct MemoryFilesystem {
    dirs: Mutex<BTreeSet<PathBuf>>,
    files: Mutex<BTreeMap<PathBuf, String>>,
    writes: Mutex<usize>,
}

impl MemoryFilesystem {
    pub fn with_file(path: &Path, content: &str) -> Self {
        let fs = Self::default();
        fs.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        fs
    }

    pub fn file(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path) || self.files.lock().unwrap().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path)
    }

    fn create_dir(&self, path: &Path, _mode: u32) -> std::io::Result<()> {
        self.dirs.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }

    fn write(&self, path: &Path, content: &str) -> std::io::Result<()> {
        *self.writes.lock().unwrap() += 1;
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}
