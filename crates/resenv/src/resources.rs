// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Stack resource discovery and the logical-to-physical resource map.

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::error::BoxError;
use crate::select::resource_key;

#[cfg(test)]
#[path = "./resources_test.rs"]
mod resources_test;

/// One resource created by the stack template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackResource {
    /// Template-assigned name, unique within a stack.
    pub logical_id: String,
    /// Provider-assigned runtime identifier.
    pub physical_id: String,
}

impl StackResource {
    pub fn new<L: Into<String>, P: Into<String>>(logical_id: L, physical_id: P) -> Self {
        Self {
            logical_id: logical_id.into(),
            physical_id: physical_id.into(),
        }
    }
}

/// Request for one page of stack resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResourcesRequest {
    pub stack_name: String,
    pub next_token: Option<String>,
}

/// One page of stack resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePage {
    pub resources: Vec<StackResource>,
    /// Continuation token; `None` on the last page.
    pub next_token: Option<String>,
}

/// Remote endpoint that lists the resources of a stack.
#[async_trait]
pub trait ResourceLister: Send + Sync {
    /// Fetch a single page.
    async fn list_stack_resources(
        &self,
        request: ListResourcesRequest,
    ) -> std::result::Result<ResourcePage, BoxError>;
}

/// Fetch every resource of `stack_name`, following continuation tokens.
///
/// Pages are requested one after another and concatenated in arrival order.
/// Any failed page aborts the whole fetch.
pub async fn fetch_resources(
    lister: &dyn ResourceLister,
    stack_name: &str,
) -> crate::Result<Vec<StackResource>> {
    let mut resources = Vec::new();
    let mut next_token = None;
    let mut pages = 0usize;

    loop {
        let request = ListResourcesRequest {
            stack_name: stack_name.to_string(),
            next_token: next_token.take(),
        };
        let page = lister.list_stack_resources(request).await.map_err(|source| {
            crate::Error::RemoteFetch {
                stack_name: stack_name.to_string(),
                source,
            }
        })?;

        pages += 1;
        tracing::debug!(
            stack = stack_name,
            page = pages,
            count = page.resources.len(),
            "Fetched resource page"
        );

        resources.extend(page.resources);
        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    tracing::debug!(
        stack = stack_name,
        pages,
        total = resources.len(),
        "Fetched stack resources"
    );
    Ok(resources)
}

/// Prefixed logical id to physical id, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMap {
    entries: IndexMap<String, String>,
}

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for ResourceMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Fold raw resources into a [`ResourceMap`] keyed by `CF_<logicalId>`.
///
/// A logical id seen twice keeps its first position and its last value.
pub fn map_resources(resources: &[StackResource]) -> ResourceMap {
    let mut entries = IndexMap::with_capacity(resources.len());
    for resource in resources {
        let key = resource_key(&resource.logical_id);
        if let Some(previous) = entries.insert(key, resource.physical_id.clone()) {
            tracing::debug!(
                logical_id = %resource.logical_id,
                %previous,
                "Duplicate logical id, keeping last physical id"
            );
        }
    }
    ResourceMap { entries }
}
