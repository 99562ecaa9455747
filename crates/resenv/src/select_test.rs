// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use indexmap::indexmap;
use rstest::{fixture, rstest};

use super::*;
use crate::{StackResource, map_resources};

#[fixture]
fn resources() -> ResourceMap {
    map_resources(&[
        StackResource::new("a", "1"),
        StackResource::new("Bucket", "bucket-xyz"),
        StackResource::new("Queue", "https://sqs/queue"),
    ])
}

fn function(requested: &[&str]) -> FunctionSpec {
    FunctionSpec {
        name: "hello".to_string(),
        requested_resource_keys: requested.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

fn env(pairs: &[(&str, &str)]) -> EnvironmentMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[rstest]
fn test_resource_key() {
    assert_eq!(resource_key("Bucket"), "CF_Bucket");
}

#[rstest]
fn test_selects_only_requested(resources: ResourceMap) {
    let selection = select_for_function(
        &function(&["Queue", "Bucket"]),
        &resources,
        &EnvironmentMap::new(),
    );

    assert_eq!(
        selection.environment,
        env(&[("CF_Queue", "https://sqs/queue"), ("CF_Bucket", "bucket-xyz")])
    );
    // Request order is kept.
    let keys: Vec<_> = selection.environment.keys().cloned().collect();
    assert_eq!(keys, vec!["CF_Queue", "CF_Bucket"]);
    assert!(selection.unmet.is_empty());
}

#[rstest]
fn test_missing_resource_is_reported_not_inserted(resources: ResourceMap) {
    let selection = select_for_function(&function(&["x"]), &resources, &EnvironmentMap::new());

    assert!(selection.matched.is_empty());
    assert!(!selection.environment.contains_key("CF_x"));
    assert_eq!(selection.unmet, vec!["CF_x"]);
    assert!(selection.has_unmet());
}

#[rstest]
fn test_duplicate_missing_request_reported_once(resources: ResourceMap) {
    let selection =
        select_for_function(&function(&["x", "a", "x"]), &resources, &EnvironmentMap::new());

    assert_eq!(selection.unmet, vec!["CF_x"]);
    assert_eq!(selection.matched, env(&[("CF_a", "1")]));
}

#[rstest]
fn test_override_precedence() {
    let resources = map_resources(&[StackResource::new("a", "1")]);
    let provider = env(&[("CF_a", "default"), ("CF_b", "2")]);
    let mut function = function(&["a"]);
    function.static_environment = env(&[("CF_b", "override")]);

    let selection = select_for_function(&function, &resources, &provider);

    assert_eq!(selection.matched, env(&[("CF_a", "1")]));
    assert_eq!(
        selection.environment,
        indexmap! {
            "CF_a".to_string() => "default".to_string(),
            "CF_b".to_string() => "override".to_string(),
        }
    );
}

#[rstest]
fn test_no_requests_yields_static_environment_only(resources: ResourceMap) {
    let mut function = function(&[]);
    function.static_environment = env(&[("FOO", "bar")]);
    let provider = env(&[("LOG_LEVEL", "info")]);

    let selection = select_for_function(&function, &resources, &provider);

    assert!(selection.matched.is_empty());
    assert!(selection.unmet.is_empty());
    assert_eq!(
        selection.environment,
        env(&[("LOG_LEVEL", "info"), ("FOO", "bar")])
    );
}

#[rstest]
fn test_empty_resource_map(#[values(vec!["a"], vec!["a", "b"])] requested: Vec<&str>) {
    let selection = select_for_function(
        &function(&requested),
        &ResourceMap::new(),
        &EnvironmentMap::new(),
    );
    assert_eq!(selection.unmet.len(), requested.len());
    assert!(selection.environment.is_empty());
}
