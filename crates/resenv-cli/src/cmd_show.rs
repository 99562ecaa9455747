// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `resenv show` command.

use std::collections::BTreeMap;

use clap::Args;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

/// Display each function's resolved environment without changing anything
#[derive(Debug, Args)]
pub struct CmdShow {
    #[clap(flatten)]
    pub service: crate::ServiceFlags,

    /// Only show this function
    #[clap(long)]
    pub function: Option<String>,

    /// Output format: table, yaml
    #[clap(long, default_value = "table")]
    pub format: String,
}

#[derive(Serialize)]
struct ShowFunction<'a> {
    remote_name: &'a str,
    file: String,
    environment: &'a resenv::config::EnvironmentMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unmet: Vec<String>,
}

impl CmdShow {
    pub async fn run(&mut self) -> Result<i32> {
        let env = self.service.resource_env().await?;
        let (resource_count, mut plans) = env.resolve().await?;

        if let Some(name) = &self.function {
            env.config().function(name)?;
            plans.retain(|plan| &plan.function.name == name);
        }

        let stack_name = env.deployment().stack_name();
        if self.format == "yaml" {
            self.show_yaml(&plans)?;
        } else {
            self.show_table(&stack_name, resource_count, &plans);
        }

        Ok(0)
    }

    fn show_table(&self, stack_name: &str, resource_count: usize, plans: &[resenv::FunctionPlan]) {
        println!("{} {}", "Stack:".bold(), stack_name.cyan());
        println!("Total: {} resource(s)", resource_count);

        for plan in plans {
            println!();
            println!(
                "{} {} {}",
                plan.function.name.bold(),
                format!("({})", plan.remote_name).dimmed(),
                plan.location.path().display()
            );

            if plan.selection.environment.is_empty() {
                println!("  {}", "(empty environment)".dimmed());
            }
            for (key, value) in &plan.selection.environment {
                println!("  {} = {}", key.cyan(), value.green());
            }
            for key in &plan.selection.unmet {
                println!("  {} {}", "missing:".yellow(), key);
            }
        }
    }

    fn show_yaml(&self, plans: &[resenv::FunctionPlan]) -> Result<()> {
        let functions: BTreeMap<&str, ShowFunction<'_>> = plans
            .iter()
            .map(|plan| {
                (
                    plan.function.name.as_str(),
                    ShowFunction {
                        remote_name: &plan.remote_name,
                        file: plan.location.path().display().to_string(),
                        environment: &plan.selection.environment,
                        unmet: plan.selection.unmet.clone(),
                    },
                )
            })
            .collect();

        let yaml = serde_yaml::to_string(&functions).into_diagnostic()?;
        print!("{yaml}");
        Ok(())
    }
}
