// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `resenv deploy` command.

use clap::Args;
use colored::Colorize;
use miette::Result;

/// Resolve stack resources, publish them and write property files
#[derive(Debug, Args)]
pub struct CmdDeploy {
    #[clap(flatten)]
    pub service: crate::ServiceFlags,

    /// Only write local property files, leave remote functions untouched
    #[clap(long)]
    pub skip_publish: bool,
}

impl CmdDeploy {
    pub async fn run(&mut self) -> Result<i32> {
        let env = self.service.resource_env().await?;
        let options = resenv::DeployOptions {
            publish: !self.skip_publish,
        };

        let report = env.deploy(&options).await?;

        println!(
            "{} {} ({} resource(s))",
            "Stack:".bold(),
            report.stack_name.cyan(),
            report.resource_count
        );

        if report.outcomes.is_empty() {
            println!("  {}", "(no functions)".dimmed());
            return Ok(0);
        }

        for outcome in &report.outcomes {
            let action = if outcome.published {
                "published".green()
            } else {
                "written".yellow()
            };
            println!(
                "  {} {} -> {}",
                outcome.function.cyan(),
                action,
                outcome.path.display()
            );
            for key in &outcome.unmet {
                println!("    {} {}", "missing:".yellow(), key);
            }
        }

        Ok(0)
    }
}
