// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `resenv load` command.

use clap::Args;
use colored::Colorize;
use miette::Result;

/// Load a function's property file, then run a command
#[derive(Debug, Args)]
pub struct CmdLoad {
    /// Function whose property file should be loaded
    pub function: String,

    #[clap(flatten)]
    pub service: crate::ServiceFlags,

    /// Command to run with the loaded environment (default: list loaded keys)
    #[clap(last = true)]
    pub command: Vec<String>,
}

impl CmdLoad {
    pub async fn run(&mut self) -> Result<i32> {
        let (config, deployment) = self.service.load()?;
        let report = resenv::load_local_env(&config, &deployment, &self.function)?;

        let Some((command, args)) = self.command.split_first() else {
            match &report {
                None => println!(
                    "{}",
                    format!(
                        "No property file for '{}' in {} / {}; deploy first",
                        self.function,
                        deployment.stage(),
                        deployment.region()
                    )
                    .dimmed()
                ),
                Some(report) => {
                    println!("{} {}", "Loaded:".bold(), report.path.display());
                    for key in &report.loaded {
                        println!("  {}", key.green());
                    }
                    for key in &report.preserved {
                        println!("  {} {}", key.yellow(), "(already set)".dimmed());
                    }
                }
            }
            return Ok(0);
        };

        tracing::info!(command = %command, "Running command with loaded environment");
        let status = tokio::process::Command::new(command)
            .args(args)
            .status()
            .await
            .map_err(|e| miette::miette!("Failed to run '{}': {}", command, e))?;

        Ok(status.code().unwrap_or(1))
    }
}
