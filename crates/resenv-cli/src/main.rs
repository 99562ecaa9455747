// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! resenv - Stack Resource Environment Resolver CLI

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::Result;

mod cmd_deploy;
mod cmd_load;
mod cmd_show;

use cmd_deploy::CmdDeploy;
use cmd_load::CmdLoad;
use cmd_show::CmdShow;

#[derive(Parser)]
#[clap(
    name = "resenv",
    about = "Stack Resource Environment Resolver",
    version,
    long_about = "Expose provisioned stack resources to functions as environment variables and local property files"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long, global = true)]
    quiet: bool,
}

/// Service file and stage selection shared by every command.
#[derive(Parser, Clone, Debug)]
pub struct ServiceFlags {
    /// Path to the service file
    #[clap(short = 'c', long = "config", default_value = resenv::SERVICE_FILENAME)]
    pub config: PathBuf,

    /// Stage to resolve (falls back to RESENV_STAGE, then provider.stage)
    #[clap(short, long)]
    pub stage: Option<String>,

    /// Region to resolve (falls back to RESENV_REGION, then provider.region)
    #[clap(short, long)]
    pub region: Option<String>,
}

impl ServiceFlags {
    /// Load the service file and resolve the deployment target.
    pub fn load(&self) -> Result<(resenv::ServiceConfig, resenv::Deployment)> {
        let config = resenv::ServiceConfig::load(&self.config)?;
        let options = self.stage_options().with_cached_from_env();
        let deployment = resenv::Deployment::resolve(&config, &options);
        tracing::debug!(
            stage = deployment.stage(),
            region = deployment.region(),
            "Resolved deployment"
        );
        Ok((config, deployment))
    }

    fn stage_options(&self) -> resenv::StageOptions {
        resenv::StageOptions {
            stage: self.stage.clone(),
            region: self.region.clone(),
            ..Default::default()
        }
    }

    /// Build a resolver wired to the provider for the resolved region.
    pub async fn resource_env(&self) -> Result<resenv::ResourceEnv> {
        let (config, deployment) = self.load()?;
        let sdk_config = resenv::aws::load_sdk_config(deployment.region()).await;

        Ok(resenv::ResourceEnv::new(
            Arc::new(config),
            deployment,
            Arc::new(resenv::aws::CloudFormationLister::new(&sdk_config)),
            Arc::new(resenv::aws::LambdaUpdater::new(&sdk_config)),
            Arc::new(resenv::LocalFilesystem),
        ))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Resolve stack resources, publish them and write property files
    Deploy(CmdDeploy),

    /// Display each function's resolved environment without changing anything
    Show(CmdShow),

    /// Load a function's property file, then run a command
    Load(CmdLoad),
}

impl Opt {
    async fn run(self) -> Result<i32> {
        // Setup logging
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        // Dispatch to command
        match self.cmd {
            Command::Deploy(mut cmd) => cmd.run().await,
            Command::Show(mut cmd) => cmd.run().await,
            Command::Load(mut cmd) => cmd.run().await,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run().await?;
    std::process::exit(code);
}
