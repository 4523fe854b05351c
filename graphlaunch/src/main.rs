//! graphlaunch binary.
//!
//! Sets the graph database connection variables, runs the loader script
//! with its three data files, and keeps the console open until the user
//! presses Enter. The loader's own exit code becomes ours.

use clap::Parser;
use graphlaunch::{Cli, PasswordSource, resolve_password};
use graphlaunch_core::{LaunchPlan, Launcher, Result, init_logging};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<ExitCode> {
    init_logging(cli.global.verbose, cli.global.quiet)?;

    let (password, source) = resolve_password(cli.prompt_password)?;
    match source {
        PasswordSource::Default => debug!("Using built-in password"),
        PasswordSource::Environment => debug!("Using password from environment"),
        PasswordSource::Prompt => debug!("Using password from prompt"),
    }

    let plan = LaunchPlan::from_config(&cli.to_config(&password));
    drop(password);

    if cli.print_plan {
        println!("{}", plan.summary().to_json()?);
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = Launcher::console(plan).run().await;
    Ok(ExitCode::from(outcome.child.exit_code()))
}
