//! Verification metadata updater CLI entrypoint.
//!
//! This binary regenerates Gradle's dependency verification metadata and
//! patches it to trust source and javadoc artifacts.

use clap::Parser;
use std::io::Write;
use verification_updater::cli::Cli;
use verification_updater::config::UpdateConfig;
use verification_updater::error::Result;
use verification_updater::gradle::SystemGradleExecutor;
use verification_updater::output::{error_chain, write_stderr_line};
use verification_updater::update::{describe_plan, update_verification_metadata};

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let config = UpdateConfig::from_cli(cli)?;

    if cli.dry_run {
        describe_plan(&config, stderr);
        return Ok(());
    }

    let report = update_verification_metadata(&config, &SystemGradleExecutor, stderr)?;

    if !config.quiet {
        write_stderr_line(stderr, report.summary_line());
    }
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {}", error_chain(&err)));
            1
        }
    }
}
