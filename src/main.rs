//! testlist - minimal asynchronous test-execution harness
//!
//! Runs the built-in self-test suite and prints the outcome.
//!
//! ## Usage
//!
//! ```bash
//! # Run the self-test suite
//! testlist selftest
//!
//! # Only print failures, with a 500ms default timeout
//! testlist selftest --print failed --timeout 500
//!
//! # Full JSON report
//! testlist selftest --format json-pretty
//!
//! # List the self-test cases
//! testlist list
//! ```

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::{debug, info};

mod cli;

use cli::{Args, Command, SelftestArgs};
use testlist::config::{AppConfig, EnvConfig};
use testlist::output::{OutputFormat, PrintFilter, ResultFormatter};
use testlist::selftest;
use testlist::utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env = EnvConfig::load();
    let config = match args.config.as_ref().or(env.config_file.as_ref()) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default()?,
    }
    .apply_env(&env);

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        let name = args.log_level.as_deref().unwrap_or(&config.log_level);
        LogLevel::from_str(name).ok_or_else(|| anyhow!("Unknown log level: {name}"))?
    };
    init_logger(level);
    debug!("Using configuration: {:?}", config);

    match args.command {
        Command::Selftest(selftest_args) => {
            if !run_selftest(selftest_args, config).await? {
                std::process::exit(1);
            }
        }
        Command::List => list_tests(config),
    }

    Ok(())
}

async fn run_selftest(args: SelftestArgs, mut config: AppConfig) -> Result<bool> {
    if let Some(timeout) = args.timeout {
        config.suite.timeout_ms = Some(timeout);
    }

    let format_name = args.format.as_deref().unwrap_or(&config.format);
    let format = OutputFormat::from_str(format_name)
        .ok_or_else(|| anyhow!("Unknown output format: {format_name}"))?;
    let print_name = args.print.as_deref().unwrap_or(&config.print);
    let filter = PrintFilter::from_str(print_name)
        .ok_or_else(|| anyhow!("Unknown print filter: {print_name}"))?;

    let mut suite = selftest::build(config.suite.clone());
    info!(
        "Running {} self-tests (default timeout: {:?})",
        suite.len(),
        suite.timeout()
    );

    let all_passed = suite.run().await;

    let formatter = ResultFormatter::new(format).with_filter(filter);
    print!("{}", formatter.format_suite(&suite));
    if matches!(format, OutputFormat::Json | OutputFormat::JsonPretty) {
        println!();
    }

    Ok(all_passed)
}

fn list_tests(config: AppConfig) {
    let suite = selftest::build(config.suite);

    println!("Self-tests:");
    println!();
    for test in suite.tests() {
        println!("  {test}");
    }
}
