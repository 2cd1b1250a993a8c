//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// Minimal asynchronous test-execution harness
#[derive(Parser, Debug)]
#[command(name = "testlist")]
#[command(version)]
#[command(about = "Run the built-in asynchronous test suite")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Path to configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the self-test suite and print results
    Selftest(SelftestArgs),

    /// List the self-test cases
    List,
}

/// Arguments for selftest command
#[derive(Parser, Debug)]
pub struct SelftestArgs {
    /// Default per-test timeout in milliseconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Which tests to print (all, succeeded, failed)
    #[arg(short, long)]
    pub print: Option<String>,

    /// Output format (text, text-json, json, json-pretty)
    #[arg(short, long)]
    pub format: Option<String>,
}
