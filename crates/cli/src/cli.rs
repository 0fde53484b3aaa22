// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Run a command with retries, or verify the output of a command expected to fail
#[derive(Parser, Debug, Clone)]
#[command(name = "outcheck", version, about)]
pub struct Cli {
    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(long, env = "OUTCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum number of attempts (overrides retry.max_attempts)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub attempts: Option<u32>,

    /// Delay between attempts in milliseconds (overrides retry.delay_ms)
    #[arg(long = "delay-ms")]
    pub delay_ms: Option<u64>,

    /// Working directory for the command
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Extra message catalog file consulted before the default bundle
    #[arg(long, env = "OUTCHECK_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Expect the command to fail and verify its output: REGEX must match the
    /// failed command line printed after the error message
    #[arg(long = "expect-failure", value_name = "REGEX", allow_hyphen_values = true)]
    pub expect_failure: Option<String>,

    /// Exit code the failure message must report
    #[arg(long = "exit-code", requires = "expect_failure", allow_hyphen_values = true)]
    pub exit_code: Option<i32>,

    /// Exact line required after the output header (repeatable, in order)
    #[arg(
        long = "expect-line",
        value_name = "TEXT",
        requires = "expect_failure",
        allow_hyphen_values = true
    )]
    pub expect_lines: Vec<String>,

    /// Write a JSONL record of every attempt to this file
    #[arg(long = "attempt-log")]
    pub attempt_log: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Program and arguments to run, after `--`
    #[arg(required = true, last = true, num_args = 1.., value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
