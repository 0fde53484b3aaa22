// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line driver tying config, executor and verifier together.

use crate::catalog::CatalogError;
use crate::cli::Cli;
use crate::config::{ConfigError, OutcheckConfig};
use crate::executor::{ExecError, RetryExecutor, RetryOutcome};
use crate::process::{CommandSpec, Process};
use crate::verify::{FailedCommandVerifier, VerifyError};
use outcheck_capture::{AttemptLog, CapturedOutput, LineMatcher};
use regex::Regex;
use std::io::Write;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Invalid --expect-failure pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error("Failed to open attempt log: {0}")]
    AttemptLog(#[source] std::io::Error),

    #[error("No command given")]
    MissingCommand,

    #[error("Expected {command_line} to fail, but it exited with code 0")]
    UnexpectedSuccess { command_line: String },

    #[error("Retry of {command_line} aborted after {attempts} attempt(s)")]
    Aborted { command_line: String, attempts: u32 },
}

/// Resolved settings and collaborators for one invocation.
#[derive(Debug)]
pub struct Invocation {
    pub config: OutcheckConfig,
    pub command: CommandSpec,
    pub log: AttemptLog,
}

impl Invocation {
    /// Merge the config file with CLI overrides
    pub fn from_cli(cli: &Cli) -> Result<Self, RunError> {
        let mut config = match cli.config {
            Some(ref path) => OutcheckConfig::load(path)?,
            None => OutcheckConfig::default(),
        };
        if let Some(attempts) = cli.attempts {
            config.retry.max_attempts = attempts;
        }
        if let Some(delay_ms) = cli.delay_ms {
            config.retry.delay_ms = delay_ms;
        }
        config.validate()?;

        let mut command =
            CommandSpec::from_argv(cli.command.iter().cloned()).ok_or(RunError::MissingCommand)?;
        if let Some(ref cwd) = cli.cwd {
            command = command.current_dir(cwd);
        }

        let log = match cli.attempt_log {
            Some(ref path) => AttemptLog::with_file(path).map_err(RunError::AttemptLog)?,
            None => AttemptLog::new(),
        };

        Ok(Self {
            config,
            command,
            log,
        })
    }

    fn executor(&self) -> RetryExecutor<CommandSpec> {
        let command = self.command.clone();
        RetryExecutor::new(move || command.clone())
            .configure(&self.config.retry)
            .log(self.log.clone())
    }
}

/// Execute the invocation described by `cli`.
///
/// Without `--expect-failure` the command's final output is echoed to
/// `stdout`/`stderr`.
pub fn run<O: Write, E: Write>(cli: &Cli, stdout: &mut O, stderr: &mut E) -> Result<(), RunError> {
    let invocation = Invocation::from_cli(cli)?;
    match cli.expect_failure {
        None => run_until_success(&invocation, stdout, stderr),
        Some(ref pattern) => run_expecting_failure(cli, &invocation, pattern),
    }
}

fn run_until_success<O: Write, E: Write>(
    invocation: &Invocation,
    stdout: &mut O,
    stderr: &mut E,
) -> Result<(), RunError> {
    let outcome = invocation.executor().execute();
    let output = match outcome {
        Ok(RetryOutcome::Succeeded { output, .. }) => output,
        Ok(RetryOutcome::Aborted { attempts }) => {
            return Err(RunError::Aborted {
                command_line: invocation.command.printable_command_line(),
                attempts,
            })
        }
        Err(err) => {
            if let Some(output) = err.output() {
                echo(output, stdout, stderr);
            }
            return Err(err.into());
        }
    };
    echo(&output, stdout, stderr);
    Ok(())
}

fn run_expecting_failure(
    cli: &Cli,
    invocation: &Invocation,
    pattern: &str,
) -> Result<(), RunError> {
    let catalog = invocation.config.catalog(cli.catalog.as_deref())?;
    let mut verifier = FailedCommandVerifier::new(catalog, Regex::new(pattern)?)
        .validators(cli.expect_lines.iter().map(|line| LineMatcher::equals(line.as_str())));
    if let Some(code) = cli.exit_code {
        verifier = verifier.exit_code(code);
    }

    let command_line = invocation.command.printable_command_line();
    match invocation.executor().execute() {
        Ok(RetryOutcome::Succeeded { .. }) => Err(RunError::UnexpectedSuccess { command_line }),
        Ok(RetryOutcome::Aborted { attempts }) => Err(RunError::Aborted {
            command_line,
            attempts,
        }),
        Err(ExecError::Exhausted { output, .. }) | Err(ExecError::Aborted { output, .. }) => {
            verifier.verify(&output)?;
            info!(command = %command_line, "failed command output verified");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn echo<O: Write, E: Write>(output: &CapturedOutput, stdout: &mut O, stderr: &mut E) {
    for line in &output.stdout {
        let _ = writeln!(stdout, "{}", line);
    }
    for line in &output.stderr {
        let _ = writeln!(stderr, "{}", line);
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
