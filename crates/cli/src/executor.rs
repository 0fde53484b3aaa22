// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retry loop around a process factory.
//!
//! [`RetryExecutor::execute`] creates a fresh process per attempt and stops
//! on the first zero exit code, on an abort request, or when the attempt
//! budget is spent. Nonzero exits with attempts remaining are absorbed and
//! followed by the configured delay.

use crate::config::RetryConfig;
use crate::process::Process;
use crate::time::{Interrupted, Sleeper, ThreadSleeper};
use outcheck_capture::{AttemptLog, CapturedOutput};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Terminal failures of a retry run.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Maximum attempt count must be at least 1")]
    NoAttempts,

    #[error("Failed to launch {command_line}: {source}")]
    Launch {
        command_line: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command_line} exited with code {} after {attempts} attempt(s)", display_code(.exit_code))]
    Exhausted {
        command_line: String,
        exit_code: Option<i32>,
        attempts: u32,
        output: CapturedOutput,
    },

    #[error("{command_line} exited with code {} after {attempts} attempt(s); retry aborted", display_code(.exit_code))]
    Aborted {
        command_line: String,
        exit_code: Option<i32>,
        attempts: u32,
        output: CapturedOutput,
    },

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

impl ExecError {
    /// Output of the last attempt, when one finished
    pub fn output(&self) -> Option<&CapturedOutput> {
        match self {
            ExecError::Exhausted { output, .. } | ExecError::Aborted { output, .. } => Some(output),
            _ => None,
        }
    }
}

impl From<ExecError> for std::io::Error {
    fn from(err: ExecError) -> Self {
        let kind = match &err {
            ExecError::Launch { source, .. } => source.kind(),
            ExecError::Interrupted(_) => std::io::ErrorKind::Interrupted,
            ExecError::NoAttempts => std::io::ErrorKind::InvalidInput,
            ExecError::Exhausted { .. } | ExecError::Aborted { .. } => std::io::ErrorKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "<signal>".to_string(),
    }
}

/// Non-error ends of a retry run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RetryOutcome {
    /// An attempt exited with code zero
    Succeeded {
        attempts: u32,
        output: CapturedOutput,
    },
    /// Abort was observed before the next attempt started
    Aborted { attempts: u32 },
}

impl RetryOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryOutcome::Succeeded { attempts, .. } | RetryOutcome::Aborted { attempts } => {
                *attempts
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RetryOutcome::Succeeded { .. })
    }

    pub fn output(&self) -> Option<&CapturedOutput> {
        match self {
            RetryOutcome::Succeeded { output, .. } => Some(output),
            RetryOutcome::Aborted { .. } => None,
        }
    }
}

/// Cooperative cancellation flag for a [`RetryExecutor`].
///
/// Effectively single-writer: set from anywhere, observed by the executor
/// only before an attempt starts and after a failed attempt finishes. A
/// running process is never interrupted.
#[derive(Clone, Debug, Default)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn abort(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

type Factory<P> = Box<dyn FnMut() -> P>;
type Initializer<P> = Box<dyn FnMut(&mut P)>;

/// Runs a freshly created process until it succeeds, is aborted, or the
/// attempt budget runs out.
pub struct RetryExecutor<P: Process> {
    factory: Factory<P>,
    initializer: Option<Initializer<P>>,
    max_attempts: u32,
    delay: Duration,
    abort: AbortHandle,
    sleeper: Arc<dyn Sleeper>,
    log: Option<AttemptLog>,
}

impl<P: Process> RetryExecutor<P> {
    pub fn new(factory: impl FnMut() -> P + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            initializer: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
            abort: AbortHandle::default(),
            sleeper: Arc::new(ThreadSleeper::new()),
            log: None,
        }
    }

    /// Attempt budget; zero is rejected when the run starts
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Wait between a failed attempt and the next one
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Apply attempts and delay from a loaded config
    pub fn configure(self, config: &RetryConfig) -> Self {
        self.max_attempts(config.max_attempts).delay(config.delay())
    }

    /// Hook run on every new process before it executes
    pub fn initializer(mut self, initializer: impl FnMut(&mut P) + 'static) -> Self {
        self.initializer = Some(Box::new(initializer));
        self
    }

    pub fn sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Record every finished attempt into `log`
    pub fn log(mut self, log: AttemptLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Handle for requesting an abort from outside the loop
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn abort(&self) {
        self.abort.abort();
    }

    /// Run the retry loop.
    ///
    /// An abort requested before the call is honored: no attempt is made.
    /// The flag is cleared when the run ends, whatever the result.
    pub fn execute(&mut self) -> Result<RetryOutcome, ExecError> {
        let result = self.run_attempts();
        self.abort.reset();
        result
    }

    fn run_attempts(&mut self) -> Result<RetryOutcome, ExecError> {
        if self.max_attempts == 0 {
            return Err(ExecError::NoAttempts);
        }

        let mut remaining = self.max_attempts;
        let mut attempts = 0;
        loop {
            if self.abort.is_aborted() {
                info!(attempts, "retry aborted");
                return Ok(RetryOutcome::Aborted { attempts });
            }

            let mut process = (self.factory)();
            if let Some(ref mut init) = self.initializer {
                init(&mut process);
            }
            let command_line = process.printable_command_line();
            attempts += 1;
            debug!(
                attempt = attempts,
                max_attempts = self.max_attempts,
                command = %command_line,
                "executing"
            );

            let output = process.execute().map_err(|source| ExecError::Launch {
                command_line: command_line.clone(),
                source,
            })?;
            if let Some(ref log) = self.log {
                log.record(command_line.as_str(), output.exit_code);
            }

            if output.success() {
                info!(attempts, command = %command_line, "command succeeded");
                return Ok(RetryOutcome::Succeeded { attempts, output });
            }

            remaining -= 1;
            if self.abort.is_aborted() {
                return Err(ExecError::Aborted {
                    command_line,
                    exit_code: output.exit_code,
                    attempts,
                    output,
                });
            }
            if remaining == 0 {
                return Err(ExecError::Exhausted {
                    command_line,
                    exit_code: output.exit_code,
                    attempts,
                    output,
                });
            }

            warn!(
                exit_code = ?output.exit_code,
                remaining,
                delay_ms = self.delay.as_millis() as u64,
                "attempt failed, retrying"
            );
            self.sleeper.sleep(self.delay)?;
        }
    }
}

impl<P: Process> std::fmt::Debug for RetryExecutor<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryExecutor")
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .field("aborted", &self.abort.is_aborted())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
