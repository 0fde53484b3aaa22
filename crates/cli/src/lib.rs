// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retrying process execution and failed-command output verification.
//!
//! Building blocks for CLI integration tests:
//! - [`executor::RetryExecutor`] reruns a process until it succeeds, is
//!   aborted, or runs out of attempts
//! - [`message::FormattedMessage`] defers catalog lookups and argument
//!   computation until a message is actually compared
//! - [`verify::FailedCommandVerifier`] checks the error line, header and
//!   extra lines a command wrapper prints for a failed command

pub mod catalog;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod executor;
pub mod message;
pub mod process;
pub mod run;
pub mod time;
pub mod verify;

/// Re-exported capture types from outcheck-capture crate.
pub mod capture {
    pub use outcheck_capture::{
        AttemptLog, CapturedAttempt, CapturedOutput, LineGroup, LineMatcher, LineMismatch,
    };
}
