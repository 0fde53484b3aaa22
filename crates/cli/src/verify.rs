// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Verification of the output a failed command prints.
//!
//! A command wrapper that sees an unexpected result prints an error line
//! (error prefix + catalog message + failed command line), then a fixed
//! header, then the command's own output. [`FailedCommandVerifier`] turns
//! that expectation into an ordered [`LineGroup`]:
//! 1. a line starting with the error prefix whose remainder contains a match
//!    for the command-line pattern
//! 2. a line equal to the output header
//! 3. any extra validators, in the order they were added

use crate::catalog::{CatalogError, StringCatalog};
use crate::diagnostic::make_error;
use crate::message::{FormattedMessage, LazyArg, MessageError};
use outcheck_capture::{CapturedOutput, LineGroup, LineMatcher, LineMismatch};
use regex::Regex;
use thiserror::Error;

/// Message for a command that exited with an unexpected code: `{0}` exit code, `{1}` command line
pub const UNEXPECTED_EXIT_CODE_KEY: &str = "error.command-failed-unexpected-exit-code";

/// Message for a command whose output did not match: `{0}` command line
pub const UNEXPECTED_OUTPUT_KEY: &str = "error.command-failed-unexpected-output";

/// Header printed before the failed command's output
pub const OUTPUT_HEADER_KEY: &str = "message.failed-command-output-header";

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Message(#[from] MessageError),

    #[error("Failed command output mismatch: {0}")]
    Mismatch(#[from] LineMismatch),
}

impl From<CatalogError> for VerifyError {
    fn from(err: CatalogError) -> Self {
        VerifyError::Message(MessageError::Catalog(err))
    }
}

/// Expected failed-command output.
#[derive(Clone, Debug)]
pub struct FailedCommandVerifier {
    catalog: StringCatalog,
    cmdline_pattern: Regex,
    exit_code: Option<i32>,
    validators: Vec<LineMatcher>,
}

impl FailedCommandVerifier {
    /// `cmdline_pattern` is searched for in the error line after its prefix
    pub fn new(catalog: StringCatalog, cmdline_pattern: Regex) -> Self {
        Self {
            catalog,
            cmdline_pattern,
            exit_code: None,
            validators: Vec::new(),
        }
    }

    /// Expect the unexpected-exit-code message instead of the
    /// unexpected-output one
    pub fn exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = Some(exit_code);
        self
    }

    /// Append a validator checked after the header line
    pub fn validator(mut self, validator: LineMatcher) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn validators(mut self, validators: impl IntoIterator<Item = LineMatcher>) -> Self {
        self.validators.extend(validators);
        self
    }

    /// The catalog message the error line starts with, before the command line
    pub fn expected_message(&self) -> Result<FormattedMessage, CatalogError> {
        match self.exit_code {
            Some(code) => self
                .catalog
                .build(UNEXPECTED_EXIT_CODE_KEY, [LazyArg::from(code), LazyArg::empty()]),
            None => self
                .catalog
                .build(UNEXPECTED_OUTPUT_KEY, [LazyArg::empty()]),
        }
    }

    /// Build the ordered line checks, evaluating catalog messages now
    pub fn build_group(&self) -> Result<LineGroup, VerifyError> {
        let error_prefix = make_error(self.expected_message()?.evaluate()?);
        let header = self.catalog.message(OUTPUT_HEADER_KEY)?.evaluate()?;

        let pattern = self.cmdline_pattern.clone();
        let prefix = error_prefix.clone();
        let failed_line = LineMatcher::custom(
            "failed command line",
            format!("{}{}", error_prefix, self.cmdline_pattern.as_str()),
            move |line| {
                line.strip_prefix(prefix.as_str())
                    .is_some_and(|rest| pattern.is_match(rest))
            },
        );

        let mut group = LineGroup::new()
            .with(failed_line)
            .with(LineMatcher::equals(header).labeled("output header"));
        group.extend(self.validators.iter().cloned());
        Ok(group)
    }

    /// Check captured lines against the expectation
    pub fn apply<S: AsRef<str>>(&self, lines: &[S]) -> Result<(), VerifyError> {
        self.build_group()?.apply(lines)?;
        Ok(())
    }

    /// Check stdout then stderr of a captured run.
    ///
    /// The two streams are captured separately, so their interleaving is
    /// lost: every stdout line is checked before any stderr line. A wrapper
    /// that prints the error line on stderr and the header on stdout must be
    /// checked with [`apply`](Self::apply) on lines in the order it wrote them.
    pub fn verify(&self, output: &CapturedOutput) -> Result<(), VerifyError> {
        self.apply(&output.lines())
    }
}

#[cfg(test)]
#[path = "verify_tests.rs"]
mod tests;
