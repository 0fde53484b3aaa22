// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Captured output of a finished process.

use serde::{Deserialize, Serialize};

/// Exit code and output lines of one process execution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl CapturedOutput {
    pub fn new(exit_code: Option<i32>, stdout: Vec<String>, stderr: Vec<String>) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
        }
    }

    /// Build from raw stream bytes, splitting on line breaks.
    ///
    /// Invalid UTF-8 is replaced lossily; `\r\n` endings are trimmed.
    pub fn from_bytes(exit_code: Option<i32>, stdout: &[u8], stderr: &[u8]) -> Self {
        Self {
            exit_code,
            stdout: split_lines(stdout),
            stderr: split_lines(stderr),
        }
    }

    /// Whether the process exited with code zero
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// All captured lines, stdout first, then stderr
    pub fn lines(&self) -> Vec<String> {
        self.stdout.iter().chain(&self.stderr).cloned().collect()
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
