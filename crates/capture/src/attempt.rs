// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-attempt record written by the retry executor.

use super::millis;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// One process execution made by a retry loop
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CapturedAttempt {
    /// Sequence number, starting at zero
    pub seq: u64,

    /// Wall-clock timestamp when the attempt finished
    pub timestamp: SystemTime,

    /// Elapsed time since the log was created
    #[serde(rename = "elapsed_ms", with = "millis")]
    pub elapsed: Duration,

    /// Printable command line of the process
    pub command_line: String,

    /// Exit code, or `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl CapturedAttempt {
    /// Whether the attempt exited with code zero
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}
