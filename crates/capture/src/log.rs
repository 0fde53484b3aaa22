// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Attempt log implementation.

use crate::attempt::CapturedAttempt;
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

/// Shared log of process attempts.
///
/// Clones share the same underlying record list, so a clone handed to an
/// executor can be inspected by the caller afterwards.
pub struct AttemptLog {
    start: Instant,
    attempts: Arc<Mutex<Vec<CapturedAttempt>>>,
    file_writer: Option<Arc<Mutex<BufWriter<File>>>>,
    write_errors: Arc<AtomicUsize>,
}

fn write_jsonl(w: &mut BufWriter<File>, attempt: &CapturedAttempt) -> std::io::Result<()> {
    serde_json::to_writer(&mut *w, attempt)?;
    writeln!(w)?;
    w.flush()
}

impl AttemptLog {
    /// Create a new in-memory attempt log
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            attempts: Arc::new(Mutex::new(Vec::new())),
            file_writer: None,
            write_errors: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create an attempt log that also writes to a file (JSONL format)
    pub fn with_file(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            start: Instant::now(),
            attempts: Arc::new(Mutex::new(Vec::new())),
            file_writer: Some(Arc::new(Mutex::new(BufWriter::new(file)))),
            write_errors: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Record a finished attempt
    pub fn record(&self, command_line: impl Into<String>, exit_code: Option<i32>) {
        let mut attempts = self.attempts.lock();
        let attempt = CapturedAttempt {
            seq: attempts.len() as u64,
            timestamp: SystemTime::now(),
            elapsed: self.start.elapsed(),
            command_line: command_line.into(),
            exit_code,
        };

        attempts.push(attempt.clone());

        if let Some(ref writer) = self.file_writer {
            if let Err(err) = write_jsonl(&mut writer.lock(), &attempt) {
                self.write_errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    seq = attempt.seq,
                    error = %err,
                    "failed to write attempt log entry"
                );
            }
        }
    }

    /// Number of records that could not be written to the log file
    pub fn write_errors(&self) -> usize {
        self.write_errors.load(Ordering::Relaxed)
    }

    /// Get all recorded attempts
    pub fn attempts(&self) -> Vec<CapturedAttempt> {
        self.attempts.lock().clone()
    }

    /// Get the most recent attempt
    pub fn last(&self) -> Option<CapturedAttempt> {
        self.attempts.lock().last().cloned()
    }

    /// Count attempts that exited with a nonzero code or a signal
    pub fn failures(&self) -> usize {
        self.attempts
            .lock()
            .iter()
            .filter(|a| !a.succeeded())
            .count()
    }

    pub fn len(&self) -> usize {
        self.attempts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.lock().is_empty()
    }

    /// Clear all recorded attempts
    pub fn clear(&self) {
        self.attempts.lock().clear();
    }
}

impl Default for AttemptLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for AttemptLog {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            attempts: Arc::clone(&self.attempts),
            file_writer: self.file_writer.as_ref().map(Arc::clone),
            write_errors: Arc::clone(&self.write_errors),
        }
    }
}

impl std::fmt::Debug for AttemptLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttemptLog")
            .field("attempts", &self.len())
            .field("file", &self.file_writer.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
