// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Captured process output and line-stream assertions.
//!
//! This crate holds the data an outcheck run produces (captured output,
//! per-attempt records) and the ordered line-matching primitive used to
//! assert against it.

mod attempt;
mod lines;
mod log;
mod millis;
mod output;

pub use attempt::CapturedAttempt;
pub use lines::{LineGroup, LineMatcher, LineMismatch};
pub use log::AttemptLog;
pub use output::CapturedOutput;
