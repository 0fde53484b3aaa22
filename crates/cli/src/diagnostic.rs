// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error prefix shared by the command wrapper and the
//! failed-command verifier.
//!
//! Terminal output is colored when stderr is a terminal.

use std::io::{self, IsTerminal, Write};

/// Prefix of every error diagnostic line.
pub const ERROR_PREFIX: &str = "error: ";

/// Prepend [`ERROR_PREFIX`] to `msg`
pub fn make_error(msg: impl std::fmt::Display) -> String {
    format!("{}{}", ERROR_PREFIX, msg)
}

/// Print an error message to stderr.
pub fn print_error(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_error(&mut io::stderr(), msg, is_tty);
}

fn write_error<W: Write>(writer: &mut W, msg: impl std::fmt::Display, is_terminal: bool) {
    if is_terminal {
        let _ = writeln!(writer, "\x1b[31m{}\x1b[0m", make_error(msg));
    } else {
        let _ = writeln!(writer, "{}", make_error(msg));
    }
}

#[cfg(test)]
#[path = "diagnostic_tests.rs"]
mod tests;
