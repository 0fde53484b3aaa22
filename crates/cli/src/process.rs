// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Launching processes and capturing their output.

use outcheck_capture::CapturedOutput;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Something the retry executor can run once per attempt.
pub trait Process {
    /// Run to completion and capture output.
    ///
    /// A nonzero exit code is reported through the returned output, not as
    /// an error; `Err` means the process could not be run at all.
    fn execute(&mut self) -> std::io::Result<CapturedOutput>;

    /// Human-readable command line for diagnostics
    fn printable_command_line(&self) -> String;
}

/// Program, arguments, working directory and environment of a process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Build from an argument vector whose first element is the program
    pub fn from_argv<I, S>(argv: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next()?;
        Some(Self::new(program).args(argv))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Change the working directory in place (for per-attempt initializers)
    pub fn set_current_dir(&mut self, dir: impl Into<PathBuf>) {
        self.cwd = Some(dir.into());
    }

    /// Add an environment variable in place (for per-attempt initializers)
    pub fn set_env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env.push((key.into(), value.into()));
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }
}

impl Process for CommandSpec {
    fn execute(&mut self) -> std::io::Result<CapturedOutput> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null());
        if let Some(ref cwd) = self.cwd {
            command.current_dir(cwd);
        }
        let output = command.output()?;
        Ok(CapturedOutput::from_bytes(
            output.status.code(),
            &output.stdout,
            &output.stderr,
        ))
    }

    fn printable_command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|part| quote(part))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote(part: &str) -> String {
    let needs_quotes =
        part.is_empty() || part.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'');
    if needs_quotes {
        format!("\"{}\"", part.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        part.to_string()
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
