// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered line-stream assertions.
//!
//! A [`LineMatcher`] is a named predicate over a single line. A [`LineGroup`]
//! applies its matchers in order against a captured stream: each matcher
//! searches forward from just after the line the previous matcher accepted.

use regex::Regex;
use std::fmt;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A named single-line predicate.
#[derive(Clone)]
pub struct LineMatcher {
    label: String,
    expected: String,
    predicate: Predicate,
}

impl LineMatcher {
    /// Create a matcher from an arbitrary predicate.
    ///
    /// `label` names the kind of check ("equals", "regex", ...) and
    /// `expected` is the text or pattern shown when the check fails.
    pub fn custom<F>(label: impl Into<String>, expected: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            expected: expected.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Line must equal `text` exactly
    pub fn equals(text: impl Into<String>) -> Self {
        let text = text.into();
        let want = text.clone();
        Self::custom("equals", text, move |line| line == want)
    }

    /// Line must contain `text`
    pub fn contains(text: impl Into<String>) -> Self {
        let text = text.into();
        let want = text.clone();
        Self::custom("contains", text, move |line| line.contains(want.as_str()))
    }

    /// Line must start with `prefix`
    pub fn starts_with(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let want = prefix.clone();
        Self::custom("starts with", prefix, move |line| {
            line.starts_with(want.as_str())
        })
    }

    /// `pattern` must be found somewhere in the line
    pub fn regex(pattern: Regex) -> Self {
        let expected = pattern.as_str().to_string();
        Self::custom("regex", expected, move |line| pattern.is_match(line))
    }

    /// Replace the label shown in mismatch reports
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Invert the predicate
    pub fn negate(self) -> Self {
        let inner = self.predicate;
        Self {
            label: format!("not {}", self.label),
            expected: self.expected,
            predicate: Arc::new(move |line| !inner(line)),
        }
    }

    pub fn matches(&self, line: &str) -> bool {
        (self.predicate)(line)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }
}

impl fmt::Debug for LineMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineMatcher")
            .field("label", &self.label)
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

/// Failure of a [`LineGroup`] to find a line for one of its matchers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineMismatch {
    /// Index of the failing matcher within its group
    pub matcher_index: usize,
    pub label: String,
    pub expected: String,
    /// Position the search started from
    pub position: usize,
    /// Line at `position`, `None` when the search started past the end
    pub actual: Option<String>,
}

impl fmt::Display for LineMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no line {} `{}` (matcher #{})",
            self.label, self.expected, self.matcher_index
        )?;
        match self.actual {
            Some(ref actual) => write!(
                f,
                "; searched from line {}: `{}`",
                self.position + 1,
                actual
            ),
            None => write!(f, "; reached end of output"),
        }
    }
}

impl std::error::Error for LineMismatch {}

/// Ordered collection of line matchers.
#[derive(Clone, Debug, Default)]
pub struct LineGroup {
    matchers: Vec<LineMatcher>,
}

impl LineGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a matcher (builder form)
    pub fn with(mut self, matcher: LineMatcher) -> Self {
        self.matchers.push(matcher);
        self
    }

    /// Append a matcher
    pub fn add(&mut self, matcher: LineMatcher) {
        self.matchers.push(matcher);
    }

    pub fn matchers(&self) -> &[LineMatcher] {
        &self.matchers
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Apply every matcher in order against `lines`.
    ///
    /// Each matcher takes the first line at or after the current position it
    /// accepts; the position then moves past that line.
    pub fn apply<S: AsRef<str>>(&self, lines: &[S]) -> Result<(), LineMismatch> {
        let mut position = 0;
        for (matcher_index, matcher) in self.matchers.iter().enumerate() {
            let found = lines
                .iter()
                .skip(position)
                .position(|line| matcher.matches(line.as_ref()));
            match found {
                Some(offset) => position += offset + 1,
                None => {
                    return Err(LineMismatch {
                        matcher_index,
                        label: matcher.label.clone(),
                        expected: matcher.expected.clone(),
                        position,
                        actual: lines.get(position).map(|l| l.as_ref().to_string()),
                    })
                }
            }
        }
        Ok(())
    }
}

impl Extend<LineMatcher> for LineGroup {
    fn extend<I: IntoIterator<Item = LineMatcher>>(&mut self, iter: I) {
        self.matchers.extend(iter);
    }
}

#[cfg(test)]
#[path = "lines_tests.rs"]
mod tests;
