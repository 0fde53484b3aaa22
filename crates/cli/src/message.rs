// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lazily formatted catalog messages.
//!
//! A [`FormattedMessage`] keeps the catalog key and its arguments and only
//! produces text when [`FormattedMessage::evaluate`] is called. Deferred
//! arguments (for example an absolute path that is expensive to resolve) are
//! computed at that point, never when the message is merely displayed.

use crate::catalog::{CatalogError, FormatFn};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Boxed error returned by fallible deferred producers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type Producer = Arc<dyn Fn() -> Result<String, BoxError> + Send + Sync>;

/// Errors raised while evaluating a message.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to evaluate argument '{label}': {source}")]
    Argument {
        label: String,
        #[source]
        source: BoxError,
    },
}

/// A message argument: a plain value or a deferred producer.
#[derive(Clone)]
pub enum LazyArg {
    Value(String),
    Deferred {
        /// Shown in place of the value until the message is evaluated
        label: String,
        producer: Producer,
    },
}

impl LazyArg {
    pub fn value(value: impl fmt::Display) -> Self {
        LazyArg::Value(value.to_string())
    }

    /// Placeholder for an intentionally absent argument
    pub fn empty() -> Self {
        LazyArg::Value(String::new())
    }

    /// Defer computing the value until evaluation
    pub fn deferred<F, T>(label: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: fmt::Display,
    {
        LazyArg::Deferred {
            label: label.into(),
            producer: Arc::new(move || Ok(producer().to_string())),
        }
    }

    /// Defer a computation that may fail, e.g. resolving a path on disk
    pub fn try_deferred<F, T, E>(label: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        T: fmt::Display,
        E: Into<BoxError>,
    {
        LazyArg::Deferred {
            label: label.into(),
            producer: Arc::new(move || producer().map(|v| v.to_string()).map_err(Into::into)),
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, LazyArg::Deferred { .. })
    }

    /// Produce the argument text, invoking the producer if deferred
    pub fn resolve(&self) -> Result<String, MessageError> {
        match self {
            LazyArg::Value(value) => Ok(value.clone()),
            LazyArg::Deferred { label, producer } => {
                producer().map_err(|source| MessageError::Argument {
                    label: label.clone(),
                    source,
                })
            }
        }
    }
}

impl fmt::Display for LazyArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LazyArg::Value(value) => f.write_str(value),
            LazyArg::Deferred { label, .. } => f.write_str(label),
        }
    }
}

impl fmt::Debug for LazyArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LazyArg::Value(value) => f.debug_tuple("Value").field(value).finish(),
            LazyArg::Deferred { label, .. } => f
                .debug_struct("Deferred")
                .field("label", label)
                .finish_non_exhaustive(),
        }
    }
}

impl From<&str> for LazyArg {
    fn from(value: &str) -> Self {
        LazyArg::Value(value.to_string())
    }
}

impl From<String> for LazyArg {
    fn from(value: String) -> Self {
        LazyArg::Value(value)
    }
}

impl From<i32> for LazyArg {
    fn from(value: i32) -> Self {
        LazyArg::value(value)
    }
}

impl From<u32> for LazyArg {
    fn from(value: u32) -> Self {
        LazyArg::value(value)
    }
}

/// Catalog key plus arguments, formatted on demand.
#[derive(Clone)]
pub struct FormattedMessage {
    formatter: FormatFn,
    key: String,
    args: Vec<LazyArg>,
}

impl FormattedMessage {
    /// Create a message; the key must be non-empty
    pub fn new(
        formatter: FormatFn,
        key: impl Into<String>,
        args: Vec<LazyArg>,
    ) -> Result<Self, CatalogError> {
        let key = key.into();
        if key.is_empty() {
            return Err(CatalogError::EmptyKey);
        }
        Ok(Self {
            formatter,
            key,
            args,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn args(&self) -> &[LazyArg] {
        &self.args
    }

    /// Resolve every argument and format the message.
    ///
    /// Deferred producers run once per call.
    pub fn evaluate(&self) -> Result<String, MessageError> {
        let resolved = self
            .args
            .iter()
            .map(LazyArg::resolve)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((self.formatter)(&self.key, &resolved)?)
    }
}

/// Unevaluated form: `key` or `key+[a, b]`, deferred arguments by label.
impl fmt::Display for FormattedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)?;
        if self.args.is_empty() {
            return Ok(());
        }
        f.write_str("+[")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for FormattedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormattedMessage")
            .field("key", &self.key)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
