//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Zid Error Module
//!
//! This module defines the error types used throughout the Zid design engine
//! for consistent error handling and reporting.
//!
//! ## Error Categories
//!
//! - **Configuration**: Root cycles, unknown dependencies, runaway execution
//! - **Dsl**: Accumulated DSL errors of a run (incompatible use, validation)
//! - **Validation**: Invalid arguments to read-side helpers
//! - **Invariant**: Broken internal invariants, these indicate a core bug
//! - **Io**: Filesystem errors while exporting designs
//! - **Serde**: Serialization/deserialization errors
//! - **Internal**: Unexpected internal failures
//!
//! DSL errors are never raised eagerly. Builder functions record them on the
//! evaluation session as [`ZiCDSLError`] values and the scheduler returns them
//! together as a [`ZiCMultiError`] once a pass completes.
//!
//! ## Usage
//!
//! ```rust
//! use zid::errors::{Result, ZiError};
//! use zid::ZiCEvalContext;
//!
//! fn example(ctx: &mut ZiCEvalContext) -> Result<()> {
//!     let summary = ctx.ZiFRun()?;
//!     if summary.executed == 0 {
//!         return Err(ZiError::validation("nothing to evaluate"));
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::io;
use std::panic::Location;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Zid.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical error enumeration for Zid.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ZiError {
    /// Fatal scheduler configuration problems detected before or during a run.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Errors accumulated by builder functions and the validate pass.
    #[error("{0}")]
    Dsl(ZiCMultiError),

    /// Invalid arguments given to read-contract helpers.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A structural invariant of the design model was violated.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ZiError {
    fn from(err: serde_json::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for ZiError {
    fn from(err: serde_yaml::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl ZiError {
    /// Helper to construct configuration errors.
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        ZiError::Configuration {
            message: message.into(),
        }
    }

    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        ZiError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct invariant errors.
    pub fn invariant<T: Into<String>>(message: T) -> Self {
        ZiError::Invariant(message.into())
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        ZiError::Internal(message.into())
    }

    /// Returns the accumulated DSL errors when this is a [`ZiError::Dsl`].
    #[allow(non_snake_case)]
    pub fn ZiFDslErrors(&self) -> Option<&ZiCMultiError> {
        match self {
            ZiError::Dsl(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Category of a recorded DSL error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZiCErrorKind {
    /// A builder was called while the current definition does not support it.
    IncompatibleUse,
    /// A builder was called with arguments it cannot accept.
    Execution,
    /// A definition failed its validate pass.
    Validation,
}

/// A single error recorded while evaluating a design.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCDSLError {
    pub kind: ZiCErrorKind,
    /// Full message including the definition context suffix.
    pub message: String,
    /// Evaluation name of the definition that was current, if any.
    pub context: Option<String>,
    pub file: Option<String>,
    pub line: u32,
}

impl ZiCDSLError {
    #[allow(non_snake_case)]
    pub fn ZiFNew(kind: ZiCErrorKind, message: impl Into<String>, context: Option<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context,
            file: None,
            line: 0,
        }
    }

    /// Attaches the given source location.
    #[allow(non_snake_case)]
    pub fn ZiFAt(mut self, location: &Location<'_>) -> Self {
        self.file = Some(location.file().to_string());
        self.line = location.line();
        self
    }
}

impl fmt::Display for ZiCDSLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "[{}:{}] {}", file, self.line, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Ordered collection of DSL errors.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiCMultiError(pub Vec<ZiCDSLError>);

impl ZiCMultiError {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self::default()
    }

    #[allow(non_snake_case)]
    pub fn ZiFPush(&mut self, err: ZiCDSLError) {
        self.0.push(err);
    }

    #[allow(non_snake_case)]
    pub fn ZiFLen(&self) -> usize {
        self.0.len()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsEmpty(&self) -> bool {
        self.0.is_empty()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIter(&self) -> impl Iterator<Item = &ZiCDSLError> {
        self.0.iter()
    }

    /// Messages only, without locations.
    #[allow(non_snake_case)]
    pub fn ZiFMessages(&self) -> Vec<String> {
        self.0.iter().map(|e| e.message.clone()).collect()
    }

    #[allow(non_snake_case)]
    pub fn ZiFClear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Display for ZiCMultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", lines.join("\n"))
    }
}

/// Validation failures gathered for a single definition during the validate
/// pass. Each entry pairs the failing definition's evaluation name with the
/// problem found.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiCValidationErrors {
    pub entries: Vec<(String, String)>,
}

impl ZiCValidationErrors {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self::default()
    }

    #[allow(non_snake_case)]
    pub fn ZiFAdd(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.entries.push((context.into(), message.into()));
    }

    #[allow(non_snake_case)]
    pub fn ZiFMerge(&mut self, other: ZiCValidationErrors) {
        self.entries.extend(other.entries);
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsEmpty(&self) -> bool {
        self.entries.is_empty()
    }

    #[allow(non_snake_case)]
    pub fn ZiFLen(&self) -> usize {
        self.entries.len()
    }

    #[allow(non_snake_case)]
    pub fn ZiFMessages(&self) -> Vec<String> {
        self.entries.iter().map(|(_, m)| m.clone()).collect()
    }
}

impl fmt::Display for ZiCValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .entries
            .iter()
            .map(|(ctx, msg)| format!("{}: {}", ctx, msg))
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}
