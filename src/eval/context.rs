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


//! # Evaluation Session
//!
//! [`ZiCEvalContext`] owns everything one compilation run touches: the design
//! being built, the stack of definitions currently being declared, the
//! recorded errors, the registered roots and the configuration.
//!
//! Builder functions are methods on the session. Each one looks at the top of
//! the stack through [`ZiCEvalContext::ZiFCurrent`] and either mutates that
//! definition or records an incompatible use. Nested bodies run through
//! [`ZiCEvalContext::ZiFExecute`], which pushes a frame, runs the body and
//! hands the frame back so the caller keeps what the body built.

use std::fmt;
use std::panic::Location;

use serde_json::Value;

use crate::errors::{
    Result, ZiCDSLError, ZiCErrorKind, ZiCMultiError, ZiCValidationErrors, ZiError,
};
use crate::eval::config::ZiCEvalConfig;
use crate::eval::root::{ZiCRoot, ZiCRootRegistry};
use crate::expr::attribute::ZiCAttribute;
use crate::expr::design::{ZiCDesign, ZiCExprRef};
use crate::expr::types::ZiCTypeId;

/// A definition being declared.
#[derive(Clone, Debug, PartialEq)]
pub enum ZiCFrame {
    Api,
    UserType(ZiCTypeId),
    ResultType(ZiCTypeId),
    /// An attribute owned by the frame until its builder stores it.
    Attribute(ZiCAttribute),
    View { name: String, attribute: ZiCAttribute },
}

impl ZiCFrame {
    /// The attribute owned by this frame, if any.
    #[allow(non_snake_case)]
    pub fn ZiFIntoAttribute(self) -> Option<ZiCAttribute> {
        match self {
            ZiCFrame::Attribute(attribute) | ZiCFrame::View { attribute, .. } => Some(attribute),
            _ => None,
        }
    }
}

/// Summary of the top frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZiCCurrent {
    Top,
    Api,
    UserType(ZiCTypeId),
    ResultType(ZiCTypeId),
    Attribute,
    View(String),
}

pub struct ZiCEvalContext {
    pub(crate) design: ZiCDesign,
    pub(crate) stack: Vec<ZiCFrame>,
    pub(crate) errors: ZiCMultiError,
    pub(crate) roots: ZiCRootRegistry,
    pub(crate) config: ZiCEvalConfig,
    /// Counter for result types whose identifier yields no name.
    pub(crate) result_type_count: usize,
}

impl fmt::Debug for ZiCEvalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiCEvalContext")
            .field("roots", &self.roots)
            .field("depth", &self.stack.len())
            .field("errors", &self.errors.ZiFLen())
            .finish()
    }
}

impl Default for ZiCEvalContext {
    fn default() -> Self {
        Self::ZiFNew()
    }
}

impl ZiCEvalContext {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self::ZiFWithConfig(ZiCEvalConfig::default())
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithConfig(config: ZiCEvalConfig) -> Self {
        ZiCEvalContext {
            design: ZiCDesign::ZiFNew(),
            stack: Vec::new(),
            errors: ZiCMultiError::ZiFNew(),
            roots: ZiCRootRegistry::ZiFWithDefaults(),
            config,
            result_type_count: 0,
        }
    }

    /// Clears the design, stack, errors and roots for a fresh run. The
    /// configuration is kept. Ignored while a body is executing.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFReset(&mut self) {
        if !self.stack.is_empty() {
            self.ZiFReportError("cannot reset the session while a definition is being evaluated");
            return;
        }
        self.design = ZiCDesign::ZiFNew();
        self.errors.ZiFClear();
        self.roots = ZiCRootRegistry::ZiFWithDefaults();
        self.result_type_count = 0;
    }

    #[allow(non_snake_case)]
    pub fn ZiFConfig(&self) -> &ZiCEvalConfig {
        &self.config
    }

    #[allow(non_snake_case)]
    pub fn ZiFDesign(&self) -> &ZiCDesign {
        &self.design
    }

    #[allow(non_snake_case)]
    pub fn ZiFDesignMut(&mut self) -> &mut ZiCDesign {
        &mut self.design
    }

    #[allow(non_snake_case)]
    pub fn ZiFIntoDesign(self) -> ZiCDesign {
        self.design
    }

    #[allow(non_snake_case)]
    pub fn ZiFErrors(&self) -> &ZiCMultiError {
        &self.errors
    }

    #[allow(non_snake_case)]
    pub fn ZiFRoots(&self) -> &ZiCRootRegistry {
        &self.roots
    }

    #[allow(non_snake_case)]
    pub fn ZiFRegisterRoot(&mut self, root: Box<dyn ZiCRoot>) -> Result<()> {
        self.roots.ZiFRegister(root)
    }

    #[allow(non_snake_case)]
    pub fn ZiFDepth(&self) -> usize {
        self.stack.len()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsTopLevel(&self) -> bool {
        self.stack.is_empty()
    }

    #[allow(non_snake_case)]
    pub fn ZiFCurrent(&self) -> ZiCCurrent {
        match self.stack.last() {
            None => ZiCCurrent::Top,
            Some(ZiCFrame::Api) => ZiCCurrent::Api,
            Some(ZiCFrame::UserType(id)) => ZiCCurrent::UserType(*id),
            Some(ZiCFrame::ResultType(id)) => ZiCCurrent::ResultType(*id),
            Some(ZiCFrame::Attribute(_)) => ZiCCurrent::Attribute,
            Some(ZiCFrame::View { name, .. }) => ZiCCurrent::View(name.clone()),
        }
    }

    /// Pushes `frame`, runs `body` and pops the frame again. Returns whether
    /// the body recorded no new error, together with the popped frame.
    #[allow(non_snake_case)]
    pub fn ZiFExecute<F>(&mut self, body: F, frame: ZiCFrame) -> (bool, ZiCFrame)
    where
        F: FnOnce(&mut Self),
    {
        let before = self.errors.ZiFLen();
        let depth = self.stack.len();
        self.stack.push(frame);
        body(self);
        self.stack.truncate(depth + 1);
        match self.stack.pop() {
            Some(frame) => (self.errors.ZiFLen() == before, frame),
            None => {
                self.record(
                    ZiCErrorKind::Execution,
                    "definition stack underflow".to_string(),
                    Location::caller(),
                );
                (false, ZiCFrame::Api)
            }
        }
    }

    /// Evaluation name of the current definition.
    #[allow(non_snake_case)]
    pub fn ZiFEvalName(&self) -> Option<String> {
        let (top, rest) = self.stack.split_last()?;
        let enclosing = rest.iter().rev().find_map(|f| self.frame_name(f));
        let name = match top {
            ZiCFrame::Attribute(_) => match enclosing {
                Some(owner) => format!("attribute of {}", owner),
                None => "attribute".to_string(),
            },
            ZiCFrame::View { name, .. } => match enclosing {
                Some(owner) => format!("view {:?} of {}", name, owner),
                None => format!("view {:?}", name),
            },
            named => self.frame_name(named).unwrap_or_default(),
        };
        Some(name)
    }

    fn frame_name(&self, frame: &ZiCFrame) -> Option<String> {
        match frame {
            ZiCFrame::Api => Some(self.design.ZiFEvalName(ZiCExprRef::Api)),
            ZiCFrame::UserType(id) | ZiCFrame::ResultType(id) => {
                Some(self.design.ZiFEvalName(ZiCExprRef::Type(*id)))
            }
            ZiCFrame::Attribute(_) | ZiCFrame::View { .. } => None,
        }
    }

    /// Records an error at the caller's location, suffixed with the current
    /// definition.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFReportError(&mut self, message: impl fmt::Display) {
        self.record(ZiCErrorKind::Execution, message.to_string(), Location::caller());
    }

    /// Records that `builder` cannot be used in the current definition.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFIncompatibleDSL(&mut self, builder: &str) {
        self.record(
            ZiCErrorKind::IncompatibleUse,
            format!("invalid use of {}", builder),
            Location::caller(),
        );
    }

    fn record(&mut self, kind: ZiCErrorKind, message: String, location: &Location<'_>) {
        let context = self.ZiFEvalName();
        let message = match &context {
            Some(name) => format!("{} in {}", message, name),
            None => format!("{} (top level)", message),
        };
        log::debug!("dsl error at {}:{}: {}", location.file(), location.line(), message);
        self.errors
            .ZiFPush(ZiCDSLError::ZiFNew(kind, message, context).ZiFAt(location));
    }

    pub(crate) fn record_validation(&mut self, errors: ZiCValidationErrors) {
        for (context, message) in errors.entries {
            self.errors.ZiFPush(ZiCDSLError::ZiFNew(
                ZiCErrorKind::Validation,
                format!("{} in {}", message, context),
                Some(context),
            ));
        }
    }

    /// Attribute of the current definition.
    pub(crate) fn current_attribute(&self) -> Option<&ZiCAttribute> {
        match self.stack.last()? {
            ZiCFrame::UserType(id) | ZiCFrame::ResultType(id) => {
                self.design.arena.ZiFGet(*id).map(|t| &t.attribute)
            }
            ZiCFrame::Attribute(attribute) | ZiCFrame::View { attribute, .. } => Some(attribute),
            ZiCFrame::Api => None,
        }
    }

    pub(crate) fn current_attribute_mut(&mut self) -> Option<&mut ZiCAttribute> {
        match self.stack.last_mut()? {
            ZiCFrame::UserType(id) | ZiCFrame::ResultType(id) => {
                let id = *id;
                self.design.arena.ZiFGetMut(id).map(|t| &mut t.attribute)
            }
            ZiCFrame::Attribute(attribute) | ZiCFrame::View { attribute, .. } => Some(attribute),
            ZiCFrame::Api => None,
        }
    }

    /// Example value for the registered type `name`, seeded from the
    /// configuration.
    #[cfg(feature = "examples")]
    #[allow(non_snake_case)]
    pub fn ZiFGenerateExample(&self, name: &str) -> Result<Value> {
        self.design.ZiFExample(name, &self.config.example_seed)
    }

    /// Validates `value` against the registered type `name`.
    #[allow(non_snake_case)]
    pub fn ZiFValidateValue(&self, name: &str, value: &Value) -> Result<Vec<String>> {
        if !self.errors.ZiFIsEmpty() {
            return Err(ZiError::Dsl(self.errors.clone()));
        }
        Ok(self
            .design
            .ZiFValidateValue(name, value)?
            .iter()
            .map(|e| e.to_string())
            .collect())
    }
}
