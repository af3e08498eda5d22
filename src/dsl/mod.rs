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


//! # Design DSL
//!
//! Builder functions used to declare a design. Every builder is a method on
//! [`ZiCEvalContext`] and acts on the definition currently being declared:
//!
//! ```rust
//! use zid::{ZiCEvalContext, ZiCPrimitive};
//!
//! let mut ctx = ZiCEvalContext::ZiFNew();
//! ctx.ZiFType("Person", |ctx| {
//!     ctx.ZiFAttribute("name", ZiCPrimitive::String);
//!     ctx.ZiFAttributeWith("age", ZiCPrimitive::Int, |ctx| ctx.ZiFMinimum(0));
//!     ctx.ZiFRequired(["name"]);
//! });
//! let summary = ctx.ZiFRun()?;
//! ```
//!
//! Top-level definitions (`ZiFApi`, `ZiFType`, `ZiFResultType`) store their
//! bodies and run them during the execute pass, so they may refer to types
//! declared later. Nested builders run their bodies immediately.
//!
//! Misuse never panics: the builder records an error on the session and the
//! run reports it.

pub mod api;
pub mod attribute;
pub mod result_type;
pub mod user_type;
pub mod validation;

use std::fmt;

use crate::eval::context::ZiCEvalContext;
use crate::expr::types::{ZiCDataType, ZiCPrimitive};

/// Type argument of attribute and container builders.
#[derive(Clone, Debug, PartialEq)]
pub enum ZiCTypeArg {
    Type(ZiCDataType),
    /// A registered type looked up by name (or identifier for result types).
    Named(String),
    /// No explicit type: taken from a reference, from the parent view or
    /// defaulted to string.
    Inherit,
}

impl From<ZiCDataType> for ZiCTypeArg {
    fn from(ty: ZiCDataType) -> Self {
        ZiCTypeArg::Type(ty)
    }
}

impl From<&ZiCDataType> for ZiCTypeArg {
    fn from(ty: &ZiCDataType) -> Self {
        ZiCTypeArg::Type(ty.clone())
    }
}

impl From<ZiCPrimitive> for ZiCTypeArg {
    fn from(p: ZiCPrimitive) -> Self {
        ZiCTypeArg::Type(ZiCDataType::Primitive(p))
    }
}

impl From<&str> for ZiCTypeArg {
    fn from(name: &str) -> Self {
        ZiCTypeArg::Named(name.to_string())
    }
}

impl From<String> for ZiCTypeArg {
    fn from(name: String) -> Self {
        ZiCTypeArg::Named(name)
    }
}

impl fmt::Display for ZiCTypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZiCTypeArg::Type(ty) => write!(f, "{:?}", ty.ZiFKind()),
            ZiCTypeArg::Named(name) => write!(f, "{:?}", name),
            ZiCTypeArg::Inherit => write!(f, "(inherited)"),
        }
    }
}

impl ZiCEvalContext {
    /// Resolves an explicit type argument. `Inherit` and unknown names give
    /// `None`.
    pub(crate) fn resolve_type_arg(&self, arg: &ZiCTypeArg) -> Option<ZiCDataType> {
        match arg {
            ZiCTypeArg::Type(ty) => Some(ty.clone()),
            ZiCTypeArg::Named(name) => self
                .design
                .ZiFDataType(name)
                .or_else(|| {
                    self.design
                        .ZiFResultType(name)
                        .and_then(|id| self.design.arena.ZiFGet(id))
                        .map(|t| t.ZiFDataType())
                }),
            ZiCTypeArg::Inherit => None,
        }
    }

    /// Type name used in error messages.
    pub(crate) fn type_name(&self, ty: &ZiCDataType) -> String {
        self.design.arena.ZiFTypeName(ty)
    }
}
