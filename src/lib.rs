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


//! # Zid Core Library
//!
//! Zid evaluates designs declared with a builder DSL. A design is a set of
//! API, type and result type definitions whose bodies are recorded first and
//! run later, so definitions may refer to each other in any order.
//!
//! ## Module Overview
//!
//! - **errors**: Error types, DSL error lists and validation error sets
//! - **expr**: The recursive attribute, type, validation and view model
//! - **eval**: The evaluation session, roots and the multi-pass runner
//! - **dsl**: Builder functions operating on the session
//!
//! ## Feature Flags
//!
//! - `examples`: Seeded example value generation
//! - `full`: Enables all features
//!
//! ## Quick Start
//!
//! ```rust
//! use zid::{ZiCEvalContext, ZiCPrimitive};
//!
//! let mut ctx = ZiCEvalContext::ZiFNew();
//! ctx.ZiFType("Bottle", |ctx| {
//!     ctx.ZiFAttribute("name", ZiCPrimitive::String);
//!     ctx.ZiFRequired(["name"]);
//! });
//! ctx.ZiFResultType("application/vnd.bottle", |ctx| {
//!     ctx.ZiFExtend("Bottle");
//!     ctx.ZiFAttributes(|ctx| ctx.ZiFAttributeName("name"));
//! });
//! ctx.ZiFRun()?;
//! let json = ctx.ZiFDesign().ZiFToJson()?;
//! ```
//!
//! ## Evaluation
//!
//! 1. **Execute**: Deferred bodies run, root by root, in dependency order
//! 2. **Validate**: Every definition is checked and all problems collected
//! 3. **Finalize**: Inherited attributes are merged and default views built
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, ZiError>`. DSL misuse is
//! recorded on the session instead of panicking and surfaces as
//! `ZiError::Dsl` when the run ends.

#![allow(non_snake_case)]

pub mod errors;
pub mod expr;
pub mod eval;
pub mod dsl;

pub use errors::{Result, ZiCDSLError, ZiCErrorKind, ZiCMultiError, ZiCValidationErrors, ZiError};
pub use expr::{
    ZiCAttribute, ZiCDataType, ZiCDesign, ZiCExprRef, ZiCFormat, ZiCInstanceError, ZiCObject,
    ZiCPrimitive, ZiCTypeArena, ZiCTypeId, ZiCUserTypeExpr, ZiCValidation, ZiCViewExpr,
    ZI_DEFAULT_VIEW,
};
pub use eval::{
    ZiCCurrent, ZiCEvalConfig, ZiCEvalConfigBuilder, ZiCEvalContext, ZiCFrame, ZiCPass, ZiCRoot,
    ZiCRunSummary,
};
pub use dsl::ZiCTypeArg;
