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

//! # Expression Model
//!
//! The recursive design model evaluated by the DSL: attributes, data types,
//! validations, user and result types, and the structural operations
//! defined over them.
//!
//! ## Modules
//!
//! - **types**: Primitive kinds, arrays, maps, objects and named type handles
//! - **attribute**: Attributes, metadata and deferred DSL bodies
//! - **validation**: Value contracts and their merge rules
//! - **format**: Named string formats
//! - **user_type**: Named types and the arena that owns them
//! - **result_type**: Media type identifiers and views
//! - **dup**: Cycle-safe deep copies
//! - **merge**: Merge, inherit and inline finalization
//! - **project**: View projection of result types
//! - **instance**: Validation of JSON values against the model
//! - **example**: Seeded example values (feature `examples`)
//! - **design**: The evaluated design document
//!
//! Named types live in a [`ZiCTypeArena`] and are referred to by
//! [`ZiCTypeId`], so cyclic type graphs are plain data.

pub mod attribute;
pub mod design;
pub mod dup;
#[cfg(feature = "examples")]
pub mod example;
pub mod format;
pub mod instance;
pub mod merge;
pub mod project;
pub mod result_type;
pub mod types;
pub mod user_type;
pub mod validation;

pub use attribute::{ZiCAttribute, ZiCDSLFunc, ZiCMeta, ZiCPending};
pub use design::{ZiCApiExpr, ZiCDesign, ZiCExprRef};
pub use dup::ZiCDupper;
#[cfg(feature = "examples")]
pub use example::ZiCExampleGenerator;
pub use format::ZiCFormat;
pub use instance::ZiCInstanceError;
pub use project::ZiCProjector;
pub use result_type::{ZiCResultInfo, ZiCViewExpr, ZI_DEFAULT_VIEW, ZI_VIEW_META_KEY, ZI_VIEW_PARAM};
pub use types::{ZiCArray, ZiCDataType, ZiCKind, ZiCMap, ZiCNamedAttribute, ZiCObject, ZiCPrimitive, ZiCTypeId};
pub use user_type::{ZiCTypeArena, ZiCUserTypeExpr};
pub use validation::ZiCValidation;
