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


//! # Evaluation Engine
//!
//! The session that builder functions operate on, the roots it schedules and
//! the multi-pass runner.
//!
//! - **config**: Run limits and example seed
//! - **context**: The session, its frame stack and the error reporter
//! - **graph**: Root dependency ordering
//! - **root**: The root trait and the default design and generated roots
//! - **runner**: Execute, validate and finalize passes

pub mod config;
pub mod context;
pub mod graph;
pub mod root;
pub mod runner;

pub use config::{ZiCEvalConfig, ZiCEvalConfigBuilder};
pub use context::{ZiCCurrent, ZiCEvalContext, ZiCFrame};
pub use graph::ZiCRootGraph;
pub use root::{ZiCDesignRoot, ZiCExprSet, ZiCGeneratedRoot, ZiCRoot, ZiCRootRegistry, ZI_DESIGN_ROOT, ZI_GENERATED_ROOT};
pub use runner::{ZiCPass, ZiCRunSummary};
