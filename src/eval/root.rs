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

//! # Zid Roots
//!
//! A root groups definitions into ordered sets and names the roots it
//! depends on. The session holds the registered roots; the design and
//! generated roots are registered by default.

use log::warn;

use crate::errors::{Result, ZiError};
use crate::eval::graph::ZiCRootGraph;
use crate::expr::design::{ZiCDesign, ZiCExprRef};

/// One definition set of a root, in registration order.
pub type ZiCExprSet = Vec<ZiCExprRef>;

/// Name of the root holding the API and every declared type.
pub const ZI_DESIGN_ROOT: &str = "design";

/// Name of the root holding generated collection types.
pub const ZI_GENERATED_ROOT: &str = "generated";

/// An independently scheduled unit of definitions.
///
/// Sets are enumerated by index and re-read on every sweep, so a root whose
/// sets grow while the execute pass runs exposes the new work to the next
/// sweep.
pub trait ZiCRoot: Send + Sync {
    fn name(&self) -> &str;

    fn depends_on(&self) -> Vec<String> {
        Vec::new()
    }

    /// Definition set number `index`, `None` once the sets are exhausted.
    fn set(&self, index: usize, design: &ZiCDesign) -> Option<ZiCExprSet>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ZiCDesignRoot;

impl ZiCRoot for ZiCDesignRoot {
    fn name(&self) -> &str {
        ZI_DESIGN_ROOT
    }

    fn set(&self, index: usize, design: &ZiCDesign) -> Option<ZiCExprSet> {
        match index {
            0 => Some(design.api.iter().map(|_| ZiCExprRef::Api).collect()),
            1 => Some(design.types.iter().copied().map(ZiCExprRef::Type).collect()),
            2 => Some(design.result_types.iter().copied().map(ZiCExprRef::Type).collect()),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ZiCGeneratedRoot;

impl ZiCRoot for ZiCGeneratedRoot {
    fn name(&self) -> &str {
        ZI_GENERATED_ROOT
    }

    fn depends_on(&self) -> Vec<String> {
        vec![ZI_DESIGN_ROOT.to_string()]
    }

    fn set(&self, index: usize, design: &ZiCDesign) -> Option<ZiCExprSet> {
        match index {
            0 => Some(design.generated.iter().copied().map(ZiCExprRef::Type).collect()),
            _ => None,
        }
    }
}

/// Registered roots in registration order.
#[derive(Default)]
pub struct ZiCRootRegistry {
    roots: Vec<Box<dyn ZiCRoot>>,
}

impl std::fmt::Debug for ZiCRootRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.roots.iter().map(|r| r.name())).finish()
    }
}

impl ZiCRootRegistry {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self::default()
    }

    /// Registry holding the design and generated roots.
    #[allow(non_snake_case)]
    pub fn ZiFWithDefaults() -> Self {
        Self {
            roots: vec![Box::new(ZiCDesignRoot), Box::new(ZiCGeneratedRoot)],
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFRegister(&mut self, root: Box<dyn ZiCRoot>) -> Result<()> {
        if root.name().is_empty() {
            warn!("registering a root with an empty name");
        }
        if self.roots.iter().any(|r| r.name() == root.name()) {
            return Err(ZiError::configuration(format!(
                "root {:?} is already registered",
                root.name()
            )));
        }
        self.roots.push(root);
        Ok(())
    }

    #[allow(non_snake_case)]
    pub fn ZiFLen(&self) -> usize {
        self.roots.len()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsEmpty(&self) -> bool {
        self.roots.is_empty()
    }

    #[allow(non_snake_case)]
    pub fn ZiFNames(&self) -> Vec<String> {
        self.roots.iter().map(|r| r.name().to_string()).collect()
    }

    #[allow(non_snake_case)]
    pub fn ZiFGet(&self, name: &str) -> Option<&dyn ZiCRoot> {
        self.roots.iter().find(|r| r.name() == name).map(|r| r.as_ref())
    }

    #[allow(non_snake_case)]
    pub fn ZiFClear(&mut self) {
        self.roots.clear();
    }

    /// Root names in dependency order.
    #[allow(non_snake_case)]
    pub fn ZiFOrderedNames(&self) -> Result<Vec<String>> {
        let mut graph = ZiCRootGraph::ZiFNew();
        for root in &self.roots {
            graph.ZiFAddRoot(root.name(), root.depends_on())?;
        }
        graph.ZiFTopologicalSort()
    }

    /// Registered roots in dependency order.
    #[allow(non_snake_case)]
    pub fn ZiFOrdered(&self) -> Result<Vec<&dyn ZiCRoot>> {
        self.ZiFOrderedNames()?
            .iter()
            .map(|name| {
                self.ZiFGet(name)
                    .ok_or_else(|| ZiError::internal(format!("root {:?} vanished", name)))
            })
            .collect()
    }

    /// Set `index` of the root `name`.
    #[allow(non_snake_case)]
    pub fn ZiFSet(&self, name: &str, index: usize, design: &ZiCDesign) -> Option<ZiCExprSet> {
        self.ZiFGet(name).and_then(|root| root.set(index, design))
    }

    /// Walks every definition set of every root in dependency order.
    #[allow(non_snake_case)]
    pub fn ZiFWalkSets<F>(&self, design: &ZiCDesign, mut visit: F) -> Result<()>
    where
        F: FnMut(&str, &ZiCExprSet),
    {
        for root in self.ZiFOrdered()? {
            let mut index = 0;
            while let Some(set) = root.set(index, design) {
                visit(root.name(), &set);
                index += 1;
            }
        }
        Ok(())
    }
}
