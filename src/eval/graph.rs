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

//! # Zid Root Graph
//!
//! Dependency graph over root names. Produces the order roots are run in
//! and rejects unknown dependencies and cycles.

use std::collections::{BTreeSet, HashMap};

use crate::errors::{Result, ZiError};

/// Dependency graph over root names.
///
/// Roots keep their registration index so the topological order is stable:
/// among roots whose dependencies are satisfied, the earliest registered
/// comes first.
#[derive(Clone, Debug, Default)]
pub struct ZiCRootGraph {
    names: Vec<String>,
    dependencies: Vec<Vec<String>>,
    index: HashMap<String, usize>,
}

impl ZiCRootGraph {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self::default()
    }

    #[allow(non_snake_case)]
    pub fn ZiFAddRoot(&mut self, name: impl Into<String>, depends_on: Vec<String>) -> Result<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(ZiError::configuration(format!(
                "root {:?} is already registered",
                name
            )));
        }
        self.index.insert(name.clone(), self.names.len());
        self.names.push(name);
        self.dependencies.push(depends_on);
        Ok(())
    }

    #[allow(non_snake_case)]
    pub fn ZiFLen(&self) -> usize {
        self.names.len()
    }

    /// Root names ordered so every root follows the roots it depends on.
    #[allow(non_snake_case)]
    pub fn ZiFTopologicalSort(&self) -> Result<Vec<String>> {
        let mut pending: Vec<usize> = Vec::with_capacity(self.names.len());
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.names.len()];

        for (i, deps) in self.dependencies.iter().enumerate() {
            let mut count = 0;
            for dep in deps {
                let Some(&j) = self.index.get(dep) else {
                    return Err(ZiError::configuration(format!(
                        "root {:?} depends on unknown root {:?}",
                        self.names[i], dep
                    )));
                };
                if !dependents[j].contains(&i) {
                    dependents[j].push(i);
                    count += 1;
                }
            }
            pending.push(count);
        }

        let mut ready: BTreeSet<usize> = pending
            .iter()
            .enumerate()
            .filter(|(_, &count)| count == 0)
            .map(|(i, _)| i)
            .collect();

        let mut sorted: Vec<String> = Vec::with_capacity(self.names.len());

        while let Some(i) = ready.pop_first() {
            sorted.push(self.names[i].clone());
            for &j in &dependents[i] {
                pending[j] -= 1;
                if pending[j] == 0 {
                    ready.insert(j);
                }
            }
        }

        if sorted.len() != self.names.len() {
            let cycle_roots: Vec<&String> = self
                .names
                .iter()
                .filter(|name| !sorted.contains(name))
                .collect();
            return Err(ZiError::configuration(format!(
                "cycle detected involving roots: {:?}",
                cycle_roots
            )));
        }

        Ok(sorted)
    }

    #[allow(non_snake_case)]
    pub fn ZiFDetectCycles(&self) -> bool {
        self.ZiFTopologicalSort().is_err()
    }
}
