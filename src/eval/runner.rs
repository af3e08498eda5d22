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


//! # Pass Scheduler
//!
//! [`ZiCEvalContext::ZiFRun`] drives every registered root through the
//! execute, validate and finalize passes in dependency order.
//!
//! The execute pass sweeps all roots until a sweep finds no pending body.
//! Within a root each definition set is re-read after its pending bodies ran,
//! so definitions appended to the same set run right after the current batch.
//! Both loops are bounded by [`ZiCEvalConfig`](crate::eval::config::ZiCEvalConfig).

use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};
use crate::eval::context::{ZiCEvalContext, ZiCFrame};
use crate::expr::design::ZiCExprRef;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZiCPass {
    Execute,
    Validate,
    Finalize,
}

impl fmt::Display for ZiCPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ZiCPass::Execute => "execute",
            ZiCPass::Validate => "validate",
            ZiCPass::Finalize => "finalize",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of a successful run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiCRunSummary {
    pub root_order: Vec<String>,
    pub sweeps: usize,
    pub executed: usize,
    pub validated: usize,
    pub finalized: usize,
    /// `(pass, root)` visits in order. Empty when tracing is disabled.
    pub trace: Vec<(ZiCPass, String)>,
}

impl ZiCRunSummary {
    /// Position of the first visit of `root` during `pass`.
    #[allow(non_snake_case)]
    pub fn ZiFFirstVisit(&self, pass: ZiCPass, root: &str) -> Option<usize> {
        self.trace.iter().position(|(p, r)| *p == pass && r == root)
    }
}

impl ZiCEvalContext {
    /// Runs the execute, validate and finalize passes.
    ///
    /// Root cycles and runaway execution fail with a configuration error
    /// before any model is produced. Recorded DSL errors stop the run before
    /// validation, and validation errors stop it before finalization; both
    /// come back together as [`ZiError::Dsl`].
    #[allow(non_snake_case)]
    pub fn ZiFRun(&mut self) -> Result<ZiCRunSummary> {
        let order = self.roots.ZiFOrderedNames()?;
        info!(
            "zid run: roots {:?}, {} types, {} result types",
            order,
            self.design.types.len(),
            self.design.result_types.len()
        );

        let mut summary = ZiCRunSummary {
            root_order: order.clone(),
            ..ZiCRunSummary::default()
        };

        self.execute_pass(&order, &mut summary)?;
        if !self.errors.ZiFIsEmpty() {
            info!("zid run: {} errors after execute pass", self.errors.ZiFLen());
            return Err(ZiError::Dsl(self.errors.clone()));
        }

        self.validate_pass(&order, &mut summary);
        if !self.errors.ZiFIsEmpty() {
            info!("zid run: {} errors after validate pass", self.errors.ZiFLen());
            return Err(ZiError::Dsl(self.errors.clone()));
        }

        self.finalize_pass(&order, &mut summary)?;

        info!(
            "zid run done: {} executed in {} sweeps, {} validated, {} finalized",
            summary.executed, summary.sweeps, summary.validated, summary.finalized
        );
        Ok(summary)
    }

    fn trace(&self, summary: &mut ZiCRunSummary, pass: ZiCPass, root: &str) {
        debug!("{} pass: root {:?}", pass, root);
        if self.config.trace {
            summary.trace.push((pass, root.to_string()));
        }
    }

    fn execute_pass(&mut self, order: &[String], summary: &mut ZiCRunSummary) -> Result<()> {
        let mut sweeps = 0;
        loop {
            sweeps += 1;
            if sweeps > self.config.max_sweeps {
                return Err(ZiError::configuration(
                    "too many generated roots, infinite loop?",
                ));
            }
            debug!("execute pass: sweep {}", sweeps);
            let mut executed = 0;
            for name in order {
                self.trace(summary, ZiCPass::Execute, name);
                executed += self.execute_root(name)?;
            }
            summary.executed += executed;
            if executed == 0 {
                break;
            }
        }
        summary.sweeps = sweeps;
        Ok(())
    }

    fn execute_root(&mut self, name: &str) -> Result<usize> {
        let mut executed = 0;
        let mut index = 0;
        while let Some(mut set) = self.roots.ZiFSet(name, index, &self.design) {
            let mut iterations = 0;
            loop {
                let pending: Vec<ZiCExprRef> = set
                    .iter()
                    .copied()
                    .filter(|expr| self.design.ZiFIsPending(*expr))
                    .collect();
                if pending.is_empty() {
                    break;
                }
                iterations += 1;
                if iterations > self.config.max_set_iterations {
                    return Err(ZiError::configuration(
                        "too many generated definitions, infinite loop?",
                    ));
                }
                for expr in pending {
                    if self.execute_expr(expr)? {
                        executed += 1;
                    }
                }
                match self.roots.ZiFSet(name, index, &self.design) {
                    Some(next) => set = next,
                    None => break,
                }
            }
            index += 1;
        }
        Ok(executed)
    }

    /// Runs the deferred body of `expr`, if it still has one.
    fn execute_expr(&mut self, expr: ZiCExprRef) -> Result<bool> {
        let (body, frame) = match expr {
            ZiCExprRef::Api => match self.design.api.as_mut() {
                Some(api) => (api.dsl.ZiFTake(), ZiCFrame::Api),
                None => return Ok(false),
            },
            ZiCExprRef::Type(id) => {
                let named = self.design.arena.ZiFExpectMut(id)?;
                let frame = if named.ZiFIsResult() {
                    ZiCFrame::ResultType(id)
                } else {
                    ZiCFrame::UserType(id)
                };
                (named.attribute.dsl.ZiFTake(), frame)
            }
        };
        let Some(body) = body else {
            return Ok(false);
        };
        debug!("executing {}", self.design.ZiFEvalName(expr));
        self.ZiFExecute(|ctx| body.ZiFCall(ctx), frame);
        Ok(true)
    }

    fn validate_pass(&mut self, order: &[String], summary: &mut ZiCRunSummary) {
        for name in order {
            self.trace(summary, ZiCPass::Validate, name);
            let mut index = 0;
            while let Some(set) = self.roots.ZiFSet(name, index, &self.design) {
                for expr in set {
                    let errors = self.design.ZiFValidateExpr(expr);
                    summary.validated += 1;
                    self.record_validation(errors);
                }
                index += 1;
            }
        }
    }

    fn finalize_pass(&mut self, order: &[String], summary: &mut ZiCRunSummary) -> Result<()> {
        for name in order {
            self.trace(summary, ZiCPass::Finalize, name);
            let mut index = 0;
            while let Some(set) = self.roots.ZiFSet(name, index, &self.design) {
                for expr in set {
                    self.design.ZiFFinalizeExpr(expr)?;
                    summary.finalized += 1;
                }
                index += 1;
            }
        }
        Ok(())
    }
}
