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


use std::sync::atomic::{AtomicBool, Ordering};

use zid::eval::{ZiCExprSet, ZI_DESIGN_ROOT, ZI_GENERATED_ROOT};
use zid::expr::{ZiCDSLFunc, ZiCPending};
use zid::{
    ZiCAttribute, ZiCDataType, ZiCDesign, ZiCEvalConfigBuilder, ZiCEvalContext, ZiCObject, ZiCPass,
    ZiCRoot, ZiError,
};

struct ZiCNamedRoot {
    name: String,
    deps: Vec<String>,
}

impl ZiCNamedRoot {
    fn boxed(name: &str, deps: &[&str]) -> Box<dyn ZiCRoot> {
        Box::new(ZiCNamedRoot {
            name: name.to_string(),
            deps: deps.iter().map(|d| d.to_string()).collect(),
        })
    }
}

impl ZiCRoot for ZiCNamedRoot {
    fn name(&self) -> &str {
        &self.name
    }

    fn depends_on(&self) -> Vec<String> {
        self.deps.clone()
    }

    fn set(&self, _index: usize, _design: &ZiCDesign) -> Option<ZiCExprSet> {
        None
    }
}

fn pending_object(body: fn(&mut ZiCEvalContext)) -> ZiCAttribute {
    let mut attribute = ZiCAttribute::ZiFNew(ZiCDataType::Object(ZiCObject::ZiFNew()));
    attribute.dsl = ZiCPending::Pending(ZiCDSLFunc::ZiFNew(body));
    attribute
}

fn spawn_type(ctx: &mut ZiCEvalContext) {
    let design = ctx.ZiFDesignMut();
    let name = format!("Spawned{}", design.types.len());
    let id = design.arena.ZiFAdd(name, pending_object(spawn_type), None);
    design.types.push(id);
}

fn spawn_generated(ctx: &mut ZiCEvalContext) {
    let design = ctx.ZiFDesignMut();
    let name = format!("Generated{}", design.generated.len());
    let id = design.arena.ZiFAdd(name, pending_object(spawn_design), None);
    design.generated.push(id);
}

fn spawn_design(ctx: &mut ZiCEvalContext) {
    let design = ctx.ZiFDesignMut();
    let name = format!("Design{}", design.types.len());
    let id = design.arena.ZiFAdd(name, pending_object(spawn_generated), None);
    design.types.push(id);
}

#[test]
fn test_dependencies_run_first_in_every_pass() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFRegisterRoot(ZiCNamedRoot::boxed("r1", &["r2"])).unwrap();
    ctx.ZiFRegisterRoot(ZiCNamedRoot::boxed("r2", &[])).unwrap();
    ctx.ZiFType("Bottle", |ctx| ctx.ZiFAttribute("name", zid::ZiCPrimitive::String));

    let summary = ctx.ZiFRun().unwrap();

    let r1 = summary.root_order.iter().position(|r| r == "r1").unwrap();
    let r2 = summary.root_order.iter().position(|r| r == "r2").unwrap();
    assert!(r2 < r1);
    for pass in [ZiCPass::Execute, ZiCPass::Validate, ZiCPass::Finalize] {
        assert!(summary.ZiFFirstVisit(pass, "r2").unwrap() < summary.ZiFFirstVisit(pass, "r1").unwrap());
    }
    assert!(
        summary.ZiFFirstVisit(ZiCPass::Execute, ZI_DESIGN_ROOT).unwrap()
            < summary.ZiFFirstVisit(ZiCPass::Execute, ZI_GENERATED_ROOT).unwrap()
    );
    assert_eq!(summary.executed, 1);
}

static CYCLE_BODY_RAN: AtomicBool = AtomicBool::new(false);

#[test]
fn test_root_cycle_rejected_before_any_pass() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFRegisterRoot(ZiCNamedRoot::boxed("r1", &["r2"])).unwrap();
    ctx.ZiFRegisterRoot(ZiCNamedRoot::boxed("r2", &["r1"])).unwrap();
    ctx.ZiFType("Bottle", |_| CYCLE_BODY_RAN.store(true, Ordering::SeqCst));

    let err = ctx.ZiFRun().unwrap_err();
    assert!(matches!(err, ZiError::Configuration { .. }));
    assert!(err.to_string().contains("cycle detected"));
    assert!(!CYCLE_BODY_RAN.load(Ordering::SeqCst));
}

#[test]
fn test_growing_set_is_bounded() {
    let config = ZiCEvalConfigBuilder::ZiFNew().ZiFMaxSetIterations(5).ZiFBuild();
    let mut ctx = ZiCEvalContext::ZiFWithConfig(config);
    ctx.ZiFType("Seed", spawn_type);

    match ctx.ZiFRun() {
        Err(ZiError::Configuration { message }) => {
            assert_eq!(message, "too many generated definitions, infinite loop?")
        }
        other => panic!("unexpected run result: {:?}", other),
    }
}

#[test]
fn test_endless_sweeps_are_bounded() {
    let config = ZiCEvalConfigBuilder::ZiFNew().ZiFMaxSweeps(4).ZiFBuild();
    let mut ctx = ZiCEvalContext::ZiFWithConfig(config);
    ctx.ZiFType("Seed", spawn_generated);

    match ctx.ZiFRun() {
        Err(ZiError::Configuration { message }) => {
            assert_eq!(message, "too many generated roots, infinite loop?")
        }
        other => panic!("unexpected run result: {:?}", other),
    }
}

#[test]
fn test_duplicate_root_name_rejected() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    let err = ctx.ZiFRegisterRoot(ZiCNamedRoot::boxed(ZI_DESIGN_ROOT, &[])).unwrap_err();
    assert!(matches!(err, ZiError::Configuration { .. }));
    assert_eq!(ctx.ZiFRoots().ZiFLen(), 2);
}

#[test]
fn test_tracing_can_be_disabled() {
    let config = ZiCEvalConfigBuilder::ZiFNew().ZiFTrace(false).ZiFBuild();
    let mut ctx = ZiCEvalContext::ZiFWithConfig(config);
    ctx.ZiFType("Bottle", |ctx| ctx.ZiFAttribute("name", zid::ZiCPrimitive::String));
    let summary = ctx.ZiFRun().unwrap();
    assert!(summary.trace.is_empty());
    assert_eq!(summary.root_order, vec![ZI_DESIGN_ROOT.to_string(), ZI_GENERATED_ROOT.to_string()]);
}
