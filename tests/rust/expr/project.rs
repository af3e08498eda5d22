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


use std::collections::HashMap;

use proptest::prelude::*;
use zid::{ZiCDataType, ZiCEvalContext, ZiCPrimitive, ZiCTypeId, ZiError, ZI_DEFAULT_VIEW};

const BOTTLE: &str = "application/vnd.bottle";
const ORIGIN: &str = "application/vnd.origin";

fn cellar() -> (ZiCEvalContext, ZiCTypeId, ZiCTypeId) {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFResultType(ORIGIN, |ctx| {
        ctx.ZiFAttributes(|ctx| {
            ctx.ZiFAttribute("country", ZiCPrimitive::String);
            ctx.ZiFAttribute("region", ZiCPrimitive::String);
        });
        ctx.ZiFViewWith("tiny", |ctx| ctx.ZiFAttributeName("country"));
    });
    ctx.ZiFResultType(BOTTLE, |ctx| {
        ctx.ZiFDescription("A bottle of wine");
        ctx.ZiFAttributes(|ctx| {
            ctx.ZiFAttribute("name", ZiCPrimitive::String);
            ctx.ZiFAttribute("vintage", ZiCPrimitive::Int);
            ctx.ZiFAttribute("origin", ORIGIN);
            ctx.ZiFRequired(["name", "vintage"]);
        });
        ctx.ZiFViewWith(ZI_DEFAULT_VIEW, |ctx| {
            ctx.ZiFAttributeName("name");
            ctx.ZiFAttributeName("origin");
        });
        ctx.ZiFViewWith("extended", |ctx| {
            ctx.ZiFAttributeName("name");
            ctx.ZiFAttributeName("vintage");
            ctx.ZiFAttributeNameWith("origin", |ctx| ctx.ZiFView("tiny"));
        });
    });
    let collection = ctx.ZiFCollectionOf(BOTTLE).ZiFNamedId().unwrap();
    ctx.ZiFRun().unwrap();
    let bottle = ctx.ZiFDesign().ZiFResultType(BOTTLE).unwrap();
    (ctx, bottle, collection)
}

fn fields(ctx: &ZiCEvalContext, id: ZiCTypeId) -> Vec<String> {
    let t = ctx.ZiFDesign().arena.ZiFGet(id).unwrap();
    t.attribute.ty.as_ref().and_then(ZiCDataType::ZiFToObject).unwrap().ZiFNames()
}

fn field_target(ctx: &ZiCEvalContext, id: ZiCTypeId, field: &str) -> ZiCTypeId {
    let t = ctx.ZiFDesign().arena.ZiFGet(id).unwrap();
    t.attribute
        .ty
        .as_ref()
        .and_then(ZiCDataType::ZiFToObject)
        .and_then(|obj| obj.ZiFGet(field))
        .and_then(|attr| attr.ty.as_ref())
        .and_then(ZiCDataType::ZiFNamedId)
        .unwrap()
}

#[test]
fn test_project_extended_view() {
    let (mut ctx, bottle, _) = cellar();
    let extended = ctx.ZiFDesignMut().ZiFProject(bottle, "extended").unwrap();

    assert_eq!(fields(&ctx, extended), vec!["name", "vintage", "origin"]);
    let projected = ctx.ZiFDesign().arena.ZiFGet(extended).unwrap();
    assert_eq!(projected.name, "BottleExtended");
    assert_eq!(projected.ZiFIdentifier(), Some("application/vnd.bottle; view=extended"));
    assert_eq!(projected.attribute.description.as_deref(), Some("A bottle of wine (extended view)"));
    assert_eq!(
        projected.attribute.validation.as_ref().unwrap().required,
        vec!["name", "vintage"]
    );
    let views: Vec<&str> = projected.ZiFViews().iter().map(|v| v.name.as_str()).collect();
    assert_eq!(views, vec![ZI_DEFAULT_VIEW]);

    let origin = field_target(&ctx, extended, "origin");
    assert_eq!(fields(&ctx, origin), vec!["country"]);
    assert_eq!(ctx.ZiFDesign().arena.ZiFGet(origin).unwrap().name, "OriginTiny");
}

#[test]
fn test_project_default_view() {
    let (mut ctx, bottle, _) = cellar();
    let default = ctx.ZiFDesignMut().ZiFProject(bottle, ZI_DEFAULT_VIEW).unwrap();

    assert_eq!(fields(&ctx, default), vec!["name", "origin"]);
    let projected = ctx.ZiFDesign().arena.ZiFGet(default).unwrap();
    assert_eq!(projected.name, "Bottle");
    assert_eq!(projected.attribute.validation.as_ref().unwrap().required, vec!["name"]);

    let origin = field_target(&ctx, default, "origin");
    assert_eq!(fields(&ctx, origin), vec!["country", "region"]);
}

#[test]
fn test_project_collection() {
    let (mut ctx, _, collection) = cellar();
    let coll = ctx.ZiFDesign().arena.ZiFGet(collection).unwrap();
    assert_eq!(coll.name, "BottleCollection");
    let views: Vec<&str> = coll.ZiFViews().iter().map(|v| v.name.as_str()).collect();
    assert_eq!(views, vec![ZI_DEFAULT_VIEW, "extended"]);

    let projected = ctx.ZiFDesignMut().ZiFProject(collection, "extended").unwrap();
    let projected = ctx.ZiFDesign().arena.ZiFGet(projected).unwrap();
    assert_eq!(projected.name, "BottleExtendedCollection");
    let elem = projected
        .attribute
        .ty
        .as_ref()
        .and_then(ZiCDataType::ZiFToArray)
        .and_then(|arr| arr.elem.ty.as_ref())
        .and_then(ZiCDataType::ZiFNamedId)
        .unwrap();
    assert_eq!(fields(&ctx, elem), vec!["name", "vintage", "origin"]);
}

#[test]
fn test_project_scenario_bottle_origin() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFResultType(ORIGIN, |ctx| {
        ctx.ZiFAttributes(|ctx| {
            ctx.ZiFAttribute("country", ZiCPrimitive::String);
        });
    });
    ctx.ZiFResultType(BOTTLE, |ctx| {
        ctx.ZiFAttributes(|ctx| {
            ctx.ZiFAttribute("id", ZiCPrimitive::Int);
            ctx.ZiFAttribute("name", ZiCPrimitive::String);
            ctx.ZiFAttribute("origin", ORIGIN);
        });
        ctx.ZiFViewWith(ZI_DEFAULT_VIEW, |ctx| {
            ctx.ZiFAttributeName("id");
            ctx.ZiFAttributeName("name");
        });
        ctx.ZiFViewWith("extended", |ctx| {
            ctx.ZiFAttributeName("id");
            ctx.ZiFAttributeName("name");
            ctx.ZiFAttributeName("origin");
        });
    });
    ctx.ZiFRun().unwrap();
    let bottle = ctx.ZiFDesign().ZiFResultType(BOTTLE).unwrap();

    let default = ctx.ZiFDesignMut().ZiFProject(bottle, ZI_DEFAULT_VIEW).unwrap();
    assert_eq!(fields(&ctx, default), vec!["id", "name"]);

    let extended = ctx.ZiFDesignMut().ZiFProject(bottle, "extended").unwrap();
    assert_eq!(fields(&ctx, extended), vec!["id", "name", "origin"]);
    let origin = field_target(&ctx, extended, "origin");
    assert_eq!(ctx.ZiFDesign().arena.ZiFGet(origin).unwrap().name, "Origin");
    assert_eq!(fields(&ctx, origin), vec!["country"]);
}

#[test]
fn test_failed_projection_is_not_memoized() {
    let (mut ctx, bottle, _) = cellar();
    {
        let design = ctx.ZiFDesignMut();
        let rt = design.arena.ZiFGetMut(bottle).unwrap();
        let extended = rt
            .result
            .as_mut()
            .unwrap()
            .views
            .iter_mut()
            .find(|v| v.name == "extended")
            .unwrap();
        let fields = extended.attribute.ty.as_mut().and_then(ZiCDataType::ZiFToObjectMut).unwrap();
        fields.ZiFGetMut("origin").unwrap().meta.ZiFSet("view", "nope");
    }
    let before = ctx.ZiFDesign().arena.ZiFLen();

    for _ in 0..2 {
        match ctx.ZiFDesignMut().ZiFProject(bottle, "extended") {
            Err(ZiError::Validation { message }) => assert!(
                message.starts_with(r#"view "nope" on field "origin" cannot be computed"#),
                "unexpected message: {}",
                message
            ),
            other => panic!("unexpected projection: {:?}", other),
        }
        assert_eq!(ctx.ZiFDesign().arena.ZiFLen(), before);
    }

    let default = ctx.ZiFDesignMut().ZiFProject(bottle, ZI_DEFAULT_VIEW).unwrap();
    assert_eq!(fields(&ctx, default), vec!["name", "origin"]);
}

#[test]
fn test_project_unknown_view() {
    let (mut ctx, bottle, _) = cellar();
    let before = ctx.ZiFDesign().arena.ZiFLen();
    match ctx.ZiFDesignMut().ZiFProject(bottle, "missing") {
        Err(ZiError::Validation { message }) => assert_eq!(message, r#"unknown view "missing""#),
        other => panic!("unexpected projection: {:?}", other),
    }
    assert_eq!(ctx.ZiFDesign().arena.ZiFLen(), before);
}

proptest! {
    #[test]
    fn prop_projection_is_memoized(views in proptest::collection::vec(prop_oneof![Just(ZI_DEFAULT_VIEW), Just("extended")], 1..8)) {
        let (mut ctx, bottle, _) = cellar();
        let mut seen: HashMap<&str, ZiCTypeId> = HashMap::new();
        for view in views {
            let id = ctx.ZiFDesignMut().ZiFProject(bottle, view).unwrap();
            if let Some(previous) = seen.get(view) {
                prop_assert_eq!(*previous, id);
            }
            seen.insert(view, id);
            prop_assert_eq!(ctx.ZiFDesignMut().ZiFProject(id, view).unwrap(), id);
        }
    }
}
