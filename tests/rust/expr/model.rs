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


use serde_json::json;
use zid::{ZiCDataType, ZiCEvalContext, ZiCPrimitive, ZI_DEFAULT_VIEW};

fn object_fields(ctx: &ZiCEvalContext, name: &str) -> Vec<String> {
    let design = ctx.ZiFDesign();
    let id = design.ZiFUserType(name).or_else(|| design.ZiFResultType(name)).unwrap();
    let ty = design.arena.ZiFGet(id).unwrap().attribute.ty.clone().unwrap();
    ty.ZiFToObject().unwrap().ZiFNames()
}

#[test]
fn test_required_closure_follows_named_fields() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFType("Inner", |ctx| {
        ctx.ZiFAttribute("y", ZiCPrimitive::String);
        ctx.ZiFAttribute("z", ZiCPrimitive::String);
        ctx.ZiFRequired(["y"]);
    });
    ctx.ZiFType("Outer", |ctx| {
        ctx.ZiFAttribute("x", "Inner");
        ctx.ZiFAttribute("w", ZiCPrimitive::Int);
        ctx.ZiFRequired(["x"]);
    });
    ctx.ZiFRun().unwrap();

    let design = ctx.ZiFDesign();
    let outer = design.arena.ZiFGet(design.ZiFUserType("Outer").unwrap()).unwrap();
    assert_eq!(outer.attribute.ZiFRequired(&design.arena), vec!["x".to_string()]);
    assert_eq!(
        outer.attribute.ZiFAllRequired(&design.arena),
        vec!["x".to_string(), "y".to_string()]
    );
    assert!(outer.attribute.ZiFIsRequired("x", &design.arena));
    assert!(!outer.attribute.ZiFIsRequired("w", &design.arena));
}

#[test]
fn test_required_closure_terminates_on_cycles() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFType("Node", |ctx| {
        ctx.ZiFAttribute("id", ZiCPrimitive::String);
        ctx.ZiFAttribute("parent", "Node");
        ctx.ZiFRequired(["id", "parent"]);
    });
    ctx.ZiFRun().unwrap();

    let design = ctx.ZiFDesign();
    let node = design.arena.ZiFGet(design.ZiFUserType("Node").unwrap()).unwrap();
    assert_eq!(
        node.attribute.ZiFAllRequired(&design.arena),
        vec!["id".to_string(), "parent".to_string()]
    );
}

#[test]
fn test_validate_pass_collects_every_problem() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFType("Bottle", |ctx| {
        ctx.ZiFAttributeWith("vintage", ZiCPrimitive::Int, |ctx| {
            ctx.ZiFMinimum(2000);
            ctx.ZiFMaximum(1900);
        });
        ctx.ZiFRequired(["missing"]);
    });
    ctx.ZiFType("Winery", |ctx| {
        ctx.ZiFAttributeWith("country", ZiCPrimitive::String, |ctx| {
            ctx.ZiFEnum(["FR", "IT"]);
            ctx.ZiFDefault("US");
        });
    });

    let err = ctx.ZiFRun().unwrap_err();
    let messages = err.ZiFDslErrors().unwrap().ZiFMessages();
    assert!(messages.len() >= 3, "{:?}", messages);
    assert!(messages
        .iter()
        .any(|m| m.contains("minimum value 2000 is greater than maximum value 1900") && m.ends_with(r#"in type "Bottle""#)));
    assert!(messages
        .iter()
        .any(|m| m.contains(r#"required field "missing" does not exist"#)));
    assert!(messages
        .iter()
        .any(|m| m.contains(r#"default value "US" is not one of the accepted values"#) && m.ends_with(r#"in type "Winery""#)));
}

#[test]
fn test_default_view_lists_every_field() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFResultType("application/vnd.bottle", |ctx| {
        ctx.ZiFAttributes(|ctx| {
            ctx.ZiFAttribute("name", ZiCPrimitive::String);
            ctx.ZiFAttribute("vintage", ZiCPrimitive::Int);
        });
        ctx.ZiFViewWith("tiny", |ctx| ctx.ZiFAttributeName("name"));
    });
    ctx.ZiFRun().unwrap();

    let design = ctx.ZiFDesign();
    let bottle = design.arena.ZiFGet(design.ZiFResultType("application/vnd.bottle").unwrap()).unwrap();
    let views: Vec<&str> = bottle.ZiFViews().iter().map(|v| v.name.as_str()).collect();
    assert_eq!(views, vec![ZI_DEFAULT_VIEW, "tiny"]);
    assert_eq!(
        bottle.ZiFView(ZI_DEFAULT_VIEW).unwrap().ZiFFieldNames(),
        vec!["name".to_string(), "vintage".to_string()]
    );
    let tiny = bottle.ZiFView("tiny").unwrap();
    let name = tiny.attribute.ty.as_ref().and_then(ZiCDataType::ZiFToObject).unwrap().ZiFGet("name").unwrap();
    assert_eq!(name.ty, Some(ZiCDataType::Primitive(ZiCPrimitive::String)));
}

#[test]
fn test_extend_and_reference_at_finalize() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFType("Payload", |ctx| {
        ctx.ZiFReference("Bottle");
        ctx.ZiFExtend("Stamped");
        ctx.ZiFAttributeName("name");
    });
    ctx.ZiFType("Bottle", |ctx| {
        ctx.ZiFAttributeWith("name", ZiCPrimitive::String, |ctx| ctx.ZiFMinLength(2));
        ctx.ZiFAttribute("vintage", ZiCPrimitive::Int);
    });
    ctx.ZiFType("Stamped", |ctx| ctx.ZiFAttribute("created_at", ZiCPrimitive::String));
    ctx.ZiFRun().unwrap();

    assert_eq!(object_fields(&ctx, "Payload"), vec!["name".to_string(), "created_at".to_string()]);
    let design = ctx.ZiFDesign();
    let payload = design.arena.ZiFGet(design.ZiFUserType("Payload").unwrap()).unwrap();
    let name = payload.attribute.ZiFFind("name", &design.arena).unwrap();
    assert_eq!(name.validation.as_ref().and_then(|v| v.min_length), Some(2));
}

#[test]
fn test_reference_must_be_declared_before_use() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFType("Payload", |ctx| {
        ctx.ZiFAttribute("bottle", "Bottle");
        ctx.ZiFAttribute("cork", "Cork");
    });
    ctx.ZiFType("Bottle", |ctx| ctx.ZiFAttribute("name", ZiCPrimitive::String));

    let err = ctx.ZiFRun().unwrap_err();
    assert_eq!(
        err.ZiFDslErrors().unwrap().ZiFMessages(),
        vec![r#"unknown type "Cork" for attribute "cork" in type "Payload""#.to_string()]
    );
}

#[test]
fn test_reference_declared_later_supplies_field_types() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFType("Payload", |ctx| {
        ctx.ZiFReference("Bottle");
        ctx.ZiFExtend("Stamped");
        ctx.ZiFAttributeName("vintage");
        ctx.ZiFAttributeName("note");
    });
    ctx.ZiFType("Bottle", |ctx| {
        ctx.ZiFAttributeWith("vintage", ZiCPrimitive::Int, |ctx| ctx.ZiFMinimum(1900));
    });
    ctx.ZiFType("Stamped", |ctx| ctx.ZiFAttribute("revision", ZiCPrimitive::Int));
    ctx.ZiFRun().unwrap();

    assert_eq!(
        object_fields(&ctx, "Payload"),
        vec!["vintage".to_string(), "note".to_string(), "revision".to_string()]
    );
    let design = ctx.ZiFDesign();
    let payload = design.arena.ZiFGet(design.ZiFUserType("Payload").unwrap()).unwrap();
    let object = payload.attribute.ty.as_ref().and_then(ZiCDataType::ZiFToObject).unwrap();

    let vintage = object.ZiFGet("vintage").unwrap();
    assert_eq!(vintage.ty, Some(ZiCDataType::Primitive(ZiCPrimitive::Int)));
    assert_eq!(vintage.validation.as_ref().and_then(|v| v.minimum), Some(1900.0));
    let note = object.ZiFGet("note").unwrap();
    assert_eq!(note.ty, Some(ZiCDataType::Primitive(ZiCPrimitive::String)));
    let revision = object.ZiFGet("revision").unwrap();
    assert_eq!(revision.ty, Some(ZiCDataType::Primitive(ZiCPrimitive::Int)));

    assert!(ctx
        .ZiFValidateValue("Payload", &json!({"vintage": 1990, "note": "dry", "revision": 2}))
        .unwrap()
        .is_empty());
    assert!(!ctx
        .ZiFValidateValue("Payload", &json!({"vintage": "old"}))
        .unwrap()
        .is_empty());
}
