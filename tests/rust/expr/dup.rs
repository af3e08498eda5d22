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


use zid::expr::ZiCValidation;
use zid::{ZiCAttribute, ZiCDataType, ZiCEvalContext, ZiCObject, ZiCPrimitive, ZiCTypeArena, ZiError};

fn field_type(arena: &ZiCTypeArena, ty: &ZiCDataType, field: &str) -> ZiCDataType {
    arena
        .ZiFAsObject(ty)
        .and_then(|obj| obj.ZiFGet(field))
        .and_then(|attr| attr.ty.clone())
        .unwrap()
}

#[test]
fn test_dup_keeps_cycle_topology() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    let a = ctx.ZiFType("A", |ctx| {
        ctx.ZiFAttribute("name", ZiCPrimitive::String);
        ctx.ZiFAttribute("b", "B");
    });
    ctx.ZiFType("B", |ctx| ctx.ZiFAttribute("a", "A"));
    ctx.ZiFRun().unwrap();
    let before = ctx.ZiFDesign().arena.ZiFLen();

    let copy = ctx.ZiFDesignMut().ZiFDuplicate(&a).unwrap();

    let arena = &ctx.ZiFDesign().arena;
    assert_eq!(arena.ZiFLen(), before + 2);
    assert_ne!(copy, a);
    let b_copy = field_type(arena, &copy, "b");
    assert_ne!(b_copy, field_type(arena, &a, "b"));
    assert_eq!(field_type(arena, &b_copy, "a"), copy);
    assert_eq!(arena.ZiFTypeName(&copy), "A");
    assert_eq!(field_type(arena, &copy, "name"), ZiCDataType::Primitive(ZiCPrimitive::String));
}

#[test]
fn test_dup_is_independent_of_the_original() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    let bottle = ctx.ZiFType("Bottle", |ctx| {
        ctx.ZiFAttributeWith("name", ZiCPrimitive::String, |ctx| ctx.ZiFMinLength(1));
    });
    ctx.ZiFRun().unwrap();

    let copy = ctx.ZiFDesignMut().ZiFDuplicate(&bottle).unwrap();
    let id = copy.ZiFNamedId().unwrap();
    let design = ctx.ZiFDesignMut();
    if let Some(obj) = design
        .arena
        .ZiFGetMut(id)
        .and_then(|t| t.attribute.ty.as_mut())
        .and_then(ZiCDataType::ZiFToObjectMut)
    {
        obj.ZiFSet("vintage", ZiCAttribute::ZiFNew(ZiCPrimitive::Int));
    }

    let arena = &ctx.ZiFDesign().arena;
    assert_eq!(arena.ZiFAsObject(&bottle).unwrap().ZiFLen(), 1);
    assert_eq!(arena.ZiFAsObject(&copy).unwrap().ZiFLen(), 2);
    assert_eq!(ctx.ZiFDesign().ZiFUserType("Bottle"), bottle.ZiFNamedId());
}

#[test]
fn test_merge_overwrites_and_unions_required() {
    let arena = ZiCTypeArena::ZiFNew();
    let mut own = ZiCObject::ZiFNew();
    own.ZiFSet("name", ZiCAttribute::ZiFNew(ZiCPrimitive::String));
    own.ZiFSet("size", ZiCAttribute::ZiFNew(ZiCPrimitive::String));
    let mut target = ZiCAttribute::ZiFNew(own);
    target.ZiFValidationMut().ZiFAddRequired(["name"]);

    let mut theirs = ZiCObject::ZiFNew();
    theirs.ZiFSet("size", ZiCAttribute::ZiFNew(ZiCPrimitive::Int));
    theirs.ZiFSet("color", ZiCAttribute::ZiFNew(ZiCPrimitive::String));
    let mut validation = ZiCValidation::ZiFNew();
    validation.ZiFAddRequired(["name", "size"]);
    let source = ZiCAttribute::ZiFNew(theirs).ZiFWithValidation(validation);

    target.ZiFMerge(&source, &arena).unwrap();

    let merged = target.ty.as_ref().and_then(ZiCDataType::ZiFToObject).unwrap();
    assert_eq!(merged.ZiFNames(), vec!["name", "size", "color"]);
    assert_eq!(
        merged.ZiFGet("size").unwrap().ty,
        Some(ZiCDataType::Primitive(ZiCPrimitive::Int))
    );
    assert_eq!(target.validation.unwrap().required, vec!["name", "size"]);
}

#[test]
fn test_merge_rejects_non_objects() {
    let arena = ZiCTypeArena::ZiFNew();
    let mut target = ZiCAttribute::ZiFNew(ZiCObject::ZiFNew());
    let source = ZiCAttribute::ZiFNew(ZiCPrimitive::String);
    assert!(matches!(target.ZiFMerge(&source, &arena), Err(ZiError::Invariant(_))));
}

#[test]
fn test_inherit_only_fills_unset_declarations() {
    let arena = ZiCTypeArena::ZiFNew();
    let mut parent_fields = ZiCObject::ZiFNew();
    parent_fields.ZiFSet(
        "name",
        ZiCAttribute::ZiFNew(ZiCPrimitive::String).ZiFWithDescription("bottle name"),
    );
    parent_fields.ZiFSet("vintage", ZiCAttribute::ZiFNew(ZiCPrimitive::Int));
    let parent = ZiCAttribute::ZiFNew(parent_fields);

    let mut child_fields = ZiCObject::ZiFNew();
    child_fields.ZiFSet("name", ZiCAttribute::default());
    child_fields.ZiFSet(
        "vintage",
        ZiCAttribute::ZiFNew(ZiCPrimitive::String).ZiFWithDescription("year"),
    );
    let mut child = ZiCAttribute::ZiFNew(child_fields);

    child.ZiFInherit(&parent, &arena);

    let fields = child.ty.as_ref().and_then(ZiCDataType::ZiFToObject).unwrap();
    let name = fields.ZiFGet("name").unwrap();
    assert_eq!(name.ty, Some(ZiCDataType::Primitive(ZiCPrimitive::String)));
    assert_eq!(name.description.as_deref(), Some("bottle name"));
    let vintage = fields.ZiFGet("vintage").unwrap();
    assert_eq!(vintage.ty, Some(ZiCDataType::Primitive(ZiCPrimitive::String)));
    assert_eq!(vintage.description.as_deref(), Some("year"));
    assert_eq!(fields.ZiFLen(), 2);
}
