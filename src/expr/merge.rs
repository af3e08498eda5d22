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

//! # Zid Merge and Inherit
//!
//! Field-level composition of object attributes:
//!
//! - **Merge** copies every field of another object in, overwriting fields
//!   of the same name. Used for `Extend` bases.
//! - **Inherit** copies declarations (description, validation, default,
//!   view, type) from a parent onto the fields both objects share, only
//!   where the child left them unset. Used for `Reference` types.
//!
//! Both operate on inline objects of the receiving attribute only. Named
//! types finalize themselves as separate definitions.

use crate::errors::{Result, ZiError};
use crate::expr::attribute::ZiCAttribute;
use crate::expr::result_type::ZI_VIEW_META_KEY;
use crate::expr::types::{ZiCDataType, ZiCObject, ZiCPrimitive};
use crate::expr::user_type::ZiCTypeArena;

impl ZiCAttribute {
    /// Merges the fields and validation of `other` into this attribute.
    /// Both must be objects; anything else is a core bug.
    #[allow(non_snake_case)]
    pub fn ZiFMerge(&mut self, other: &ZiCAttribute, arena: &ZiCTypeArena) -> Result<()> {
        let source = other
            .ty
            .as_ref()
            .and_then(|t| arena.ZiFAsObject(t))
            .ok_or_else(|| ZiError::invariant("cannot merge non object attributes"))?;
        let target = self
            .ty
            .as_mut()
            .and_then(ZiCDataType::ZiFToObjectMut)
            .ok_or_else(|| ZiError::invariant("cannot merge non object attributes"))?;
        for (name, attr) in source.ZiFIter() {
            target.ZiFSet(name, attr.clone());
        }
        if let Some(theirs) = &other.validation {
            match self.validation.as_mut() {
                Some(own) => own.ZiFMerge(theirs),
                None => self.validation = Some(theirs.clone()),
            }
        }
        Ok(())
    }

    /// Inherits declarations of `parent` onto the fields shared by both
    /// objects. No-op unless both attributes are objects.
    #[allow(non_snake_case)]
    pub fn ZiFInherit(&mut self, parent: &ZiCAttribute, arena: &ZiCTypeArena) {
        if !self.should_inherit(parent, arena) {
            return;
        }
        if let Some(theirs) = &parent.validation {
            self.ZiFValidationMut().ZiFAddRequired(theirs.required.iter());
        }
        self.inherit_fields(parent, arena);
    }

    fn should_inherit(&self, parent: &ZiCAttribute, arena: &ZiCTypeArena) -> bool {
        let own = self.ty.as_ref().map(ZiCDataType::ZiFIsObject).unwrap_or(false);
        let theirs = parent
            .ty
            .as_ref()
            .map(|t| arena.ZiFIsObject(t))
            .unwrap_or(false);
        own && theirs
    }

    fn inherit_fields(&mut self, parent: &ZiCAttribute, arena: &ZiCTypeArena) {
        let Some(source) = parent.ty.as_ref().and_then(|t| arena.ZiFAsObject(t)) else {
            return;
        };
        let Some(target) = self.ty.as_mut().and_then(ZiCDataType::ZiFToObjectMut) else {
            return;
        };
        for (name, field) in target.ZiFIterMut() {
            let Some(theirs) = source.ZiFGet(name) else {
                continue;
            };
            if field.ty.is_none() {
                field.ty = theirs.ty.clone();
            }
            if field.description.is_none() {
                field.description = theirs.description.clone();
            }
            if let Some(parent_validation) = &theirs.validation {
                match field.validation.as_mut() {
                    Some(own) => own.ZiFInheritFrom(parent_validation),
                    None => field.validation = Some(parent_validation.clone()),
                }
            }
            if field.default_value.is_none() {
                field.default_value = theirs.default_value.clone();
            }
            if field.meta.ZiFGet(ZI_VIEW_META_KEY).is_none() {
                if let Some(view) = theirs.meta.ZiFGet(ZI_VIEW_META_KEY) {
                    field.meta.ZiFAdd(ZI_VIEW_META_KEY, view.iter().cloned());
                }
            }
            // The child's inline tree is finite, which bounds the recursion.
            if field.should_inherit(theirs, arena) {
                field.inherit_fields(theirs, arena);
            }
        }
    }

    /// Applies references and bases to this attribute and every attribute
    /// it owns inline.
    #[allow(non_snake_case)]
    pub fn ZiFFinalizeInline(&mut self, arena: &ZiCTypeArena) -> Result<()> {
        let references = self.references.clone();
        for reference in &references {
            if let Some(parent) = reference_attribute(reference, arena) {
                self.ZiFInherit(&parent, arena);
            }
        }
        if !references.is_empty() {
            if let Some(obj) = self.ty.as_mut().and_then(ZiCDataType::ZiFToObjectMut) {
                for (_, field) in obj.ZiFIterMut() {
                    if field.ty.is_none() {
                        field.ty = Some(ZiCDataType::Primitive(ZiCPrimitive::String));
                    }
                }
            }
        }
        let bases = self.bases.clone();
        if !bases.is_empty() && self.ty.is_none() {
            self.ty = Some(ZiCDataType::Object(ZiCObject::ZiFNew()));
        }
        for base in &bases {
            if let Some(source) = reference_attribute(base, arena) {
                self.ZiFMerge(&source, arena)?;
            }
        }

        match self.ty.as_mut() {
            Some(ZiCDataType::Object(obj)) => {
                for (_, field) in obj.ZiFIterMut() {
                    field.ZiFFinalizeInline(arena)?;
                }
            }
            Some(ZiCDataType::Array(arr)) => arr.elem.ZiFFinalizeInline(arena)?,
            Some(ZiCDataType::Map(map)) => {
                map.key.ZiFFinalizeInline(arena)?;
                map.elem.ZiFFinalizeInline(arena)?;
            }
            _ => {}
        }
        Ok(())
    }
}

fn reference_attribute(ty: &ZiCDataType, arena: &ZiCTypeArena) -> Option<ZiCAttribute> {
    match ty {
        ZiCDataType::UserType(id) | ZiCDataType::ResultType(id) => {
            arena.ZiFGet(*id).map(|t| t.attribute.clone())
        }
        other => Some(ZiCAttribute::ZiFNew(other.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(fields: Vec<(&str, ZiCAttribute)>) -> ZiCAttribute {
        let mut obj = ZiCObject::ZiFNew();
        for (name, attr) in fields {
            obj.ZiFSet(name, attr);
        }
        ZiCAttribute::ZiFNew(obj)
    }

    #[test]
    fn test_merge_overwrites_and_adds_fields() {
        let arena = ZiCTypeArena::ZiFNew();
        let mut target = object(vec![
            ("a", ZiCAttribute::ZiFNew(ZiCPrimitive::String)),
            ("b", ZiCAttribute::ZiFNew(ZiCPrimitive::String)),
        ]);
        let other = object(vec![
            ("b", ZiCAttribute::ZiFNew(ZiCPrimitive::Int)),
            ("c", ZiCAttribute::ZiFNew(ZiCPrimitive::Boolean)),
        ]);
        target.ZiFMerge(&other, &arena).unwrap();

        let obj = target.ty.as_ref().and_then(|t| t.ZiFToObject()).unwrap();
        assert_eq!(obj.ZiFNames(), vec!["a", "b", "c"]);
        assert_eq!(
            obj.ZiFGet("b").and_then(|b| b.ty.clone()),
            Some(ZiCDataType::Primitive(ZiCPrimitive::Int))
        );
    }

    #[test]
    fn test_merge_non_object_is_invariant_error() {
        let arena = ZiCTypeArena::ZiFNew();
        let mut target = ZiCAttribute::ZiFNew(ZiCPrimitive::String);
        let other = object(vec![]);
        assert!(matches!(target.ZiFMerge(&other, &arena), Err(ZiError::Invariant(_))));
    }

    #[test]
    fn test_inherit_only_fills_unset() {
        let arena = ZiCTypeArena::ZiFNew();
        let mut parent_name = ZiCAttribute::ZiFNew(ZiCPrimitive::String).ZiFWithDescription("parent");
        parent_name.ZiFValidationMut().max_length = Some(10);
        parent_name.default_value = Some(serde_json::json!("x"));
        let mut parent = object(vec![("name", parent_name)]);
        parent.ZiFValidationMut().ZiFAddRequired(["name"]);

        let mut child_name = ZiCAttribute::default().ZiFWithDescription("child");
        child_name.ZiFValidationMut().max_length = Some(3);
        let mut child = object(vec![("name", child_name)]);

        child.ZiFInherit(&parent, &arena);

        let field = child.ZiFFind("name", &arena).unwrap();
        assert_eq!(field.description.as_deref(), Some("child"));
        assert_eq!(field.ty, Some(ZiCDataType::Primitive(ZiCPrimitive::String)));
        assert_eq!(field.validation.as_ref().and_then(|v| v.max_length), Some(3));
        assert_eq!(field.default_value, Some(serde_json::json!("x")));
        assert_eq!(child.ZiFRequired(&arena), vec!["name".to_string()]);
    }
}
