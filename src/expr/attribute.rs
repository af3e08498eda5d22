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

//! # Zid Attribute Module
//!
//! Attributes are the universal building block of a design: every field,
//! every type body and every view is an attribute. This module holds the
//! attribute structure together with its structural queries and its
//! design-time validation.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ZiCValidationErrors;
use crate::eval::context::ZiCEvalContext;
use crate::expr::result_type::{ZI_DEFAULT_VIEW, ZI_VIEW_META_KEY};
use crate::expr::types::{ZiCDataType, ZiCPrimitive, ZiCTypeId};
use crate::expr::user_type::ZiCTypeArena;
use crate::expr::validation::ZiCValidation;

/// Multi-valued metadata bag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiCMeta(pub BTreeMap<String, Vec<String>>);

impl ZiCMeta {
    #[allow(non_snake_case)]
    pub fn ZiFAdd(&mut self, key: impl Into<String>, values: impl IntoIterator<Item = String>) {
        self.0.entry(key.into()).or_default().extend(values);
    }

    /// Replaces every value stored under `key`.
    #[allow(non_snake_case)]
    pub fn ZiFSet(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), vec![value.into()]);
    }

    #[allow(non_snake_case)]
    pub fn ZiFGet(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(|v| v.as_slice())
    }

    #[allow(non_snake_case)]
    pub fn ZiFLast(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.last()).map(|s| s.as_str())
    }

    #[allow(non_snake_case)]
    pub fn ZiFRemove(&mut self, key: &str) {
        self.0.remove(key);
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsEmpty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A deferred builder body.
#[derive(Clone)]
pub struct ZiCDSLFunc(Arc<dyn Fn(&mut ZiCEvalContext) + Send + Sync>);

impl ZiCDSLFunc {
    #[allow(non_snake_case)]
    pub fn ZiFNew<F>(body: F) -> Self
    where
        F: Fn(&mut ZiCEvalContext) + Send + Sync + 'static,
    {
        ZiCDSLFunc(Arc::new(body))
    }

    #[allow(non_snake_case)]
    pub fn ZiFCall(&self, ctx: &mut ZiCEvalContext) {
        (self.0)(ctx)
    }
}

impl fmt::Debug for ZiCDSLFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZiCDSLFunc")
    }
}

/// Build state of a definition whose body runs during the execute pass.
#[derive(Clone, Debug, Default)]
pub enum ZiCPending {
    Pending(ZiCDSLFunc),
    #[default]
    Built,
}

impl ZiCPending {
    #[allow(non_snake_case)]
    pub fn ZiFIsPending(&self) -> bool {
        matches!(self, ZiCPending::Pending(_))
    }

    /// Takes the pending body, leaving the definition marked as built.
    #[allow(non_snake_case)]
    pub fn ZiFTake(&mut self) -> Option<ZiCDSLFunc> {
        match std::mem::take(self) {
            ZiCPending::Pending(body) => Some(body),
            ZiCPending::Built => None,
        }
    }
}

impl PartialEq for ZiCPending {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ZiCPending::Built, ZiCPending::Built) => true,
            (ZiCPending::Pending(a), ZiCPending::Pending(b)) => Arc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

/// A typed, optionally validated and defaulted value slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiCAttribute {
    #[serde(rename = "type")]
    pub ty: Option<ZiCDataType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ZiCValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(default, skip_serializing_if = "ZiCMeta::ZiFIsEmpty")]
    pub meta: ZiCMeta,
    /// Types whose fields are merged in during finalize.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<ZiCDataType>,
    /// Types whose field declarations are inherited during finalize.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ZiCDataType>,
    #[serde(skip)]
    pub dsl: ZiCPending,
}

impl ZiCAttribute {
    #[allow(non_snake_case)]
    pub fn ZiFNew(ty: impl Into<ZiCDataType>) -> Self {
        Self {
            ty: Some(ty.into()),
            ..Self::default()
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithDescription(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithValidation(mut self, validation: ZiCValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFValidationMut(&mut self) -> &mut ZiCValidation {
        self.validation.get_or_insert_with(ZiCValidation::default)
    }

    /// View assigned through metadata, if any.
    #[allow(non_snake_case)]
    pub fn ZiFViewName(&self) -> Option<&str> {
        self.meta.ZiFLast(ZI_VIEW_META_KEY)
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsRequired(&self, name: &str, arena: &ZiCTypeArena) -> bool {
        self.ZiFRequired(arena).iter().any(|n| n == name)
    }

    /// Required names of this attribute, walking into its own named type.
    #[allow(non_snake_case)]
    pub fn ZiFRequired(&self, arena: &ZiCTypeArena) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.direct_required(arena, &mut seen, &mut out);
        out
    }

    /// Transitive closure of required names. Every required field whose type
    /// is itself a named type contributes that type's required names too.
    #[allow(non_snake_case)]
    pub fn ZiFAllRequired(&self, arena: &ZiCTypeArena) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.required_closure(arena, &mut seen, &mut out);
        out
    }

    fn direct_required(&self, arena: &ZiCTypeArena, seen: &mut HashSet<ZiCTypeId>, out: &mut Vec<String>) {
        if let Some(validation) = &self.validation {
            for name in &validation.required {
                push_unique(out, name);
            }
        }
        if let Some(id) = self.ty.as_ref().and_then(ZiCDataType::ZiFNamedId) {
            if seen.insert(id) {
                if let Some(named) = arena.ZiFGet(id) {
                    named.attribute.direct_required(arena, seen, out);
                }
            }
        }
    }

    fn required_closure(&self, arena: &ZiCTypeArena, seen: &mut HashSet<ZiCTypeId>, out: &mut Vec<String>) {
        let mut direct = Vec::new();
        self.direct_required(arena, seen, &mut direct);
        for name in &direct {
            push_unique(out, name);
        }
        for name in &direct {
            let nested = self
                .ZiFFind(name, arena)
                .and_then(|field| field.ty.as_ref())
                .and_then(ZiCDataType::ZiFNamedId);
            if let Some(id) = nested {
                if seen.insert(id) {
                    if let Some(named) = arena.ZiFGet(id) {
                        named.attribute.required_closure(arena, seen, out);
                    }
                }
            }
        }
    }

    /// Looks up a child attribute in this attribute's object, then in its
    /// bases and references.
    #[allow(non_snake_case)]
    pub fn ZiFFind<'a>(&'a self, name: &str, arena: &'a ZiCTypeArena) -> Option<&'a ZiCAttribute> {
        let mut seen = HashSet::new();
        self.find_in(name, arena, &mut seen)
    }

    fn find_in<'a>(
        &'a self,
        name: &str,
        arena: &'a ZiCTypeArena,
        seen: &mut HashSet<ZiCTypeId>,
    ) -> Option<&'a ZiCAttribute> {
        let own = self.ty.iter();
        for ty in own.chain(self.bases.iter()).chain(self.references.iter()) {
            if let Some(found) = find_in_type(ty, name, arena, seen) {
                return Some(found);
            }
        }
        None
    }

    /// Type an untyped child `name` takes at finalize: the type of the
    /// same field in the first reference declaring it, otherwise string.
    #[allow(non_snake_case)]
    pub fn ZiFReferencedType(&self, name: &str, arena: &ZiCTypeArena) -> ZiCDataType {
        self.references
            .iter()
            .find_map(|r| {
                let mut seen = HashSet::new();
                find_in_type(r, name, arena, &mut seen).and_then(|a| a.ty.clone())
            })
            .unwrap_or(ZiCDataType::Primitive(ZiCPrimitive::String))
    }

    /// Design-time validation of this attribute and everything it owns
    /// inline. Named types are validated as definitions of their own.
    #[allow(non_snake_case)]
    pub fn ZiFValidate(&self, ctx: &str, parent: &str, arena: &ZiCTypeArena) -> ZiCValidationErrors {
        let mut errors = ZiCValidationErrors::ZiFNew();
        self.validate_into(ctx, parent, arena, &mut errors);
        errors
    }

    fn validate_into(&self, ctx: &str, parent: &str, arena: &ZiCTypeArena, errors: &mut ZiCValidationErrors) {
        let prefix = if ctx.is_empty() {
            String::new()
        } else {
            format!("{} - ", ctx)
        };
        let ty = match &self.ty {
            Some(ty) => ty,
            None => {
                errors.ZiFAdd(parent, format!("{}attribute type is nil", prefix));
                return;
            }
        };

        if let Some(default) = &self.default_value {
            if let Some(p) = arena.ZiFPrimitive(ty) {
                if !p.ZiFIsCompatible(default) {
                    errors.ZiFAdd(
                        parent,
                        format!(
                            "{}default value {} is incompatible with attribute of type {}",
                            prefix,
                            default,
                            p.ZiFName()
                        ),
                    );
                }
            }
            let values = self.validation.as_ref().and_then(|v| v.values.as_ref());
            if let Some(values) = values {
                if !values.contains(default) {
                    errors.ZiFAdd(
                        parent,
                        format!("{}default value {} is not one of the accepted values", prefix, default),
                    );
                }
            }
        }

        if let Some(validation) = &self.validation {
            for problem in validation.ZiFValidate() {
                errors.ZiFAdd(parent, format!("{}{}", prefix, problem));
            }
            if !validation.required.is_empty() {
                let object_like = arena.ZiFAsObject(ty).is_some()
                    || self.bases.iter().any(|b| arena.ZiFAsObject(b).is_some());
                if !object_like {
                    errors.ZiFAdd(
                        parent,
                        format!(
                            "{}required fields are only valid on objects but type is {}",
                            prefix,
                            arena.ZiFTypeName(ty)
                        ),
                    );
                } else {
                    for name in &validation.required {
                        if self.ZiFFind(name, arena).is_none() {
                            errors.ZiFAdd(
                                parent,
                                format!(
                                    "{}required field {:?} does not exist in type {}",
                                    prefix,
                                    name,
                                    arena.ZiFTypeName(ty)
                                ),
                            );
                        }
                    }
                }
            }
        }

        if let Some(view) = self.ZiFViewName() {
            match ty {
                ZiCDataType::ResultType(id) => {
                    if let Some(rt) = arena.ZiFGet(*id) {
                        if view != ZI_DEFAULT_VIEW && rt.ZiFView(view).is_none() {
                            errors.ZiFAdd(
                                parent,
                                format!("{}type {:?} does not define view {:?}", prefix, rt.name, view),
                            );
                        }
                    }
                }
                other => errors.ZiFAdd(
                    parent,
                    format!(
                        "{}uses view {:?} but {:?} is not a result type",
                        prefix,
                        view,
                        arena.ZiFTypeName(other)
                    ),
                ),
            }
        }

        match ty {
            ZiCDataType::Object(obj) => {
                for (name, field) in obj.ZiFIter() {
                    let field_ctx = format!("{}field {}", prefix, name);
                    if field.ty.is_none() && !self.references.is_empty() {
                        let mut resolved = field.clone();
                        resolved.ty = Some(self.ZiFReferencedType(name, arena));
                        resolved.validate_into(&field_ctx, parent, arena, errors);
                    } else {
                        field.validate_into(&field_ctx, parent, arena, errors);
                    }
                }
            }
            ZiCDataType::Array(arr) => {
                arr.elem
                    .validate_into(&format!("{}elements", prefix), parent, arena, errors);
            }
            ZiCDataType::Map(map) => {
                map.key.validate_into(&format!("{}keys", prefix), parent, arena, errors);
                map.elem
                    .validate_into(&format!("{}values", prefix), parent, arena, errors);
            }
            ZiCDataType::Primitive(_) | ZiCDataType::UserType(_) | ZiCDataType::ResultType(_) => {}
        }
    }
}

fn find_in_type<'a>(
    ty: &'a ZiCDataType,
    name: &str,
    arena: &'a ZiCTypeArena,
    seen: &mut HashSet<ZiCTypeId>,
) -> Option<&'a ZiCAttribute> {
    match ty {
        ZiCDataType::Object(obj) => obj.ZiFGet(name),
        ZiCDataType::UserType(id) | ZiCDataType::ResultType(id) => {
            if !seen.insert(*id) {
                return None;
            }
            arena
                .ZiFGet(*id)
                .and_then(|named| named.attribute.find_in(name, arena, seen))
        }
        _ => None,
    }
}

pub(crate) fn push_unique(out: &mut Vec<String>, name: &str) {
    if !out.iter().any(|n| n == name) {
        out.push(name.to_string());
    }
}
