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

//! # Zid User Types
//!
//! User and result types live in a [`ZiCTypeArena`] and are referenced from
//! attributes by [`ZiCTypeId`]. Storing them by identity rather than by
//! ownership lets type graphs contain cycles while every structural walk
//! stays bounded by memoizing on identities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};
use crate::expr::attribute::ZiCAttribute;
use crate::expr::result_type::{ZiCResultInfo, ZiCViewExpr};
use crate::expr::types::{ZiCArray, ZiCDataType, ZiCMap, ZiCObject, ZiCPrimitive, ZiCTypeId};

/// A named type. A result type is a user type with result information.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCUserTypeExpr {
    pub id: ZiCTypeId,
    pub name: String,
    pub attribute: ZiCAttribute,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ZiCResultInfo>,
}

impl ZiCUserTypeExpr {
    #[allow(non_snake_case)]
    pub fn ZiFIsResult(&self) -> bool {
        self.result.is_some()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIdentifier(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.identifier.as_str())
    }

    #[allow(non_snake_case)]
    pub fn ZiFView(&self, name: &str) -> Option<&ZiCViewExpr> {
        self.result.as_ref().and_then(|r| r.ZiFView(name))
    }

    #[allow(non_snake_case)]
    pub fn ZiFViews(&self) -> &[ZiCViewExpr] {
        match &self.result {
            Some(r) => &r.views,
            None => &[],
        }
    }

    /// Data type referring to this definition.
    #[allow(non_snake_case)]
    pub fn ZiFDataType(&self) -> ZiCDataType {
        if self.ZiFIsResult() {
            ZiCDataType::ResultType(self.id)
        } else {
            ZiCDataType::UserType(self.id)
        }
    }

    /// Name used in error contexts, e.g. `type "Person"`.
    #[allow(non_snake_case)]
    pub fn ZiFEvalName(&self) -> String {
        match &self.result {
            Some(r) => format!("result type {:?}", r.identifier),
            None => format!("type {:?}", self.name),
        }
    }
}

/// Storage for every user and result type of a design, including the
/// duplicates and projections derived from them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiCTypeArena {
    types: Vec<ZiCUserTypeExpr>,
    /// Projected result types keyed by projected identifier.
    #[serde(default)]
    pub(crate) projections: BTreeMap<String, ZiCTypeId>,
}

impl ZiCTypeArena {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self::default()
    }

    /// Stores a new named type and returns its identity.
    #[allow(non_snake_case)]
    pub fn ZiFAdd(
        &mut self,
        name: impl Into<String>,
        attribute: ZiCAttribute,
        result: Option<ZiCResultInfo>,
    ) -> ZiCTypeId {
        let id = ZiCTypeId(self.types.len());
        self.types.push(ZiCUserTypeExpr {
            id,
            name: name.into(),
            attribute,
            result,
        });
        id
    }

    #[allow(non_snake_case)]
    pub fn ZiFGet(&self, id: ZiCTypeId) -> Option<&ZiCUserTypeExpr> {
        self.types.get(id.0)
    }

    #[allow(non_snake_case)]
    pub fn ZiFGetMut(&mut self, id: ZiCTypeId) -> Option<&mut ZiCUserTypeExpr> {
        self.types.get_mut(id.0)
    }

    /// Like [`ZiCTypeArena::ZiFGet`] but a missing identity is an invariant error.
    #[allow(non_snake_case)]
    pub fn ZiFExpect(&self, id: ZiCTypeId) -> Result<&ZiCUserTypeExpr> {
        self.types
            .get(id.0)
            .ok_or_else(|| ZiError::invariant(format!("unknown type identity {}", id)))
    }

    #[allow(non_snake_case)]
    pub fn ZiFExpectMut(&mut self, id: ZiCTypeId) -> Result<&mut ZiCUserTypeExpr> {
        self.types
            .get_mut(id.0)
            .ok_or_else(|| ZiError::invariant(format!("unknown type identity {}", id)))
    }

    /// Drops every type stored at or after `len` and the projections that
    /// point at them.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.types.truncate(len);
        self.projections.retain(|_, id| id.0 < len);
    }

    #[allow(non_snake_case)]
    pub fn ZiFLen(&self) -> usize {
        self.types.len()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsEmpty(&self) -> bool {
        self.types.is_empty()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIter(&self) -> impl Iterator<Item = &ZiCUserTypeExpr> {
        self.types.iter()
    }

    /// Follows named types down to the first non-named shape. Returns `None`
    /// for dangling identities, untyped definitions and alias cycles.
    #[allow(non_snake_case)]
    pub fn ZiFResolve<'a>(&'a self, ty: &'a ZiCDataType) -> Option<&'a ZiCDataType> {
        let mut current = ty;
        for _ in 0..=self.types.len() {
            match current.ZiFNamedId() {
                Some(id) => current = self.types.get(id.0)?.attribute.ty.as_ref()?,
                None => return Some(current),
            }
        }
        None
    }

    #[allow(non_snake_case)]
    pub fn ZiFAsObject<'a>(&'a self, ty: &'a ZiCDataType) -> Option<&'a ZiCObject> {
        self.ZiFResolve(ty).and_then(ZiCDataType::ZiFToObject)
    }

    #[allow(non_snake_case)]
    pub fn ZiFAsArray<'a>(&'a self, ty: &'a ZiCDataType) -> Option<&'a ZiCArray> {
        self.ZiFResolve(ty).and_then(ZiCDataType::ZiFToArray)
    }

    #[allow(non_snake_case)]
    pub fn ZiFAsMap<'a>(&'a self, ty: &'a ZiCDataType) -> Option<&'a ZiCMap> {
        self.ZiFResolve(ty).and_then(ZiCDataType::ZiFToMap)
    }

    #[allow(non_snake_case)]
    pub fn ZiFPrimitive(&self, ty: &ZiCDataType) -> Option<ZiCPrimitive> {
        self.ZiFResolve(ty).and_then(ZiCDataType::ZiFToPrimitive)
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsObject(&self, ty: &ZiCDataType) -> bool {
        self.ZiFAsObject(ty).is_some()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsArray(&self, ty: &ZiCDataType) -> bool {
        self.ZiFAsArray(ty).is_some()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsMap(&self, ty: &ZiCDataType) -> bool {
        self.ZiFAsMap(ty).is_some()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsPrimitive(&self, ty: &ZiCDataType) -> bool {
        self.ZiFPrimitive(ty).is_some()
    }

    /// Human readable name of a type.
    #[allow(non_snake_case)]
    pub fn ZiFTypeName(&self, ty: &ZiCDataType) -> String {
        match ty {
            ZiCDataType::Primitive(p) => p.ZiFName().to_string(),
            ZiCDataType::Array(_) => "array".to_string(),
            ZiCDataType::Map(_) => "map".to_string(),
            ZiCDataType::Object(_) => "object".to_string(),
            ZiCDataType::UserType(id) | ZiCDataType::ResultType(id) => self
                .ZiFGet(*id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| format!("<unknown {}>", id)),
        }
    }

    /// Structural hash. Named types hash by identity so cyclic graphs hash
    /// in bounded time.
    #[allow(non_snake_case)]
    pub fn ZiFHash(&self, ty: &ZiCDataType) -> String {
        match ty {
            ZiCDataType::Primitive(p) => format!("_{}", p.ZiFName()),
            ZiCDataType::Array(arr) => format!("_array:{}", self.attribute_hash(&arr.elem)),
            ZiCDataType::Map(map) => format!(
                "_map:{}:{}",
                self.attribute_hash(&map.key),
                self.attribute_hash(&map.elem)
            ),
            ZiCDataType::Object(obj) => {
                let mut fields: Vec<String> = obj
                    .ZiFIter()
                    .map(|(name, attr)| format!("{}:{}", name, self.attribute_hash(attr)))
                    .collect();
                fields.sort();
                format!("_object:{}", fields.join(","))
            }
            ZiCDataType::UserType(id) => format!("_type:{}", id.0),
            ZiCDataType::ResultType(id) => format!("_result:{}", id.0),
        }
    }

    /// Structural equality in the sense of [`ZiCTypeArena::ZiFHash`].
    #[allow(non_snake_case)]
    pub fn ZiFEqual(&self, a: &ZiCDataType, b: &ZiCDataType) -> bool {
        self.ZiFHash(a) == self.ZiFHash(b)
    }

    fn attribute_hash(&self, attr: &ZiCAttribute) -> String {
        attr.ty
            .as_ref()
            .map(|ty| self.ZiFHash(ty))
            .unwrap_or_else(|| "_nil".to_string())
    }
}
