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

//! # Zid Type Model
//!
//! The closed set of shapes an attribute value may take. Containers own
//! their child attributes inline while named types are referenced through a
//! [`ZiCTypeId`] into the [`ZiCTypeArena`](crate::expr::user_type::ZiCTypeArena),
//! which is what lets user types refer to themselves or to each other.
//!
//! Narrowing helpers come in two flavours:
//!
//! - `ZiFTo*` only looks at the type itself and returns `None` on mismatch
//! - arena-aware `ZiFAs*` (on the arena) follow named types to their
//!   underlying shape first

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::expr::attribute::ZiCAttribute;

/// Kind tag of a data type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZiCKind {
    Boolean,
    Int,
    Int32,
    Int64,
    UInt,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    Bytes,
    Any,
    Array,
    Object,
    Map,
    UserType,
    ResultType,
}

/// Leaf value kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZiCPrimitive {
    Boolean,
    Int,
    Int32,
    Int64,
    UInt,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    Bytes,
    Any,
}

impl ZiCPrimitive {
    #[allow(non_snake_case)]
    pub fn ZiFName(&self) -> &'static str {
        match self {
            ZiCPrimitive::Boolean => "boolean",
            ZiCPrimitive::Int => "int",
            ZiCPrimitive::Int32 => "int32",
            ZiCPrimitive::Int64 => "int64",
            ZiCPrimitive::UInt => "uint",
            ZiCPrimitive::UInt32 => "uint32",
            ZiCPrimitive::UInt64 => "uint64",
            ZiCPrimitive::Float32 => "float32",
            ZiCPrimitive::Float64 => "float64",
            ZiCPrimitive::String => "string",
            ZiCPrimitive::Bytes => "bytes",
            ZiCPrimitive::Any => "any",
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFKind(&self) -> ZiCKind {
        match self {
            ZiCPrimitive::Boolean => ZiCKind::Boolean,
            ZiCPrimitive::Int => ZiCKind::Int,
            ZiCPrimitive::Int32 => ZiCKind::Int32,
            ZiCPrimitive::Int64 => ZiCKind::Int64,
            ZiCPrimitive::UInt => ZiCKind::UInt,
            ZiCPrimitive::UInt32 => ZiCKind::UInt32,
            ZiCPrimitive::UInt64 => ZiCKind::UInt64,
            ZiCPrimitive::Float32 => ZiCKind::Float32,
            ZiCPrimitive::Float64 => ZiCKind::Float64,
            ZiCPrimitive::String => ZiCKind::String,
            ZiCPrimitive::Bytes => ZiCKind::Bytes,
            ZiCPrimitive::Any => ZiCKind::Any,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsInteger(&self) -> bool {
        matches!(
            self,
            ZiCPrimitive::Int
                | ZiCPrimitive::Int32
                | ZiCPrimitive::Int64
                | ZiCPrimitive::UInt
                | ZiCPrimitive::UInt32
                | ZiCPrimitive::UInt64
        )
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsNumeric(&self) -> bool {
        self.ZiFIsInteger() || matches!(self, ZiCPrimitive::Float32 | ZiCPrimitive::Float64)
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsStringLike(&self) -> bool {
        matches!(self, ZiCPrimitive::String | ZiCPrimitive::Bytes)
    }

    /// Whether a JSON value may be held by an attribute of this primitive.
    #[allow(non_snake_case)]
    pub fn ZiFIsCompatible(&self, value: &Value) -> bool {
        match self {
            ZiCPrimitive::Boolean => value.is_boolean(),
            ZiCPrimitive::Int | ZiCPrimitive::Int64 => value.as_i64().is_some(),
            ZiCPrimitive::Int32 => value
                .as_i64()
                .map(|n| n >= i32::MIN as i64 && n <= i32::MAX as i64)
                .unwrap_or(false),
            ZiCPrimitive::UInt | ZiCPrimitive::UInt64 => value.as_u64().is_some(),
            ZiCPrimitive::UInt32 => value
                .as_u64()
                .map(|n| n <= u32::MAX as u64)
                .unwrap_or(false),
            ZiCPrimitive::Float32 | ZiCPrimitive::Float64 => value.is_number(),
            ZiCPrimitive::String | ZiCPrimitive::Bytes => value.is_string(),
            ZiCPrimitive::Any => true,
        }
    }
}

impl fmt::Display for ZiCPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ZiFName())
    }
}

/// Stable identity of a user or result type inside a type arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZiCTypeId(pub usize);

impl fmt::Display for ZiCTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiCArray {
    pub elem: ZiCAttribute,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiCMap {
    pub key: ZiCAttribute,
    pub elem: ZiCAttribute,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCNamedAttribute {
    pub name: String,
    pub attribute: ZiCAttribute,
}

/// Ordered name to attribute pairs. Names are unique.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiCObject(pub Vec<ZiCNamedAttribute>);

impl ZiCObject {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self::default()
    }

    #[allow(non_snake_case)]
    pub fn ZiFGet(&self, name: &str) -> Option<&ZiCAttribute> {
        self.0.iter().find(|n| n.name == name).map(|n| &n.attribute)
    }

    #[allow(non_snake_case)]
    pub fn ZiFGetMut(&mut self, name: &str) -> Option<&mut ZiCAttribute> {
        self.0
            .iter_mut()
            .find(|n| n.name == name)
            .map(|n| &mut n.attribute)
    }

    #[allow(non_snake_case)]
    pub fn ZiFContains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n.name == name)
    }

    /// Inserts a field, replacing an existing one of the same name in place.
    #[allow(non_snake_case)]
    pub fn ZiFSet(&mut self, name: impl Into<String>, attribute: ZiCAttribute) {
        let name = name.into();
        match self.0.iter_mut().find(|n| n.name == name) {
            Some(existing) => existing.attribute = attribute,
            None => self.0.push(ZiCNamedAttribute { name, attribute }),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFDelete(&mut self, name: &str) -> Option<ZiCAttribute> {
        let index = self.0.iter().position(|n| n.name == name)?;
        Some(self.0.remove(index).attribute)
    }

    #[allow(non_snake_case)]
    pub fn ZiFRename(&mut self, old: &str, new: &str) {
        if let Some(field) = self.0.iter_mut().find(|n| n.name == old) {
            field.name = new.to_string();
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFNames(&self) -> Vec<String> {
        self.0.iter().map(|n| n.name.clone()).collect()
    }

    #[allow(non_snake_case)]
    pub fn ZiFLen(&self) -> usize {
        self.0.len()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsEmpty(&self) -> bool {
        self.0.is_empty()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIter(&self) -> impl Iterator<Item = (&str, &ZiCAttribute)> {
        self.0.iter().map(|n| (n.name.as_str(), &n.attribute))
    }

    #[allow(non_snake_case)]
    pub fn ZiFIterMut(&mut self) -> impl Iterator<Item = (&str, &mut ZiCAttribute)> {
        self.0
            .iter_mut()
            .map(|n| (n.name.as_str(), &mut n.attribute))
    }
}

/// A data type. Named variants refer into the type arena.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZiCDataType {
    Primitive(ZiCPrimitive),
    Array(Box<ZiCArray>),
    Map(Box<ZiCMap>),
    Object(ZiCObject),
    UserType(ZiCTypeId),
    ResultType(ZiCTypeId),
}

impl From<ZiCPrimitive> for ZiCDataType {
    fn from(p: ZiCPrimitive) -> Self {
        ZiCDataType::Primitive(p)
    }
}

impl From<ZiCObject> for ZiCDataType {
    fn from(o: ZiCObject) -> Self {
        ZiCDataType::Object(o)
    }
}

impl ZiCDataType {
    #[allow(non_snake_case)]
    pub fn ZiFArrayOf(elem: ZiCAttribute) -> Self {
        ZiCDataType::Array(Box::new(ZiCArray { elem }))
    }

    #[allow(non_snake_case)]
    pub fn ZiFMapOf(key: ZiCAttribute, elem: ZiCAttribute) -> Self {
        ZiCDataType::Map(Box::new(ZiCMap { key, elem }))
    }

    #[allow(non_snake_case)]
    pub fn ZiFKind(&self) -> ZiCKind {
        match self {
            ZiCDataType::Primitive(p) => p.ZiFKind(),
            ZiCDataType::Array(_) => ZiCKind::Array,
            ZiCDataType::Map(_) => ZiCKind::Map,
            ZiCDataType::Object(_) => ZiCKind::Object,
            ZiCDataType::UserType(_) => ZiCKind::UserType,
            ZiCDataType::ResultType(_) => ZiCKind::ResultType,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsPrimitive(&self) -> bool {
        matches!(self, ZiCDataType::Primitive(_))
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsObject(&self) -> bool {
        matches!(self, ZiCDataType::Object(_))
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsArray(&self) -> bool {
        matches!(self, ZiCDataType::Array(_))
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsMap(&self) -> bool {
        matches!(self, ZiCDataType::Map(_))
    }

    /// Identity of a user or result type reference.
    #[allow(non_snake_case)]
    pub fn ZiFNamedId(&self) -> Option<ZiCTypeId> {
        match self {
            ZiCDataType::UserType(id) | ZiCDataType::ResultType(id) => Some(*id),
            _ => None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFToPrimitive(&self) -> Option<ZiCPrimitive> {
        match self {
            ZiCDataType::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFToObject(&self) -> Option<&ZiCObject> {
        match self {
            ZiCDataType::Object(o) => Some(o),
            _ => None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFToObjectMut(&mut self) -> Option<&mut ZiCObject> {
        match self {
            ZiCDataType::Object(o) => Some(o),
            _ => None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFToArray(&self) -> Option<&ZiCArray> {
        match self {
            ZiCDataType::Array(a) => Some(a),
            _ => None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFToArrayMut(&mut self) -> Option<&mut ZiCArray> {
        match self {
            ZiCDataType::Array(a) => Some(a),
            _ => None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFToMap(&self) -> Option<&ZiCMap> {
        match self {
            ZiCDataType::Map(m) => Some(m),
            _ => None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFToMapMut(&mut self) -> Option<&mut ZiCMap> {
        match self {
            ZiCDataType::Map(m) => Some(m),
            _ => None,
        }
    }
}
