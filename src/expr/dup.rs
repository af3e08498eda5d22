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

//! # Zid Duplication
//!
//! Deep copies of type graphs. Named types are copied into fresh arena
//! slots; every identity is copied at most once per duplication, so cyclic
//! graphs terminate and the copy keeps the cycle topology.
//!
//! Plain `Clone` on an attribute copies its inline structure but keeps
//! named types shared. Use [`ZiCDupper`] when named types must be copied
//! as well.

use std::collections::HashMap;

use crate::errors::Result;
use crate::expr::attribute::ZiCAttribute;
use crate::expr::result_type::ZiCResultInfo;
use crate::expr::types::{ZiCDataType, ZiCObject, ZiCTypeId};
use crate::expr::user_type::ZiCTypeArena;

/// Duplication session holding the identity memo tables.
pub struct ZiCDupper<'a> {
    arena: &'a mut ZiCTypeArena,
    user_types: HashMap<ZiCTypeId, ZiCTypeId>,
    result_types: HashMap<ZiCTypeId, ZiCTypeId>,
}

impl<'a> ZiCDupper<'a> {
    #[allow(non_snake_case)]
    pub fn ZiFNew(arena: &'a mut ZiCTypeArena) -> Self {
        Self {
            arena,
            user_types: HashMap::new(),
            result_types: HashMap::new(),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFDupType(&mut self, ty: &ZiCDataType) -> Result<ZiCDataType> {
        Ok(match ty {
            ZiCDataType::Primitive(p) => ZiCDataType::Primitive(*p),
            ZiCDataType::Array(arr) => ZiCDataType::ZiFArrayOf(self.ZiFDupAttribute(&arr.elem)?),
            ZiCDataType::Map(map) => ZiCDataType::ZiFMapOf(
                self.ZiFDupAttribute(&map.key)?,
                self.ZiFDupAttribute(&map.elem)?,
            ),
            ZiCDataType::Object(obj) => {
                let mut copy = ZiCObject::ZiFNew();
                for (name, attr) in obj.ZiFIter() {
                    copy.ZiFSet(name, self.ZiFDupAttribute(attr)?);
                }
                ZiCDataType::Object(copy)
            }
            ZiCDataType::UserType(id) => ZiCDataType::UserType(self.dup_named(*id, false)?),
            ZiCDataType::ResultType(id) => ZiCDataType::ResultType(self.dup_named(*id, true)?),
        })
    }

    #[allow(non_snake_case)]
    pub fn ZiFDupAttribute(&mut self, attr: &ZiCAttribute) -> Result<ZiCAttribute> {
        let mut copy = attr.clone();
        copy.ty = match &attr.ty {
            Some(ty) => Some(self.ZiFDupType(ty)?),
            None => None,
        };
        Ok(copy)
    }

    fn dup_named(&mut self, id: ZiCTypeId, result: bool) -> Result<ZiCTypeId> {
        let memo = if result { &self.result_types } else { &self.user_types };
        if let Some(copy) = memo.get(&id) {
            return Ok(*copy);
        }

        let source = self.arena.ZiFExpect(id)?.clone();
        // Reserve the slot before recursing so back references find it.
        let copy_id = self.arena.ZiFAdd(
            source.name.clone(),
            ZiCAttribute::default(),
            source.result.as_ref().map(|r| ZiCResultInfo {
                identifier: r.identifier.clone(),
                content_type: r.content_type.clone(),
                views: Vec::new(),
            }),
        );
        if result {
            self.result_types.insert(id, copy_id);
        } else {
            self.user_types.insert(id, copy_id);
        }

        let attribute = self.ZiFDupAttribute(&source.attribute)?;
        let mut views = Vec::new();
        if let Some(info) = &source.result {
            for view in &info.views {
                let mut copy = view.clone();
                copy.attribute = self.ZiFDupAttribute(&view.attribute)?;
                views.push(copy);
            }
        }

        let slot = self.arena.ZiFExpectMut(copy_id)?;
        slot.attribute = attribute;
        if let Some(info) = slot.result.as_mut() {
            info.views = views;
        }
        Ok(copy_id)
    }
}

impl ZiCTypeArena {
    /// Deep copy of `ty` including every named type it reaches.
    #[allow(non_snake_case)]
    pub fn ZiFDuplicate(&mut self, ty: &ZiCDataType) -> Result<ZiCDataType> {
        ZiCDupper::ZiFNew(self).ZiFDupType(ty)
    }

    /// Deep copy of an attribute including every named type it reaches.
    #[allow(non_snake_case)]
    pub fn ZiFDuplicateAttribute(&mut self, attr: &ZiCAttribute) -> Result<ZiCAttribute> {
        ZiCDupper::ZiFNew(self).ZiFDupAttribute(attr)
    }
}
