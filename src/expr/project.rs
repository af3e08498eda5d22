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

//! # Zid View Projection
//!
//! Computes the type rendered by a result type under one of its views.
//! Projection folds over the reachable type graph: fields typed by another
//! result type are projected with the view they declare, collections project
//! their element. Every identity is projected at most once per view and the
//! results are memoized in the arena, so cyclic graphs terminate and
//! repeated projections return the same identity.

use crate::errors::{Result, ZiError};
use crate::expr::attribute::ZiCAttribute;
use crate::expr::result_type::{
    ZiCResultInfo, ZiCViewExpr, ZiFTitle, ZiFViewIdentifier, ZI_DEFAULT_VIEW, ZI_VIEW_META_KEY,
};
use crate::expr::types::{ZiCDataType, ZiCObject, ZiCTypeId};
use crate::expr::user_type::{ZiCTypeArena, ZiCUserTypeExpr};

pub struct ZiCProjector<'a> {
    arena: &'a mut ZiCTypeArena,
}

impl<'a> ZiCProjector<'a> {
    #[allow(non_snake_case)]
    pub fn ZiFNew(arena: &'a mut ZiCTypeArena) -> Self {
        Self { arena }
    }

    /// Projects `id` with `view`. A failed projection leaves neither
    /// partially built types nor memo entries behind.
    #[allow(non_snake_case)]
    pub fn ZiFProject(&mut self, id: ZiCTypeId, view: &str) -> Result<ZiCTypeId> {
        let checkpoint = self.arena.ZiFLen();
        let projected = self.project(id, view);
        if projected.is_err() {
            self.arena.truncate(checkpoint);
        }
        projected
    }

    fn project(&mut self, id: ZiCTypeId, view: &str) -> Result<ZiCTypeId> {
        let rt = self.arena.ZiFExpect(id)?;
        let info = rt
            .result
            .as_ref()
            .ok_or_else(|| ZiError::validation(format!("type {:?} is not a result type", rt.name)))?;
        if info.ZiFProjectedView().as_deref() == Some(view) {
            return Ok(id);
        }
        let identifier = ZiFViewIdentifier(&info.identifier, view);
        let key = format!("{}::{}", id.0, identifier);
        if let Some(existing) = self.arena.projections.get(&key) {
            return Ok(*existing);
        }

        let rt = rt.clone();
        if rt.attribute.ty.as_ref().map(ZiCDataType::ZiFIsArray).unwrap_or(false) {
            self.project_collection(rt, view, identifier, key)
        } else {
            self.project_single(rt, view, identifier, key)
        }
    }

    fn reserve(&mut self, rt: &ZiCUserTypeExpr, identifier: String, key: String) -> ZiCTypeId {
        let content_type = rt.result.as_ref().and_then(|r| r.content_type.clone());
        let id = self.arena.ZiFAdd(
            rt.name.clone(),
            ZiCAttribute::default(),
            Some(ZiCResultInfo {
                identifier,
                content_type,
                views: Vec::new(),
            }),
        );
        self.arena.projections.insert(key, id);
        id
    }

    fn project_single(
        &mut self,
        rt: ZiCUserTypeExpr,
        view: &str,
        identifier: String,
        key: String,
    ) -> Result<ZiCTypeId> {
        let selected = rt
            .ZiFView(view)
            .cloned()
            .ok_or_else(|| ZiError::validation(format!("unknown view {:?}", view)))?;
        let source = rt
            .attribute
            .ty
            .as_ref()
            .and_then(|t| self.arena.ZiFAsObject(t))
            .cloned()
            .unwrap_or_default();
        let view_fields = selected
            .attribute
            .ty
            .as_ref()
            .and_then(ZiCDataType::ZiFToObject)
            .cloned()
            .unwrap_or_default();

        let projected_id = self.reserve(&rt, identifier, key);

        let mut object = ZiCObject::ZiFNew();
        for (name, view_attr) in view_fields.ZiFIter() {
            let Some(field) = source.ZiFGet(name) else {
                continue;
            };
            let mut field = field.clone();
            self.project_attribute(&mut field, view_attr, name)?;
            object.ZiFSet(name, field);
        }

        let mut validation = rt.attribute.validation.clone();
        if let Some(v) = validation.as_mut() {
            v.required.retain(|r| object.ZiFContains(r));
        }
        let description = format!(
            "{} ({} view)",
            rt.attribute
                .description
                .clone()
                .unwrap_or_else(|| format!("{} result type", rt.name)),
            view
        );
        let name = if view == ZI_DEFAULT_VIEW {
            rt.name.clone()
        } else {
            format!("{}{}", rt.name, ZiFTitle(view))
        };

        let slot = self.arena.ZiFExpectMut(projected_id)?;
        slot.name = name;
        slot.attribute = ZiCAttribute {
            ty: Some(ZiCDataType::Object(object.clone())),
            description: Some(description),
            validation,
            meta: rt.attribute.meta.clone(),
            ..ZiCAttribute::default()
        };
        if let Some(info) = slot.result.as_mut() {
            info.views = vec![ZiCViewExpr {
                name: ZI_DEFAULT_VIEW.to_string(),
                attribute: ZiCAttribute::ZiFNew(object),
            }];
        }
        Ok(projected_id)
    }

    fn project_collection(
        &mut self,
        rt: ZiCUserTypeExpr,
        view: &str,
        identifier: String,
        key: String,
    ) -> Result<ZiCTypeId> {
        let mut elem = rt
            .attribute
            .ty
            .as_ref()
            .and_then(ZiCDataType::ZiFToArray)
            .map(|a| a.elem.clone())
            .unwrap_or_default();
        let elem_id = match elem.ty {
            Some(ZiCDataType::ResultType(elem_id)) => elem_id,
            _ => {
                return Err(ZiError::validation(format!(
                    "collection {:?} element is not a result type",
                    rt.name
                )))
            }
        };

        let projected_id = self.reserve(&rt, identifier, key);
        let projected_elem = self.ZiFProject(elem_id, view)?;
        let elem_type = self.arena.ZiFExpect(projected_elem)?;
        let elem_name = elem_type.name.clone();
        let elem_view = elem_type
            .ZiFView(ZI_DEFAULT_VIEW)
            .cloned()
            .ok_or_else(|| ZiError::invariant(format!("projected type {:?} has no default view", elem_name)))?;

        elem.ty = Some(ZiCDataType::ResultType(projected_elem));
        elem.meta.ZiFRemove(ZI_VIEW_META_KEY);
        let name = format!("{}Collection", elem_name);
        let description = format!(
            "{} is the result type for an array of {} ({} view)",
            name, elem_name, view
        );

        let slot = self.arena.ZiFExpectMut(projected_id)?;
        slot.name = name;
        slot.attribute = ZiCAttribute {
            ty: Some(ZiCDataType::ZiFArrayOf(elem)),
            description: Some(description),
            meta: rt.attribute.meta.clone(),
            ..ZiCAttribute::default()
        };
        if let Some(info) = slot.result.as_mut() {
            info.views = vec![elem_view];
        }
        Ok(projected_id)
    }

    fn project_attribute(&mut self, attr: &mut ZiCAttribute, view_attr: &ZiCAttribute, field: &str) -> Result<()> {
        let Some(ty) = attr.ty.take() else {
            return Ok(());
        };
        let projected = match ty {
            ZiCDataType::ResultType(id) => {
                let view = view_attr
                    .ZiFViewName()
                    .or_else(|| attr.ZiFViewName())
                    .unwrap_or(ZI_DEFAULT_VIEW)
                    .to_string();
                let projected = self.ZiFProject(id, &view).map_err(|err| {
                    log::warn!("field {:?} names view {:?} which cannot be projected", field, view);
                    ZiError::validation(format!(
                        "view {:?} on field {:?} cannot be computed: {}",
                        view, field, err
                    ))
                })?;
                attr.meta.ZiFRemove(ZI_VIEW_META_KEY);
                ZiCDataType::ResultType(projected)
            }
            ZiCDataType::Array(mut arr) => {
                self.project_attribute(&mut arr.elem, view_attr, field)?;
                ZiCDataType::Array(arr)
            }
            ZiCDataType::Map(mut map) => {
                self.project_attribute(&mut map.elem, view_attr, field)?;
                ZiCDataType::Map(map)
            }
            ZiCDataType::Object(mut obj) => {
                let nested = view_attr.ty.as_ref().and_then(ZiCDataType::ZiFToObject);
                let empty = ZiCAttribute::default();
                for (name, child) in obj.ZiFIterMut() {
                    let child_view = nested.and_then(|n| n.ZiFGet(name)).unwrap_or(&empty);
                    self.project_attribute(child, child_view, name)?;
                }
                ZiCDataType::Object(obj)
            }
            other => other,
        };
        attr.ty = Some(projected);
        Ok(())
    }
}

impl ZiCTypeArena {
    /// Projects result type `id` with `view`. See [`ZiCProjector`].
    #[allow(non_snake_case)]
    pub fn ZiFProject(&mut self, id: ZiCTypeId, view: &str) -> Result<ZiCTypeId> {
        ZiCProjector::ZiFNew(self).ZiFProject(id, view)
    }
}
