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

//! # Zid Type Builders
//!
//! Declares named user types and the inline array and map types used as
//! attribute types.

use crate::dsl::ZiCTypeArg;
use crate::eval::context::{ZiCEvalContext, ZiCFrame};
use crate::expr::attribute::{ZiCAttribute, ZiCDSLFunc, ZiCPending};
use crate::expr::types::{ZiCDataType, ZiCObject, ZiCPrimitive};

impl ZiCEvalContext {
    /// Declares an object user type. The body runs during the execute pass
    /// and declares the fields.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFType<F>(&mut self, name: &str, body: F) -> ZiCDataType
    where
        F: Fn(&mut ZiCEvalContext) + Send + Sync + 'static,
    {
        self.declare_type(
            name,
            ZiCDataType::Object(ZiCObject::ZiFNew()),
            Some(ZiCDSLFunc::ZiFNew(body)),
        )
    }

    /// Declares a user type over an existing type, e.g. a named array or an
    /// alias of a primitive.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFTypeAlias(&mut self, name: &str, base: impl Into<ZiCTypeArg>) -> ZiCDataType {
        let base = base.into();
        match self.resolve_type_arg(&base) {
            Some(ty) => self.declare_type(name, ty, None),
            None => {
                self.ZiFReportError(format!("invalid base type {} for type {:?}", base, name));
                ZiCDataType::Primitive(ZiCPrimitive::Any)
            }
        }
    }

    /// Like [`ZiFTypeAlias`](Self::ZiFTypeAlias) with a deferred body, for
    /// example to add validations to the base type.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFTypeAliasWith<F>(&mut self, name: &str, base: impl Into<ZiCTypeArg>, body: F) -> ZiCDataType
    where
        F: Fn(&mut ZiCEvalContext) + Send + Sync + 'static,
    {
        let base = base.into();
        match self.resolve_type_arg(&base) {
            Some(ty) => self.declare_type(name, ty, Some(ZiCDSLFunc::ZiFNew(body))),
            None => {
                self.ZiFReportError(format!("invalid base type {} for type {:?}", base, name));
                ZiCDataType::Primitive(ZiCPrimitive::Any)
            }
        }
    }

    #[track_caller]
    fn declare_type(&mut self, name: &str, base: ZiCDataType, body: Option<ZiCDSLFunc>) -> ZiCDataType {
        if self.design.ZiFUserType(name).is_some() {
            self.ZiFReportError(format!("type {:?} defined twice", name));
            return ZiCDataType::Primitive(ZiCPrimitive::Any);
        }
        if !self.ZiFIsTopLevel() {
            self.ZiFIncompatibleDSL("Type");
            return ZiCDataType::Primitive(ZiCPrimitive::Any);
        }
        let attribute = ZiCAttribute {
            ty: Some(base),
            dsl: body.map(ZiCPending::Pending).unwrap_or_default(),
            ..ZiCAttribute::default()
        };
        let id = self.design.arena.ZiFAdd(name, attribute, None);
        self.design.types.push(id);
        ZiCDataType::UserType(id)
    }

    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFArrayOf(&mut self, elem: impl Into<ZiCTypeArg>) -> ZiCDataType {
        self.array_of(elem.into(), None::<fn(&mut ZiCEvalContext)>)
    }

    /// Array whose element attribute is refined by `body`, e.g. with
    /// validations on the elements.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFArrayOfWith<F>(&mut self, elem: impl Into<ZiCTypeArg>, body: F) -> ZiCDataType
    where
        F: FnOnce(&mut ZiCEvalContext),
    {
        self.array_of(elem.into(), Some(body))
    }

    #[track_caller]
    fn array_of<F>(&mut self, elem: ZiCTypeArg, body: Option<F>) -> ZiCDataType
    where
        F: FnOnce(&mut ZiCEvalContext),
    {
        let Some(ty) = self.resolve_type_arg(&elem) else {
            self.ZiFReportError("invalid ArrayOf argument: not a type and not a known user type name");
            return ZiCDataType::ZiFArrayOf(ZiCAttribute::ZiFNew(ZiCPrimitive::String));
        };
        let mut attribute = ZiCAttribute::ZiFNew(ty);
        if let Some(body) = body {
            let (_, frame) = self.ZiFExecute(body, ZiCFrame::Attribute(attribute));
            attribute = frame.ZiFIntoAttribute().unwrap_or_default();
        }
        ZiCDataType::ZiFArrayOf(attribute)
    }

    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFMapOf(&mut self, key: impl Into<ZiCTypeArg>, elem: impl Into<ZiCTypeArg>) -> ZiCDataType {
        self.map_of(key.into(), elem.into(), None::<fn(&mut ZiCEvalContext)>)
    }

    /// Map refined by `body`, which may use [`ZiFKey`](Self::ZiFKey) and
    /// [`ZiFElem`](Self::ZiFElem).
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFMapOfWith<F>(&mut self, key: impl Into<ZiCTypeArg>, elem: impl Into<ZiCTypeArg>, body: F) -> ZiCDataType
    where
        F: FnOnce(&mut ZiCEvalContext),
    {
        self.map_of(key.into(), elem.into(), Some(body))
    }

    #[track_caller]
    fn map_of<F>(&mut self, key: ZiCTypeArg, elem: ZiCTypeArg, body: Option<F>) -> ZiCDataType
    where
        F: FnOnce(&mut ZiCEvalContext),
    {
        let fallback = ZiCDataType::ZiFMapOf(
            ZiCAttribute::ZiFNew(ZiCPrimitive::String),
            ZiCAttribute::ZiFNew(ZiCPrimitive::String),
        );
        let Some(key) = self.resolve_type_arg(&key) else {
            self.ZiFReportError("invalid MapOf key argument: not a type and not a known user type name");
            return fallback;
        };
        let Some(elem) = self.resolve_type_arg(&elem) else {
            self.ZiFReportError("invalid MapOf value argument: not a type and not a known user type name");
            return fallback;
        };
        let map = ZiCDataType::ZiFMapOf(ZiCAttribute::ZiFNew(key), ZiCAttribute::ZiFNew(elem));
        let Some(body) = body else {
            return map;
        };
        let (_, frame) = self.ZiFExecute(body, ZiCFrame::Attribute(ZiCAttribute::ZiFNew(map.clone())));
        frame
            .ZiFIntoAttribute()
            .and_then(|attribute| attribute.ty)
            .unwrap_or(map)
    }

    /// Refines the key attribute of the current map attribute.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFKey<F>(&mut self, body: F)
    where
        F: FnOnce(&mut ZiCEvalContext),
    {
        let key = self
            .current_attribute()
            .and_then(|a| a.ty.as_ref())
            .and_then(ZiCDataType::ZiFToMap)
            .map(|m| m.key.clone());
        let Some(key) = key else {
            self.ZiFIncompatibleDSL("Key");
            return;
        };
        let (_, frame) = self.ZiFExecute(body, ZiCFrame::Attribute(key));
        let built = frame.ZiFIntoAttribute();
        let target = self
            .current_attribute_mut()
            .and_then(|a| a.ty.as_mut())
            .and_then(ZiCDataType::ZiFToMapMut);
        if let (Some(map), Some(built)) = (target, built) {
            map.key = built;
        }
    }

    /// Refines the element attribute of the current array or map attribute.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFElem<F>(&mut self, body: F)
    where
        F: FnOnce(&mut ZiCEvalContext),
    {
        let elem = self.current_attribute().and_then(|a| match a.ty.as_ref() {
            Some(ZiCDataType::Array(arr)) => Some(arr.elem.clone()),
            Some(ZiCDataType::Map(map)) => Some(map.elem.clone()),
            _ => None,
        });
        let Some(elem) = elem else {
            self.ZiFIncompatibleDSL("Elem");
            return;
        };
        let (_, frame) = self.ZiFExecute(body, ZiCFrame::Attribute(elem));
        let Some(built) = frame.ZiFIntoAttribute() else {
            return;
        };
        match self.current_attribute_mut().and_then(|a| a.ty.as_mut()) {
            Some(ZiCDataType::Array(arr)) => arr.elem = built,
            Some(ZiCDataType::Map(map)) => map.elem = built,
            _ => {}
        }
    }

    /// Renames the current type, or records the generated type name of the
    /// current attribute.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFTypeName(&mut self, name: &str) {
        match self.stack.last_mut() {
            Some(ZiCFrame::UserType(id)) | Some(ZiCFrame::ResultType(id)) => {
                let id = *id;
                if let Some(named) = self.design.arena.ZiFGetMut(id) {
                    named.name = name.to_string();
                }
            }
            Some(ZiCFrame::Attribute(attribute)) => attribute.meta.ZiFSet("struct:type:name", name),
            _ => self.ZiFIncompatibleDSL("TypeName"),
        }
    }
}
