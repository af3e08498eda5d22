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

//! # Zid Attribute Builders
//!
//! Builders declaring attributes and their metadata inside a type, result
//! type, view or another attribute: child attributes, defaults, examples,
//! descriptions, references and extended bases.

use serde_json::Value;

use crate::dsl::ZiCTypeArg;
use crate::eval::context::{ZiCEvalContext, ZiCFrame};
use crate::expr::attribute::ZiCAttribute;
use crate::expr::types::{ZiCDataType, ZiCObject, ZiCPrimitive};

impl ZiCEvalContext {
    /// Declares a field of the current object.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFAttribute(&mut self, name: &str, ty: impl Into<ZiCTypeArg>) {
        self.declare_attribute(name, ty.into(), None::<fn(&mut ZiCEvalContext)>);
    }

    /// Declares a field whose description, validations or nested fields are
    /// set by `body`.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFAttributeWith<F>(&mut self, name: &str, ty: impl Into<ZiCTypeArg>, body: F)
    where
        F: FnOnce(&mut ZiCEvalContext),
    {
        self.declare_attribute(name, ty.into(), Some(body));
    }

    /// Declares a field without an explicit type.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFAttributeName(&mut self, name: &str) {
        self.declare_attribute(name, ZiCTypeArg::Inherit, None::<fn(&mut ZiCEvalContext)>);
    }

    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFAttributeNameWith<F>(&mut self, name: &str, body: F)
    where
        F: FnOnce(&mut ZiCEvalContext),
    {
        self.declare_attribute(name, ZiCTypeArg::Inherit, Some(body));
    }

    #[track_caller]
    fn declare_attribute<F>(&mut self, name: &str, ty: ZiCTypeArg, body: Option<F>)
    where
        F: FnOnce(&mut ZiCEvalContext),
    {
        let parent = self.current_attribute().map(|p| {
            let shape = p
                .ty
                .as_ref()
                .map(|t| (t.ZiFIsObject(), self.design.arena.ZiFTypeName(t)));
            let exists = p
                .ty
                .as_ref()
                .and_then(ZiCDataType::ZiFToObject)
                .map(|o| o.ZiFContains(name))
                .unwrap_or(false);
            (shape, exists, p.references.clone())
        });
        let Some((shape, exists, references)) = parent else {
            self.ZiFIncompatibleDSL("Attribute");
            return;
        };
        if let Some((false, type_name)) = shape {
            self.ZiFReportError(format!(
                "can't define child attribute {:?} on attribute of type {}",
                name, type_name
            ));
            return;
        }
        if exists {
            self.ZiFReportError(format!("attribute {:?} defined twice", name));
            return;
        }

        let in_view = matches!(self.stack.last(), Some(ZiCFrame::View { .. }));
        let base = references.iter().find_map(|r| {
            self.design
                .arena
                .ZiFAsObject(r)
                .and_then(|o| o.ZiFGet(name))
                .cloned()
        });

        let explicit = match &ty {
            ZiCTypeArg::Inherit => None,
            arg => match self.resolve_type_arg(arg) {
                Some(t) => Some(t),
                None => {
                    self.ZiFReportError(format!("unknown type {} for attribute {:?}", arg, name));
                    return;
                }
            },
        };

        let mut attribute = base.unwrap_or_default();
        if let Some(t) = explicit {
            attribute.ty = Some(t);
        }
        if let Some(body) = body {
            let (_, frame) = self.ZiFExecute(body, ZiCFrame::Attribute(attribute));
            attribute = frame.ZiFIntoAttribute().unwrap_or_default();
        }
        // With a reference the type may come from a definition whose body
        // has not run yet; finalize resolves it.
        if attribute.ty.is_none() && !in_view && references.is_empty() {
            attribute.ty = Some(ZiCDataType::Primitive(ZiCPrimitive::String));
        }

        if let Some(parent) = self.current_attribute_mut() {
            let object = parent
                .ty
                .get_or_insert_with(|| ZiCDataType::Object(ZiCObject::ZiFNew()));
            if let Some(object) = object.ZiFToObjectMut() {
                object.ZiFSet(name, attribute);
            }
        }
    }

    /// Sets the default value of the current attribute.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFDefault(&mut self, value: impl Into<Value>) {
        let value = value.into();
        let Some(ty) = self.current_attribute().map(|a| a.ty.clone()) else {
            self.ZiFIncompatibleDSL("Default");
            return;
        };
        if let Some(p) = ty.as_ref().and_then(|t| self.design.arena.ZiFPrimitive(t)) {
            if !p.ZiFIsCompatible(&value) {
                self.ZiFReportError(format!(
                    "default value {} is incompatible with attribute of type {}",
                    value,
                    p.ZiFName()
                ));
                return;
            }
        }
        if let Some(attribute) = self.current_attribute_mut() {
            attribute.default_value = Some(value);
        }
    }

    /// Sets the example value of the current attribute.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFExample(&mut self, value: impl Into<Value>) {
        let value = value.into();
        let Some(ty) = self.current_attribute().map(|a| a.ty.clone()) else {
            self.ZiFIncompatibleDSL("Example");
            return;
        };
        if let Some(p) = ty.as_ref().and_then(|t| self.design.arena.ZiFPrimitive(t)) {
            if !p.ZiFIsCompatible(&value) {
                self.ZiFReportError(format!(
                    "example value {} is incompatible with attribute of type {}",
                    value,
                    p.ZiFName()
                ));
                return;
            }
        }
        if let Some(attribute) = self.current_attribute_mut() {
            attribute.example = Some(value);
        }
    }

    /// Inherits field declarations (description, validations, defaults and
    /// views) from `ty` for fields declared with the same name.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFReference(&mut self, ty: impl Into<ZiCTypeArg>) {
        if let Some(ty) = self.object_argument("Reference", ty.into()) {
            if let Some(attribute) = self.current_attribute_mut() {
                attribute.references.push(ty);
            }
        }
    }

    /// Adds every field of `ty` to the current object during finalize.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFExtend(&mut self, ty: impl Into<ZiCTypeArg>) {
        if let Some(ty) = self.object_argument("Extend", ty.into()) {
            if let Some(attribute) = self.current_attribute_mut() {
                attribute.bases.push(ty);
            }
        }
    }

    #[track_caller]
    fn object_argument(&mut self, builder: &str, arg: ZiCTypeArg) -> Option<ZiCDataType> {
        if self.current_attribute().is_none() || matches!(self.stack.last(), Some(ZiCFrame::View { .. })) {
            self.ZiFIncompatibleDSL(builder);
            return None;
        }
        let Some(ty) = self.resolve_type_arg(&arg) else {
            self.ZiFReportError(format!("unknown type {} given to {}", arg, builder));
            return None;
        };
        if !self.design.arena.ZiFIsObject(&ty) {
            self.ZiFReportError(format!(
                "argument of {} must be an object, got {}",
                builder,
                self.type_name(&ty)
            ));
            return None;
        }
        Some(ty)
    }
}
