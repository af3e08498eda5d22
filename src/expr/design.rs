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

//! # Zid Design Document
//!
//! The evaluated design: the API definition, the type arena and the lists of
//! registered user, result and generated types. This is what generators
//! consume once a run succeeds. It also carries the per-definition validate
//! and finalize logic driven by the scheduler.
//!
//! ## Read Contract
//!
//! - Lookups by type name ([`ZiCDesign::ZiFUserType`]) and by media type
//!   identifier ([`ZiCDesign::ZiFResultType`])
//! - View shapes via [`ZiCDesign::ZiFProject`], never by filtering fields by hand
//! - JSON export and a content fingerprint for deterministic replay checks

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, ZiCValidationErrors, ZiError};
use crate::expr::attribute::{ZiCAttribute, ZiCMeta, ZiCPending};
use crate::expr::instance::ZiCInstanceError;
use crate::expr::result_type::{ZiFCanonicalIdentifier, ZiFParseMediaType, ZI_DEFAULT_VIEW};
use crate::expr::types::{ZiCDataType, ZiCTypeId};
use crate::expr::user_type::{ZiCTypeArena, ZiCUserTypeExpr};

/// Default API name when the design declares none.
pub const ZI_DEFAULT_API_NAME: &str = "api";

/// Default API version.
pub const ZI_DEFAULT_API_VERSION: &str = "0.0.1";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiCApiExpr {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "ZiCMeta::ZiFIsEmpty")]
    pub meta: ZiCMeta,
    #[serde(skip)]
    pub dsl: ZiCPending,
}

/// Handle to a definition enumerated by a root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZiCExprRef {
    Api,
    Type(ZiCTypeId),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiCDesign {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ZiCApiExpr>,
    pub arena: ZiCTypeArena,
    /// User types in registration order.
    pub types: Vec<ZiCTypeId>,
    /// Result types in registration order.
    pub result_types: Vec<ZiCTypeId>,
    /// Collection result types created on demand.
    pub generated: Vec<ZiCTypeId>,
}

impl ZiCDesign {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self::default()
    }

    #[allow(non_snake_case)]
    pub fn ZiFGet(&self, id: ZiCTypeId) -> Option<&ZiCUserTypeExpr> {
        self.arena.ZiFGet(id)
    }

    /// Registered type (user, result or generated) with the given name.
    #[allow(non_snake_case)]
    pub fn ZiFUserType(&self, name: &str) -> Option<ZiCTypeId> {
        self.types
            .iter()
            .chain(self.result_types.iter())
            .chain(self.generated.iter())
            .copied()
            .find(|id| self.arena.ZiFGet(*id).map(|t| t.name == name).unwrap_or(false))
    }

    /// Registered result type whose canonical identifier matches.
    #[allow(non_snake_case)]
    pub fn ZiFResultType(&self, identifier: &str) -> Option<ZiCTypeId> {
        let wanted = ZiFCanonicalIdentifier(identifier);
        self.result_types
            .iter()
            .chain(self.generated.iter())
            .copied()
            .find(|id| {
                self.arena
                    .ZiFGet(*id)
                    .and_then(ZiCUserTypeExpr::ZiFIdentifier)
                    .map(|i| ZiFCanonicalIdentifier(i) == wanted)
                    .unwrap_or(false)
            })
    }

    /// Data type referring to the registered type `name`.
    #[allow(non_snake_case)]
    pub fn ZiFDataType(&self, name: &str) -> Option<ZiCDataType> {
        self.ZiFUserType(name)
            .and_then(|id| self.arena.ZiFGet(id))
            .map(ZiCUserTypeExpr::ZiFDataType)
    }

    /// Name of a definition as used in error contexts.
    #[allow(non_snake_case)]
    pub fn ZiFEvalName(&self, expr: ZiCExprRef) -> String {
        match expr {
            ZiCExprRef::Api => match &self.api {
                Some(api) => format!("API {:?}", api.name),
                None => "API".to_string(),
            },
            ZiCExprRef::Type(id) => self
                .arena
                .ZiFGet(id)
                .map(ZiCUserTypeExpr::ZiFEvalName)
                .unwrap_or_else(|| format!("type {}", id)),
        }
    }

    /// Whether a definition still carries a deferred body.
    #[allow(non_snake_case)]
    pub fn ZiFIsPending(&self, expr: ZiCExprRef) -> bool {
        match expr {
            ZiCExprRef::Api => self.api.as_ref().map(|a| a.dsl.ZiFIsPending()).unwrap_or(false),
            ZiCExprRef::Type(id) => self
                .arena
                .ZiFGet(id)
                .map(|t| t.attribute.dsl.ZiFIsPending())
                .unwrap_or(false),
        }
    }

    /// Validate-pass checks of one definition.
    #[allow(non_snake_case)]
    pub fn ZiFValidateExpr(&self, expr: ZiCExprRef) -> ZiCValidationErrors {
        let mut errors = ZiCValidationErrors::ZiFNew();
        match expr {
            ZiCExprRef::Api => {
                if let Some(api) = &self.api {
                    if api.name.trim().is_empty() {
                        errors.ZiFAdd(self.ZiFEvalName(expr), "API name cannot be empty");
                    }
                }
            }
            ZiCExprRef::Type(id) => match self.arena.ZiFGet(id) {
                Some(t) => {
                    let parent = t.ZiFEvalName();
                    errors.ZiFMerge(t.attribute.ZiFValidate("", &parent, &self.arena));
                    if t.ZiFIsResult() {
                        self.validate_result(t, &parent, &mut errors);
                    }
                }
                None => errors.ZiFAdd(format!("type {}", id), "unknown type identity"),
            },
        }
        errors
    }

    fn validate_result(&self, t: &ZiCUserTypeExpr, parent: &str, errors: &mut ZiCValidationErrors) {
        let Some(info) = &t.result else {
            return;
        };
        let (base, _) = ZiFParseMediaType(&info.identifier);
        if !base.contains('/') {
            errors.ZiFAdd(parent, format!("invalid result type identifier {:?}", info.identifier));
        }

        let rendered = match t.attribute.ty.as_ref().and_then(ZiCDataType::ZiFToArray) {
            Some(arr) => match arr.elem.ty {
                Some(ZiCDataType::ResultType(_)) => arr.elem.clone(),
                _ => {
                    errors.ZiFAdd(parent, "collection element must be a result type");
                    return;
                }
            },
            None => t.attribute.clone(),
        };

        for view in &info.views {
            let Some(fields) = view.attribute.ty.as_ref().and_then(ZiCDataType::ZiFToObject) else {
                errors.ZiFAdd(parent, format!("view {:?} must be an object", view.name));
                continue;
            };
            for (name, view_attr) in fields.ZiFIter() {
                let Some(source) = rendered.ZiFFind(name, &self.arena) else {
                    errors.ZiFAdd(
                        parent,
                        format!("view {:?} references unknown attribute {:?}", view.name, name),
                    );
                    continue;
                };
                let Some(wanted) = view_attr.ZiFViewName() else {
                    continue;
                };
                let target = match &source.ty {
                    Some(ZiCDataType::ResultType(id)) => Some(*id),
                    Some(ZiCDataType::Array(arr)) => match arr.elem.ty {
                        Some(ZiCDataType::ResultType(id)) => Some(id),
                        _ => None,
                    },
                    _ => None,
                };
                match target.and_then(|id| self.arena.ZiFGet(id)) {
                    Some(rt) => {
                        if wanted != ZI_DEFAULT_VIEW && rt.ZiFView(wanted).is_none() {
                            errors.ZiFAdd(
                                parent,
                                format!(
                                    "view {:?} field {:?} uses view {:?} which is not defined by {:?}",
                                    view.name, name, wanted, rt.name
                                ),
                            );
                        }
                    }
                    None => errors.ZiFAdd(
                        parent,
                        format!(
                            "view {:?} field {:?} uses view {:?} but is not a result type",
                            view.name, name, wanted
                        ),
                    ),
                }
            }
        }
    }

    /// Finalize-pass work of one definition: inherited and merged fields,
    /// the synthesized default view and the types of view fields.
    #[allow(non_snake_case)]
    pub fn ZiFFinalizeExpr(&mut self, expr: ZiCExprRef) -> Result<()> {
        match expr {
            ZiCExprRef::Api => {
                if let Some(api) = self.api.as_mut() {
                    if api.name.trim().is_empty() {
                        api.name = ZI_DEFAULT_API_NAME.to_string();
                    }
                    if api.version.is_none() {
                        api.version = Some(ZI_DEFAULT_API_VERSION.to_string());
                    }
                }
                Ok(())
            }
            ZiCExprRef::Type(id) => self.finalize_type(id),
        }
    }

    fn finalize_type(&mut self, id: ZiCTypeId) -> Result<()> {
        let source = self.arena.ZiFExpect(id)?;
        let mut attribute = source.attribute.clone();
        let mut result = source.result.clone();
        attribute.ZiFFinalizeInline(&self.arena)?;

        if let Some(info) = result.as_mut() {
            let rendered = match attribute.ty.as_ref().and_then(ZiCDataType::ZiFToArray) {
                Some(arr) => arr.elem.ty.as_ref(),
                None => attribute.ty.as_ref(),
            };
            let object = rendered.and_then(|t| self.arena.ZiFAsObject(t)).cloned();
            if let Some(object) = object {
                info.ZiFEnsureDefaultView(&object);
                for view in info.views.iter_mut() {
                    let Some(fields) = view.attribute.ty.as_mut().and_then(ZiCDataType::ZiFToObjectMut) else {
                        continue;
                    };
                    for (name, field) in fields.ZiFIterMut() {
                        let Some(source) = object.ZiFGet(name) else {
                            continue;
                        };
                        if field.ty.is_none() {
                            field.ty = source.ty.clone();
                        }
                        if field.description.is_none() {
                            field.description = source.description.clone();
                        }
                    }
                }
            }
        }

        let slot = self.arena.ZiFExpectMut(id)?;
        slot.attribute = attribute;
        slot.result = result;
        Ok(())
    }

    /// Projects result type `id` with `view`.
    #[allow(non_snake_case)]
    pub fn ZiFProject(&mut self, id: ZiCTypeId, view: &str) -> Result<ZiCTypeId> {
        log::debug!("projecting type {} with view {:?}", id, view);
        self.arena.ZiFProject(id, view)
    }

    /// Deep copy of a type including every named type it reaches.
    #[allow(non_snake_case)]
    pub fn ZiFDuplicate(&mut self, ty: &ZiCDataType) -> Result<ZiCDataType> {
        self.arena.ZiFDuplicate(ty)
    }

    /// Validates a JSON value against the registered type `name`.
    #[allow(non_snake_case)]
    pub fn ZiFValidateValue(&self, name: &str, value: &Value) -> Result<Vec<ZiCInstanceError>> {
        let ty = self
            .ZiFDataType(name)
            .ok_or_else(|| ZiError::validation(format!("unknown type {:?}", name)))?;
        Ok(ZiCAttribute::ZiFNew(ty).ZiFValidateValue(value, &self.arena))
    }

    /// Example value for the registered type `name`.
    #[cfg(feature = "examples")]
    #[allow(non_snake_case)]
    pub fn ZiFExample(&self, name: &str, seed: &str) -> Result<Value> {
        let ty = self
            .ZiFDataType(name)
            .ok_or_else(|| ZiError::validation(format!("unknown type {:?}", name)))?;
        let mut generator = crate::expr::example::ZiCExampleGenerator::ZiFNew(seed);
        Ok(generator.ZiFExample(&ZiCAttribute::ZiFNew(ty), &self.arena))
    }

    #[allow(non_snake_case)]
    pub fn ZiFToJson(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[allow(non_snake_case)]
    pub fn ZiFFromJson(json: &str) -> Result<ZiCDesign> {
        Ok(serde_json::from_str(json)?)
    }

    #[allow(non_snake_case)]
    pub fn ZiFWriteJson(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        log::info!("writing design document to {}", path.display());
        std::fs::write(path, self.ZiFToJson()?)?;
        Ok(())
    }

    /// blake3 digest of the JSON document, hex encoded.
    #[allow(non_snake_case)]
    pub fn ZiFFingerprint(&self) -> Result<String> {
        let json = self.ZiFToJson()?;
        Ok(hex::encode(blake3::hash(json.as_bytes()).as_bytes()))
    }
}
