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

//! # Zid Validation Builders
//!
//! Builders adding to the validation contract of the current attribute.
//! Each checks that the attribute type accepts the validation before
//! recording it.

use regex::Regex;
use serde_json::Value;

use crate::eval::context::ZiCEvalContext;
use crate::expr::format::ZiCFormat;
use crate::expr::types::ZiCDataType;

/// What a validation builder accepts, for compatibility checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ZiCAccepts {
    String,
    Number,
    Sized,
    Object,
}

impl ZiCAccepts {
    fn describe(self) -> &'static str {
        match self {
            ZiCAccepts::String => "a string",
            ZiCAccepts::Number => "an integer or a number",
            ZiCAccepts::Sized => "a string or an array",
            ZiCAccepts::Object => "an object",
        }
    }
}

impl ZiCEvalContext {
    /// Resolved type of the current attribute, `Some(None)` when it has no
    /// type yet. Records an incompatible use when there is no attribute.
    #[track_caller]
    fn validation_target(&mut self, builder: &str) -> Option<Option<ZiCDataType>> {
        match self.current_attribute().map(|a| a.ty.clone()) {
            Some(ty) => Some(ty),
            None => {
                self.ZiFIncompatibleDSL(builder);
                None
            }
        }
    }

    /// Whether the current attribute may carry `validation`, recording an
    /// error when it may not.
    #[track_caller]
    fn check_validation(&mut self, builder: &str, validation: &str, accepts: ZiCAccepts) -> bool {
        let Some(ty) = self.validation_target(builder) else {
            return false;
        };
        let Some(ty) = ty else {
            return true;
        };
        let arena = &self.design.arena;
        let ok = match accepts {
            ZiCAccepts::Object => arena.ZiFIsObject(&ty),
            ZiCAccepts::String => arena
                .ZiFPrimitive(&ty)
                .map(|p| p.ZiFIsStringLike())
                .unwrap_or(false),
            ZiCAccepts::Number => arena
                .ZiFPrimitive(&ty)
                .map(|p| p.ZiFIsNumeric())
                .unwrap_or(false),
            ZiCAccepts::Sized => {
                arena.ZiFIsArray(&ty)
                    || arena.ZiFIsMap(&ty)
                    || arena
                        .ZiFPrimitive(&ty)
                        .map(|p| p.ZiFIsStringLike())
                        .unwrap_or(false)
            }
        };
        if !ok {
            let actual = self.type_name(&ty);
            self.ZiFReportError(format!(
                "invalid {} validation definition: attribute must be {} (but type is {})",
                validation,
                accepts.describe(),
                actual
            ));
        }
        ok
    }

    /// Restricts the current attribute to the given values.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFEnum<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let Some(ty) = self.validation_target("Enum") else {
            return;
        };
        let primitive = ty.as_ref().and_then(|t| self.design.arena.ZiFPrimitive(t));
        let mut ok = true;
        if let Some(p) = primitive {
            for (i, value) in values.iter().enumerate() {
                if !p.ZiFIsCompatible(value) {
                    self.ZiFReportError(format!(
                        "value {} at index {} is incompatible with attribute of type {}",
                        value,
                        i,
                        p.ZiFName()
                    ));
                    ok = false;
                }
            }
        }
        if ok {
            if let Some(attribute) = self.current_attribute_mut() {
                attribute.ZiFValidationMut().values = Some(values);
            }
        }
    }

    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFFormat(&mut self, format: &str) {
        if ZiCFormat::ZiFParse(format).is_none() {
            self.ZiFReportError(format!("invalid validation format {:?}", format));
            return;
        }
        if self.check_validation("Format", "format", ZiCAccepts::String) {
            if let Some(attribute) = self.current_attribute_mut() {
                attribute.ZiFValidationMut().format = Some(format.to_string());
            }
        }
    }

    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFPattern(&mut self, pattern: &str) {
        if !self.check_validation("Pattern", "pattern", ZiCAccepts::String) {
            return;
        }
        if let Err(err) = Regex::new(pattern) {
            self.ZiFReportError(format!("invalid pattern {:?}, {}", pattern, err));
            return;
        }
        if let Some(attribute) = self.current_attribute_mut() {
            attribute.ZiFValidationMut().pattern = Some(pattern.to_string());
        }
    }

    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFMinimum(&mut self, value: impl Into<f64>) {
        let value = value.into();
        if self.check_validation("Minimum", "minimum", ZiCAccepts::Number) {
            if let Some(attribute) = self.current_attribute_mut() {
                attribute.ZiFValidationMut().minimum = Some(value);
            }
        }
    }

    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFMaximum(&mut self, value: impl Into<f64>) {
        let value = value.into();
        if self.check_validation("Maximum", "maximum", ZiCAccepts::Number) {
            if let Some(attribute) = self.current_attribute_mut() {
                attribute.ZiFValidationMut().maximum = Some(value);
            }
        }
    }

    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFExclusiveMinimum(&mut self, value: impl Into<f64>) {
        let value = value.into();
        if self.check_validation("ExclusiveMinimum", "exclusive minimum", ZiCAccepts::Number) {
            if let Some(attribute) = self.current_attribute_mut() {
                attribute.ZiFValidationMut().exclusive_minimum = Some(value);
            }
        }
    }

    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFExclusiveMaximum(&mut self, value: impl Into<f64>) {
        let value = value.into();
        if self.check_validation("ExclusiveMaximum", "exclusive maximum", ZiCAccepts::Number) {
            if let Some(attribute) = self.current_attribute_mut() {
                attribute.ZiFValidationMut().exclusive_maximum = Some(value);
            }
        }
    }

    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFMinLength(&mut self, length: usize) {
        if self.check_validation("MinLength", "minimum length", ZiCAccepts::Sized) {
            if let Some(attribute) = self.current_attribute_mut() {
                attribute.ZiFValidationMut().min_length = Some(length);
            }
        }
    }

    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFMaxLength(&mut self, length: usize) {
        if self.check_validation("MaxLength", "maximum length", ZiCAccepts::Sized) {
            if let Some(attribute) = self.current_attribute_mut() {
                attribute.ZiFValidationMut().max_length = Some(length);
            }
        }
    }

    /// Adds required field names to the current object. Names already
    /// required are kept once.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFRequired<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.check_validation("Required", "required", ZiCAccepts::Object) {
            if let Some(attribute) = self.current_attribute_mut() {
                attribute.ZiFValidationMut().ZiFAddRequired(names);
            }
        }
    }
}
