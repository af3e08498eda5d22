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

//! # Zid Instance Validation
//!
//! Checks JSON values against a finalized design. Every problem found is
//! reported with the JSON path of the offending value; validation never
//! stops at the first failure.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::expr::attribute::ZiCAttribute;
use crate::expr::format::ZiCFormat;
use crate::expr::types::ZiCDataType;
use crate::expr::user_type::ZiCTypeArena;
use crate::expr::validation::ZiCValidation;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiCInstanceError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for ZiCInstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl ZiCAttribute {
    /// Validates `value` against this attribute. The root path is `$`.
    #[allow(non_snake_case)]
    pub fn ZiFValidateValue(&self, value: &Value, arena: &ZiCTypeArena) -> Vec<ZiCInstanceError> {
        let mut check = ZiCValueCheck::new(arena);
        check.attribute(self, value, "$");
        check.errors
    }
}

/// State of one instance validation. Patterns are compiled once per
/// validation no matter how many values they apply to.
struct ZiCValueCheck<'a> {
    arena: &'a ZiCTypeArena,
    patterns: HashMap<String, Option<Regex>>,
    errors: Vec<ZiCInstanceError>,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<'a> ZiCValueCheck<'a> {
    fn new(arena: &'a ZiCTypeArena) -> Self {
        Self {
            arena,
            patterns: HashMap::new(),
            errors: Vec::new(),
        }
    }

    fn push(&mut self, path: &str, message: String) {
        self.errors.push(ZiCInstanceError {
            path: path.to_string(),
            message,
        });
    }

    fn pattern(&mut self, pattern: &str) -> Option<&Regex> {
        self.patterns
            .entry(pattern.to_string())
            .or_insert_with(|| Regex::new(pattern).ok())
            .as_ref()
    }

    fn attribute(&mut self, attr: &ZiCAttribute, value: &Value, path: &str) {
        let Some(ty) = &attr.ty else {
            return;
        };
        if let Some(validation) = &attr.validation {
            self.contract(validation, value, path);
        }

        let arena = self.arena;
        match ty {
            ZiCDataType::UserType(id) | ZiCDataType::ResultType(id) => {
                if let Some(named) = arena.ZiFGet(*id) {
                    self.attribute(&named.attribute, value, path);
                }
            }
            ZiCDataType::Primitive(p) => {
                if !p.ZiFIsCompatible(value) {
                    self.push(path, format!("expected {} but got {}", p.ZiFName(), json_kind(value)));
                }
            }
            ZiCDataType::Array(arr) => match value.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        self.attribute(&arr.elem, item, &format!("{}[{}]", path, i));
                    }
                }
                None => self.push(path, format!("expected array but got {}", json_kind(value))),
            },
            ZiCDataType::Map(map) => match value.as_object() {
                Some(entries) => {
                    for (key, item) in entries {
                        let item_path = format!("{}.{}", path, key);
                        self.attribute(&map.key, &Value::String(key.clone()), &item_path);
                        self.attribute(&map.elem, item, &item_path);
                    }
                }
                None => self.push(path, format!("expected map but got {}", json_kind(value))),
            },
            ZiCDataType::Object(obj) => match value.as_object() {
                Some(fields) => {
                    let required = attr
                        .validation
                        .as_ref()
                        .map(|v| v.required.as_slice())
                        .unwrap_or_default();
                    for name in required {
                        if fields.get(name).map(Value::is_null).unwrap_or(true) {
                            self.push(path, format!("missing required field {:?}", name));
                        }
                    }
                    for (name, field) in obj.ZiFIter() {
                        match fields.get(name) {
                            Some(v) if !v.is_null() => self.attribute(field, v, &format!("{}.{}", path, name)),
                            _ => {}
                        }
                    }
                }
                None => self.push(path, format!("expected object but got {}", json_kind(value))),
            },
        }
    }

    fn contract(&mut self, v: &ZiCValidation, value: &Value, path: &str) {
        if let Some(values) = &v.values {
            if !values.contains(value) {
                self.push(path, format!("value {} is not one of the accepted values", value));
            }
        }
        if let Some(s) = value.as_str() {
            if let Some(pattern) = &v.pattern {
                let matched = self.pattern(pattern).map(|re| re.is_match(s));
                if matched == Some(false) {
                    self.push(path, format!("value {:?} does not match pattern {:?}", s, pattern));
                }
            }
            if let Some(format) = v.format.as_deref().and_then(ZiCFormat::ZiFParse) {
                if let Err(reason) = format.ZiFCheck(s) {
                    self.push(path, format!("value {:?} is not valid: {}", s, reason));
                }
            }
        }
        if let Some(n) = value.as_f64() {
            if let Some(min) = v.minimum {
                if n < min {
                    self.push(path, format!("value {} is lower than minimum {}", n, min));
                }
            }
            if let Some(min) = v.exclusive_minimum {
                if n <= min {
                    self.push(path, format!("value {} must be greater than {}", n, min));
                }
            }
            if let Some(max) = v.maximum {
                if n > max {
                    self.push(path, format!("value {} is greater than maximum {}", n, max));
                }
            }
            if let Some(max) = v.exclusive_maximum {
                if n >= max {
                    self.push(path, format!("value {} must be lower than {}", n, max));
                }
            }
        }
        let length = match value {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(a) => Some(a.len()),
            Value::Object(o) => Some(o.len()),
            _ => None,
        };
        if let Some(length) = length {
            if let Some(min) = v.min_length {
                if length < min {
                    self.push(path, format!("length {} is lower than min length {}", length, min));
                }
            }
            if let Some(max) = v.max_length {
                if length > max {
                    self.push(path, format!("length {} is greater than max length {}", length, max));
                }
            }
        }
    }
}
