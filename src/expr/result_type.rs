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

//! # Zid Result Types
//!
//! Result types are user types extended with a media type identifier and a
//! set of named views. Each view is an object attribute listing a subset of
//! the result type's fields. This module also holds the small media type
//! helpers used to derive canonical identifiers and type names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::expr::attribute::ZiCAttribute;
use crate::expr::types::ZiCObject;

/// Name of the view every result type resolves.
pub const ZI_DEFAULT_VIEW: &str = "default";

/// Metadata key assigning a view to an attribute.
pub const ZI_VIEW_META_KEY: &str = "view";

/// Identifier parameter marking a projected view.
pub const ZI_VIEW_PARAM: &str = "view";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCViewExpr {
    pub name: String,
    pub attribute: ZiCAttribute,
}

impl ZiCViewExpr {
    /// Field names rendered by the view, in declaration order.
    #[allow(non_snake_case)]
    pub fn ZiFFieldNames(&self) -> Vec<String> {
        self.attribute
            .ty
            .as_ref()
            .and_then(|t| t.ZiFToObject())
            .map(ZiCObject::ZiFNames)
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiCResultInfo {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub views: Vec<ZiCViewExpr>,
}

impl ZiCResultInfo {
    #[allow(non_snake_case)]
    pub fn ZiFNew(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFView(&self, name: &str) -> Option<&ZiCViewExpr> {
        self.views.iter().find(|v| v.name == name)
    }

    #[allow(non_snake_case)]
    pub fn ZiFViewMut(&mut self, name: &str) -> Option<&mut ZiCViewExpr> {
        self.views.iter_mut().find(|v| v.name == name)
    }

    #[allow(non_snake_case)]
    pub fn ZiFHasView(&self, name: &str) -> bool {
        self.ZiFView(name).is_some()
    }

    /// Synthesizes the default view from `object` when none was declared.
    /// Returns whether a view was added.
    #[allow(non_snake_case)]
    pub fn ZiFEnsureDefaultView(&mut self, object: &ZiCObject) -> bool {
        if self.ZiFHasView(ZI_DEFAULT_VIEW) {
            return false;
        }
        self.views.insert(
            0,
            ZiCViewExpr {
                name: ZI_DEFAULT_VIEW.to_string(),
                attribute: ZiCAttribute::ZiFNew(object.clone()),
            },
        );
        true
    }

    /// Value of the identifier's view parameter.
    #[allow(non_snake_case)]
    pub fn ZiFProjectedView(&self) -> Option<String> {
        let (_, params) = ZiFParseMediaType(&self.identifier);
        params.get(ZI_VIEW_PARAM).cloned()
    }
}

/// Splits a media type into its lowercase base and its parameters.
#[allow(non_snake_case)]
pub fn ZiFParseMediaType(identifier: &str) -> (String, BTreeMap<String, String>) {
    let mut parts = identifier.split(';');
    let base = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
    let mut params = BTreeMap::new();
    for part in parts {
        if let Some((key, value)) = part.split_once('=') {
            let value = value.trim().trim_matches('"');
            params.insert(key.trim().to_ascii_lowercase(), value.to_string());
        }
    }
    (base, params)
}

#[allow(non_snake_case)]
pub fn ZiFFormatMediaType(base: &str, params: &BTreeMap<String, String>) -> String {
    let mut out = base.to_string();
    for (key, value) in params {
        out.push_str(&format!("; {}={}", key, value));
    }
    out
}

/// Identifier with any structured syntax suffix and the view parameter
/// removed, used to detect duplicate result types.
#[allow(non_snake_case)]
pub fn ZiFCanonicalIdentifier(identifier: &str) -> String {
    let (base, mut params) = ZiFParseMediaType(identifier);
    let base = match base.split_once('+') {
        Some((head, _)) => head.to_string(),
        None => base,
    };
    params.remove(ZI_VIEW_PARAM);
    ZiFFormatMediaType(&base, &params)
}

/// Identifier with the view parameter set to `view`.
#[allow(non_snake_case)]
pub fn ZiFViewIdentifier(identifier: &str, view: &str) -> String {
    let (base, mut params) = ZiFParseMediaType(identifier);
    params.insert(ZI_VIEW_PARAM.to_string(), view.to_string());
    ZiFFormatMediaType(&base, &params)
}

/// Derives a type name from a media type, e.g. `application/vnd.goa.bottle`
/// becomes `GoaBottle`. Returns an empty string when nothing usable remains.
#[allow(non_snake_case)]
pub fn ZiFTypeNameFromIdentifier(identifier: &str) -> String {
    let (base, _) = ZiFParseMediaType(identifier);
    let last = base.rsplit('/').next().unwrap_or_default();
    let last = match last.split_once('+') {
        Some((head, _)) => head,
        None => last,
    };
    let last = last.strip_prefix("vnd.").unwrap_or(last);
    last.split(|c: char| c == '.' || c == '-' || c == '_')
        .map(ZiFTitle)
        .collect::<Vec<_>>()
        .join("")
}

/// Uppercases the first character.
#[allow(non_snake_case)]
pub fn ZiFTitle(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
