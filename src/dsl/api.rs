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

//! # Zid API Builders
//!
//! Declares the API definition of a design: its name, title, version and
//! description. The body runs during the execute pass like any other
//! definition.

use crate::eval::context::{ZiCEvalContext, ZiCFrame};
use crate::expr::attribute::{ZiCDSLFunc, ZiCPending};
use crate::expr::design::ZiCApiExpr;

impl ZiCEvalContext {
    /// Declares the API. The body runs during the execute pass.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFApi<F>(&mut self, name: &str, body: F)
    where
        F: Fn(&mut ZiCEvalContext) + Send + Sync + 'static,
    {
        if !self.ZiFIsTopLevel() {
            self.ZiFIncompatibleDSL("API");
            return;
        }
        if let Some(existing) = &self.design.api {
            let message = format!("API {:?} is already defined, cannot define {:?}", existing.name, name);
            self.ZiFReportError(message);
            return;
        }
        self.design.api = Some(ZiCApiExpr {
            name: name.to_string(),
            dsl: ZiCPending::Pending(ZiCDSLFunc::ZiFNew(body)),
            ..ZiCApiExpr::default()
        });
    }

    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFTitle(&mut self, title: &str) {
        match (self.stack.last(), self.design.api.as_mut()) {
            (Some(ZiCFrame::Api), Some(api)) => api.title = Some(title.to_string()),
            _ => self.ZiFIncompatibleDSL("Title"),
        }
    }

    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFVersion(&mut self, version: &str) {
        match (self.stack.last(), self.design.api.as_mut()) {
            (Some(ZiCFrame::Api), Some(api)) => api.version = Some(version.to_string()),
            _ => self.ZiFIncompatibleDSL("Version"),
        }
    }

    /// Sets the description of the API or of the current type, attribute or
    /// view.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFDescription(&mut self, description: &str) {
        if let Some(ZiCFrame::Api) = self.stack.last() {
            if let Some(api) = self.design.api.as_mut() {
                api.description = Some(description.to_string());
                return;
            }
        }
        match self.current_attribute_mut() {
            Some(attribute) => attribute.description = Some(description.to_string()),
            None => self.ZiFIncompatibleDSL("Description"),
        }
    }

    /// Adds metadata values to the API or to the current attribute.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFMeta(&mut self, name: &str, values: &[&str]) {
        let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        if let Some(ZiCFrame::Api) = self.stack.last() {
            if let Some(api) = self.design.api.as_mut() {
                api.meta.ZiFAdd(name, values);
                return;
            }
        }
        match self.current_attribute_mut() {
            Some(attribute) => attribute.meta.ZiFAdd(name, values),
            None => self.ZiFIncompatibleDSL("Meta"),
        }
    }
}
