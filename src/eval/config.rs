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

//! # Zid Evaluation Configuration
//!
//! Loop guards, example seed and tracing of a run, with a builder that
//! loads them from JSON or YAML.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Result;

/// Evaluation settings of one session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCEvalConfig {
    /// Execute-pass sweeps across all roots before the run is aborted.
    pub max_sweeps: usize,
    /// Re-iterations of one definition set while it keeps growing.
    pub max_set_iterations: usize,
    /// Seed for example generation.
    pub example_seed: String,
    /// Whether the run summary records the `(pass, root)` trace.
    pub trace: bool,
}

impl Default for ZiCEvalConfig {
    fn default() -> Self {
        ZiCEvalConfig {
            max_sweeps: 100,
            max_set_iterations: 100,
            example_seed: "zid".to_string(),
            trace: true,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZiCEvalConfigBuilder {
    pub max_sweeps: Option<usize>,
    pub max_set_iterations: Option<usize>,
    pub example_seed: Option<String>,
    pub trace: Option<bool>,
}

impl ZiCEvalConfigBuilder {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self::default()
    }

    #[allow(non_snake_case)]
    pub fn ZiFMaxSweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = Some(max_sweeps);
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFMaxSetIterations(mut self, max_set_iterations: usize) -> Self {
        self.max_set_iterations = Some(max_set_iterations);
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFExampleSeed(mut self, seed: impl Into<String>) -> Self {
        self.example_seed = Some(seed.into());
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFTrace(mut self, trace: bool) -> Self {
        self.trace = Some(trace);
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFBuild(self) -> ZiCEvalConfig {
        let base = ZiCEvalConfig::default();
        ZiCEvalConfig {
            max_sweeps: self.max_sweeps.unwrap_or(base.max_sweeps),
            max_set_iterations: self.max_set_iterations.unwrap_or(base.max_set_iterations),
            example_seed: self.example_seed.unwrap_or(base.example_seed),
            trace: self.trace.unwrap_or(base.trace),
        }
    }

    /// Lenient: malformed input yields the defaults.
    #[allow(non_snake_case)]
    pub fn ZiFFromJson(value: &Value) -> ZiCEvalConfig {
        let builder: ZiCEvalConfigBuilder = serde_json::from_value(value.clone())
            .unwrap_or_else(|_| ZiCEvalConfigBuilder::default());
        builder.ZiFBuild()
    }

    #[allow(non_snake_case)]
    pub fn ZiFFromYaml(source: &str) -> Result<ZiCEvalConfig> {
        let builder: ZiCEvalConfigBuilder = serde_yaml::from_str(source)?;
        Ok(builder.ZiFBuild())
    }
}
