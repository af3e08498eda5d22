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

//! # Zid Validation Contract
//!
//! A validation contract constrains the values an attribute accepts. The
//! contract itself is checked for consistency during the validate pass and
//! contracts compose by union when types are merged.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::expr::attribute::push_unique;
use crate::expr::format::ZiCFormat;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiCValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl ZiCValidation {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self::default()
    }

    /// Adds required names, ignoring ones already present.
    #[allow(non_snake_case)]
    pub fn ZiFAddRequired<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            push_unique(&mut self.required, name.as_ref());
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFRemoveRequired(&mut self, name: &str) {
        self.required.retain(|n| n != name);
    }

    /// True when the contract carries nothing but required names.
    #[allow(non_snake_case)]
    pub fn ZiFHasRequiredOnly(&self) -> bool {
        let mut without_required = self.clone();
        without_required.required.clear();
        without_required == ZiCValidation::default()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsEmpty(&self) -> bool {
        self == &ZiCValidation::default()
    }

    /// Merges `other` into this contract. Values, format and pattern already
    /// set here win. Bounds widen so the result accepts what either accepted.
    #[allow(non_snake_case)]
    pub fn ZiFMerge(&mut self, other: &ZiCValidation) {
        if self.values.is_none() {
            self.values = other.values.clone();
        }
        if self.format.is_none() {
            self.format = other.format.clone();
        }
        if self.pattern.is_none() {
            self.pattern = other.pattern.clone();
        }
        self.exclusive_minimum = lower(self.exclusive_minimum, other.exclusive_minimum);
        self.minimum = lower(self.minimum, other.minimum);
        self.maximum = upper(self.maximum, other.maximum);
        self.exclusive_maximum = upper(self.exclusive_maximum, other.exclusive_maximum);
        self.min_length = match (self.min_length, other.min_length) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (None, b) => b,
            (a, None) => a,
        };
        self.max_length = match (self.max_length, other.max_length) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (None, b) => b,
            (a, None) => a,
        };
        self.ZiFAddRequired(other.required.iter());
    }

    /// Fills every constraint left unset here from `parent` and adds the
    /// parent's required names. Constraints already set are kept as is.
    #[allow(non_snake_case)]
    pub fn ZiFInheritFrom(&mut self, parent: &ZiCValidation) {
        if self.values.is_none() {
            self.values = parent.values.clone();
        }
        if self.format.is_none() {
            self.format = parent.format.clone();
        }
        if self.pattern.is_none() {
            self.pattern = parent.pattern.clone();
        }
        self.exclusive_minimum = self.exclusive_minimum.or(parent.exclusive_minimum);
        self.minimum = self.minimum.or(parent.minimum);
        self.maximum = self.maximum.or(parent.maximum);
        self.exclusive_maximum = self.exclusive_maximum.or(parent.exclusive_maximum);
        self.min_length = self.min_length.or(parent.min_length);
        self.max_length = self.max_length.or(parent.max_length);
        self.ZiFAddRequired(parent.required.iter());
    }

    /// Consistency problems of the contract itself.
    #[allow(non_snake_case)]
    pub fn ZiFValidate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if let Some(values) = &self.values {
            if values.is_empty() {
                problems.push("enum validation must define at least one value".to_string());
            }
        }
        if self.minimum.is_some() && self.exclusive_minimum.is_some() {
            problems.push("both minimum and exclusive minimum are defined".to_string());
        }
        if self.maximum.is_some() && self.exclusive_maximum.is_some() {
            problems.push("both maximum and exclusive maximum are defined".to_string());
        }
        // An exclusive bound on either side rules out equal bounds too.
        let lows = [(self.minimum, false), (self.exclusive_minimum, true)];
        let highs = [(self.maximum, false), (self.exclusive_maximum, true)];
        for (low, low_exclusive) in lows {
            for (high, high_exclusive) in highs {
                let (Some(low), Some(high)) = (low, high) else {
                    continue;
                };
                if low > high {
                    problems.push(format!(
                        "minimum value {} is greater than maximum value {}",
                        low, high
                    ));
                } else if low == high && (low_exclusive || high_exclusive) {
                    problems.push(format!(
                        "minimum value {} is equal to maximum value {} but one bound is exclusive",
                        low, high
                    ));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                problems.push(format!("min length {} is greater than max length {}", min, max));
            }
        }
        if let Some(pattern) = &self.pattern {
            if let Err(err) = Regex::new(pattern) {
                problems.push(format!("invalid pattern {:?}: {}", pattern, err));
            }
        }
        if let Some(format) = &self.format {
            if ZiCFormat::ZiFParse(format).is_none() {
                problems.push(format!("unsupported format {:?}", format));
            }
        }
        problems
    }
}

fn lower(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (None, b) => b,
        (a, None) => a,
    }
}

fn upper(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (None, b) => b,
        (a, None) => a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_merge_keeps_own_values_and_unions_required() {
        let mut target = ZiCValidation::ZiFNew();
        target.pattern = Some("^a".to_string());
        target.minimum = Some(5.0);
        target.ZiFAddRequired(["id"]);

        let mut other = ZiCValidation::ZiFNew();
        other.pattern = Some("^b".to_string());
        other.format = Some("email".to_string());
        other.minimum = Some(1.0);
        other.ZiFAddRequired(["id", "name"]);

        target.ZiFMerge(&other);
        assert_eq!(target.pattern.as_deref(), Some("^a"));
        assert_eq!(target.format.as_deref(), Some("email"));
        assert_eq!(target.minimum, Some(1.0));
        assert_eq!(target.required, vec!["id".to_string(), "name".to_string()]);
    }

    #[test]
    fn test_contract_consistency_checks() {
        let mut v = ZiCValidation::ZiFNew();
        v.minimum = Some(1.0);
        v.exclusive_minimum = Some(1.0);
        v.min_length = Some(4);
        v.max_length = Some(2);
        v.pattern = Some("(".to_string());
        v.format = Some("nope".to_string());

        let problems = v.ZiFValidate();
        assert_eq!(problems.len(), 4, "{:?}", problems);
    }

    #[test]
    fn test_exclusive_bounds_reject_equal_values() {
        let mut v = ZiCValidation::ZiFNew();
        v.minimum = Some(5.0);
        v.exclusive_maximum = Some(5.0);
        assert_eq!(
            v.ZiFValidate(),
            vec!["minimum value 5 is equal to maximum value 5 but one bound is exclusive".to_string()]
        );

        let mut v = ZiCValidation::ZiFNew();
        v.exclusive_minimum = Some(7.0);
        v.maximum = Some(3.0);
        assert_eq!(
            v.ZiFValidate(),
            vec!["minimum value 7 is greater than maximum value 3".to_string()]
        );

        let mut v = ZiCValidation::ZiFNew();
        v.minimum = Some(5.0);
        v.maximum = Some(5.0);
        assert!(v.ZiFValidate().is_empty());
    }

    #[test]
    fn test_required_only() {
        let mut v = ZiCValidation::ZiFNew();
        v.ZiFAddRequired(["a"]);
        assert!(v.ZiFHasRequiredOnly());
        v.max_length = Some(3);
        assert!(!v.ZiFHasRequiredOnly());
        v.ZiFRemoveRequired("a");
        assert!(v.required.is_empty());
    }

    proptest! {
        #[test]
        fn prop_merge_with_self_is_identity(min in -1000i32..1000, span in 0i32..1000, names in proptest::collection::vec("[a-z]{1,6}", 0..6)) {
            let mut v = ZiCValidation::ZiFNew();
            v.minimum = Some(min as f64);
            v.maximum = Some((min + span) as f64);
            v.ZiFAddRequired(names.iter());
            let copy = v.clone();
            v.ZiFMerge(&copy);
            prop_assert_eq!(v, copy);
        }

        #[test]
        fn prop_required_is_union(a in proptest::collection::vec("[a-z]{1,4}", 0..5), b in proptest::collection::vec("[a-z]{1,4}", 0..5)) {
            let mut left = ZiCValidation::ZiFNew();
            left.ZiFAddRequired(a.iter());
            let mut right = ZiCValidation::ZiFNew();
            right.ZiFAddRequired(b.iter());
            left.ZiFMerge(&right);
            for name in a.iter().chain(b.iter()) {
                prop_assert_eq!(left.required.iter().filter(|n| *n == name).count(), 1);
            }
        }
    }
}
