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

//! # Zid Example Generation
//!
//! Produces example values for attributes. Output is fully determined by the
//! seed so regenerated documentation stays stable. Declared examples and
//! defaults win over generated values; generated values honour enums,
//! formats, bounds and lengths. Recursion through named types is capped so
//! cyclic types still produce finite examples.

use chrono::{DateTime, Days, NaiveDate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};
use xxhash_rust::xxh3::xxh3_64;

use crate::expr::attribute::ZiCAttribute;
use crate::expr::format::ZiCFormat;
use crate::expr::types::{ZiCDataType, ZiCPrimitive, ZiCTypeId};
use crate::expr::user_type::ZiCTypeArena;
use crate::expr::validation::ZiCValidation;

const WORDS: [&str; 12] = [
    "alpha", "bravo", "cellar", "delta", "estate", "fjord", "grape", "harvest", "island", "juniper",
    "kelp", "lagoon",
];

pub struct ZiCExampleGenerator {
    rng: SmallRng,
    max_depth: usize,
}

impl ZiCExampleGenerator {
    #[allow(non_snake_case)]
    pub fn ZiFNew(seed: &str) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(xxh3_64(seed.as_bytes())),
            max_depth: 4,
        }
    }

    /// Maximum number of nested named types entered per example.
    #[allow(non_snake_case)]
    pub fn ZiFWithMaxDepth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFExample(&mut self, attr: &ZiCAttribute, arena: &ZiCTypeArena) -> Value {
        let mut stack = Vec::new();
        self.example(attr, arena, &mut stack)
    }

    fn example(&mut self, attr: &ZiCAttribute, arena: &ZiCTypeArena, stack: &mut Vec<ZiCTypeId>) -> Value {
        if let Some(example) = &attr.example {
            return example.clone();
        }
        if let Some(default) = &attr.default_value {
            return default.clone();
        }
        let validation = attr.validation.as_ref();
        if let Some(values) = validation.and_then(|v| v.values.as_ref()) {
            if !values.is_empty() {
                let pick = self.rng.gen_range(0..values.len());
                return values[pick].clone();
            }
        }

        let Some(ty) = &attr.ty else {
            return Value::Null;
        };
        match ty {
            ZiCDataType::UserType(id) | ZiCDataType::ResultType(id) => {
                if stack.len() >= self.max_depth || stack.contains(id) {
                    return Value::Null;
                }
                let Some(named) = arena.ZiFGet(*id) else {
                    return Value::Null;
                };
                stack.push(*id);
                let value = self.example(&named.attribute, arena, stack);
                stack.pop();
                value
            }
            ZiCDataType::Primitive(p) => self.primitive(*p, validation),
            ZiCDataType::Array(arr) => {
                let count = self.length(validation, 1, 3);
                let items = (0..count)
                    .map(|_| self.example(&arr.elem, arena, stack))
                    .collect();
                Value::Array(items)
            }
            ZiCDataType::Map(map) => {
                let count = self.length(validation, 1, 2);
                let mut out = Map::new();
                for _ in 0..count {
                    let key = match self.example(&map.key, arena, stack) {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    let value = self.example(&map.elem, arena, stack);
                    out.insert(key, value);
                }
                Value::Object(out)
            }
            ZiCDataType::Object(obj) => {
                let mut out = Map::new();
                for (name, field) in obj.ZiFIter() {
                    let value = self.example(field, arena, stack);
                    if !value.is_null() {
                        out.insert(name.to_string(), value);
                    }
                }
                Value::Object(out)
            }
        }
    }

    fn length(&mut self, validation: Option<&ZiCValidation>, low: usize, high: usize) -> usize {
        let min = validation.and_then(|v| v.min_length).unwrap_or(low);
        let max = validation
            .and_then(|v| v.max_length)
            .unwrap_or_else(|| high.max(min));
        if min >= max {
            min
        } else {
            self.rng.gen_range(min..=max)
        }
    }

    fn primitive(&mut self, p: ZiCPrimitive, validation: Option<&ZiCValidation>) -> Value {
        match p {
            ZiCPrimitive::Boolean => Value::Bool(self.rng.gen_bool(0.5)),
            ZiCPrimitive::Float32 | ZiCPrimitive::Float64 => {
                let (low, high) = self.bounds(validation, 0.0, 100.0);
                let n = if low >= high { low } else { self.rng.gen_range(low..high) };
                serde_json::Number::from_f64(n)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
            p if p.ZiFIsInteger() => {
                let unsigned = matches!(p, ZiCPrimitive::UInt | ZiCPrimitive::UInt32 | ZiCPrimitive::UInt64);
                let (low, high) = self.bounds(validation, 0.0, 1000.0);
                let low = (if unsigned { low.max(0.0) } else { low }).ceil() as i64;
                let high = high.floor() as i64;
                let n = if low >= high { low } else { self.rng.gen_range(low..=high) };
                Value::from(n)
            }
            _ => {
                let format = validation
                    .and_then(|v| v.format.as_deref())
                    .and_then(ZiCFormat::ZiFParse);
                match format {
                    Some(format) => Value::String(self.formatted(format)),
                    None => Value::String(self.word(validation)),
                }
            }
        }
    }

    fn bounds(&self, validation: Option<&ZiCValidation>, low: f64, high: f64) -> (f64, f64) {
        let Some(v) = validation else {
            return (low, high);
        };
        let min = v
            .minimum
            .or(v.exclusive_minimum.map(|m| m + 1.0))
            .unwrap_or(low);
        let max = v
            .maximum
            .or(v.exclusive_maximum.map(|m| m - 1.0))
            .unwrap_or_else(|| high.max(min));
        (min, max)
    }

    fn word(&mut self, validation: Option<&ZiCValidation>) -> String {
        let mut word = WORDS[self.rng.gen_range(0..WORDS.len())].to_string();
        let min = validation.and_then(|v| v.min_length).unwrap_or(0);
        while word.chars().count() < min {
            word.push_str(WORDS[self.rng.gen_range(0..WORDS.len())]);
        }
        if let Some(max) = validation.and_then(|v| v.max_length) {
            word = word.chars().take(max).collect();
        }
        word
    }

    fn formatted(&mut self, format: ZiCFormat) -> String {
        let word = WORDS[self.rng.gen_range(0..WORDS.len())];
        match format {
            ZiCFormat::Date => NaiveDate::from_ymd_opt(2020, 1, 1)
                .and_then(|d| d.checked_add_days(Days::new(self.rng.gen_range(0..3650))))
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "2020-01-01".to_string()),
            ZiCFormat::DateTime => self.timestamp().map(|t| t.to_rfc3339()).unwrap_or_default(),
            ZiCFormat::Rfc1123 => self.timestamp().map(|t| t.to_rfc2822()).unwrap_or_default(),
            ZiCFormat::Uuid => format!(
                "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
                self.rng.gen::<u32>(),
                self.rng.gen::<u16>(),
                self.rng.gen::<u16>() & 0x0fff,
                (self.rng.gen::<u16>() & 0x3fff) | 0x8000,
                self.rng.gen::<u64>() & 0xffff_ffff_ffff
            ),
            ZiCFormat::Email => format!("{}@example.com", word),
            ZiCFormat::Hostname => format!("{}.example.com", word),
            ZiCFormat::Ipv4 | ZiCFormat::Ip => format!(
                "{}.{}.{}.{}",
                self.rng.gen_range(1..=223u8),
                self.rng.gen::<u8>(),
                self.rng.gen::<u8>(),
                self.rng.gen_range(1..=254u8)
            ),
            ZiCFormat::Ipv6 => (0..8)
                .map(|_| format!("{:x}", self.rng.gen::<u16>()))
                .collect::<Vec<_>>()
                .join(":"),
            ZiCFormat::Uri => format!("https://example.com/{}", word),
            ZiCFormat::Mac => (0..6)
                .map(|_| format!("{:02x}", self.rng.gen::<u8>()))
                .collect::<Vec<_>>()
                .join(":"),
            ZiCFormat::Cidr => format!("10.{}.0.0/16", self.rng.gen::<u8>()),
            ZiCFormat::Regexp => format!("^{}[0-9]*$", word),
            ZiCFormat::Json => format!("{{\"{}\": {}}}", word, self.rng.gen_range(0..100)),
        }
    }

    fn timestamp(&mut self) -> Option<DateTime<chrono::Utc>> {
        DateTime::from_timestamp(1_577_836_800 + self.rng.gen_range(0..315_360_000i64), 0)
    }
}
