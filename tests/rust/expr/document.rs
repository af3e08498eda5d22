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


use serde_json::Value;
use tempfile::tempdir;
use zid::{ZiCDesign, ZiCEvalConfigBuilder, ZiCEvalContext, ZiCPrimitive};

fn cellar(seed: &str) -> ZiCEvalContext {
    let config = ZiCEvalConfigBuilder::ZiFNew().ZiFExampleSeed(seed).ZiFBuild();
    let mut ctx = ZiCEvalContext::ZiFWithConfig(config);
    ctx.ZiFApi("cellar", |ctx| {
        ctx.ZiFTitle("The cellar API");
        ctx.ZiFMeta("owner", &["sommelier"]);
    });
    ctx.ZiFType("Bottle", |ctx| {
        ctx.ZiFAttributeWith("name", ZiCPrimitive::String, |ctx| {
            ctx.ZiFMinLength(2);
            ctx.ZiFMaxLength(20);
        });
        ctx.ZiFAttributeWith("vintage", ZiCPrimitive::Int, |ctx| {
            ctx.ZiFMinimum(1900);
            ctx.ZiFMaximum(2030);
        });
        ctx.ZiFAttributeWith("color", ZiCPrimitive::String, |ctx| ctx.ZiFEnum(["red", "white"]));
        let tags = ctx.ZiFArrayOf(ZiCPrimitive::String);
        ctx.ZiFAttribute("tags", tags);
        ctx.ZiFRequired(["name", "vintage"]);
    });
    ctx.ZiFResultType("application/vnd.bottle", |ctx| {
        ctx.ZiFExtend("Bottle");
        ctx.ZiFViewWith("tiny", |ctx| ctx.ZiFAttributeName("name"));
    });
    ctx.ZiFRun().unwrap();
    ctx
}

#[test]
fn test_export_to_file() {
    let ctx = cellar("zid");
    let dir = tempdir().unwrap();
    let path = dir.path().join("design.json");
    ctx.ZiFDesign().ZiFWriteJson(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let doc: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc["api"]["name"], "cellar");
    assert_eq!(doc["api"]["title"], "The cellar API");
    assert_eq!(doc["api"]["version"], "0.0.1");

    let restored = ZiCDesign::ZiFFromJson(&text).unwrap();
    assert_eq!(&restored, ctx.ZiFDesign());
}

#[test]
fn test_fingerprint_is_deterministic() {
    let first = cellar("zid").ZiFDesign().ZiFFingerprint().unwrap();
    let second = cellar("zid").ZiFDesign().ZiFFingerprint().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 64);

    let mut other = cellar("zid");
    other.ZiFType("Cork", |ctx| ctx.ZiFAttribute("material", ZiCPrimitive::String));
    other.ZiFRun().unwrap();
    assert_ne!(other.ZiFDesign().ZiFFingerprint().unwrap(), first);
}

#[cfg(feature = "examples")]
#[test]
fn test_examples_are_seeded_and_valid() {
    let first = cellar("bordeaux").ZiFGenerateExample("Bottle").unwrap();
    let second = cellar("bordeaux").ZiFGenerateExample("Bottle").unwrap();
    assert_eq!(first, second);

    let ctx = cellar("bordeaux");
    assert!(ctx.ZiFValidateValue("Bottle", &first).unwrap().is_empty(), "{}", first);
    assert!(first.get("name").is_some());
    assert!(first.get("vintage").is_some());
}
