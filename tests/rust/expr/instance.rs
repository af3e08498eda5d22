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


use serde_json::json;
use zid::{ZiCEvalContext, ZiCPrimitive, ZiError};

fn people() -> ZiCEvalContext {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFType("Person", |ctx| {
        ctx.ZiFAttribute("name", ZiCPrimitive::String);
        ctx.ZiFAttributeWith("age", ZiCPrimitive::Int, |ctx| ctx.ZiFMinimum(0));
        ctx.ZiFAttributeWith("email", ZiCPrimitive::String, |ctx| ctx.ZiFFormat("email"));
        ctx.ZiFAttribute("address", "Address");
        ctx.ZiFRequired(["name"]);
    });
    ctx.ZiFType("Address", |ctx| {
        ctx.ZiFAttribute("city", ZiCPrimitive::String);
        ctx.ZiFAttributeWith("zip", ZiCPrimitive::String, |ctx| ctx.ZiFPattern("^[0-9]{5}$"));
        ctx.ZiFRequired(["city"]);
    });
    ctx.ZiFRun().unwrap();
    ctx
}

#[test]
fn test_missing_required_field() {
    let ctx = people();
    let errors = ctx.ZiFValidateValue("Person", &json!({"age": 30})).unwrap();
    assert_eq!(errors.len(), 1, "{:?}", errors);
    assert!(errors[0].contains("name"));
    assert_eq!(errors[0], r#"$: missing required field "name""#);
}

#[test]
fn test_valid_value() {
    let ctx = people();
    let value = json!({
        "name": "Ada",
        "age": 36,
        "email": "ada@example.com",
        "address": {"city": "London", "zip": "12345"}
    });
    assert!(ctx.ZiFValidateValue("Person", &value).unwrap().is_empty());
}

#[test]
fn test_every_problem_is_reported_with_its_path() {
    let ctx = people();
    let value = json!({
        "name": 7,
        "age": -1,
        "email": "not an address",
        "address": {"zip": "abc"}
    });
    let errors = ctx.ZiFValidateValue("Person", &value).unwrap();
    let paths: Vec<&str> = errors.iter().map(|e| e.split(':').next().unwrap()).collect();
    assert_eq!(errors.len(), 5, "{:?}", errors);
    assert!(paths.contains(&"$.name"));
    assert!(paths.contains(&"$.age"));
    assert!(paths.contains(&"$.email"));
    assert!(paths.contains(&"$.address"));
    assert!(paths.contains(&"$.address.zip"));
}

#[test]
fn test_unknown_type_and_failed_run() {
    let ctx = people();
    assert!(matches!(
        ctx.ZiFValidateValue("Cat", &json!({})),
        Err(ZiError::Validation { .. })
    ));

    let mut broken = ZiCEvalContext::ZiFNew();
    broken.ZiFAttribute("name", ZiCPrimitive::String);
    assert!(matches!(
        broken.ZiFValidateValue("Person", &json!({})),
        Err(ZiError::Dsl(_))
    ));
}
