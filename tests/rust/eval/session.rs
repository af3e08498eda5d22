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


use std::sync::{Arc, Mutex};

use zid::{ZiCCurrent, ZiCErrorKind, ZiCEvalContext, ZiCPrimitive, ZiError};

#[test]
fn test_current_definition_follows_nesting() {
    let seen: Arc<Mutex<Vec<ZiCCurrent>>> = Arc::new(Mutex::new(Vec::new()));
    let mut ctx = ZiCEvalContext::ZiFNew();
    assert_eq!(ctx.ZiFCurrent(), ZiCCurrent::Top);
    assert!(ctx.ZiFIsTopLevel());

    let record = seen.clone();
    ctx.ZiFApi("cellar", move |ctx| record.lock().unwrap().push(ctx.ZiFCurrent()));
    let record = seen.clone();
    ctx.ZiFType("Bottle", move |ctx| {
        record.lock().unwrap().push(ctx.ZiFCurrent());
        let inner = record.clone();
        ctx.ZiFAttributeWith("name", ZiCPrimitive::String, move |ctx| {
            inner.lock().unwrap().push(ctx.ZiFCurrent());
            assert_eq!(ctx.ZiFDepth(), 2);
        });
    });
    let record = seen.clone();
    ctx.ZiFResultType("application/vnd.bottle", move |ctx| {
        ctx.ZiFAttributes(|ctx| ctx.ZiFAttribute("name", ZiCPrimitive::String));
        let inner = record.clone();
        ctx.ZiFViewWith("tiny", move |ctx| {
            inner.lock().unwrap().push(ctx.ZiFCurrent());
            ctx.ZiFAttributeName("name");
        });
    });

    ctx.ZiFRun().unwrap();

    let bottle = ctx.ZiFDesign().ZiFUserType("Bottle").unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ZiCCurrent::Api,
            ZiCCurrent::UserType(bottle),
            ZiCCurrent::Attribute,
            ZiCCurrent::View("tiny".to_string()),
        ]
    );
    assert_eq!(ctx.ZiFCurrent(), ZiCCurrent::Top);
}

#[test]
fn test_builder_outside_its_definition() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFAttribute("name", ZiCPrimitive::String);
    ctx.ZiFType("Bottle", |ctx| {
        ctx.ZiFTitle("cellar");
        ctx.ZiFAttribute("name", ZiCPrimitive::String);
    });

    assert_eq!(ctx.ZiFErrors().ZiFMessages(), vec!["invalid use of Attribute (top level)".to_string()]);

    let err = ctx.ZiFRun().unwrap_err();
    let errors = err.ZiFDslErrors().unwrap();
    assert_eq!(
        errors.ZiFMessages(),
        vec![
            "invalid use of Attribute (top level)".to_string(),
            r#"invalid use of Title in type "Bottle""#.to_string(),
        ]
    );
    assert!(errors.ZiFIter().all(|e| e.kind == ZiCErrorKind::IncompatibleUse));
    assert_eq!(errors.0[0].context, None);
    assert_eq!(errors.0[1].context.as_deref(), Some(r#"type "Bottle""#));
}

#[test]
fn test_errors_point_at_the_declaring_line() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFAttribute("name", ZiCPrimitive::String); let line = line!();

    let error = &ctx.ZiFErrors().0[0];
    assert!(error.file.as_deref().unwrap().ends_with("session.rs"));
    assert_eq!(error.line, line);
    assert!(error.to_string().starts_with('['));
}

#[test]
fn test_nested_type_declaration_rejected() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFType("Outer", |ctx| {
        ctx.ZiFType("Inner", |_| {});
    });
    match ctx.ZiFRun() {
        Err(ZiError::Dsl(errors)) => assert_eq!(
            errors.ZiFMessages(),
            vec![r#"invalid use of Type in type "Outer""#.to_string()]
        ),
        other => panic!("unexpected run result: {:?}", other),
    }
    assert!(ctx.ZiFDesign().ZiFUserType("Inner").is_none());
}

#[test]
fn test_reset_starts_a_fresh_session() {
    let mut ctx = ZiCEvalContext::ZiFNew();
    ctx.ZiFAttribute("name", ZiCPrimitive::String);
    ctx.ZiFType("Bottle", |_| {});
    ctx.ZiFReset();
    assert!(ctx.ZiFErrors().ZiFIsEmpty());
    assert!(ctx.ZiFDesign().types.is_empty());
    assert!(ctx.ZiFRun().is_ok());
}
