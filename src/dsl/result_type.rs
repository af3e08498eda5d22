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

//! # Zid Result Type Builders
//!
//! Declares result types, their views and the collection result types
//! created by `CollectionOf`. Collections are registered with the generated
//! root so they are executed after the types they wrap.

use crate::dsl::ZiCTypeArg;
use crate::eval::context::{ZiCEvalContext, ZiCFrame};
use crate::expr::attribute::{ZiCAttribute, ZiCDSLFunc, ZiCPending};
use crate::expr::result_type::{
    ZiCResultInfo, ZiCViewExpr, ZiFCanonicalIdentifier, ZiFFormatMediaType, ZiFParseMediaType,
    ZiFTypeNameFromIdentifier, ZI_VIEW_META_KEY,
};
use crate::expr::types::{ZiCDataType, ZiCObject, ZiCPrimitive, ZiCTypeId};

const ZI_COLLECTION_PARAM: &str = "type";
const ZI_COLLECTION_VALUE: &str = "collection";

impl ZiCEvalContext {
    /// Declares a result type identified by a media type. The body runs
    /// during the execute pass and declares attributes and views.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFResultType<F>(&mut self, identifier: &str, body: F) -> ZiCDataType
    where
        F: Fn(&mut ZiCEvalContext) + Send + Sync + 'static,
    {
        if !self.ZiFIsTopLevel() {
            self.ZiFIncompatibleDSL("ResultType");
            return ZiCDataType::Primitive(ZiCPrimitive::Any);
        }

        let (mut base, params) = ZiFParseMediaType(identifier);
        if !base.contains('/') {
            self.ZiFReportError(format!("invalid result type identifier {:?}", identifier));
            base = "text/plain".to_string();
        }
        let canonical = ZiFCanonicalIdentifier(identifier);
        if self.design.ZiFResultType(identifier).is_some() {
            self.ZiFReportError(format!(
                "result type {:?} with canonical identifier {:?} is defined twice",
                identifier, canonical
            ));
            return ZiCDataType::Primitive(ZiCPrimitive::Any);
        }
        let identifier = ZiFFormatMediaType(&base, &params);

        let mut name = ZiFTypeNameFromIdentifier(&identifier);
        if name.is_empty() {
            self.result_type_count += 1;
            name = format!("ResultType{}", self.result_type_count);
        }

        let attribute = ZiCAttribute {
            ty: Some(ZiCDataType::Object(ZiCObject::ZiFNew())),
            dsl: ZiCPending::Pending(ZiCDSLFunc::ZiFNew(body)),
            ..ZiCAttribute::default()
        };
        let id = self
            .design
            .arena
            .ZiFAdd(name, attribute, Some(ZiCResultInfo::ZiFNew(identifier)));
        self.design.result_types.push(id);
        ZiCDataType::ResultType(id)
    }

    fn current_result_type(&self) -> Option<ZiCTypeId> {
        match self.stack.last() {
            Some(ZiCFrame::ResultType(id)) => Some(*id),
            _ => None,
        }
    }

    /// Runs `body` against the attributes of the current result type.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFAttributes<F>(&mut self, body: F)
    where
        F: FnOnce(&mut ZiCEvalContext),
    {
        match self.current_result_type() {
            Some(id) => {
                self.ZiFExecute(body, ZiCFrame::ResultType(id));
            }
            None => self.ZiFIncompatibleDSL("Attributes"),
        }
    }

    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFContentType(&mut self, content_type: &str) {
        let info = self
            .current_result_type()
            .and_then(|id| self.design.arena.ZiFGetMut(id))
            .and_then(|t| t.result.as_mut());
        match info {
            Some(info) => info.content_type = Some(content_type.to_string()),
            None => self.ZiFIncompatibleDSL("ContentType"),
        }
    }

    /// Declares a view of the current result type listing the rendered
    /// fields.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFViewWith<F>(&mut self, name: &str, body: F)
    where
        F: FnOnce(&mut ZiCEvalContext),
    {
        let Some(id) = self.current_result_type() else {
            self.ZiFIncompatibleDSL("View");
            return;
        };
        if self.view_exists(id, name) {
            return;
        }
        let frame = ZiCFrame::View {
            name: name.to_string(),
            attribute: ZiCAttribute::ZiFNew(ZiCObject::ZiFNew()),
        };
        let (_, frame) = self.ZiFExecute(body, frame);
        let Some(attribute) = frame.ZiFIntoAttribute() else {
            return;
        };
        self.push_view(id, ZiCViewExpr { name: name.to_string(), attribute });
    }

    /// Without a body: on a collection, reuses the element's view of that
    /// name; inside an attribute, selects the view used to render it.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFView(&mut self, name: &str) {
        if let Some(ZiCFrame::Attribute(attribute)) = self.stack.last_mut() {
            attribute.meta.ZiFSet(ZI_VIEW_META_KEY, name);
            return;
        }
        let Some(id) = self.current_result_type() else {
            self.ZiFIncompatibleDSL("View");
            return;
        };
        if self.view_exists(id, name) {
            return;
        }
        let element = self
            .design
            .arena
            .ZiFGet(id)
            .and_then(|t| t.attribute.ty.as_ref())
            .and_then(ZiCDataType::ZiFToArray)
            .and_then(|arr| arr.elem.ty.as_ref())
            .and_then(ZiCDataType::ZiFNamedId);
        let Some(element) = element else {
            self.ZiFReportError(format!("view {:?} has no definition", name));
            return;
        };
        match self.design.arena.ZiFGet(element).and_then(|t| t.ZiFView(name)).cloned() {
            Some(view) => self.push_view(id, view),
            None => self.ZiFReportError(format!("unknown view {:?}", name)),
        }
    }

    #[track_caller]
    fn view_exists(&mut self, id: ZiCTypeId, name: &str) -> bool {
        let Some(named) = self.design.arena.ZiFGet(id) else {
            return false;
        };
        if named.ZiFView(name).is_none() {
            return false;
        }
        self.ZiFReportError(format!("multiple expressions for view {:?}", name));
        true
    }

    fn push_view(&mut self, id: ZiCTypeId, view: ZiCViewExpr) {
        if let Some(info) = self.design.arena.ZiFGetMut(id).and_then(|t| t.result.as_mut()) {
            info.views.push(view);
        }
    }

    /// Collection result type of `elem`, created on first use and
    /// registered with the generated root. It takes the element's views.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFCollectionOf(&mut self, elem: impl Into<ZiCTypeArg>) -> ZiCDataType {
        self.collection_of(elem.into(), None)
    }

    /// Like [`ZiFCollectionOf`](Self::ZiFCollectionOf) with a body declaring
    /// the collection's own views.
    #[track_caller]
    #[allow(non_snake_case)]
    pub fn ZiFCollectionOfWith<F>(&mut self, elem: impl Into<ZiCTypeArg>, body: F) -> ZiCDataType
    where
        F: Fn(&mut ZiCEvalContext) + Send + Sync + 'static,
    {
        self.collection_of(elem.into(), Some(ZiCDSLFunc::ZiFNew(body)))
    }

    #[track_caller]
    fn collection_of(&mut self, elem: ZiCTypeArg, body: Option<ZiCDSLFunc>) -> ZiCDataType {
        let element = match &elem {
            ZiCTypeArg::Named(name) => self
                .design
                .ZiFResultType(name)
                .or_else(|| self.design.ZiFUserType(name)),
            other => self.resolve_type_arg(other).and_then(|t| t.ZiFNamedId()),
        }
        .and_then(|id| self.design.arena.ZiFGet(id))
        .filter(|t| t.ZiFIsResult())
        .map(|t| (t.id, t.name.clone(), t.ZiFIdentifier().unwrap_or_default().to_string()));

        let Some((element, element_name, element_identifier)) = element else {
            self.ZiFReportError(
                "invalid CollectionOf argument: not a result type and not a known result type identifier",
            );
            return ZiCDataType::Primitive(ZiCPrimitive::Any);
        };

        let (base, mut params) = ZiFParseMediaType(&element_identifier);
        params
            .entry(ZI_COLLECTION_PARAM.to_string())
            .or_insert_with(|| ZI_COLLECTION_VALUE.to_string());
        let identifier = ZiFFormatMediaType(&base, &params);
        let canonical = ZiFCanonicalIdentifier(&identifier);

        let existing = self.design.generated.iter().copied().find(|id| {
            self.design
                .arena
                .ZiFGet(*id)
                .and_then(|t| t.ZiFIdentifier())
                .map(|i| ZiFCanonicalIdentifier(i) == canonical)
                .unwrap_or(false)
        });
        if let Some(id) = existing {
            return ZiCDataType::ResultType(id);
        }

        let extra = body;
        let dsl = ZiCDSLFunc::ZiFNew(move |ctx: &mut ZiCEvalContext| {
            let Some(id) = ctx.current_result_type() else {
                ctx.ZiFIncompatibleDSL("CollectionOf");
                return;
            };
            let element_name = ctx
                .design
                .arena
                .ZiFGet(element)
                .map(|t| t.name.clone())
                .unwrap_or_default();
            if let Some(named) = ctx.design.arena.ZiFGetMut(id) {
                named.name = format!("{}Collection", element_name);
                named.attribute.ty = Some(ZiCDataType::ZiFArrayOf(ZiCAttribute::ZiFNew(
                    ZiCDataType::ResultType(element),
                )));
            }
            if let Some(extra) = &extra {
                extra.ZiFCall(ctx);
            }
            let inherited = ctx
                .design
                .arena
                .ZiFGet(element)
                .map(|t| t.ZiFViews().to_vec())
                .unwrap_or_default();
            if let Some(info) = ctx.design.arena.ZiFGetMut(id).and_then(|t| t.result.as_mut()) {
                if info.views.is_empty() {
                    info.views = inherited;
                }
            }
        });

        let attribute = ZiCAttribute {
            ty: Some(ZiCDataType::ZiFArrayOf(ZiCAttribute::ZiFNew(
                ZiCDataType::ResultType(element),
            ))),
            dsl: ZiCPending::Pending(dsl),
            ..ZiCAttribute::default()
        };
        let id = self.design.arena.ZiFAdd(
            format!("{}Collection", element_name),
            attribute,
            Some(ZiCResultInfo::ZiFNew(identifier)),
        );
        self.design.generated.push(id);
        ZiCDataType::ResultType(id)
    }
}
