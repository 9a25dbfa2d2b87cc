//! Generates `client.py`: backend protocols, per-operation parameter
//! types, response aliases, the dispatch tables, and the `SyncClient` /
//! `AsyncClient` classes.
//!
//! Methods with a single operation get a fully typed implementation whose
//! `url` parameter is `Literal[path]`. Methods serving several paths get
//! one `@overload` per operation (declaration order preserved, so the
//! checker resolves the most specific literal) plus a generic
//! implementation that all overloads funnel into.

mod methods;
mod params;
mod response;
mod scaffold;

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::GenerationError;
use crate::ir::{HttpMethod, IRDocument, OperationIR};

use super::profile::GenerationProfile;
use super::pytype::TypeEmitter;

/// Shared mutable state for one client generation pass.
pub(crate) struct ClientCtx {
    pub emitter: TypeEmitter,
    pub typing_imports: BTreeSet<&'static str>,
    pub typing_extensions_imports: BTreeSet<&'static str>,
}

pub fn generate_client(
    ir: &IRDocument,
    profile: GenerationProfile,
) -> Result<String, GenerationError> {
    let mut ctx = ClientCtx {
        emitter: TypeEmitter::new(profile, false),
        typing_imports: ["overload", "cast", "Protocol", "Literal"].into(),
        typing_extensions_imports: BTreeSet::new(),
    };
    if !profile.pep604_unions {
        ctx.typing_imports.insert("Union");
    }
    if profile.typing_extensions {
        ctx.typing_extensions_imports.extend(["TypedDict", "Required"]);
    } else {
        ctx.typing_imports.extend(["TypedDict", "Required"]);
    }

    let mut lines: Vec<String> = Vec::new();
    lines.push("# ruff: noqa: F401".to_string());
    if profile.future_annotations {
        lines.push("from __future__ import annotations".to_string());
    }
    lines.push("import inspect".to_string());
    lines.push("import json".to_string());
    lines.push("from urllib.parse import urlencode".to_string());
    lines.push(
        "from collections.abc import AsyncIterable, AsyncIterator, Iterable, Iterator, Mapping"
            .to_string(),
    );
    if !ir.schemas.is_empty() {
        lines.push("from .models import (".to_string());
        for name in ir.schemas.keys() {
            lines.push(format!("    {name},"));
        }
        lines.push(")".to_string());
    }
    lines.push("from .types import SuccessResponse, ErrorResponse, JsonValue".to_string());
    lines.push(String::new());

    lines.push("RequestUrl = str".to_string());
    let headers_ty = ctx.emitter.optional("Mapping[str, str]");
    lines.push(format!("RequestHeaders = {headers_ty}"));
    let content_ty = ctx
        .emitter
        .union_of(&["str".into(), "bytes".into(), "Iterable[bytes]".into(), "AsyncIterable[bytes]".into()]);
    lines.push(format!("RequestContent = {content_ty}"));
    let timeout_ty = ctx.emitter.optional("float");
    lines.push(format!("TimeoutType = {timeout_ty}"));
    lines.push(String::new());

    lines.extend(scaffold::backend_protocols());
    lines.extend(scaffold::client_errors());
    lines.extend(scaffold::dispatch_helpers());

    for operation in &ir.operations {
        lines.extend(params::param_types(operation, &mut ctx)?);
    }
    lines.extend(response::response_aliases(&ir.operations, &mut ctx)?);
    lines.extend(response::expected_statuses_map(&ir.operations));
    lines.extend(response::accept_types_map(&ir.operations));
    lines.extend(response::request_content_types_map(&ir.operations));
    lines.extend(response::dispatch_map(&ir.operations));

    for sync in [true, false] {
        let class = if sync { "SyncClient" } else { "AsyncClient" };
        lines.push(format!("class {class}:"));
        if ir.operations.is_empty() {
            lines.push("    pass".to_string());
        } else {
            lines.extend(scaffold::client_init(sync));
            lines.extend(scaffold::request_impl(sync));
            for (method, ops) in group_operations(&ir.operations) {
                if ops.len() == 1 {
                    lines.extend(methods::typed_method_impl(ops[0], &mut ctx, sync)?);
                } else {
                    for &operation in &ops {
                        lines.extend(methods::method_overload(operation, &mut ctx, sync)?);
                    }
                    lines.extend(methods::generic_method_impl(method, &mut ctx, sync));
                }
            }
        }
        lines.push(String::new());
    }

    lines.extend(methods::create_helper());

    // Typing imports collect while the body is generated, so they are
    // inserted afterwards, right below the __future__ import.
    let mut insert_at = import_insert_index(&lines);
    if !ctx.typing_extensions_imports.is_empty() {
        let names: Vec<&str> = ctx.typing_extensions_imports.iter().copied().collect();
        lines.insert(
            insert_at,
            format!("from typing_extensions import {}", names.join(", ")),
        );
        insert_at += 1;
    }
    let mut typing: BTreeSet<&str> = ctx.typing_imports.iter().copied().collect();
    typing.extend(ctx.emitter.imports.iter().copied());
    if !typing.is_empty() {
        let names: Vec<&str> = typing.into_iter().collect();
        lines.insert(insert_at, format!("from typing import {}", names.join(", ")));
    }
    debug!(operations = ir.operations.len(), "generated client");

    let mut code = lines.join("\n");
    code.truncate(code.trim_end().len());
    code.push('\n');
    Ok(code)
}

/// Operations grouped by HTTP method, method order first-seen and
/// declaration order preserved inside a group.
fn group_operations(operations: &[OperationIR]) -> Vec<(HttpMethod, Vec<&OperationIR>)> {
    let mut grouped: Vec<(HttpMethod, Vec<&OperationIR>)> = Vec::new();
    for operation in operations {
        match grouped.iter_mut().find(|(m, _)| *m == operation.method) {
            Some((_, ops)) => ops.push(operation),
            None => grouped.push((operation.method, vec![operation])),
        }
    }
    grouped
}

fn import_insert_index(lines: &[String]) -> usize {
    for (index, line) in lines.iter().enumerate() {
        if line.starts_with("from __future__ import") {
            return index + 1;
        }
    }
    if lines.first().is_some_and(|line| line.starts_with("# ruff:")) {
        return 1;
    }
    0
}
