//! Response type aliases, the constant maps, and the dispatch table.
//!
//! Every operation gets `{OpId}Response` and `{OpId}AsyncResponse`
//! aliases: unions of `SuccessResponse[...]` / `ErrorResponse[...]` over
//! its declared responses. The `RESPONSE_DISPATCH` constant carries each
//! operation's decode rules, ordered most-specific first; the request
//! implementation walks the list, keeps the rules matching the observed
//! status, and among those prefers the one matching the caller's `accept`
//! choice. That order is how exact codes beat ranges and ranges beat
//! "default" at runtime.

use crate::error::GenerationError;
use crate::ir::{BodyVariantIR, OperationIR};
use crate::util::py_string;

use super::ClientCtx;

pub(crate) fn response_aliases(
    operations: &[OperationIR],
    ctx: &mut ClientCtx,
) -> Result<Vec<String>, GenerationError> {
    let mut lines = Vec::new();
    for operation in operations {
        let sync_value = operation_return_type(operation, ctx, true)?;
        let async_value = operation_return_type(operation, ctx, false)?;
        lines.push(format!("{}Response = {sync_value}", operation.id));
        lines.push(format!("{}AsyncResponse = {async_value}", operation.id));
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    Ok(lines)
}

/// The full return annotation for an operation: a union of wrapped
/// success and error body types.
pub(crate) fn operation_return_type(
    operation: &OperationIR,
    ctx: &mut ClientCtx,
    sync: bool,
) -> Result<String, GenerationError> {
    if operation.responses.entries.is_empty() {
        return Ok(ctx.emitter.union_of(&[
            "SuccessResponse[JsonValue]".to_string(),
            "ErrorResponse[JsonValue]".to_string(),
        ]));
    }
    let mut wrapped: Vec<String> = Vec::new();
    for entry in &operation.responses.entries {
        let body = entry_body_union(operation, &entry.variants, ctx, sync)?;
        let wrapper = if entry.status.is_success() {
            "SuccessResponse"
        } else {
            "ErrorResponse"
        };
        wrapped.push(format!("{wrapper}[{body}]"));
    }
    Ok(ctx.emitter.union_of(&wrapped))
}

fn entry_body_union(
    operation: &OperationIR,
    variants: &[BodyVariantIR],
    ctx: &mut ClientCtx,
    sync: bool,
) -> Result<String, GenerationError> {
    if variants.is_empty() {
        return Ok("None".to_string());
    }
    let mut types = Vec::with_capacity(variants.len());
    for variant in variants {
        types.push(body_annotation(operation, variant, ctx, sync)?);
    }
    Ok(ctx.emitter.union_of(&types))
}

/// Map one content-type variant to the Python type the runtime decoder
/// produces for it.
pub(crate) fn body_annotation(
    operation: &OperationIR,
    variant: &BodyVariantIR,
    ctx: &mut ClientCtx,
    sync: bool,
) -> Result<String, GenerationError> {
    let iterator = if sync { "Iterator" } else { "AsyncIterator" };
    let content_type = variant.content_type.as_str();
    match decode_kind(content_type) {
        DecodeKind::Bytes => Ok("bytes".to_string()),
        DecodeKind::EventStream => Ok(format!("{iterator}[str]")),
        DecodeKind::NdJson => {
            let item = match &variant.schema {
                Some(schema) => ctx.emitter.emit(schema, &operation.id)?,
                None => "JsonValue".to_string(),
            };
            Ok(format!("{iterator}[{item}]"))
        }
        DecodeKind::Text => Ok("str".to_string()),
        DecodeKind::Json => match &variant.schema {
            Some(schema) => ctx.emitter.emit(schema, &operation.id),
            None => Ok("JsonValue".to_string()),
        },
        DecodeKind::Passthrough => match &variant.schema {
            Some(schema) => ctx.emitter.emit(schema, &operation.id),
            None => Ok("bytes".to_string()),
        },
    }
}

/// How the generated runtime decodes a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecodeKind {
    Json,
    Text,
    Bytes,
    EventStream,
    NdJson,
    Passthrough,
}

impl DecodeKind {
    pub(crate) fn tag(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::EventStream => "stream",
            Self::NdJson => "ndjson",
            Self::Passthrough => "raw",
        }
    }
}

pub(crate) fn decode_kind(content_type: &str) -> DecodeKind {
    if content_type == "application/octet-stream" {
        return DecodeKind::Bytes;
    }
    if content_type == "text/event-stream" {
        return DecodeKind::EventStream;
    }
    if content_type.starts_with("application/x-ndjson")
        || content_type.starts_with("application/stream+json")
    {
        return DecodeKind::NdJson;
    }
    if content_type.starts_with("text/")
        || content_type.starts_with("application/x-www-form-urlencoded")
    {
        return DecodeKind::Text;
    }
    if content_type.starts_with("application/json") || content_type.ends_with("+json") {
        return DecodeKind::Json;
    }
    DecodeKind::Passthrough
}

pub(crate) fn expected_statuses_map(operations: &[OperationIR]) -> Vec<String> {
    let mut entries = Vec::new();
    for operation in operations {
        let statuses = operation.responses.known_statuses();
        if statuses.is_empty() {
            continue;
        }
        let set: Vec<String> = statuses
            .iter()
            .map(|code| py_string(&code.to_string()))
            .collect();
        entries.push(format!(
            "    ({}, {}): {{{}}},",
            py_string(operation.method.as_str()),
            py_string(&operation.path),
            set.join(", ")
        ));
    }
    map_constant("EXPECTED_STATUSES", "dict[tuple[str, str], set[str]]", entries)
}

pub(crate) fn accept_types_map(operations: &[OperationIR]) -> Vec<String> {
    let mut entries = Vec::new();
    for operation in operations {
        let mut content_types = operation.response_content_types();
        if content_types.is_empty() {
            continue;
        }
        content_types.sort_unstable();
        let list: Vec<String> = content_types.iter().map(|ct| py_string(ct)).collect();
        entries.push(format!(
            "    ({}, {}): [{}],",
            py_string(operation.method.as_str()),
            py_string(&operation.path),
            list.join(", ")
        ));
    }
    map_constant("ACCEPT_TYPES", "dict[tuple[str, str], list[str]]", entries)
}

pub(crate) fn request_content_types_map(operations: &[OperationIR]) -> Vec<String> {
    let mut entries = Vec::new();
    for operation in operations {
        let Some(body) = &operation.request_body else {
            continue;
        };
        if body.variants.is_empty() {
            continue;
        }
        let mut content_types: Vec<&str> = body
            .variants
            .iter()
            .map(|variant| variant.content_type.as_str())
            .collect();
        content_types.sort_unstable();
        let list: Vec<String> = content_types.iter().map(|ct| py_string(ct)).collect();
        entries.push(format!(
            "    ({}, {}): [{}],",
            py_string(operation.method.as_str()),
            py_string(&operation.path),
            list.join(", ")
        ));
    }
    map_constant(
        "REQUEST_CONTENT_TYPES",
        "dict[tuple[str, str], list[str]]",
        entries,
    )
}

/// Per-operation decode rules in dispatch order. Each rule is
/// `(status_key, content_type | None, decode_tag)`.
pub(crate) fn dispatch_map(operations: &[OperationIR]) -> Vec<String> {
    let mut entries = Vec::new();
    for operation in operations {
        let plan = operation.responses.dispatch_plan();
        if plan.is_empty() {
            continue;
        }
        let mut rules = Vec::with_capacity(plan.len());
        for rule in plan {
            let content = match &rule.content_type {
                Some(ct) => py_string(ct),
                None => "None".to_string(),
            };
            let kind = match &rule.content_type {
                Some(ct) => decode_kind(ct).tag(),
                None => "none",
            };
            rules.push(format!(
                "({}, {content}, {})",
                py_string(&rule.status.render()),
                py_string(kind)
            ));
        }
        entries.push(format!(
            "    ({}, {}): [{}],",
            py_string(operation.method.as_str()),
            py_string(&operation.path),
            rules.join(", ")
        ));
    }
    map_constant(
        "RESPONSE_DISPATCH",
        "dict[tuple[str, str], list[tuple[str, str | None, str]]]",
        entries,
    )
}

fn map_constant(name: &str, annotation: &str, entries: Vec<String>) -> Vec<String> {
    if entries.is_empty() {
        return vec![format!("{name}: {annotation} = {{}}"), String::new()];
    }
    let mut lines = vec![format!("{name}: {annotation} = {{")];
    lines.extend(entries);
    lines.push("}".to_string());
    lines.push(String::new());
    lines
}

/// Body parameter annotation for a request body: a union over its
/// content-type variants, optional unless the body is required.
pub(crate) fn request_body_annotation(
    operation: &OperationIR,
    ctx: &mut ClientCtx,
) -> Result<Option<String>, GenerationError> {
    let Some(body) = &operation.request_body else {
        return Ok(None);
    };
    let mut types = Vec::new();
    for variant in &body.variants {
        types.push(body_annotation(operation, variant, ctx, true)?);
    }
    let union = if types.is_empty() {
        "JsonValue".to_string()
    } else {
        ctx.emitter.union_of(&types)
    };
    if body.required {
        Ok(Some(union))
    } else {
        Ok(Some(ctx.emitter.optional(&union)))
    }
}

/// `Literal[...]` of request content types when the caller must choose.
pub(crate) fn request_content_type_annotation(
    operation: &OperationIR,
    ctx: &mut ClientCtx,
) -> Option<String> {
    let body = operation.request_body.as_ref()?;
    if body.variants.len() <= 1 {
        return None;
    }
    let mut content_types: Vec<&str> = body
        .variants
        .iter()
        .map(|variant| variant.content_type.as_str())
        .collect();
    content_types.sort_unstable();
    ctx.typing_imports.insert("Literal");
    let rendered: Vec<String> = content_types.iter().map(|ct| py_string(ct)).collect();
    Some(format!("Literal[{}]", rendered.join(", ")))
}
