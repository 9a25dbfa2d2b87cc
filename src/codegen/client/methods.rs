//! Client method emission: typed implementations, overloads, the generic
//! per-method implementation, and the `create()` backend helper.

use crate::error::GenerationError;
use crate::ir::{HttpMethod, OperationIR};
use crate::util::py_string;

use super::response::{request_body_annotation, request_content_type_annotation};
use super::ClientCtx;

/// Signature pieces shared by overloads and typed implementations.
fn method_signature(
    operation: &OperationIR,
    ctx: &mut ClientCtx,
    sync: bool,
    optional_default: &str,
) -> Result<(String, String), GenerationError> {
    let url = format!("Literal[{}]", py_string(&operation.path));
    let params = ctx.emitter.optional(&format!("{}Params", operation.id));
    let alias_suffix = if sync { "Response" } else { "AsyncResponse" };
    let response_alias = format!("{}{alias_suffix}", operation.id);

    let mut parts = vec![
        format!("url: {url}"),
        "*".to_string(),
        format!("params: {params} = {optional_default}"),
    ];
    match request_body_annotation(operation, ctx)? {
        Some(body_ty) => {
            let required = operation
                .request_body
                .as_ref()
                .is_some_and(|body| body.required);
            if required {
                parts.push(format!("body: {body_ty}"));
            } else {
                parts.push(format!("body: {body_ty} = {optional_default}"));
            }
            match request_content_type_annotation(operation, ctx) {
                Some(literal) if required => parts.push(format!("content_type: {literal}")),
                Some(literal) => {
                    parts.push(format!("content_type: {literal} = {optional_default}"));
                }
                None => {
                    let ty = ctx.emitter.optional("str");
                    parts.push(format!("content_type: {ty} = {optional_default}"));
                }
            }
        }
        None => {
            let ty = ctx.emitter.optional("str");
            parts.push(format!("body: None = {optional_default}"));
            parts.push(format!("content_type: {ty} = {optional_default}"));
        }
    }
    let statuses_ty = ctx.emitter.optional("set[str]");
    parts.push(format!("expected_statuses: {statuses_ty} = {optional_default}"));
    let timeout_ty = ctx.emitter.optional("float");
    parts.push(format!("timeout: {timeout_ty} = {optional_default}"));
    Ok((parts.join(", "), response_alias))
}

/// One-line docstring from the operation summary, when declared.
fn summary_docstring(operation: &OperationIR) -> Option<String> {
    let summary = operation.summary.as_deref()?;
    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    let text = collapsed.replace('\\', "\\\\").replace('"', "\\\"");
    Some(format!("        \"\"\"{text}\"\"\""))
}

pub(crate) fn method_overload(
    operation: &OperationIR,
    ctx: &mut ClientCtx,
    sync: bool,
) -> Result<Vec<String>, GenerationError> {
    let (signature, response_alias) = method_signature(operation, ctx, sync, "...")?;
    let def = if sync { "def" } else { "async def" };
    let mut lines = vec![
        "    @overload".to_string(),
        format!(
            "    {def} {}(self, {signature}) -> {response_alias}:",
            operation.method.py_name()
        ),
    ];
    if let Some(doc) = summary_docstring(operation) {
        lines.push(doc);
    }
    lines.push("        ...".to_string());
    lines.push(String::new());
    Ok(lines)
}

pub(crate) fn typed_method_impl(
    operation: &OperationIR,
    ctx: &mut ClientCtx,
    sync: bool,
) -> Result<Vec<String>, GenerationError> {
    let (signature, response_alias) = method_signature(operation, ctx, sync, "None")?;
    let def = if sync { "def" } else { "async def" };
    let call = if sync {
        "self.request("
    } else {
        "await self.request("
    };
    let mut lines = vec![format!(
        "    {def} {}(self, {signature}) -> {response_alias}:",
        operation.method.py_name()
    )];
    if let Some(doc) = summary_docstring(operation) {
        lines.push(doc);
    }
    lines.extend([
        "        return cast(".to_string(),
        format!("            {response_alias},"),
        format!("            {call}"),
        format!("                {},", py_string(operation.method.as_str())),
        "                url,".to_string(),
        "                params=params,".to_string(),
        "                body=body,".to_string(),
        "                content_type=content_type,".to_string(),
        "                expected_statuses=expected_statuses,".to_string(),
        "                timeout=timeout,".to_string(),
        "            ),".to_string(),
        "        )".to_string(),
        String::new(),
    ]);
    Ok(lines)
}

/// The untyped implementation that backs a set of overloads.
pub(crate) fn generic_method_impl(
    method: HttpMethod,
    ctx: &mut ClientCtx,
    sync: bool,
) -> Vec<String> {
    let def = if sync { "def" } else { "async def" };
    let call = if sync {
        "self.request("
    } else {
        "await self.request("
    };
    let object_opt = ctx.emitter.optional("object");
    let str_opt = ctx.emitter.optional("str");
    let statuses_opt = ctx.emitter.optional("set[str]");
    let float_opt = ctx.emitter.optional("float");
    let return_ty = ctx.emitter.union_of(&[
        "SuccessResponse[object]".to_string(),
        "ErrorResponse[object]".to_string(),
    ]);
    vec![
        format!("    {def} {}(", method.py_name()),
        "        self,".to_string(),
        "        url: str,".to_string(),
        "        *,".to_string(),
        format!("        params: {object_opt} = None,"),
        format!("        body: {object_opt} = None,"),
        format!("        content_type: {str_opt} = None,"),
        format!("        expected_statuses: {statuses_opt} = None,"),
        format!("        timeout: {float_opt} = None,"),
        format!("    ) -> {return_ty}:"),
        format!("        return {call}"),
        format!("            {},", py_string(method.as_str())),
        "            url,".to_string(),
        "            params=params,".to_string(),
        "            body=body,".to_string(),
        "            content_type=content_type,".to_string(),
        "            expected_statuses=expected_statuses,".to_string(),
        "            timeout=timeout,".to_string(),
        "        )".to_string(),
        String::new(),
    ]
}

/// The `create()` helper that picks the client class from the backend's
/// request coroutine-ness.
pub(crate) fn create_helper() -> Vec<String> {
    [
        "@overload",
        "def create(",
        "    base_url: str,",
        "    backend: SyncBackend,",
        "    headers: RequestHeaders = None,",
        "    raise_on_unexpected_status: bool = True,",
        ") -> SyncClient:",
        "    ...",
        "",
        "@overload",
        "def create(",
        "    base_url: str,",
        "    backend: AsyncBackend,",
        "    headers: RequestHeaders = None,",
        "    raise_on_unexpected_status: bool = True,",
        ") -> AsyncClient:",
        "    ...",
        "",
        "def create(",
        "    base_url: str,",
        "    backend: object,",
        "    headers: RequestHeaders = None,",
        "    raise_on_unexpected_status: bool = True,",
        "):",
        "    request = getattr(backend, \"request\", None)",
        "    if request and inspect.iscoroutinefunction(request):",
        "        return AsyncClient(",
        "            base_url=base_url,",
        "            backend=cast(AsyncBackend, backend),",
        "            headers=headers,",
        "            raise_on_unexpected_status=raise_on_unexpected_status,",
        "        )",
        "    if request:",
        "        return SyncClient(",
        "            base_url=base_url,",
        "            backend=cast(SyncBackend, backend),",
        "            headers=headers,",
        "            raise_on_unexpected_status=raise_on_unexpected_status,",
        "        )",
        "    raise TypeError(\"backend must implement SyncBackend or AsyncBackend\")",
        "",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::codegen::profile::GenerationProfile;
    use crate::codegen::pytype::TypeEmitter;
    use crate::ir::build_ir;
    use std::collections::BTreeSet;

    fn ctx() -> ClientCtx {
        ClientCtx {
            emitter: TypeEmitter::new(GenerationProfile::default(), false),
            typing_imports: BTreeSet::new(),
            typing_extensions_imports: BTreeSet::new(),
        }
    }

    fn first_operation(document: serde_json::Value) -> OperationIR {
        build_ir(&document).unwrap().operations.remove(0)
    }

    #[test]
    fn test_overload_uses_literal_path_and_alias() {
        let op = first_operation(serde_json::json!({
            "paths": {"/items/{id}": {"get": {"operationId": "getItem", "responses": {}}}}
        }));
        let lines = method_overload(&op, &mut ctx(), true).unwrap().join("\n");
        assert!(lines.contains("@overload"));
        assert!(lines.contains("def get(self, url: Literal[\"/items/{id}\"]"));
        assert!(lines.contains("-> GetItemResponse:"));
        assert!(lines.contains("params: GetItemParams | None = ..."));
    }

    #[test]
    fn test_required_body_has_no_default() {
        let op = first_operation(serde_json::json!({
            "paths": {"/items": {"post": {
                "operationId": "createItem",
                "requestBody": {"required": true, "content": {"application/json": {
                    "schema": {"$ref": "#/components/schemas/Item"}
                }}},
                "responses": {}
            }}},
            "components": {"schemas": {"Item": {"type": "object",
                "properties": {"id": {"type": "integer"}}, "required": ["id"]}}}
        }));
        let lines = typed_method_impl(&op, &mut ctx(), true).unwrap().join("\n");
        assert!(lines.contains("body: Item,"));
        assert!(!lines.contains("body: Item = None"));
    }

    #[test]
    fn test_optional_body_defaults_to_none() {
        let op = first_operation(serde_json::json!({
            "paths": {"/items": {"post": {
                "operationId": "createItem",
                "requestBody": {"content": {"application/json": {
                    "schema": {"type": "string"}
                }}},
                "responses": {}
            }}}
        }));
        let lines = typed_method_impl(&op, &mut ctx(), true).unwrap().join("\n");
        assert!(lines.contains("body: str | None = None"));
    }

    #[test]
    fn test_async_variants_await_the_request() {
        let op = first_operation(serde_json::json!({
            "paths": {"/items": {"get": {"operationId": "listItems", "responses": {}}}}
        }));
        let lines = typed_method_impl(&op, &mut ctx(), false).unwrap().join("\n");
        assert!(lines.contains("async def get(self,"));
        assert!(lines.contains("await self.request("));
        assert!(lines.contains("-> ListItemsAsyncResponse:"));
    }

    #[test]
    fn test_summary_becomes_method_docstring() {
        let op = first_operation(serde_json::json!({
            "paths": {"/items": {"get": {
                "operationId": "listItems",
                "summary": "List every item.",
                "responses": {}
            }}}
        }));
        let lines = typed_method_impl(&op, &mut ctx(), true).unwrap().join("\n");
        assert!(lines.contains("        \"\"\"List every item.\"\"\""));
        let overload = method_overload(&op, &mut ctx(), true).unwrap().join("\n");
        assert!(overload.contains("\"\"\"List every item.\"\"\"\n        ..."));
    }

    #[test]
    fn test_content_type_literal_for_multi_variant_body() {
        let op = first_operation(serde_json::json!({
            "paths": {"/upload": {"post": {
                "operationId": "upload",
                "requestBody": {"required": true, "content": {
                    "application/json": {"schema": {"type": "string"}},
                    "application/octet-stream": {}
                }},
                "responses": {}
            }}}
        }));
        let lines = method_overload(&op, &mut ctx(), true).unwrap().join("\n");
        assert!(lines.contains(
            "content_type: Literal[\"application/json\", \"application/octet-stream\"]"
        ));
    }
}
