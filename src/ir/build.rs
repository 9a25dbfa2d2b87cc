//! Document -> `IRDocument` construction.
//!
//! Walks the typed spec view in declaration order, lowers every schema
//! through the [`TypeResolver`], and validates the operation-level
//! uniqueness rules (operation ids, parameter names, response statuses).

use serde_json::Value;
use tracing::debug;

use crate::error::SpecError;
use crate::spec::{from_entry, MediaType, OpenApiSpec, Operation, Parameter, PathItem, Response};
use crate::util::{operation_name, pascal_case, sanitize_type_name};

use super::model::{
    BodyVariantIR, HttpMethod, IRDocument, OperationIR, ParamLocation, ParameterIR, PrimitiveKind,
    RequestBodyIR, ResponseEntryIR, ResponseTable, SchemaIR, StatusKey,
};
use super::resolve::TypeResolver;

/// Build the IR for a fully resolved document tree.
pub fn build_ir(document: &Value) -> Result<IRDocument, SpecError> {
    let spec = OpenApiSpec::from_value(document.clone())?;
    let mut resolver = TypeResolver::new(document.clone());
    resolver.resolve_components()?;

    let mut operations = Vec::new();
    let mut seen_ids = Vec::new();
    for (path, raw_item) in &spec.paths {
        let item: PathItem = from_entry(raw_item, path)?;
        for (method_name, op) in item.operations() {
            let method = HttpMethod::parse(method_name).ok_or_else(|| {
                SpecError::Parse(format!("unsupported method '{method_name}' on {path}"))
            })?;
            let operation = build_operation(&mut resolver, path, method, op, &item)?;
            if seen_ids.contains(&operation.id) {
                return Err(SpecError::DuplicateOperationId { id: operation.id });
            }
            seen_ids.push(operation.id.clone());
            operations.push(operation);
        }
    }
    debug!(
        operations = operations.len(),
        "built intermediate representation"
    );
    Ok(IRDocument {
        schemas: resolver.into_arena(),
        operations,
    })
}

fn build_operation(
    resolver: &mut TypeResolver,
    path: &str,
    method: HttpMethod,
    op: &Operation,
    item: &PathItem,
) -> Result<OperationIR, SpecError> {
    let id = match &op.operation_id {
        Some(declared) => sanitize_type_name(&pascal_case(declared)),
        None => operation_name(method.py_name(), path),
    };
    let parameters = merge_parameters(resolver, &id, item.parameters.as_deref(), op)?;
    let request_body = build_request_body(resolver, &id, op)?;
    let responses = build_response_table(resolver, &id, op)?;
    Ok(OperationIR {
        id,
        method,
        path: path.to_string(),
        summary: op.summary.clone(),
        parameters: parameters
            .into_iter()
            .map(|(_, param)| param)
            .collect(),
        request_body,
        responses,
    })
}

type KeyedParams = Vec<((String, ParamLocation), ParameterIR)>;

/// Path-level parameters apply to every operation; an operation-level
/// parameter with the same (name, location) replaces the shared one.
/// Duplicates within a single level are an authoring error.
fn merge_parameters(
    resolver: &mut TypeResolver,
    id: &str,
    path_level: Option<&[Parameter]>,
    op: &Operation,
) -> Result<KeyedParams, SpecError> {
    let mut merged: KeyedParams = Vec::new();
    for (level, params) in [
        ("path item", path_level),
        ("operation", op.parameters.as_deref()),
    ] {
        let mut level_seen = Vec::new();
        for param in params.unwrap_or_default() {
            let lowered = lower_parameter(resolver, id, param)?;
            let key = (lowered.name.clone(), lowered.location);
            if level_seen.contains(&key) {
                return Err(SpecError::DuplicateParameter {
                    name: lowered.name,
                    location: format!("{level} {}", lowered.location.as_str()),
                    operation: id.to_string(),
                });
            }
            level_seen.push(key.clone());
            match merged.iter_mut().find(|(k, _)| *k == key) {
                Some((_, existing)) => *existing = lowered,
                None => merged.push((key, lowered)),
            }
        }
    }
    Ok(merged)
}

fn lower_parameter(
    resolver: &mut TypeResolver,
    id: &str,
    param: &Parameter,
) -> Result<ParameterIR, SpecError> {
    let location = match param.location.as_str() {
        "path" => ParamLocation::Path,
        "query" => ParamLocation::Query,
        "header" => ParamLocation::Header,
        "cookie" => ParamLocation::Cookie,
        other => {
            return Err(SpecError::Parse(format!(
                "parameter '{}' of {id} has unknown location '{other}'",
                param.name
            )))
        }
    };
    let hint = format!("{id}{}", pascal_case(&param.name));
    let doc_location = format!("{id}/parameters/{}", param.name);
    let ty = match &param.schema {
        Some(schema) => resolver.resolve_hoisted(schema, &doc_location, &hint)?,
        // Content-encoded parameters carry the schema under a media type.
        None => match first_content_schema(param.content.as_ref()) {
            Some(raw) => {
                let ir = resolver.resolve_value(&raw, &doc_location, &hint)?;
                resolver.hoist(ir, &hint)
            }
            None => SchemaIR::Primitive(PrimitiveKind::Any),
        },
    };
    let has_default = param.default.is_some();
    // Path parameters are always required regardless of the flag.
    let required = location == ParamLocation::Path || (param.required && !has_default);
    Ok(ParameterIR {
        name: param.name.clone(),
        location,
        required,
        ty,
        style: param.style.clone(),
        explode: param.explode,
        has_default,
    })
}

fn first_content_schema(content: Option<&serde_json::Map<String, Value>>) -> Option<Value> {
    let (_, media) = content?.iter().next()?;
    media.get("schema").cloned()
}

fn build_request_body(
    resolver: &mut TypeResolver,
    id: &str,
    op: &Operation,
) -> Result<Option<RequestBodyIR>, SpecError> {
    let Some(body) = &op.request_body else {
        return Ok(None);
    };
    let mut variants = Vec::new();
    for (content_type, raw) in body.content.iter().flatten() {
        let location = format!("{id}/requestBody/{content_type}");
        let media: MediaType = from_entry(raw, &location)?;
        let schema = media
            .schema
            .map(|schema| resolver.resolve_hoisted(&schema, &location, &format!("{id}Body")))
            .transpose()?;
        variants.push(BodyVariantIR {
            content_type: content_type.clone(),
            schema,
        });
    }
    Ok(Some(RequestBodyIR {
        required: body.required,
        variants,
    }))
}

fn build_response_table(
    resolver: &mut TypeResolver,
    id: &str,
    op: &Operation,
) -> Result<ResponseTable, SpecError> {
    let mut entries: Vec<ResponseEntryIR> = Vec::new();
    for (status_str, raw) in &op.responses {
        let Some(status) = StatusKey::parse(status_str) else {
            return Err(SpecError::InvalidStatus {
                status: status_str.clone(),
                operation: id.to_string(),
            });
        };
        if entries.iter().any(|entry| entry.status == status) {
            return Err(SpecError::DuplicateStatus {
                status: status.render(),
                operation: id.to_string(),
            });
        }
        let location = format!("{id}/responses/{status_str}");
        let response: Response = from_entry(raw, &location)?;
        let hint = if status.is_success() {
            format!("{id}Response")
        } else {
            format!("{id}ErrorResponse")
        };
        let mut variants = Vec::new();
        for (content_type, raw_media) in response.content.iter().flatten() {
            let media_location = format!("{location}/{content_type}");
            let media: MediaType = from_entry(raw_media, &media_location)?;
            let schema = media
                .schema
                .map(|schema| resolver.resolve_hoisted(&schema, &media_location, &hint))
                .transpose()?;
            variants.push(BodyVariantIR {
                content_type: content_type.clone(),
                schema,
            });
        }
        entries.push(ResponseEntryIR { status, variants });
    }
    Ok(ResponseTable { entries })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn build(json: serde_json::Value) -> IRDocument {
        build_ir(&json).unwrap()
    }

    fn build_err(json: serde_json::Value) -> SpecError {
        build_ir(&json).unwrap_err()
    }

    #[test]
    fn test_operation_ids_declared_and_synthesized() {
        let ir = build(serde_json::json!({
            "paths": {
                "/items": {
                    "get": {"operationId": "listItems", "responses": {}},
                    "post": {"responses": {}}
                }
            }
        }));
        let ids: Vec<_> = ir.operations.iter().map(|op| op.id.as_str()).collect();
        assert_eq!(ids, ["ListItems", "PostItems"]);
    }

    #[test]
    fn test_sibling_path_templates_stay_distinct() {
        let ir = build(serde_json::json!({
            "paths": {
                "/users/{id}": {"get": {"responses": {}}},
                "/users/{user_id}": {"get": {"responses": {}}}
            }
        }));
        let ids: Vec<_> = ir.operations.iter().map(|op| op.id.as_str()).collect();
        assert_eq!(ids, ["GetUsersId", "GetUsersUserId"]);
    }

    #[test]
    fn test_duplicate_operation_id_rejected() {
        let err = build_err(serde_json::json!({
            "paths": {
                "/a": {"get": {"operationId": "same", "responses": {}}},
                "/b": {"get": {"operationId": "same", "responses": {}}}
            }
        }));
        assert!(matches!(err, SpecError::DuplicateOperationId { .. }));
    }

    #[test]
    fn test_operation_parameter_overrides_path_level() {
        let ir = build(serde_json::json!({
            "paths": {
                "/items": {
                    "parameters": [
                        {"name": "limit", "in": "query", "schema": {"type": "string"}},
                        {"name": "offset", "in": "query", "schema": {"type": "integer"}}
                    ],
                    "get": {
                        "parameters": [
                            {"name": "limit", "in": "query", "required": true,
                             "schema": {"type": "integer"}}
                        ],
                        "responses": {}
                    }
                }
            }
        }));
        let params = &ir.operations[0].parameters;
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "limit");
        assert!(params[0].required);
        assert_eq!(params[0].ty, SchemaIR::Primitive(PrimitiveKind::Integer));
        assert_eq!(params[1].name, "offset");
    }

    #[test]
    fn test_duplicate_parameter_in_one_level_rejected() {
        let err = build_err(serde_json::json!({
            "paths": {
                "/items": {
                    "get": {
                        "parameters": [
                            {"name": "q", "in": "query"},
                            {"name": "q", "in": "query"}
                        ],
                        "responses": {}
                    }
                }
            }
        }));
        assert!(matches!(err, SpecError::DuplicateParameter { .. }));
    }

    #[test]
    fn test_same_name_different_location_is_not_a_duplicate() {
        let ir = build(serde_json::json!({
            "paths": {
                "/items/{id}": {
                    "get": {
                        "parameters": [
                            {"name": "id", "in": "path", "required": true,
                             "schema": {"type": "string"}},
                            {"name": "id", "in": "query", "schema": {"type": "string"}}
                        ],
                        "responses": {}
                    }
                }
            }
        }));
        assert_eq!(ir.operations[0].parameters.len(), 2);
    }

    #[test]
    fn test_path_parameters_forced_required() {
        let ir = build(serde_json::json!({
            "paths": {
                "/items/{id}": {
                    "get": {
                        "parameters": [{"name": "id", "in": "path", "schema": {"type": "string"}}],
                        "responses": {}
                    }
                }
            }
        }));
        assert!(ir.operations[0].parameters[0].required);
    }

    #[test]
    fn test_parameter_default_clears_required() {
        let ir = build(serde_json::json!({
            "paths": {
                "/items": {
                    "get": {
                        "parameters": [{"name": "limit", "in": "query", "required": true,
                                        "schema": {"type": "integer"}, "default": 10}],
                        "responses": {}
                    }
                }
            }
        }));
        let param = &ir.operations[0].parameters[0];
        assert!(!param.required);
        assert!(param.has_default);
    }

    #[test]
    fn test_anonymous_body_and_response_schemas_hoisted() {
        let ir = build(serde_json::json!({
            "paths": {
                "/items": {
                    "post": {
                        "operationId": "createItem",
                        "requestBody": {"required": true, "content": {"application/json": {
                            "schema": {"type": "object",
                                       "properties": {"name": {"type": "string"}},
                                       "required": ["name"]}
                        }}},
                        "responses": {"201": {"content": {"application/json": {
                            "schema": {"type": "object",
                                       "properties": {"id": {"type": "integer"}}}
                        }}}}
                    }
                }
            }
        }));
        let op = &ir.operations[0];
        let body = op.request_body.as_ref().unwrap();
        assert_eq!(
            body.variants[0].schema,
            Some(SchemaIR::Reference("CreateItemBody".into()))
        );
        assert_eq!(
            op.responses.entries[0].variants[0].schema,
            Some(SchemaIR::Reference("CreateItemResponse".into()))
        );
        assert!(ir.schemas.contains_key("CreateItemBody"));
        assert!(ir.schemas.contains_key("CreateItemResponse"));
    }

    #[test]
    fn test_named_schema_reference_not_rehoisted() {
        let ir = build(serde_json::json!({
            "paths": {
                "/items": {
                    "get": {"operationId": "listItems", "responses": {"200": {
                        "content": {"application/json": {"schema": {
                            "type": "array",
                            "items": {"$ref": "#/components/schemas/Item"}
                        }}}
                    }}}
                }
            },
            "components": {"schemas": {"Item": {
                "type": "object",
                "properties": {"id": {"type": "integer"}},
                "required": ["id"]
            }}}
        }));
        assert_eq!(
            ir.operations[0].responses.entries[0].variants[0].schema,
            Some(SchemaIR::Array(Box::new(SchemaIR::Reference(
                "Item".into()
            ))))
        );
        assert_eq!(ir.schemas.len(), 1);
    }

    #[test]
    fn test_invalid_and_duplicate_status_keys() {
        let err = build_err(serde_json::json!({
            "paths": {"/a": {"get": {"responses": {"999": {}}}}}
        }));
        assert!(matches!(err, SpecError::InvalidStatus { .. }));

        let err = build_err(serde_json::json!({
            "paths": {"/a": {"get": {"responses": {"2XX": {}, "2xx": {}}}}}
        }));
        assert!(matches!(err, SpecError::DuplicateStatus { .. }));
    }

    #[test]
    fn test_bodyless_response_has_no_variants() {
        let ir = build(serde_json::json!({
            "paths": {"/a": {"delete": {"responses": {"204": {"description": "gone"}}}}}
        }));
        let entry = &ir.operations[0].responses.entries[0];
        assert_eq!(entry.status, StatusKey::Code(204));
        assert!(entry.variants.is_empty());
    }
}
