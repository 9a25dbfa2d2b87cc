//! Per-operation parameter TypedDicts.
//!
//! Each operation gets one TypedDict per location plus a combined
//! `{OpId}Params` class with `path` / `query` / `header` / `cookie` keys.
//! When an operation declares several response content types, a synthetic
//! `accept` header parameter typed as a `Literal` of those content types
//! is added so callers can select one.

use crate::error::GenerationError;
use crate::ir::{OperationIR, ParamLocation, ParameterIR};
use crate::util::py_string;

use super::ClientCtx;

const LOCATIONS: [(ParamLocation, &str); 4] = [
    (ParamLocation::Path, "Path"),
    (ParamLocation::Query, "Query"),
    (ParamLocation::Header, "Header"),
    (ParamLocation::Cookie, "Cookie"),
];

pub(crate) fn param_types(
    operation: &OperationIR,
    ctx: &mut ClientCtx,
) -> Result<Vec<String>, GenerationError> {
    let accept = accept_literal(operation, ctx);
    let mut lines: Vec<String> = Vec::new();
    for (location, title) in LOCATIONS {
        let class_name = format!("{}{title}Params", operation.id);
        let mut items: Vec<String> = Vec::new();
        for param in operation.parameters_at(location) {
            items.push(param_item(param, operation, ctx)?);
        }
        if location == ParamLocation::Header {
            if let Some(literal) = &accept {
                items.push(format!("        {}: {literal},", py_string("accept")));
            }
        }
        lines.push(format!("{class_name} = TypedDict("));
        lines.push(format!("    {},", py_string(&class_name)));
        lines.push("    {".to_string());
        lines.extend(items);
        lines.push("    },".to_string());
        lines.push("    total=False,".to_string());
        lines.push(")".to_string());
        lines.push(String::new());
    }

    lines.push(format!("class {}Params(TypedDict, total=False):", operation.id));
    for (_, title) in LOCATIONS {
        let field = title.to_ascii_lowercase();
        lines.push(format!("    {field}: {}{title}Params", operation.id));
    }
    lines.push(String::new());
    Ok(lines)
}

fn param_item(
    param: &ParameterIR,
    operation: &OperationIR,
    ctx: &mut ClientCtx,
) -> Result<String, GenerationError> {
    let location = format!("{}.{}", operation.id, param.name);
    let mut ty = ctx.emitter.emit(&param.ty, &location)?;
    if param.required {
        ty = format!("Required[{ty}]");
    }
    Ok(format!("        {}: {ty},", py_string(&param.name)))
}

/// `Literal["a", "b"]` of response content types, when there is a choice.
fn accept_literal(operation: &OperationIR, ctx: &mut ClientCtx) -> Option<String> {
    let mut content_types: Vec<&str> = operation.response_content_types();
    if content_types.len() <= 1 {
        return None;
    }
    content_types.sort_unstable();
    ctx.typing_imports.insert("Literal");
    let rendered: Vec<String> = content_types
        .iter()
        .map(|value| py_string(value))
        .collect();
    Some(format!("Literal[{}]", rendered.join(", ")))
}
