//! Generates `models.py`: one definition per arena schema.
//!
//! Object schemas become TypedDicts in the functional form, which accepts
//! field names that are not Python identifiers. Everything else becomes a
//! type alias. Forward references are quoted, so definition order inside
//! the file never matters and the arena's sorted order is used as-is.

use tracing::debug;

use crate::error::GenerationError;
use crate::ir::{FieldIR, IRDocument, SchemaIR};
use crate::util::py_string;

use super::profile::GenerationProfile;
use super::pytype::TypeEmitter;

pub fn generate_models(
    ir: &IRDocument,
    profile: GenerationProfile,
) -> Result<String, GenerationError> {
    let mut emitter = TypeEmitter::new(profile.for_models(), true);
    let mut body: Vec<String> = Vec::new();
    for (name, schema) in &ir.schemas {
        match schema {
            SchemaIR::Object(fields) if !fields.is_empty() => {
                emit_typed_dict(name, fields, &mut emitter, &mut body)?;
            }
            other => {
                let ty = emitter.emit(other, name)?;
                body.push(format!("{name} = {ty}"));
                body.push(String::new());
            }
        }
    }
    debug!(definitions = ir.schemas.len(), "generated models");

    let mut lines: Vec<String> = Vec::new();
    if profile.future_annotations {
        lines.push("from __future__ import annotations".to_string());
    }
    if !emitter.imports.is_empty() {
        let imports: Vec<&str> = emitter.imports.iter().copied().collect();
        lines.push(format!("from typing import {}", imports.join(", ")));
    }
    if profile.typing_extensions {
        lines.push("from typing_extensions import Required, TypedDict".to_string());
    } else {
        lines.push("from typing import Required, TypedDict".to_string());
    }
    if body.iter().any(|line| line.contains("JsonValue")) {
        lines.push("from .types import JsonValue".to_string());
    }
    lines.push(String::new());
    lines.extend(body);

    let mut code = lines.join("\n");
    code.truncate(code.trim_end().len());
    code.push('\n');
    Ok(code)
}

fn emit_typed_dict(
    name: &str,
    fields: &[FieldIR],
    emitter: &mut TypeEmitter,
    out: &mut Vec<String>,
) -> Result<(), GenerationError> {
    out.push(format!("{name} = TypedDict("));
    out.push(format!("    {},", py_string(name)));
    out.push("    {".to_string());
    for field in fields {
        let mut ty = emitter.emit(&field.ty, name)?;
        if field.required {
            ty = format!("Required[{ty}]");
        }
        out.push(format!("        {}: {ty},", py_string(&field.name)));
    }
    out.push("    },".to_string());
    out.push("    total=False,".to_string());
    out.push(")".to_string());
    out.push(String::new());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ir::PrimitiveKind;
    use std::collections::BTreeMap;

    fn document(schemas: Vec<(&str, SchemaIR)>) -> IRDocument {
        IRDocument {
            schemas: schemas
                .into_iter()
                .map(|(name, ir)| (name.to_string(), ir))
                .collect::<BTreeMap<_, _>>(),
            operations: Vec::new(),
        }
    }

    #[test]
    fn test_object_becomes_functional_typed_dict() {
        let ir = document(vec![(
            "Item",
            SchemaIR::Object(vec![
                FieldIR {
                    name: "id".into(),
                    ty: SchemaIR::Primitive(PrimitiveKind::Integer),
                    required: true,
                },
                FieldIR {
                    name: "display-name".into(),
                    ty: SchemaIR::Primitive(PrimitiveKind::String),
                    required: false,
                },
            ]),
        )]);
        let code = generate_models(&ir, GenerationProfile::default()).unwrap();
        assert!(code.contains("Item = TypedDict("));
        assert!(code.contains("        \"id\": Required[int],"));
        assert!(code.contains("        \"display-name\": str,"));
        assert!(code.contains("    total=False,"));
    }

    #[test]
    fn test_alias_and_forward_reference() {
        let ir = document(vec![
            (
                "Item",
                SchemaIR::Object(vec![FieldIR {
                    name: "id".into(),
                    ty: SchemaIR::Primitive(PrimitiveKind::Integer),
                    required: true,
                }]),
            ),
            (
                "ItemList",
                SchemaIR::Array(Box::new(SchemaIR::Reference("Item".into()))),
            ),
        ]);
        let code = generate_models(&ir, GenerationProfile::default()).unwrap();
        assert!(code.contains("ItemList = list[\"Item\"]"));
    }

    #[test]
    fn test_models_never_use_pep604_unions() {
        let ir = document(vec![(
            "MaybeInt",
            SchemaIR::Union {
                members: vec![
                    SchemaIR::Primitive(PrimitiveKind::Integer),
                    SchemaIR::Primitive(PrimitiveKind::Null),
                ],
                discriminant: None,
            },
        )]);
        let code = generate_models(&ir, GenerationProfile::default()).unwrap();
        assert!(code.contains("MaybeInt = Union[int, None]"));
        assert!(code.contains("from typing import Union"));
    }

    #[test]
    fn test_json_value_import_only_when_used() {
        let any = document(vec![("Anything", SchemaIR::Primitive(PrimitiveKind::Any))]);
        let code = generate_models(&any, GenerationProfile::default()).unwrap();
        assert!(code.contains("from .types import JsonValue"));

        let plain = document(vec![("Name", SchemaIR::Primitive(PrimitiveKind::String))]);
        let code = generate_models(&plain, GenerationProfile::default()).unwrap();
        assert!(!code.contains("from .types import JsonValue"));
    }

    #[test]
    fn test_typing_extensions_fallback() {
        let ir = document(vec![("Name", SchemaIR::Primitive(PrimitiveKind::String))]);
        let profile = GenerationProfile {
            typing_extensions: true,
            ..GenerationProfile::default()
        };
        let code = generate_models(&ir, profile).unwrap();
        assert!(code.contains("from typing_extensions import Required, TypedDict"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let ir = document(vec![
            ("B", SchemaIR::Primitive(PrimitiveKind::String)),
            ("A", SchemaIR::Primitive(PrimitiveKind::Integer)),
        ]);
        let first = generate_models(&ir, GenerationProfile::default()).unwrap();
        let second = generate_models(&ir, GenerationProfile::default()).unwrap();
        assert_eq!(first, second);
        assert!(first.find("A = int").unwrap() < first.find("B = str").unwrap());
    }
}
