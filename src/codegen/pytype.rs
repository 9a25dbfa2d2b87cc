//! Python type annotations as a small AST, plus the profile-aware emitter.
//!
//! Generators lower [`SchemaIR`] nodes to [`PyType`] and render them
//! through one [`TypeEmitter`], which tracks the `typing` imports the
//! rendered annotations need.

use std::collections::BTreeSet;

use crate::error::GenerationError;
use crate::ir::{LiteralValue, PrimitiveKind, SchemaIR};
use crate::util::escape_py_string;

use super::profile::GenerationProfile;

/// A Python type annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum PyType {
    /// A bare name: `str`, `int`, `JsonValue`, or a model class.
    Named(String),
    /// A quoted forward reference to a model class.
    ForwardRef(String),
    List(Box<PyType>),
    /// `dict[str, V]`.
    Dict(Box<PyType>),
    Literal(Vec<LiteralValue>),
    Union(Vec<PyType>),
}

impl PyType {
    pub fn named(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

/// Renders [`PyType`] values under a profile, accumulating the `typing`
/// imports the output requires.
#[derive(Debug)]
pub struct TypeEmitter {
    pub profile: GenerationProfile,
    /// Quote model references (forward refs inside the models file).
    pub quote_refs: bool,
    pub imports: BTreeSet<&'static str>,
}

impl TypeEmitter {
    pub fn new(profile: GenerationProfile, quote_refs: bool) -> Self {
        Self {
            profile,
            quote_refs,
            imports: BTreeSet::new(),
        }
    }

    /// Lower and render in one step. `location` names the definition being
    /// emitted, for error reporting.
    pub fn emit(&mut self, ir: &SchemaIR, location: &str) -> Result<String, GenerationError> {
        let ty = self.lower(ir, location)?;
        Ok(self.render(&ty))
    }

    /// Lower an IR schema to a Python annotation.
    pub fn lower(&self, ir: &SchemaIR, location: &str) -> Result<PyType, GenerationError> {
        match ir {
            SchemaIR::Primitive(kind) => Ok(PyType::named(primitive_name(*kind))),
            SchemaIR::Array(item) => Ok(PyType::List(Box::new(self.lower(item, location)?))),
            SchemaIR::Map(value) => Ok(PyType::Dict(Box::new(self.lower(value, location)?))),
            // Inline objects only reach here when they have no fields
            // (everything else is hoisted to a named definition).
            SchemaIR::Object(_) => Ok(PyType::Dict(Box::new(PyType::named("JsonValue")))),
            SchemaIR::Enum { values, .. } => {
                // Literal cannot hold floats; a float enum degrades to its
                // base scalar type.
                if values
                    .iter()
                    .any(|value| matches!(value, LiteralValue::Float(_)))
                {
                    return Ok(PyType::named("float"));
                }
                Ok(PyType::Literal(values.clone()))
            }
            SchemaIR::Union { members, .. } => {
                if members.is_empty() {
                    return Err(GenerationError::EmptyUnion {
                        location: location.to_string(),
                    });
                }
                let lowered = members
                    .iter()
                    .map(|member| self.lower(member, location))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(PyType::Union(lowered))
            }
            SchemaIR::Reference(name) => {
                if self.quote_refs {
                    Ok(PyType::ForwardRef(name.clone()))
                } else {
                    Ok(PyType::Named(name.clone()))
                }
            }
        }
    }

    /// Render an annotation, recording imports as a side effect.
    pub fn render(&mut self, ty: &PyType) -> String {
        match ty {
            PyType::Named(name) => name.clone(),
            PyType::ForwardRef(name) => format!("\"{name}\""),
            PyType::List(item) => format!("list[{}]", self.render(item)),
            PyType::Dict(value) => format!("dict[str, {}]", self.render(value)),
            PyType::Literal(values) => {
                self.imports.insert("Literal");
                let rendered: Vec<String> = values.iter().map(render_literal).collect();
                format!("Literal[{}]", rendered.join(", "))
            }
            PyType::Union(members) => {
                let mut rendered: Vec<String> = Vec::new();
                for member in members {
                    let piece = self.render(member);
                    if !rendered.contains(&piece) {
                        rendered.push(piece);
                    }
                }
                if rendered.len() == 1 {
                    return rendered.join("");
                }
                if self.profile.pep604_unions {
                    rendered.join(" | ")
                } else {
                    self.imports.insert("Union");
                    format!("Union[{}]", rendered.join(", "))
                }
            }
        }
    }

    /// Union of already-rendered annotation strings, deduplicated.
    pub fn union_of(&mut self, types: &[String]) -> String {
        let mut unique: Vec<&str> = Vec::new();
        for ty in types {
            if !unique.contains(&ty.as_str()) {
                unique.push(ty);
            }
        }
        match unique.len() {
            0 => String::new(),
            1 => unique[0].to_string(),
            _ => {
                if self.profile.pep604_unions {
                    unique.join(" | ")
                } else {
                    self.imports.insert("Union");
                    format!("Union[{}]", unique.join(", "))
                }
            }
        }
    }

    /// `T | None` under the profile's union syntax.
    pub fn optional(&mut self, base: &str) -> String {
        if base == "None" || base.split(" | ").any(|part| part == "None") {
            return base.to_string();
        }
        if self.profile.pep604_unions {
            format!("{base} | None")
        } else {
            self.imports.insert("Union");
            format!("Union[{base}, None]")
        }
    }
}

fn primitive_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::String => "str",
        PrimitiveKind::Bytes => "bytes",
        PrimitiveKind::Integer => "int",
        PrimitiveKind::Number => "float",
        PrimitiveKind::Boolean => "bool",
        PrimitiveKind::Null => "None",
        PrimitiveKind::Any => "JsonValue",
    }
}

fn render_literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Str(s) => format!("\"{}\"", escape_py_string(s)),
        LiteralValue::Int(i) => i.to_string(),
        LiteralValue::Float(f) => f.to_string(),
        LiteralValue::Bool(true) => "True".to_string(),
        LiteralValue::Bool(false) => "False".to_string(),
        LiteralValue::Null => "None".to_string(),
    }
}
