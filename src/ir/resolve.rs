//! Schema lowering and the named-schema arena.
//!
//! [`TypeResolver`] owns the arena of named [`SchemaIR`] nodes. Every
//! distinct document location lowers to exactly one arena entry, so two
//! references to the same schema always yield the same `Reference` name.
//! Recursion is broken by registering a schema's name before lowering its
//! body; self-references resolve to the name and never recurse.
//!
//! Anonymous object schemas nested inside other schemas are hoisted into
//! the arena under derived names (`UserAddress` for the `address` field of
//! `User`), since the generated models file cannot express inline records.
//! Inline enums stay inline; they render as `Literal[...]`.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::SpecError;
use crate::loader::schema_name_from_reference;
use crate::spec::{from_entry, AdditionalProperties, Schema, SchemaType};
use crate::util::{pascal_case, pointer_tail, sanitize_type_name};

use super::model::{FieldIR, LiteralValue, PrimitiveKind, SchemaIR};

/// Lowers document schemas into the IR arena.
pub struct TypeResolver {
    /// Fully resolved document tree, used to chase deferred cycle pointers.
    root: Value,
    /// Raw `components.schemas` entries in declaration order.
    components: Map<String, Value>,
    arena: BTreeMap<String, SchemaIR>,
    /// Document pointer -> assigned arena name. Registered before lowering
    /// so recursive schemas terminate.
    assigned: HashMap<String, String>,
    used_names: HashSet<String>,
}

impl TypeResolver {
    pub fn new(root: Value) -> Self {
        let components = root
            .pointer("/components/schemas")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Self {
            root,
            components,
            arena: BTreeMap::new(),
            assigned: HashMap::new(),
            used_names: HashSet::new(),
        }
    }

    /// Lower every named component schema into the arena.
    pub fn resolve_components(&mut self) -> Result<(), SpecError> {
        let names: Vec<String> = self.components.keys().cloned().collect();
        for name in names {
            self.ensure_component(&name)?;
        }
        Ok(())
    }

    /// Consume the resolver, yielding the finished arena.
    pub fn into_arena(self) -> BTreeMap<String, SchemaIR> {
        self.arena
    }

    /// Lower one schema value kept as raw JSON for ordering.
    pub fn resolve_value(
        &mut self,
        value: &Value,
        location: &str,
        hint: &str,
    ) -> Result<SchemaIR, SpecError> {
        let schema: Schema = from_entry(value, location)?;
        self.resolve_schema(&schema, location, hint)
    }

    /// Lower a schema, then intern it under a derived name if it is an
    /// object or enum worth naming. Used for anonymous operation schemas
    /// (parameters, bodies, responses).
    pub fn resolve_hoisted(
        &mut self,
        schema: &Schema,
        location: &str,
        hint: &str,
    ) -> Result<SchemaIR, SpecError> {
        let ir = self.resolve_schema(schema, location, hint)?;
        Ok(self.hoist(ir, hint))
    }

    /// Intern an IR node under a unique name derived from `hint` when it
    /// warrants a standalone definition; pass everything else through.
    pub fn hoist(&mut self, ir: SchemaIR, hint: &str) -> SchemaIR {
        if !ir.warrants_hoisting() {
            return ir;
        }
        let name = self.unique_name(hint);
        debug!(name, "hoisted anonymous schema");
        self.arena.insert(name.clone(), ir);
        SchemaIR::Reference(name)
    }

    /// Lower a schema to IR. `location` is the document pointer used in
    /// errors; `hint` seeds names for hoisted nested objects.
    pub fn resolve_schema(
        &mut self,
        schema: &Schema,
        location: &str,
        hint: &str,
    ) -> Result<SchemaIR, SpecError> {
        let ir = self.resolve_schema_inner(schema, location, hint)?;
        // Nullable schemas wrap the result; 3.1 type arrays and
        // anyOf-with-null already produced a null member above.
        if schema.is_nullable() && !admits_null(&ir) {
            return Ok(SchemaIR::Union {
                members: vec![ir, SchemaIR::Primitive(PrimitiveKind::Null)],
                discriminant: None,
            });
        }
        Ok(ir)
    }

    fn resolve_schema_inner(
        &mut self,
        schema: &Schema,
        location: &str,
        hint: &str,
    ) -> Result<SchemaIR, SpecError> {
        if let Some(reference) = &schema.ref_path {
            return self.resolve_ref(reference, location);
        }
        if let Some(value) = &schema.const_value {
            let literal = literal_from_value(value, location)?;
            let base = literal.kind();
            return Ok(SchemaIR::Enum {
                values: vec![literal],
                base,
            });
        }
        if let Some(values) = &schema.enum_values {
            return self.resolve_enum(values, location);
        }
        if let Some(members) = &schema.all_of {
            return self.resolve_all_of(schema, members, location, hint);
        }
        if let Some(members) = schema.one_of.as_ref().or(schema.any_of.as_ref()) {
            return self.resolve_union(schema, members, location, hint);
        }
        match &schema.schema_type {
            Some(SchemaType::Single(name)) => self.resolve_typed(schema, name, location, hint),
            Some(SchemaType::Multiple(names)) => {
                self.resolve_type_array(schema, names, location, hint)
            }
            None => {
                // Untyped schemas with properties or additionalProperties
                // are still objects; bare ones carry no information.
                if schema.properties.is_some() {
                    self.resolve_object(schema, location, hint)
                } else if schema.additional_properties.is_some() {
                    self.resolve_typed(schema, "object", location, hint)
                } else {
                    Ok(SchemaIR::Primitive(PrimitiveKind::Any))
                }
            }
        }
    }

    /// Resolve a `$ref` marker left in place by the loader.
    fn resolve_ref(&mut self, reference: &str, location: &str) -> Result<SchemaIR, SpecError> {
        if let Some(name) = schema_name_from_reference(reference) {
            let name = name.to_string();
            let assigned = self.ensure_component(&name)?;
            return Ok(SchemaIR::Reference(assigned));
        }
        // A non-schema pointer here means the loader hit a reference cycle
        // and deferred it. Hoist the target under a synthetic name.
        if let Some(assigned) = self.assigned.get(reference) {
            return Ok(SchemaIR::Reference(assigned.clone()));
        }
        let name = self.unique_name(&sanitize_type_name(pointer_tail(reference)));
        self.assigned.insert(reference.to_string(), name.clone());

        let pointer = reference.strip_prefix('#').unwrap_or(reference);
        let target = self
            .root
            .pointer(pointer)
            .cloned()
            .ok_or_else(|| SpecError::BrokenReference {
                pointer: reference.to_string(),
            })?;
        let ir = self.resolve_value(&target, reference, &name)?;
        self.arena.insert(name.clone(), ir);
        Ok(SchemaIR::Reference(name))
    }

    /// Lower a named component schema, interning it exactly once.
    fn ensure_component(&mut self, name: &str) -> Result<String, SpecError> {
        let reference = format!("#/components/schemas/{name}");
        if let Some(assigned) = self.assigned.get(&reference) {
            return Ok(assigned.clone());
        }
        let assigned = self.unique_name(&sanitize_type_name(name));
        // Register before lowering so recursive schemas resolve to the
        // name instead of recursing.
        self.assigned.insert(reference.clone(), assigned.clone());

        let Some(raw) = self.components.get(name).cloned() else {
            return Err(SpecError::BrokenReference { pointer: reference });
        };
        let ir = self.resolve_value(&raw, &reference, &assigned)?;
        self.arena.insert(assigned.clone(), ir);
        Ok(assigned)
    }

    fn resolve_enum(&mut self, values: &[Value], location: &str) -> Result<SchemaIR, SpecError> {
        let mut literals = Vec::with_capacity(values.len());
        for value in values {
            literals.push(literal_from_value(value, location)?);
        }
        // All non-null values must share one scalar kind; integers are
        // absorbed into a number enum.
        let mut base = PrimitiveKind::Null;
        for literal in &literals {
            let kind = literal.kind();
            match (base, kind) {
                (_, PrimitiveKind::Null) => {}
                (PrimitiveKind::Null, _) => base = kind,
                (PrimitiveKind::Integer, PrimitiveKind::Number)
                | (PrimitiveKind::Number, PrimitiveKind::Integer) => {
                    base = PrimitiveKind::Number;
                }
                (current, _) if current == kind => {}
                _ => {
                    return Err(SpecError::HeterogeneousEnum {
                        location: location.to_string(),
                    })
                }
            }
        }
        Ok(SchemaIR::Enum {
            values: literals,
            base,
        })
    }

    /// allOf: merge the object fields of every member, last member wins on
    /// field conflicts. Members contributing no fields are skipped; an
    /// allOf with nothing to merge degrades to its sole member or an open
    /// mapping.
    fn resolve_all_of(
        &mut self,
        schema: &Schema,
        members: &[Schema],
        location: &str,
        hint: &str,
    ) -> Result<SchemaIR, SpecError> {
        let mut lowered = Vec::with_capacity(members.len());
        for (index, member) in members.iter().enumerate() {
            let member_location = format!("{location}/allOf/{index}");
            lowered.push(self.resolve_schema(member, &member_location, hint)?);
        }
        // Inline sibling properties participate as a final member.
        if schema.properties.is_some() {
            lowered.push(self.resolve_object(schema, location, hint)?);
        }

        let mut fields: Vec<FieldIR> = Vec::new();
        let mut merged_any = false;
        for member in &lowered {
            let Some(member_fields) = self.object_fields(member) else {
                continue;
            };
            merged_any = true;
            for field in member_fields {
                match fields.iter_mut().find(|f| f.name == field.name) {
                    Some(existing) => *existing = field,
                    None => fields.push(field),
                }
            }
        }
        if merged_any {
            return Ok(SchemaIR::Object(fields));
        }
        if lowered.len() == 1 {
            if let Some(only) = lowered.pop() {
                return Ok(only);
            }
        }
        Ok(SchemaIR::Map(Box::new(SchemaIR::Primitive(
            PrimitiveKind::Any,
        ))))
    }

    /// Object fields of an IR node, chasing references through the arena.
    fn object_fields(&self, ir: &SchemaIR) -> Option<Vec<FieldIR>> {
        let mut seen = HashSet::new();
        let mut current = ir;
        loop {
            match current {
                SchemaIR::Object(fields) => return Some(fields.clone()),
                SchemaIR::Reference(name) => {
                    if !seen.insert(name.clone()) {
                        return None;
                    }
                    current = self.arena.get(name)?;
                }
                _ => return None,
            }
        }
    }

    /// oneOf / anyOf. Null members collapse into a single null arm and
    /// duplicate members are dropped; a single surviving member degrades
    /// to that member directly.
    fn resolve_union(
        &mut self,
        schema: &Schema,
        members: &[Schema],
        location: &str,
        hint: &str,
    ) -> Result<SchemaIR, SpecError> {
        let keyword = if schema.one_of.is_some() {
            "oneOf"
        } else {
            "anyOf"
        };
        let mut lowered: Vec<SchemaIR> = Vec::new();
        let mut has_null = false;
        for (index, member) in members.iter().enumerate() {
            let member_location = format!("{location}/{keyword}/{index}");
            let member_hint = member
                .title
                .as_deref()
                .map(sanitize_type_name)
                .unwrap_or_else(|| format!("{hint}Variant{index}"));
            let ir = self.resolve_schema(member, &member_location, &member_hint)?;
            let ir = self.hoist(ir, &member_hint);
            if ir.is_null() {
                has_null = true;
            } else if !lowered.contains(&ir) {
                lowered.push(ir);
            }
        }
        if has_null {
            lowered.push(SchemaIR::Primitive(PrimitiveKind::Null));
        }
        let discriminant = schema
            .discriminator
            .as_ref()
            .map(|d| d.property_name.clone());
        if lowered.len() == 1 && discriminant.is_none() {
            if let Some(only) = lowered.pop() {
                return Ok(only);
            }
        }
        Ok(SchemaIR::Union {
            members: lowered,
            discriminant,
        })
    }

    fn resolve_typed(
        &mut self,
        schema: &Schema,
        type_name: &str,
        location: &str,
        hint: &str,
    ) -> Result<SchemaIR, SpecError> {
        match type_name {
            "string" => match schema.format.as_deref() {
                Some("binary" | "byte") => Ok(SchemaIR::Primitive(PrimitiveKind::Bytes)),
                _ => Ok(SchemaIR::Primitive(PrimitiveKind::String)),
            },
            "integer" => Ok(SchemaIR::Primitive(PrimitiveKind::Integer)),
            "number" => Ok(SchemaIR::Primitive(PrimitiveKind::Number)),
            "boolean" => Ok(SchemaIR::Primitive(PrimitiveKind::Boolean)),
            "null" => Ok(SchemaIR::Primitive(PrimitiveKind::Null)),
            "array" => {
                let Some(items) = &schema.items else {
                    return Err(SpecError::MissingItemSchema {
                        location: location.to_string(),
                    });
                };
                let item_location = format!("{location}/items");
                let item_hint = format!("{hint}Item");
                let item = self.resolve_schema(items, &item_location, &item_hint)?;
                let item = self.hoist_object(item, &item_hint);
                Ok(SchemaIR::Array(Box::new(item)))
            }
            "object" => self.resolve_object(schema, location, hint),
            _ => Ok(SchemaIR::Primitive(PrimitiveKind::Any)),
        }
    }

    /// OpenAPI 3.1 type arrays: each named type lowers on its own and the
    /// results form a union, with "null" contributing a null arm.
    fn resolve_type_array(
        &mut self,
        schema: &Schema,
        names: &[String],
        location: &str,
        hint: &str,
    ) -> Result<SchemaIR, SpecError> {
        let mut members: Vec<SchemaIR> = Vec::new();
        let mut has_null = false;
        for name in names {
            if name == "null" {
                has_null = true;
                continue;
            }
            let ir = self.resolve_typed(schema, name, location, hint)?;
            if !members.contains(&ir) {
                members.push(ir);
            }
        }
        if has_null {
            members.push(SchemaIR::Primitive(PrimitiveKind::Null));
        }
        if members.is_empty() {
            return Ok(SchemaIR::Primitive(PrimitiveKind::Null));
        }
        if members.len() == 1 {
            if let Some(only) = members.pop() {
                return Ok(only);
            }
        }
        Ok(SchemaIR::Union {
            members,
            discriminant: None,
        })
    }

    fn resolve_object(
        &mut self,
        schema: &Schema,
        location: &str,
        hint: &str,
    ) -> Result<SchemaIR, SpecError> {
        if let Some(properties) = &schema.properties {
            let required: HashSet<&str> = schema
                .required
                .iter()
                .flatten()
                .map(String::as_str)
                .collect();
            let mut fields = Vec::with_capacity(properties.len());
            for (name, raw) in properties {
                let field_location = format!("{location}/properties/{name}");
                let field_schema: Schema = from_entry(raw, &field_location)?;
                let field_hint = format!("{hint}{}", pascal_case(name));
                let ty = self.resolve_schema(&field_schema, &field_location, &field_hint)?;
                let ty = self.hoist_object(ty, &field_hint);
                // A declared default makes the field fillable client-side,
                // so it is never required in the generated model.
                let required = required.contains(name.as_str()) && field_schema.default.is_none();
                fields.push(FieldIR {
                    name: name.clone(),
                    ty,
                    required,
                });
            }
            return Ok(SchemaIR::Object(fields));
        }
        match &schema.additional_properties {
            Some(AdditionalProperties::Schema(value_schema)) => {
                let value_location = format!("{location}/additionalProperties");
                let value_hint = format!("{hint}Value");
                let value = self.resolve_schema(value_schema, &value_location, &value_hint)?;
                let value = self.hoist_object(value, &value_hint);
                Ok(SchemaIR::Map(Box::new(value)))
            }
            Some(AdditionalProperties::Bool(false)) => Ok(SchemaIR::Object(Vec::new())),
            _ => Ok(SchemaIR::Map(Box::new(SchemaIR::Primitive(
                PrimitiveKind::Any,
            )))),
        }
    }

    /// Hoist nested anonymous objects only. Enums stay inline here; the
    /// type emitter renders them as `Literal[...]` without a definition.
    fn hoist_object(&mut self, ir: SchemaIR, hint: &str) -> SchemaIR {
        if matches!(&ir, SchemaIR::Object(fields) if !fields.is_empty()) {
            let name = self.unique_name(hint);
            self.arena.insert(name.clone(), ir);
            return SchemaIR::Reference(name);
        }
        ir
    }

    /// Deterministic fresh name: the base itself, then `Base2`, `Base3`.
    fn unique_name(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "Unnamed" } else { base };
        let mut candidate = base.to_string();
        let mut counter = 1u32;
        while !self.used_names.insert(candidate.clone()) {
            counter += 1;
            candidate = format!("{base}{counter}");
        }
        candidate
    }
}

/// Whether an IR node already has a null arm.
fn admits_null(ir: &SchemaIR) -> bool {
    match ir {
        SchemaIR::Union { members, .. } => members.iter().any(SchemaIR::is_null),
        other => other.is_null(),
    }
}

fn literal_from_value(value: &Value, location: &str) -> Result<LiteralValue, SpecError> {
    match value {
        Value::String(s) => Ok(LiteralValue::Str(s.clone())),
        Value::Bool(b) => Ok(LiteralValue::Bool(*b)),
        Value::Null => Ok(LiteralValue::Null),
        Value::Number(n) => {
            if let Some(int) = n.as_i64() {
                Ok(LiteralValue::Int(int))
            } else {
                Ok(LiteralValue::Float(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        _ => Err(SpecError::HeterogeneousEnum {
            location: location.to_string(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn resolver(json: &str) -> TypeResolver {
        TypeResolver::new(serde_json::from_str(json).unwrap())
    }

    fn schema(json: &str) -> Schema {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_component_interned_once() {
        let mut tr = resolver(
            r#"{"components": {"schemas": {"Item": {
                "type": "object",
                "properties": {"id": {"type": "integer"}},
                "required": ["id"]
            }}}}"#,
        );
        let first = tr
            .resolve_schema(&schema(r##"{"$ref": "#/components/schemas/Item"}"##), "#", "A")
            .unwrap();
        let second = tr
            .resolve_schema(&schema(r##"{"$ref": "#/components/schemas/Item"}"##), "#", "B")
            .unwrap();
        assert_eq!(first, SchemaIR::Reference("Item".into()));
        assert_eq!(first, second);
        assert_eq!(tr.into_arena().len(), 1);
    }

    #[test]
    fn test_recursive_schema_terminates() {
        let mut tr = resolver(
            r##"{"components": {"schemas": {"Node": {
                "type": "object",
                "properties": {
                    "children": {"type": "array", "items": {"$ref": "#/components/schemas/Node"}}
                }
            }}}}"##,
        );
        tr.resolve_components().unwrap();
        let arena = tr.into_arena();
        let SchemaIR::Object(fields) = &arena["Node"] else {
            panic!("expected object");
        };
        assert_eq!(
            fields[0].ty,
            SchemaIR::Array(Box::new(SchemaIR::Reference("Node".into())))
        );
    }

    #[test]
    fn test_all_of_last_member_wins() {
        let mut tr = resolver(r"{}");
        let ir = tr
            .resolve_schema(
                &schema(
                    r#"{"allOf": [
                        {"type": "object", "properties": {"id": {"type": "string"}, "a": {"type": "integer"}}, "required": ["id"]},
                        {"type": "object", "properties": {"id": {"type": "integer"}}}
                    ]}"#,
                ),
                "#",
                "Merged",
            )
            .unwrap();
        let SchemaIR::Object(fields) = ir else {
            panic!("expected object");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "id");
        assert_eq!(fields[0].ty, SchemaIR::Primitive(PrimitiveKind::Integer));
        assert!(!fields[0].required);
        assert_eq!(fields[1].name, "a");
    }

    #[test]
    fn test_heterogeneous_enum_rejected() {
        let mut tr = resolver(r"{}");
        let err = tr
            .resolve_schema(&schema(r#"{"enum": ["a", 1]}"#), "#/e", "E")
            .unwrap_err();
        assert!(matches!(err, SpecError::HeterogeneousEnum { .. }));
    }

    #[test]
    fn test_enum_with_null_keeps_base_kind() {
        let mut tr = resolver(r"{}");
        let ir = tr
            .resolve_schema(&schema(r#"{"enum": ["a", "b", null]}"#), "#", "E")
            .unwrap();
        assert_eq!(
            ir,
            SchemaIR::Enum {
                values: vec![
                    LiteralValue::Str("a".into()),
                    LiteralValue::Str("b".into()),
                    LiteralValue::Null,
                ],
                base: PrimitiveKind::String,
            }
        );
    }

    #[test]
    fn test_nullable_flag_wraps_in_union() {
        let mut tr = resolver(r"{}");
        let ir = tr
            .resolve_schema(&schema(r#"{"type": "string", "nullable": true}"#), "#", "S")
            .unwrap();
        assert_eq!(
            ir,
            SchemaIR::Union {
                members: vec![
                    SchemaIR::Primitive(PrimitiveKind::String),
                    SchemaIR::Primitive(PrimitiveKind::Null),
                ],
                discriminant: None,
            }
        );
    }

    #[test]
    fn test_nullable_flag_on_type_array_not_double_wrapped() {
        let mut tr = resolver(r"{}");
        let ir = tr
            .resolve_schema(
                &schema(r#"{"type": ["string", "null"], "nullable": true}"#),
                "#",
                "S",
            )
            .unwrap();
        let SchemaIR::Union { members, .. } = ir else {
            panic!("expected union");
        };
        assert_eq!(members.len(), 2);
        assert_eq!(members.iter().filter(|m| m.is_null()).count(), 1);
    }

    #[test]
    fn test_type_array_with_null() {
        let mut tr = resolver(r"{}");
        let ir = tr
            .resolve_schema(&schema(r#"{"type": ["integer", "null"]}"#), "#", "N")
            .unwrap();
        let SchemaIR::Union { members, .. } = ir else {
            panic!("expected union");
        };
        assert_eq!(members.len(), 2);
        assert!(members[1].is_null());
    }

    #[test]
    fn test_binary_format_string_lowers_to_bytes() {
        let mut tr = resolver(r"{}");
        for format in ["binary", "byte"] {
            let ir = tr
                .resolve_schema(
                    &schema(&format!(r#"{{"type": "string", "format": "{format}"}}"#)),
                    "#",
                    "Blob",
                )
                .unwrap();
            assert_eq!(ir, SchemaIR::Primitive(PrimitiveKind::Bytes));
        }
        let plain = tr
            .resolve_schema(&schema(r#"{"type": "string", "format": "date-time"}"#), "#", "S")
            .unwrap();
        assert_eq!(plain, SchemaIR::Primitive(PrimitiveKind::String));
    }

    #[test]
    fn test_array_without_items_fails() {
        let mut tr = resolver(r"{}");
        let err = tr
            .resolve_schema(&schema(r#"{"type": "array"}"#), "#/bad", "A")
            .unwrap_err();
        assert!(matches!(err, SpecError::MissingItemSchema { .. }));
    }

    #[test]
    fn test_nested_object_hoisted_under_derived_name() {
        let mut tr = resolver(
            r#"{"components": {"schemas": {"User": {
                "type": "object",
                "properties": {
                    "address": {"type": "object", "properties": {"city": {"type": "string"}}}
                }
            }}}}"#,
        );
        tr.resolve_components().unwrap();
        let arena = tr.into_arena();
        let SchemaIR::Object(fields) = &arena["User"] else {
            panic!("expected object");
        };
        assert_eq!(fields[0].ty, SchemaIR::Reference("UserAddress".into()));
        assert!(matches!(&arena["UserAddress"], SchemaIR::Object(f) if f.len() == 1));
    }

    #[test]
    fn test_anonymous_enum_stays_inline() {
        let mut tr = resolver(r"{}");
        let ir = tr
            .resolve_schema(
                &schema(r#"{"type": "object", "properties": {"state": {"enum": ["on", "off"]}}}"#),
                "#",
                "Config",
            )
            .unwrap();
        let SchemaIR::Object(fields) = ir else {
            panic!("expected object");
        };
        assert!(matches!(fields[0].ty, SchemaIR::Enum { .. }));
    }

    #[test]
    fn test_discriminated_union() {
        let mut tr = resolver(
            r#"{"components": {"schemas": {
                "Cat": {"type": "object", "properties": {"kind": {"type": "string"}}},
                "Dog": {"type": "object", "properties": {"kind": {"type": "string"}}}
            }}}"#,
        );
        let ir = tr
            .resolve_schema(
                &schema(
                    r##"{"oneOf": [
                        {"$ref": "#/components/schemas/Cat"},
                        {"$ref": "#/components/schemas/Dog"}
                    ], "discriminator": {"propertyName": "kind"}}"##,
                ),
                "#",
                "Pet",
            )
            .unwrap();
        assert_eq!(
            ir,
            SchemaIR::Union {
                members: vec![
                    SchemaIR::Reference("Cat".into()),
                    SchemaIR::Reference("Dog".into()),
                ],
                discriminant: Some("kind".into()),
            }
        );
    }

    #[test]
    fn test_name_collision_gets_suffix() {
        let mut tr = resolver(r"{}");
        let first = tr.hoist(
            SchemaIR::Object(vec![FieldIR {
                name: "a".into(),
                ty: SchemaIR::Primitive(PrimitiveKind::String),
                required: true,
            }]),
            "Payload",
        );
        let second = tr.hoist(
            SchemaIR::Object(vec![FieldIR {
                name: "b".into(),
                ty: SchemaIR::Primitive(PrimitiveKind::String),
                required: true,
            }]),
            "Payload",
        );
        assert_eq!(first, SchemaIR::Reference("Payload".into()));
        assert_eq!(second, SchemaIR::Reference("Payload2".into()));
    }

    #[test]
    fn test_const_becomes_single_literal_enum() {
        let mut tr = resolver(r"{}");
        let ir = tr
            .resolve_schema(&schema(r#"{"const": "fixed"}"#), "#", "C")
            .unwrap();
        assert_eq!(
            ir,
            SchemaIR::Enum {
                values: vec![LiteralValue::Str("fixed".into())],
                base: PrimitiveKind::String,
            }
        );
    }
}
