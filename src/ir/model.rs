//! IR data types.
//!
//! Cycles in the type graph are always expressed through a named
//! [`SchemaIR::Reference`] into the document arena, never inline, so no
//! generator recurses unboundedly.

use std::collections::BTreeMap;

/// Scalar kinds the generators know how to lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    /// String schemas with `format: binary` or `format: byte` carry raw
    /// payloads, not text.
    Bytes,
    Integer,
    Number,
    Boolean,
    Null,
    /// No usable type information; lowers to the target's "any JSON" type.
    Any,
}

/// A literal value inside an enum.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl LiteralValue {
    /// The scalar kind of this literal, used to check enum homogeneity.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Str(_) => PrimitiveKind::String,
            Self::Int(_) => PrimitiveKind::Integer,
            Self::Float(_) => PrimitiveKind::Number,
            Self::Bool(_) => PrimitiveKind::Boolean,
            Self::Null => PrimitiveKind::Null,
        }
    }
}

/// One field of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIR {
    pub name: String,
    pub ty: SchemaIR,
    pub required: bool,
}

/// Canonical type description of a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaIR {
    Primitive(PrimitiveKind),
    Array(Box<SchemaIR>),
    /// Record with a fixed field set, declaration order preserved.
    Object(Vec<FieldIR>),
    /// Open mapping with uniform value type (additionalProperties).
    Map(Box<SchemaIR>),
    Enum {
        values: Vec<LiteralValue>,
        base: PrimitiveKind,
    },
    Union {
        members: Vec<SchemaIR>,
        /// Tag field name for discriminated unions.
        discriminant: Option<String>,
    },
    /// Indirection to a named node in the document arena.
    Reference(String),
}

impl SchemaIR {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Primitive(PrimitiveKind::Null))
    }

    /// Whether this schema is worth hoisting to a named definition when it
    /// appears anonymously in an operation (objects with fields, enums).
    pub fn warrants_hoisting(&self) -> bool {
        match self {
            Self::Object(fields) => !fields.is_empty(),
            Self::Enum { .. } => true,
            _ => false,
        }
    }
}

/// Where a parameter is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParamLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

/// A single operation parameter.
#[derive(Debug, Clone)]
pub struct ParameterIR {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,
    pub ty: SchemaIR,
    /// Serialization style (e.g. "form", "deepObject").
    pub style: Option<String>,
    pub explode: Option<bool>,
    /// Parameters with a declared default are never required.
    pub has_default: bool,
}

/// One request-body encoding.
#[derive(Debug, Clone)]
pub struct BodyVariantIR {
    pub content_type: String,
    pub schema: Option<SchemaIR>,
}

/// Request body keyed by content type, declaration order preserved.
#[derive(Debug, Clone)]
pub struct RequestBodyIR {
    pub required: bool,
    pub variants: Vec<BodyVariantIR>,
}

/// A response status key: a literal code, a range ("2XX"), or "default".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKey {
    Code(u16),
    /// Class digit: `Range(2)` is "2XX".
    Range(u8),
    Default,
}

impl StatusKey {
    /// Parse a response-table key. Accepts "200", "2XX", "default".
    pub fn parse(key: &str) -> Option<Self> {
        if key.eq_ignore_ascii_case("default") {
            return Some(Self::Default);
        }
        let upper = key.to_ascii_uppercase();
        if upper.len() == 3 && upper.ends_with("XX") {
            let class = upper.as_bytes()[0];
            if class.is_ascii_digit() {
                return Some(Self::Range(class - b'0'));
            }
            return None;
        }
        let code: u16 = key.parse().ok()?;
        (100..=599).contains(&code).then_some(Self::Code(code))
    }

    pub fn matches(self, status: u16) -> bool {
        match self {
            Self::Code(code) => code == status,
            Self::Range(class) => status / 100 == u16::from(class),
            Self::Default => true,
        }
    }

    /// Success means the 2xx class; "default" counts as error-shaped since
    /// it usually documents failure payloads.
    pub fn is_success(self) -> bool {
        match self {
            Self::Code(code) => (200..300).contains(&code),
            Self::Range(class) => class == 2,
            Self::Default => false,
        }
    }

    pub fn render(self) -> String {
        match self {
            Self::Code(code) => code.to_string(),
            Self::Range(class) => format!("{class}XX"),
            Self::Default => "default".to_string(),
        }
    }

    /// Specificity class for dispatch ordering: exact < range < default.
    fn specificity(self) -> u8 {
        match self {
            Self::Code(_) => 0,
            Self::Range(_) => 1,
            Self::Default => 2,
        }
    }
}

/// One declared response: a status key and its content-type variants.
#[derive(Debug, Clone)]
pub struct ResponseEntryIR {
    pub status: StatusKey,
    /// Distinct content types for this status; empty means a bodyless
    /// response (matched with a wildcard content rule).
    pub variants: Vec<BodyVariantIR>,
}

/// A single row of the generated dispatch table.
#[derive(Debug, Clone)]
pub struct DispatchRule {
    pub status: StatusKey,
    /// `None` is the content-type wildcard.
    pub content_type: Option<String>,
    pub schema: Option<SchemaIR>,
}

/// The response table of one operation.
#[derive(Debug, Clone, Default)]
pub struct ResponseTable {
    pub entries: Vec<ResponseEntryIR>,
}

impl ResponseTable {
    /// Flatten the table into dispatch rules ordered most-specific first:
    /// exact status + exact content type, exact + wildcard, range + exact,
    /// range + wildcard, then "default". The generated client walks this
    /// list and takes the first match, so the order is the semantic
    /// contract callers rely on.
    pub fn dispatch_plan(&self) -> Vec<DispatchRule> {
        let mut rules = Vec::new();
        for entry in &self.entries {
            if entry.variants.is_empty() {
                rules.push(DispatchRule {
                    status: entry.status,
                    content_type: None,
                    schema: None,
                });
                continue;
            }
            for variant in &entry.variants {
                rules.push(DispatchRule {
                    status: entry.status,
                    content_type: Some(variant.content_type.clone()),
                    schema: variant.schema.clone(),
                });
            }
        }
        // Stable sort keeps declaration order within a specificity class.
        rules.sort_by_key(|rule| {
            let content = u8::from(rule.content_type.is_none());
            (rule.status.specificity(), content)
        });
        rules
    }

    /// Select the rule for an observed status and content type.
    pub fn lookup(&self, status: u16, content_type: &str) -> Option<DispatchRule> {
        let base = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim();
        self.dispatch_plan()
            .into_iter()
            .find(|rule| {
                rule.status.matches(status)
                    && rule
                        .content_type
                        .as_ref()
                        .is_none_or(|expected| expected == base)
            })
    }

    /// Literal status codes declared on this operation (used for the
    /// generated EXPECTED_STATUSES map). An explicit "default" entry means
    /// every status is expected, so the set is empty.
    pub fn known_statuses(&self) -> Vec<u16> {
        if self
            .entries
            .iter()
            .any(|entry| entry.status == StatusKey::Default)
        {
            return Vec::new();
        }
        let mut out = Vec::new();
        for entry in &self.entries {
            if let StatusKey::Code(code) = entry.status {
                if !out.contains(&code) {
                    out.push(code);
                }
            }
        }
        out
    }
}

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "get" => Some(Self::Get),
            "put" => Some(Self::Put),
            "post" => Some(Self::Post),
            "delete" => Some(Self::Delete),
            "options" => Some(Self::Options),
            "head" => Some(Self::Head),
            "patch" => Some(Self::Patch),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Wire form, e.g. "GET".
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }

    /// Python method name on the generated client, e.g. "get".
    pub fn py_name(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }
}

/// An HTTP operation, immutable after construction.
#[derive(Debug, Clone)]
pub struct OperationIR {
    /// Unique PascalCase identifier (declared operationId or synthesized
    /// from method + path).
    pub id: String,
    pub method: HttpMethod,
    /// Literal path template, e.g. "/users/{id}".
    pub path: String,
    pub summary: Option<String>,
    pub parameters: Vec<ParameterIR>,
    pub request_body: Option<RequestBodyIR>,
    pub responses: ResponseTable,
}

impl OperationIR {
    pub fn parameters_at(&self, location: ParamLocation) -> impl Iterator<Item = &ParameterIR> {
        self.parameters
            .iter()
            .filter(move |param| param.location == location)
    }

    /// Distinct response content types, declaration order.
    pub fn response_content_types(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for entry in &self.responses.entries {
            for variant in &entry.variants {
                if !out.contains(&variant.content_type.as_str()) {
                    out.push(&variant.content_type);
                }
            }
        }
        out
    }
}

/// The closed output of the build phase and sole input to generation.
#[derive(Debug, Clone, Default)]
pub struct IRDocument {
    /// Named schema arena; BTreeMap gives deterministic emission order.
    pub schemas: BTreeMap<String, SchemaIR>,
    pub operations: Vec<OperationIR>,
}
