//! Error taxonomy for the generation pipeline.
//!
//! `SpecError` covers malformed or unresolvable input documents; every
//! variant names the document location it came from. `GenerationError`
//! covers cases where the selected profile cannot represent the IR. Both
//! are fatal: the pipeline makes a single pass and never writes partial
//! output.

use thiserror::Error;

/// Malformed or unresolvable input document.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("OpenAPI document must be a JSON object")]
    NotAnObject,

    #[error("failed to parse OpenAPI document: {0}")]
    Parse(String),

    #[error("missing or invalid 'openapi' version field")]
    MissingVersion,

    #[error("unresolvable $ref pointer: {pointer}")]
    BrokenReference { pointer: String },

    #[error("external $ref is not supported: {reference}")]
    UnsupportedReference { reference: String },

    #[error("$ref must be a string at {location}")]
    MalformedReference { location: String },

    #[error("heterogeneous enum at {location}: literal values mix scalar kinds")]
    HeterogeneousEnum { location: String },

    #[error("array schema at {location} is missing an item schema")]
    MissingItemSchema { location: String },

    #[error("duplicate operation id '{id}': each operation must have a unique identifier")]
    DuplicateOperationId { id: String },

    #[error("duplicate parameter '{name}' in {location} of {operation}")]
    DuplicateParameter {
        name: String,
        location: String,
        operation: String,
    },

    #[error("duplicate response status '{status}' in {operation}")]
    DuplicateStatus { status: String, operation: String },

    #[error("invalid response status key '{status}' in {operation}")]
    InvalidStatus { status: String, operation: String },
}

/// The selected profile cannot represent part of the IR.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("unknown target version '{0}'")]
    UnknownTargetVersion(String),

    #[error("union at {location} has no members and no representable encoding")]
    EmptyUnion { location: String },
}

/// Umbrella error for the whole pipeline, including I/O at the package
/// boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("failed to read spec file: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write generated package: {0}")]
    Write(#[source] std::io::Error),
}
