//! Intermediate representation for OpenAPI documents.
//!
//! The IR is independent of the source document's shape: a closed arena of
//! named schema nodes plus a flat operation list. It is built once, then
//! read by every generator.
//!
//! - `model`: the IR data types (`SchemaIR`, `OperationIR`, `IRDocument`)
//! - `resolve`: schema -> `SchemaIR` lowering, naming, and the arena
//! - `build`: document -> `IRDocument`

mod build;
mod model;
mod resolve;

pub use build::build_ir;
pub use model::{
    BodyVariantIR, DispatchRule, FieldIR, HttpMethod, IRDocument, LiteralValue, OperationIR,
    ParamLocation, ParameterIR, PrimitiveKind, RequestBodyIR, ResponseEntryIR, ResponseTable,
    SchemaIR, StatusKey,
};
pub use resolve::TypeResolver;
