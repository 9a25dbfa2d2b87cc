//! Generate typed Python client packages from OpenAPI 3.x documents.
//!
//! Pipeline: raw text -> document tree ([`loader`]) -> typed view
//! ([`spec`]) -> intermediate representation ([`ir`]) -> Python source
//! ([`codegen`]) -> package on disk ([`package`]). Control flows strictly
//! forward; regenerating from the same document and profile is
//! byte-for-byte reproducible.

pub mod codegen;
pub mod error;
pub mod ir;
pub mod loader;
pub mod package;
pub mod spec;
pub mod util;

use std::path::PathBuf;

pub use codegen::GenerationProfile;
pub use error::Error;
pub use package::PackageSpec;

/// Run the whole pipeline over raw document text.
pub fn generate_from_text(
    text: &str,
    package: &PackageSpec,
    profile: GenerationProfile,
) -> Result<PathBuf, Error> {
    let document = loader::load_document(text)?;
    let ir = ir::build_ir(&document)?;
    package::generate_package(package, &ir, profile)
}
