//! Package assembly: write the generated package to disk.
//!
//! All file contents are generated before anything is written, so a
//! generation failure never leaves a partial package behind.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::codegen::{generate_client, generate_models, generate_types, GenerationProfile};
use crate::error::Error;
use crate::ir::IRDocument;

/// Where and under what name the package is written.
#[derive(Debug, Clone)]
pub struct PackageSpec {
    pub package_name: String,
    pub output_dir: PathBuf,
}

/// Generate and write the package; returns the package directory.
pub fn generate_package(
    spec: &PackageSpec,
    ir: &IRDocument,
    profile: GenerationProfile,
) -> Result<PathBuf, Error> {
    let models = generate_models(ir, profile)?;
    let types = generate_types(profile);
    let client = generate_client(ir, profile)?;
    let init = init_content();

    let package_dir = spec.output_dir.join(&spec.package_name);
    fs::create_dir_all(&package_dir).map_err(Error::Write)?;
    write_file(&package_dir.join("models.py"), &models)?;
    write_file(&package_dir.join("types.py"), &types)?;
    write_file(&package_dir.join("client.py"), &client)?;
    write_file(&package_dir.join("__init__.py"), &init)?;
    info!(package = %package_dir.display(), "wrote generated package");
    Ok(package_dir)
}

fn write_file(path: &Path, content: &str) -> Result<(), Error> {
    fs::write(path, content).map_err(Error::Write)
}

fn init_content() -> String {
    let lines = [
        "from .client import (",
        "    AsyncClient,",
        "    ClientError,",
        "    DecodeError,",
        "    SyncClient,",
        "    TransportError,",
        "    UnexpectedStatusError,",
        "    create,",
        ")",
        "from .models import *  # noqa: F403",
        "from .types import (",
        "    CookieParams,",
        "    ErrorResponse,",
        "    HeaderParams,",
        "    Headers,",
        "    JsonValue,",
        "    PathParams,",
        "    QueryParams,",
        "    SuccessResponse,",
        ")",
        "",
        "__all__ = [",
        "    \"SyncClient\",",
        "    \"AsyncClient\",",
        "    \"create\",",
        "    \"SuccessResponse\",",
        "    \"ErrorResponse\",",
        "    \"JsonValue\",",
        "    \"Headers\",",
        "    \"QueryParams\",",
        "    \"PathParams\",",
        "    \"HeaderParams\",",
        "    \"CookieParams\",",
        "    \"ClientError\",",
        "    \"TransportError\",",
        "    \"DecodeError\",",
        "    \"UnexpectedStatusError\",",
        "]",
    ];
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
