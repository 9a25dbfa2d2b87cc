use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use clientsmith::{generate_from_text, Error, GenerationProfile, PackageSpec};

/// Generate a typed Python client package from an OpenAPI document.
#[derive(Debug, Parser)]
#[command(name = "clientsmith", version)]
struct Args {
    /// Path to the OpenAPI document (JSON or YAML).
    spec: PathBuf,

    /// Name of the generated package.
    #[arg(short = 'n', long)]
    package_name: String,

    /// Directory the package is written into.
    #[arg(short = 'o', long, default_value = ".")]
    output_dir: PathBuf,

    /// Target Python version, e.g. 3.10.
    #[arg(long, default_value = "3.10")]
    python_version: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    match run(&args) {
        Ok(package_dir) => {
            println!("{}", package_dir.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<PathBuf, Error> {
    let text = fs::read_to_string(&args.spec).map_err(Error::Read)?;
    let profile = GenerationProfile::from_version(&args.python_version)?;
    let package = PackageSpec {
        package_name: args.package_name.clone(),
        output_dir: args.output_dir.clone(),
    };
    generate_from_text(&text, &package, profile)
}
