//! Code generation: IR -> Python source text.
//!
//! Three generators share the IR and a [`GenerationProfile`]:
//! - `models`: one TypedDict or alias per arena schema (`models.py`)
//! - `runtime`: the fixed support types (`types.py`)
//! - `client`: protocols, parameter types, dispatch tables, and the
//!   `SyncClient` / `AsyncClient` classes (`client.py`)

mod client;
mod models;
mod profile;
mod pytype;
mod runtime;

pub use client::generate_client;
pub use models::generate_models;
pub use profile::GenerationProfile;
pub use pytype::{PyType, TypeEmitter};
pub use runtime::generate_types;
