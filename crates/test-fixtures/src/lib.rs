//! Test support for Fathom: fixture loading plus scripted provider doubles.
//!
//! Fixture JSON lives under `test-fixtures/fixtures/`. The doubles implement
//! the provider traits so stages and the controller can be driven without
//! a model server or an index.

mod doubles;

pub use doubles::{FailingIndex, ScriptedModel, StalledIndex, StaticIndex};

use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Root directory of the fixture files.
fn fixtures_root() -> PathBuf {
    // Walk up from the crate under test until a test-fixtures directory appears.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);
    loop {
        for candidate in [path.join("fixtures"), path.join("test-fixtures").join("fixtures")] {
            if candidate.join("corpora").is_dir() {
                return candidate;
            }
        }
        if !path.pop() {
            break;
        }
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}
