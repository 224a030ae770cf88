//! Shared JSON fixtures for kinetic tests and benches.
//!
//! `fixtures/manifest.json` at the workspace root maps fixture names to paths
//! relative to the `fixtures/` directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    /// Preset libraries: `{ "presetName": { ...props } }` documents.
    presets: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn read_fixture(rel: &str) -> Result<String> {
    let path = fixtures_root().join(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

pub mod presets {
    use super::*;

    fn relative(name: &str) -> Result<&'static str> {
        MANIFEST
            .presets
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("unknown preset library fixture '{name}'"))
    }

    /// Names of every preset library in the manifest.
    pub fn keys() -> Vec<String> {
        MANIFEST.presets.keys().cloned().collect()
    }

    /// Raw JSON text, ready for `PresetLibrary::from_json`.
    pub fn json(name: &str) -> Result<String> {
        read_fixture(relative(name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let text = json(name)?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse preset library fixture {name}"))
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(fixtures_root().join(relative(name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_lists_every_library() {
        let mut keys = presets::keys();
        keys.sort();
        assert_eq!(keys, ["sequence", "ui"]);
        for key in keys {
            assert!(presets::path(&key).unwrap().exists(), "missing {key}");
        }
    }

    #[test]
    fn libraries_parse_as_objects() {
        let ui: serde_json::Map<String, serde_json::Value> =
            presets::load("ui").expect("ui presets");
        assert!(ui.contains_key("fadeIn"));
        assert!(presets::json("nope").is_err());
    }
}
