//! Serde-backed host implementation for offline runs.
//!
//! A snapshot directory holds a `snapshot.json` describing the catalogs plus
//! the container files it references. The binary and the integration tests
//! use this in place of a live host; an embedding process would supply its
//! own [`Host`] implementation instead.

use crate::host::{
    DataFile, EditorIdSource, Form, FormId, FormType, GlobalVar, Host, ScriptFunction, Setting,
};
use ahash::AHashMap;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// In-memory host catalogs deserialized from `snapshot.json`.
#[derive(Debug, Default, Deserialize)]
pub struct HostSnapshot {
    #[serde(default)]
    pub console_commands: Vec<ScriptFunction>,
    #[serde(default)]
    pub script_functions: Vec<ScriptFunction>,
    #[serde(default)]
    pub game_settings: Vec<Setting>,
    #[serde(default)]
    pub ini_settings: Vec<Setting>,
    #[serde(default)]
    pub ini_prefs: Vec<Setting>,
    #[serde(default)]
    pub globals: Vec<GlobalVar>,
    #[serde(default)]
    pub forms: Vec<Form>,
    #[serde(default)]
    pub full_files: Vec<DataFile>,
    #[serde(default)]
    pub small_files: Vec<DataFile>,

    #[serde(skip)]
    pref_index: AHashMap<String, usize>,
}

impl HostSnapshot {
    /// Load a snapshot directory. Relative container paths are resolved
    /// against the directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join("snapshot.json");
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read snapshot: {}", path.display()))?;
        let mut snapshot: HostSnapshot = serde_json::from_str(&text)
            .with_context(|| format!("malformed snapshot: {}", path.display()))?;

        for file in snapshot
            .full_files
            .iter_mut()
            .chain(snapshot.small_files.iter_mut())
        {
            if file.path.is_relative() {
                file.path = dir.join(&file.path);
            }
        }

        snapshot.reindex();
        Ok(snapshot)
    }

    /// Rebuild derived lookup tables after the catalogs were mutated.
    /// Game settings are kept name-sorted to match the live host's ordered
    /// settings collection.
    pub fn reindex(&mut self) {
        self.game_settings.sort_by(|a, b| a.name.cmp(&b.name));
        self.pref_index = self
            .ini_prefs
            .iter()
            .enumerate()
            .map(|(i, setting)| (setting.name.clone(), i))
            .collect();
    }
}

impl Host for HostSnapshot {
    fn console_commands(&self) -> &[ScriptFunction] {
        &self.console_commands
    }

    fn script_functions(&self) -> &[ScriptFunction] {
        &self.script_functions
    }

    fn game_settings(&self) -> &[Setting] {
        &self.game_settings
    }

    fn ini_settings(&self) -> &[Setting] {
        &self.ini_settings
    }

    fn ini_pref(&self, name: &str) -> Option<&Setting> {
        self.pref_index.get(name).map(|&i| &self.ini_prefs[i])
    }

    fn globals(&self) -> &[GlobalVar] {
        &self.globals
    }

    fn forms_of_type(&self, kind: FormType) -> Vec<&Form> {
        self.forms.iter().filter(|f| f.kind == kind).collect()
    }

    fn all_forms(&self) -> Vec<&Form> {
        self.forms.iter().collect()
    }

    fn full_files(&self) -> &[DataFile] {
        &self.full_files
    }

    fn small_files(&self) -> &[DataFile] {
        &self.small_files
    }
}

/// Editor-id override table keyed by form id, the offline stand-in for a
/// host module that recovers dropped editor ids.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct OverrideTable {
    entries: AHashMap<FormId, String>,
}

impl OverrideTable {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read override table: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("malformed override table: {}", path.display()))
    }

    pub fn insert(&mut self, id: FormId, editor_id: impl Into<String>) {
        self.entries.insert(id, editor_id.into());
    }
}

impl EditorIdSource for OverrideTable {
    fn editor_id<'a>(&'a self, form: &'a Form) -> &'a str {
        self.entries
            .get(&form.form_id)
            .map(String::as_str)
            .unwrap_or(&form.editor_id)
    }
}
