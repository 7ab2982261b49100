use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::error::Result;

/// Friendly-name lookup tables for assets (node ids) and users.
///
/// Loaded once from an optional JSON file of the form
///
/// ```json
/// {
///   "nodeids": { "node//<id>": "friendly name" },
///   "userids": { "<username>": "friendly name" }
/// }
/// ```
///
/// and read-only for the rest of the run. Report bodies and the
/// `--user`/`--asset` filters both work on the resolved display names.
#[derive(Debug, Clone, Deserialize)]
pub struct AliasTables {
    /// node id → display name.
    #[serde(default)]
    pub nodeids: HashMap<String, String>,
    /// username → display name.
    #[serde(default)]
    pub userids: HashMap<String, String>,
}

impl Default for AliasTables {
    /// Built-in single-entry tables used when no alias file exists.
    fn default() -> Self {
        let mut nodeids = HashMap::new();
        nodeids.insert(
            "node//aabbccddeeffgghhiijjkkllmmnnooppqqrrssttuuvvwwxxyyzz001122334455".to_string(),
            "My Pi".to_string(),
        );
        let mut userids = HashMap::new();
        userids.insert("admin".to_string(), "Administrator".to_string());
        Self { nodeids, userids }
    }
}

impl AliasTables {
    /// Default location of the alias file, next to the events database.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meshcentral-data")
            .join("mesh-report-aliases.json")
    }

    /// Load tables from `path` when given, else from the default location.
    ///
    /// A missing file silently yields the built-in defaults; a file that
    /// exists but cannot be read or parsed logs a warning and yields the
    /// defaults as well.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(tables) => tables,
            Err(e) => {
                warn!(
                    "Could not load alias file {}: {}; using built-in defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Load tables from an explicit file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Display name for a username, or the raw name when no alias exists.
    pub fn resolve_user<'a>(&'a self, raw: &'a str) -> &'a str {
        self.userids.get(raw).map(String::as_str).unwrap_or(raw)
    }

    /// Display name for a node id, or the raw id when no alias exists.
    pub fn resolve_asset<'a>(&'a self, raw: &'a str) -> &'a str {
        self.nodeids.get(raw).map(String::as_str).unwrap_or(raw)
    }

    /// Whether `name` is one of the known user display names.
    pub fn is_known_user(&self, name: &str) -> bool {
        self.userids.values().any(|alias| alias == name)
    }

    /// Whether `name` is one of the known asset display names.
    pub fn is_known_asset(&self, name: &str) -> bool {
        self.nodeids.values().any(|alias| alias == name)
    }
}
