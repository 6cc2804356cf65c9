use crate::error::{Result, SnippetsError};
use crate::expansion::ExpandOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const HASHTAG_CHAR: char = '#';
/// Expansions allowed per key within one top-level call before the marker freezes.
pub const MAX_EXPANSION_COUNT: usize = 15;
pub const SNIPPET_DIR_NAME: &str = "snippet";
pub const PROJECT_DIR_NAME: &str = ".snippets";
pub const CONFIG_FILENAME: &str = "config.json";
pub const SNIPPET_EXTENSION: &str = "md";

/// Get the snippets configuration directory
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = env::var("SNIPPETS_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("snippets");
    }
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".config").join("snippets"))
        .unwrap_or_else(|_| PathBuf::from(".snippets-config"))
}

/// Get the path to the settings file
pub fn get_config_file_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILENAME)
}

/// Get the directory holding global snippets
pub fn get_global_snippet_dir() -> PathBuf {
    get_config_dir().join(SNIPPET_DIR_NAME)
}

/// Get the directory holding project snippets under `root`
pub fn project_snippet_dir(root: &Path) -> PathBuf {
    root.join(PROJECT_DIR_NAME).join(SNIPPET_DIR_NAME)
}

/// User settings, read from `config.json` in the config directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Route `<inject>` blocks to their own channel instead of leaving them inline.
    pub extract_inject: bool,
    pub debug: bool,
    pub global_dir: Option<PathBuf>,
    pub project_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extract_inject: true,
            debug: false,
            global_dir: None,
            project_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing or blank file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&content)
            .map_err(|e| SnippetsError::InvalidConfig(format!("{}: {}", path.display(), e)))
    }

    pub fn load() -> Result<Self> {
        Self::load_from_path(&get_config_file_path())
    }

    /// Resolve the snippet directories, with `project_root` used when no
    /// explicit project directory is configured.
    pub fn snippet_paths(&self, project_root: Option<&Path>) -> SnippetPaths {
        let global = self
            .global_dir
            .clone()
            .unwrap_or_else(get_global_snippet_dir);
        let project = self
            .project_dir
            .clone()
            .or_else(|| project_root.map(project_snippet_dir));

        SnippetPaths { global, project }
    }

    pub fn expand_options(&self) -> ExpandOptions {
        ExpandOptions {
            extract_inject: self.extract_inject,
        }
    }
}

/// Where snippet files are read from. Project entries override global ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetPaths {
    pub global: PathBuf,
    pub project: Option<PathBuf>,
}
