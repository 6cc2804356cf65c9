//! Reads snippet files from disk into a [`SnippetRegistry`].
//!
//! A snippet is a `*.md` file whose lowercased stem is its name. An optional
//! YAML frontmatter block may declare `aliases` (a string or a list) and a
//! `description`:
//!
//! ```markdown
//! ---
//! aliases: [bug, ticket]
//! description: Jira issue template
//! ---
//! Create the issue in Jira.
//! ```

use crate::config::{SnippetPaths, SNIPPET_EXTENSION};
use crate::error::{Result, SnippetsError};
use crate::models::{Snippet, SnippetRegistry, SnippetSource};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    #[serde(default)]
    aliases: Option<Aliases>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Aliases {
    One(String),
    Many(Vec<String>),
}

impl Aliases {
    fn normalize(self) -> Vec<String> {
        let raw = match self {
            Aliases::One(alias) => vec![alias],
            Aliases::Many(aliases) => aliases,
        };
        raw.into_iter()
            .map(|alias| alias.trim().to_lowercase())
            .filter(|alias| !alias.is_empty())
            .collect()
    }
}

/// Split a leading `---` frontmatter block from the body. Returns `None` for
/// the frontmatter when there is no complete block.
fn split_frontmatter(raw: &str) -> (Option<&str>, &str) {
    let Some(rest) = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))
    else {
        return (None, raw);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, raw)
}

/// Build a snippet from the raw text of a file.
pub fn parse_snippet(name: &str, raw: &str, path: &Path, source: SnippetSource) -> Result<Snippet> {
    let (yaml, body) = split_frontmatter(raw);

    let frontmatter = match yaml {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str::<Option<Frontmatter>>(yaml)
            .map_err(|source| SnippetsError::Frontmatter {
                path: path.to_path_buf(),
                source,
            })?
            .unwrap_or_default(),
        _ => Frontmatter::default(),
    };

    let mut snippet = Snippet::new(name, body.trim()).with_source(source);
    snippet.aliases = frontmatter.aliases.map(Aliases::normalize).unwrap_or_default();
    snippet.description = frontmatter
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    snippet.path = Some(path.to_path_buf());

    Ok(snippet)
}

fn snippet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_snippet = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(SNIPPET_EXTENSION));
        if is_snippet {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every snippet in `dir`. A missing directory holds no snippets; files
/// with unreadable frontmatter are skipped.
pub fn load_dir(dir: &Path, source: SnippetSource) -> Result<Vec<Snippet>> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "snippet directory not found");
        return Ok(Vec::new());
    }

    let mut snippets = Vec::new();
    for path in snippet_files(dir)? {
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            tracing::warn!(path = %path.display(), "skipping snippet with non UTF-8 name");
            continue;
        };
        let raw = fs::read_to_string(&path)?;

        match parse_snippet(name, &raw, &path, source) {
            Ok(snippet) => {
                tracing::debug!(
                    name = %snippet.name,
                    aliases = ?snippet.aliases,
                    path = %path.display(),
                    "loaded snippet"
                );
                snippets.push(snippet);
            }
            Err(e) => tracing::warn!("skipping snippet: {}", e),
        }
    }

    Ok(snippets)
}

/// Load global snippets, then project snippets over them.
pub fn load_snippets(paths: &SnippetPaths) -> Result<SnippetRegistry> {
    let mut registry = SnippetRegistry::new();

    for snippet in load_dir(&paths.global, SnippetSource::Global)? {
        registry.register(snippet);
    }
    if let Some(project) = &paths.project {
        for snippet in load_dir(project, SnippetSource::Project)? {
            registry.register(snippet);
        }
    }

    tracing::debug!(keys = registry.len(), "snippet registry ready");
    Ok(registry)
}
