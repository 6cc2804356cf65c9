use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a snippet was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetSource {
    Global,
    Project,
}

/// A named block of reusable text, reachable by its name and any aliases
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub name: String,
    pub content: String,
    pub aliases: Vec<String>,
    pub description: Option<String>,
    pub source: SnippetSource,
    pub path: Option<PathBuf>,
}

impl Snippet {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            content: content.into(),
            aliases: Vec::new(),
            description: None,
            source: SnippetSource::Global,
            path: None,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(|a| a.into().to_lowercase()).collect();
        self
    }

    pub fn with_source(mut self, source: SnippetSource) -> Self {
        self.source = source;
        self
    }

    /// The primary name followed by every alias
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Lookup table from lowercase key to snippet. Aliases share the same `Arc`.
#[derive(Debug, Clone, Default)]
pub struct SnippetRegistry {
    entries: HashMap<String, Arc<Snippet>>,
}

impl SnippetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a single key. Keys are stored lowercased.
    pub fn insert(&mut self, key: &str, snippet: Arc<Snippet>) {
        self.entries.insert(key.to_lowercase(), snippet);
    }

    /// Bind a snippet under its name and aliases.
    ///
    /// If a snippet with the same name is already registered, every key bound
    /// to it is removed first, so its aliases do not outlive it.
    pub fn register(&mut self, snippet: Snippet) {
        if let Some(previous) = self.entries.get(&snippet.name).cloned() {
            if previous.name == snippet.name {
                self.entries.retain(|_, bound| !Arc::ptr_eq(bound, &previous));
            }
        }

        let snippet = Arc::new(snippet);
        for key in snippet.keys() {
            if key.is_empty() {
                continue;
            }
            self.entries.insert(key.to_string(), Arc::clone(&snippet));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Arc<Snippet>> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of bound keys, aliases included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every bound key, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Distinct snippets, sorted by name
    pub fn snippets(&self) -> Vec<&Arc<Snippet>> {
        let mut snippets: Vec<&Arc<Snippet>> = Vec::new();
        for snippet in self.entries.values() {
            if !snippets.iter().any(|seen| Arc::ptr_eq(seen, snippet)) {
                snippets.push(snippet);
            }
        }
        snippets.sort_by(|a, b| a.name.cmp(&b.name));
        snippets
    }
}

impl FromIterator<Snippet> for SnippetRegistry {
    fn from_iter<T: IntoIterator<Item = Snippet>>(iter: T) -> Self {
        let mut registry = Self::new();
        for snippet in iter {
            registry.register(snippet);
        }
        registry
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for SnippetRegistry {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(name, content)| Snippet::new(name.as_ref(), content))
            .collect()
    }
}
