//! Hashtag expansion.
//!
//! `#name` markers are replaced by the inline part of the matching snippet,
//! recursively. Block content found along the way is collected separately so
//! the caller can place it before or after the message, or route `<inject>`
//! content somewhere else entirely.
//!
//! Every key has a budget of [`MAX_EXPANSION_COUNT`] expansions shared by the
//! whole top-level call. Once spent, the marker is left verbatim, which is what
//! stops self-referencing snippets.

use crate::blocks::{parse_blocks, BlockError, BlockOptions};
use crate::config::{HASHTAG_CHAR, MAX_EXPANSION_COUNT};
use crate::models::SnippetRegistry;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Matches anywhere, including mid-word and inside URLs.
static HASHTAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"#[A-Za-z0-9_-]+").unwrap());

/// Expansions performed per key during one top-level call
pub type ExpansionCounts = HashMap<String, usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    pub extract_inject: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            extract_inject: true,
        }
    }
}

impl From<ExpandOptions> for BlockOptions {
    fn from(options: ExpandOptions) -> Self {
        BlockOptions {
            extract_inject: options.extract_inject,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpansionResult {
    pub text: String,
    pub prepend: Vec<String>,
    pub append: Vec<String>,
    pub inject: Vec<String>,
}

impl ExpansionResult {
    fn extend_blocks(&mut self, prepend: Vec<String>, append: Vec<String>, inject: Vec<String>) {
        self.prepend.extend(prepend);
        self.append.extend(append);
        self.inject.extend(inject);
    }
}

/// Non-fatal problems met while expanding. The marker involved is always
/// left in the text unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionWarning {
    LoopDetected { key: String, count: usize },
    ParseFailed { key: String, error: BlockError },
}

impl ExpansionWarning {
    pub fn key(&self) -> &str {
        match self {
            Self::LoopDetected { key, .. } | Self::ParseFailed { key, .. } => key,
        }
    }
}

impl fmt::Display for ExpansionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoopDetected { key, count } => write!(
                f,
                "expansion loop on #{}: expanded {} times, limit is {}",
                key, count, MAX_EXPANSION_COUNT
            ),
            Self::ParseFailed { key, error } => {
                write!(f, "could not parse blocks in #{}: {}", key, error)
            }
        }
    }
}

/// Receives expansion warnings
pub trait WarningSink {
    fn warn(&mut self, warning: ExpansionWarning);
}

/// Reports warnings through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&mut self, warning: ExpansionWarning) {
        match &warning {
            ExpansionWarning::LoopDetected { key, count } => {
                tracing::warn!(key = %key, count = *count, "{}", warning);
            }
            ExpansionWarning::ParseFailed { key, .. } => {
                tracing::warn!(key = %key, "{}", warning);
            }
        }
    }
}

impl WarningSink for Vec<ExpansionWarning> {
    fn warn(&mut self, warning: ExpansionWarning) {
        self.push(warning);
    }
}

/// Expand every marker in `text` with a fresh budget, reporting through `tracing`.
pub fn expand_hashtags(text: &str, registry: &SnippetRegistry) -> ExpansionResult {
    let mut counts = ExpansionCounts::new();
    expand_hashtags_with(
        text,
        registry,
        &mut counts,
        ExpandOptions::default(),
        &mut TracingSink,
    )
}

/// Expand every marker in `text`, drawing on the shared `counts` budget.
///
/// Passes repeat until one leaves the text unchanged or runs into an
/// exhausted budget.
pub fn expand_hashtags_with(
    text: &str,
    registry: &SnippetRegistry,
    counts: &mut ExpansionCounts,
    options: ExpandOptions,
    sink: &mut dyn WarningSink,
) -> ExpansionResult {
    let mut result = ExpansionResult {
        text: text.to_string(),
        ..ExpansionResult::default()
    };

    loop {
        let pass = expand_pass(&result.text, registry, counts, options, sink);
        result.extend_blocks(pass.blocks.prepend, pass.blocks.append, pass.blocks.inject);

        let changed = pass.blocks.text != result.text;
        result.text = pass.blocks.text;
        if !changed || pass.loop_detected {
            break;
        }
    }

    result
}

struct Pass {
    blocks: ExpansionResult,
    loop_detected: bool,
}

fn expand_pass(
    text: &str,
    registry: &SnippetRegistry,
    counts: &mut ExpansionCounts,
    options: ExpandOptions,
    sink: &mut dyn WarningSink,
) -> Pass {
    let mut pass = Pass {
        blocks: ExpansionResult::default(),
        loop_detected: false,
    };
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;

    for marker in HASHTAG_REGEX.find_iter(text) {
        output.push_str(&text[cursor..marker.start()]);
        cursor = marker.end();

        let name = marker.as_str().trim_start_matches(HASHTAG_CHAR);
        let key = name.to_ascii_lowercase();
        let Some(snippet) = registry.get(&key) else {
            output.push_str(marker.as_str());
            continue;
        };

        let count = {
            let count = counts.entry(key.clone()).or_insert(0);
            *count += 1;
            *count
        };
        if count > MAX_EXPANSION_COUNT {
            sink.warn(ExpansionWarning::LoopDetected { key, count });
            pass.loop_detected = true;
            output.push_str(marker.as_str());
            continue;
        }

        let parsed = match parse_blocks(&snippet.content, options.into()) {
            Ok(parsed) => parsed,
            Err(error) => {
                sink.warn(ExpansionWarning::ParseFailed { key, error });
                output.push_str(marker.as_str());
                continue;
            }
        };

        tracing::trace!(key = %key, count, "expanding snippet");
        pass.blocks.extend_blocks(parsed.prepend, parsed.append, parsed.inject);

        let nested = expand_hashtags_with(&parsed.inline, registry, counts, options, sink);
        pass.blocks.extend_blocks(nested.prepend, nested.append, nested.inject);
        output.push_str(&nested.text);
    }

    output.push_str(&text[cursor..]);
    pass.blocks.text = output;
    pass
}

/// Build the final message: prepend blocks, then the text, then append
/// blocks, separated by blank lines. Inject blocks are not placed.
pub fn assemble_message(result: &ExpansionResult) -> String {
    if result.prepend.is_empty() && result.append.is_empty() {
        return result.text.clone();
    }

    let mut sections: Vec<String> = Vec::with_capacity(3);
    if !result.prepend.is_empty() {
        sections.push(result.prepend.join("\n\n"));
    }
    if !result.text.trim().is_empty() {
        sections.push(result.text.clone());
    }
    if !result.append.is_empty() {
        sections.push(result.append.join("\n\n"));
    }
    sections.join("\n\n")
}

/// A message ready to send, plus side content to route elsewhere
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessedMessage {
    pub message: String,
    pub inject: Vec<String>,
}

/// Expand and assemble one message with its own budget.
pub fn process_message(
    text: &str,
    registry: &SnippetRegistry,
    options: ExpandOptions,
    sink: &mut dyn WarningSink,
) -> ProcessedMessage {
    let mut counts = ExpansionCounts::new();
    let result = expand_hashtags_with(text, registry, &mut counts, options, sink);

    ProcessedMessage {
        message: assemble_message(&result),
        inject: result.inject,
    }
}

/// Process each part independently; budgets are never shared between parts.
pub fn process_parts<S: AsRef<str>>(
    parts: &[S],
    registry: &SnippetRegistry,
    options: ExpandOptions,
    sink: &mut dyn WarningSink,
) -> Vec<ProcessedMessage> {
    parts
        .iter()
        .map(|part| process_message(part.as_ref(), registry, options, sink))
        .collect()
}
