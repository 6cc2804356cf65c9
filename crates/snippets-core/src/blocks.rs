//! Splits snippet content into inline text and `<prepend>`, `<append>` and
//! `<inject>` blocks.
//!
//! Blocks do not nest. Stray closing tags are dropped and an unclosed block
//! runs to the end of the content; a nested opening tag or a closing tag that
//! does not match the open block fails the whole parse.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

static BLOCK_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(/?)(prepend|append|inject)>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Prepend,
    Append,
    Inject,
}

impl BlockKind {
    fn from_tag(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "prepend" => Some(Self::Prepend),
            "append" => Some(Self::Append),
            "inject" => Some(Self::Inject),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Prepend => "prepend",
            Self::Append => "append",
            Self::Inject => "inject",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("closing </{close}> does not match open <{open}>")]
    MismatchedClose { open: BlockKind, close: BlockKind },

    #[error("<{nested}> opened inside <{open}>; blocks cannot nest")]
    NestedOpen { open: BlockKind, nested: BlockKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOptions {
    /// When false, `<inject>` tags are ordinary text.
    pub extract_inject: bool,
}

impl Default for BlockOptions {
    fn default() -> Self {
        Self {
            extract_inject: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBlocks {
    pub inline: String,
    pub prepend: Vec<String>,
    pub append: Vec<String>,
    pub inject: Vec<String>,
}

impl ParsedBlocks {
    fn push(&mut self, kind: BlockKind, raw: &str) {
        let block = raw.trim();
        if block.is_empty() {
            return;
        }
        let list = match kind {
            BlockKind::Prepend => &mut self.prepend,
            BlockKind::Append => &mut self.append,
            BlockKind::Inject => &mut self.inject,
        };
        list.push(block.to_string());
    }
}

struct OpenBlock {
    kind: BlockKind,
    body_start: usize,
}

/// Partition `content` into inline text and ordered block lists.
pub fn parse_blocks(content: &str, options: BlockOptions) -> Result<ParsedBlocks, BlockError> {
    let mut parsed = ParsedBlocks::default();
    let mut inline = String::with_capacity(content.len());
    let mut cursor = 0;
    let mut open: Option<OpenBlock> = None;

    for caps in BLOCK_TAG_REGEX.captures_iter(content) {
        let (Some(tag), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let Some(kind) = BlockKind::from_tag(name.as_str()) else {
            continue;
        };
        if kind == BlockKind::Inject && !options.extract_inject {
            continue;
        }
        let closing = caps.get(1).is_some_and(|slash| !slash.is_empty());

        match (open.take(), closing) {
            (None, false) => {
                inline.push_str(&content[cursor..tag.start()]);
                open = Some(OpenBlock {
                    kind,
                    body_start: tag.end(),
                });
            }
            // Stray close: the tag itself is dropped.
            (None, true) => {
                inline.push_str(&content[cursor..tag.start()]);
                cursor = tag.end();
            }
            (Some(block), false) => {
                return Err(BlockError::NestedOpen {
                    open: block.kind,
                    nested: kind,
                });
            }
            (Some(block), true) if block.kind != kind => {
                return Err(BlockError::MismatchedClose {
                    open: block.kind,
                    close: kind,
                });
            }
            (Some(block), true) => {
                parsed.push(block.kind, &content[block.body_start..tag.start()]);
                cursor = tag.end();
            }
        }
    }

    match open {
        Some(block) => parsed.push(block.kind, &content[block.body_start..]),
        None => inline.push_str(&content[cursor..]),
    }

    parsed.inline = inline.trim().to_string();
    Ok(parsed)
}
