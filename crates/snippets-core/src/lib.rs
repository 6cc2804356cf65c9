//! Hashtag snippet expansion for chat messages.
//!
//! `#name` markers in a message are replaced by the snippet registered under
//! that name, recursively, before the message is sent on. Snippets may carry
//! `<prepend>`, `<append>` and `<inject>` blocks that are placed around the
//! message or handed back separately.

pub mod blocks;
pub mod config;
pub mod error;
pub mod expansion;
pub mod loader;
pub mod models;

// Re-export common items for convenience
pub use blocks::{parse_blocks, BlockError, BlockKind, BlockOptions, ParsedBlocks};
pub use config::{get_config_dir, Settings, SnippetPaths, HASHTAG_CHAR, MAX_EXPANSION_COUNT};
pub use error::{Result, SnippetsError};
pub use expansion::{
    assemble_message, expand_hashtags, expand_hashtags_with, process_message, process_parts,
    ExpandOptions, ExpansionCounts, ExpansionResult, ExpansionWarning, ProcessedMessage,
    TracingSink, WarningSink,
};
pub use loader::{load_dir, load_snippets, parse_snippet};
pub use models::{Snippet, SnippetRegistry, SnippetSource};
