//! End-to-end expansion scenarios, from snippet files on disk to the final
//! assembled message.

use pretty_assertions::assert_eq;
use snippets_core::{
    assemble_message, expand_hashtags, expand_hashtags_with, load_snippets, process_message,
    ExpandOptions, ExpansionCounts, ExpansionWarning, SnippetPaths, SnippetRegistry,
    MAX_EXPANSION_COUNT,
};
use std::fs;
use tempfile::TempDir;

fn registry(entries: &[(&str, &str)]) -> SnippetRegistry {
    entries.iter().copied().collect()
}

#[test]
fn simple_substitution() {
    let registry = registry(&[("greeting", "Hello, World!")]);

    assert_eq!(
        expand_hashtags("Say #greeting", &registry).text,
        "Say Hello, World!"
    );
}

#[test]
fn self_reference_freezes_with_marker_left_in_place() {
    let registry = registry(&[("self", "I reference #self")]);
    let result = expand_hashtags("#self", &registry);

    assert_eq!(
        result.text,
        format!("{}#self", "I reference ".repeat(MAX_EXPANSION_COUNT))
    );
}

#[test]
fn append_block_lands_after_message() {
    let registry = registry(&[("jira", "Jira MCP\n<append>\n## Fields\n</append>")]);
    let result = expand_hashtags("Create bug #jira now", &registry);

    assert_eq!(result.text, "Create bug Jira MCP now");
    assert_eq!(result.append, vec!["## Fields"]);
    assert_eq!(
        assemble_message(&result),
        "Create bug Jira MCP now\n\n## Fields"
    );
}

#[test]
fn mismatched_tags_leave_marker_and_warn_once() {
    let registry = registry(&[("broken", "<prepend>text</append>")]);
    let mut counts = ExpansionCounts::new();
    let mut warnings: Vec<ExpansionWarning> = Vec::new();

    let result = expand_hashtags_with(
        "see #broken",
        &registry,
        &mut counts,
        ExpandOptions::default(),
        &mut warnings,
    );

    assert_eq!(result.text, "see #broken");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key(), "broken");
}

#[test]
fn diamond_expands_both_branches() {
    let registry = registry(&[
        ("top", "#left #right"),
        ("left", "L #bottom"),
        ("right", "R #bottom"),
        ("bottom", "B"),
    ]);

    assert_eq!(expand_hashtags("#top", &registry).text, "L B R B");
}

#[test]
fn lookup_is_case_insensitive() {
    let registry = registry(&[("hello", "X")]);

    assert_eq!(expand_hashtags("#Hello", &registry).text, "X");
}

#[test]
fn snippets_from_disk_expand_through_aliases() {
    let temp_dir = TempDir::new().unwrap();
    let global = temp_dir.path().join("global");
    let project = temp_dir.path().join("project");
    fs::create_dir_all(&global).unwrap();
    fs::create_dir_all(&project).unwrap();
    fs::write(
        global.join("review.md"),
        "---\naliases: [cr]\ndescription: Code review\n---\nReview this carefully.\n<prepend>You are a reviewer.</prepend>\n#style",
    )
    .unwrap();
    fs::write(global.join("style.md"), "Follow the style guide.").unwrap();
    fs::write(
        project.join("style.md"),
        "Follow the project style guide.\n<inject>style guide lives in docs/</inject>",
    )
    .unwrap();

    let registry = load_snippets(&SnippetPaths {
        global,
        project: Some(project),
    })
    .unwrap();

    let processed = process_message(
        "#CR please",
        &registry,
        ExpandOptions::default(),
        &mut Vec::<ExpansionWarning>::new(),
    );

    assert_eq!(
        processed.message,
        "You are a reviewer.\n\nReview this carefully.\n\nFollow the project style guide. please"
    );
    assert_eq!(processed.inject, vec!["style guide lives in docs/"]);
}
