use crate::cli::{Commands, Snippets};
use crate::utils::read_message;
use snippets_core::{
    load_snippets, process_message, ExpandOptions, Result, Settings, Snippet, SnippetRegistry,
    SnippetsError, TracingSink, HASHTAG_CHAR,
};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

/// Settings and snippets needed to run a command
pub struct Session {
    pub settings: Settings,
    pub registry: SnippetRegistry,
}

impl Session {
    pub fn load(settings: Settings, project_root: Option<&Path>) -> Result<Self> {
        let paths = settings.snippet_paths(project_root);
        tracing::debug!(
            global = %paths.global.display(),
            project = ?paths.project,
            "loading snippets"
        );
        let registry = load_snippets(&paths)?;

        Ok(Self { settings, registry })
    }
}

/// Read settings from `--config` or the default location
pub fn load_settings(args: &Snippets) -> Result<Settings> {
    match &args.config {
        Some(path) => Settings::load_from_path(path),
        None => Settings::load(),
    }
}

pub fn handle_command(command: Commands, session: &Session) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Expand { text, json } => {
            let message = match text {
                Some(text) => text,
                None => read_message(io::stdin().lock())?,
            };
            let options = session.settings.expand_options();
            expand(&message, &session.registry, options, json, &mut out, &mut io::stderr())
        }
        Commands::List { json } => list(&session.registry, json, &mut out),
        Commands::Show { name } => show(&name, &session.registry, &mut out),
    }
}

fn expand(
    message: &str,
    registry: &SnippetRegistry,
    options: ExpandOptions,
    json: bool,
    out: &mut dyn Write,
    side: &mut dyn Write,
) -> Result<()> {
    let processed = process_message(message, registry, options, &mut TracingSink);

    if json {
        serde_json::to_writer_pretty(&mut *out, &processed)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{}", processed.message)?;
    for block in &processed.inject {
        writeln!(side, "--- inject ---")?;
        writeln!(side, "{}", block)?;
    }
    Ok(())
}

fn list(registry: &SnippetRegistry, json: bool, out: &mut dyn Write) -> Result<()> {
    let snippets = registry.snippets();
    if json {
        let entries: Vec<&Snippet> = snippets.iter().map(|snippet| Arc::as_ref(snippet)).collect();
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
        return Ok(());
    }

    if snippets.is_empty() {
        writeln!(out, "No snippets found.")?;
        return Ok(());
    }

    for snippet in snippets {
        let mut line = format!("#{}", snippet.name);
        if !snippet.aliases.is_empty() {
            let aliases: Vec<String> = snippet.aliases.iter().map(|a| format!("#{}", a)).collect();
            line.push_str(&format!(" ({})", aliases.join(", ")));
        }
        if let Some(description) = &snippet.description {
            line.push_str(&format!(" - {}", description));
        }
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn show(name: &str, registry: &SnippetRegistry, out: &mut dyn Write) -> Result<()> {
    let key = name.trim_start_matches(HASHTAG_CHAR).to_lowercase();
    let snippet = registry
        .get(&key)
        .ok_or_else(|| SnippetsError::SnippetNotFound(name.to_string()))?;

    writeln!(out, "{}", snippet.content)?;
    Ok(())
}
