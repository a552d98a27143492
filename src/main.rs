//! # Comment Blocks
//!
//! Builds a justified comment block around the text it reads from stdin.
//!
//! ## Usage
//!
//! ```bash
//! echo 'Section title' | comment-blocks --language rust
//! pbpaste | comment-blocks --block banner --file src/main.rs --line 12
//! ```

use chrono::Local;
use clap::{Parser, Subcommand};
use std::env;
use std::io::{self, Read};
use std::path::PathBuf;

use comment_blocks::catalog::{all_placeholders, CaseModifier};
use comment_blocks::config::{self, Config};
use comment_blocks::host::{Host, InputProvider, MemoryDocument, Position, Selection};
use comment_blocks::language::language_for_path;
use comment_blocks::terminal::{NonInteractive, SystemClipboard, TerminalInput};
use comment_blocks::{build_edits, BlockOverrides, Result};

/// Comment Blocks - justified comment blocks from templates
#[derive(Parser)]
#[command(name = "comment-blocks")]
#[command(version)]
#[command(about = "Build justified comment blocks from templates", long_about = None)]
#[command(
    after_help = "Input: Reads the selected text from stdin\n\nExample:\n  echo 'Section title' | comment-blocks --language rust"
)]
struct Cli {
    /// Named block from the config file
    #[arg(long)]
    block: Option<String>,

    /// Block settings as JSON, e.g. '{"justify": "left"}'
    #[arg(long)]
    args: Option<String>,

    /// File the text comes from (path variables, language detection)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Language id for comment delimiters (default: guessed from --file)
    #[arg(long)]
    language: Option<String>,

    /// Workspace folder (default: current directory)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Line of the file the text starts on (1-based)
    #[arg(long, default_value_t = 1)]
    line: usize,

    /// Never prompt; ${getInput} resolves to empty text
    #[arg(long)]
    no_prompt: bool,

    /// Config file to use instead of the standard locations
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate example config file
    GenerateConfig,

    /// List every placeholder and case modifier
    Variables,
}

fn main() -> Result<()> {
    // Initialize logging with WARN level by default (can be overridden with RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        env::set_var("COMMENT_BLOCKS_CONFIG_PATH", path);
    }

    if let Some(command) = &cli.command {
        match command {
            Commands::GenerateConfig => {
                let config_path = Config::default_config_path()?;
                println!("Generating example config file at: {:?}", config_path);

                if let Some(parent) = config_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                std::fs::write(&config_path, Config::example_toml())?;
                println!("Config file generated successfully!");
                println!("Edit {} to customize settings", config_path.display());
                return Ok(());
            }
            Commands::Variables => {
                for placeholder in all_placeholders() {
                    println!("{}", placeholder);
                }
                println!();
                println!("Case modifiers (before a placeholder, e.g. \\U${{fileBasename}}):");
                for letter in CaseModifier::LETTERS.chars() {
                    if let Some(modifier) = CaseModifier::from_escape(&letter.to_string()) {
                        println!("  \\{}  {:?}", letter, modifier);
                    }
                }
                return Ok(());
            }
        }
    }

    // Read the selection from stdin
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let text = buffer
        .strip_suffix('\n')
        .map(|t| t.strip_suffix('\r').unwrap_or(t))
        .unwrap_or(&buffer);

    let args = match &cli.args {
        Some(json) => serde_json::from_str::<BlockOverrides>(json)?,
        None => BlockOverrides::default(),
    };
    let settings = config::get_config().settings_for(cli.block.as_deref(), args)?;

    let first_line = cli.line.saturating_sub(1);
    let document = document_for(text, first_line, &cli);
    let selection = selection_for(&document, first_line);

    let clipboard = SystemClipboard;
    let terminal_input = TerminalInput::new();
    let input: &dyn InputProvider = if cli.no_prompt {
        &NonInteractive
    } else {
        &terminal_input
    };
    let host = Host::new(&document)
        .with_clipboard(&clipboard)
        .with_input(input);

    for edit in build_edits(&settings, host, &[selection], Local::now())? {
        println!("{}", edit.text);
    }
    Ok(())
}

/// An in-memory document holding `text` at `first_line`.
///
/// The lines above it are left blank; only the cursor line matters for the
/// line-number placeholders.
fn document_for(text: &str, first_line: usize, cli: &Cli) -> MemoryDocument {
    let mut document = MemoryDocument::new(&format!("{}{}", "\n".repeat(first_line), text));

    let workspace = cli
        .workspace
        .clone()
        .or_else(|| env::current_dir().ok());
    if let Some(workspace) = &workspace {
        document = document.with_workspace(workspace);
    }

    if let Some(file) = &cli.file {
        let file = match &workspace {
            Some(root) if file.is_relative() => root.join(file),
            _ => file.clone(),
        };
        if let Some(language) = language_for_path(&file) {
            document = document.with_language(language);
        }
        document = document.with_path(file);
    }

    if let Some(language) = &cli.language {
        document = document.with_language(language.as_str());
    }
    document
}

/// Selection from the start of `first_line` to the end of the document.
fn selection_for(document: &MemoryDocument, first_line: usize) -> Selection {
    Selection::new(Position::new(first_line, 0), document.full_selection().end())
}
