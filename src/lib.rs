//! # Comment Blocks Library
//!
//! Builds fixed-width, justified comment blocks from declarative templates.
//!
//! ## Features
//!
//! - **Templates**: per-line start/end text, justification, gaps, padding and subjects
//! - **Placeholders**: selection, clipboard, file paths, dates, symbols and interactive input,
//!   with case modifiers such as `\U${fileBasename}`
//! - **Multi-line subjects**: a multi-line selection or clipboard becomes one line per source line
//! - **Configuration**: TOML defaults and named blocks, merged with invocation arguments
//!
//! ## Quick Start
//!
//! ```rust
//! use comment_blocks::host::{Host, MemoryDocument};
//! use comment_blocks::settings::BlockSettings;
//! use comment_blocks::{build, ResolutionContext};
//!
//! let doc = MemoryDocument::new("Section").with_language("rust");
//! let mut ctx = ResolutionContext::new(Host::new(&doc), doc.full_selection());
//! let block = build(&BlockSettings::default(), &mut ctx).unwrap();
//! assert_eq!(block.lines().count(), 3);
//! ```

pub mod case;
pub mod catalog;
/// Configuration management module for loading and saving settings
pub mod config;
pub mod context;
pub mod edit;
pub mod equalize;
pub mod error;
pub mod expand;
/// Editor interfaces and their in-memory implementations
pub mod host;
pub mod language;
pub mod layout;
pub mod normalize;
pub mod patterns;
pub mod resolve;
pub mod settings;
/// Clipboard and prompt adapters for the command line
pub mod terminal;

pub use config::Config;
pub use context::ResolutionContext;
pub use edit::{build_edits, TextEdit};
pub use error::{CommentBlockError, Result};
pub use layout::build;
pub use resolve::resolve;
pub use settings::{BlockOverrides, BlockSettings};
