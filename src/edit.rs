//! Editor-side glue: what a selection becomes before a block is built, and
//! one text edit per selection afterwards.

use chrono::{DateTime, Local};

use crate::context::ResolutionContext;
use crate::error::Result;
use crate::host::{DocumentProvider, Host, Position, Selection};
use crate::layout::build;
use crate::settings::BlockSettings;

/// A selection adjusted to the lines the block will replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSelection {
    pub selection: Selection,
    /// Indentation repeated in front of every line after the first.
    pub indent: String,
}

/// Replacement of `selection` by `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub selection: Selection,
    pub text: String,
}

/// Widen a selection the way the command does before building.
///
/// - a single-line selection with `selectCurrentLine` takes the whole line,
///   or everything after the indentation with `keepIndentation`;
/// - a multi-line selection always takes whole lines, keeping its direction.
pub fn prepare_selection(
    document: &dyn DocumentProvider,
    selection: Selection,
    settings: &BlockSettings,
) -> PreparedSelection {
    let line_of = |line: usize| document.line_text(line).unwrap_or_default();

    if selection.is_single_line() {
        let line = selection.active.line;
        let text = line_of(line);
        let indent = leading_whitespace(&text);

        if !settings.keep_indentation {
            let selection = if settings.select_current_line {
                Selection::new(Position::new(line, 0), Position::new(line, text.chars().count()))
            } else {
                selection
            };
            return PreparedSelection {
                selection,
                indent: String::new(),
            };
        }

        if !settings.select_current_line {
            let indent: String = text.chars().take(selection.start().column).collect();
            return PreparedSelection { selection, indent };
        }
        let start = indent.chars().count();
        return PreparedSelection {
            selection: Selection::new(
                Position::new(line, start),
                Position::new(line, text.chars().count().max(start)),
            ),
            indent,
        };
    }

    let (first, last) = (selection.start().line, selection.end().line);
    let last_len = line_of(last).chars().count();
    let selection = if selection.is_reversed() {
        Selection::new(Position::new(last, last_len), Position::new(first, 0))
    } else {
        Selection::new(Position::new(first, 0), Position::new(last, last_len))
    };

    let indent = if settings.keep_indentation {
        common_indent(&document.text_in(selection.range()))
    } else {
        String::new()
    };
    PreparedSelection { selection, indent }
}

/// Build one block per selection, in order.
///
/// Each selection gets a fresh context, so input prompts repeat per
/// selection. The match index stays 0 for every selection.
pub fn build_edits(
    settings: &BlockSettings,
    host: Host<'_>,
    selections: &[Selection],
    now: DateTime<Local>,
) -> Result<Vec<TextEdit>> {
    selections
        .iter()
        .map(|&selection| -> Result<TextEdit> {
            let prepared = prepare_selection(host.document, selection, settings);
            let indent_width = prepared.indent.chars().count();
            let mut ctx = ResolutionContext::new(host, prepared.selection)
                .with_now(now)
                .with_leading_width(indent_width);

            let block = build(settings, &mut ctx)?;
            Ok(TextEdit {
                selection: prepared.selection,
                text: indent_lines(&block, &prepared.indent),
            })
        })
        .collect()
}

/// Prefix every line after the first with `indent`.
pub fn indent_lines(block: &str, indent: &str) -> String {
    if indent.is_empty() {
        return block.to_string();
    }
    block
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.to_string()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn leading_whitespace(text: &str) -> String {
    text.chars().take_while(|c| c.is_whitespace()).collect()
}

/// Leading whitespace shared by every non-empty line.
fn common_indent(text: &str) -> String {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(leading_whitespace)
        .min_by_key(|indent| indent.chars().count())
        .unwrap_or_default()
}
