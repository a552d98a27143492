//! Multi-line expansion of selection and clipboard subjects.
//!
//! A subject such as `"label: ${selectedText}"` whose selection spans three
//! lines becomes three subjects. The first keeps the literal text around the
//! placeholder, the rest are inserted right after it, and every per-line
//! setting gains copies of the value at the expansion point.

use crate::case;
use crate::catalog::{Category, Variable};
use crate::context::ResolutionContext;
use crate::patterns::{self, PlaceholderMatch};
use crate::settings::BlockSettings;

/// Result of the expansion pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    pub settings: BlockSettings,
    /// True once any subject was split into several lines.
    pub expanded: bool,
}

/// Split subjects that reference multi-line selection or clipboard content.
///
/// A single-line selection or clipboard leaves the subject alone; the
/// resolver inlines it later.
pub fn expand(settings: &BlockSettings, ctx: &mut ResolutionContext<'_>) -> Expansion {
    let mut settings = settings.clone();
    let mut expanded = false;
    let mut index = 0;

    while index < settings.subjects.len() {
        let subject = settings.subjects[index].clone();
        let Some((found, content)) = first_multi_line(&subject, ctx) else {
            index += 1;
            continue;
        };
        let lines = split_lines(&content);

        let lines: Vec<String> = strip_common_indent(&lines)
            .into_iter()
            .map(|line| match found.modifier {
                Some(modifier) => case::apply(modifier, &line),
                None => line,
            })
            .collect();
        log::debug!(
            "expanding subject {} into {} lines ({:?})",
            index,
            lines.len(),
            found.variable
        );

        let prefix = &subject[..found.range.start];
        let suffix = &subject[found.range.end..];
        let mut replacement = Vec::with_capacity(lines.len());
        replacement.push(format!("{}{}{}", prefix, lines[0], suffix));
        replacement.extend(lines[1..].iter().cloned());

        let extra = lines.len() - 1;
        settings.subjects.splice(index..=index, replacement);
        duplicate_line(&mut settings, index, extra);

        expanded = true;
        index += lines.len();
    }

    Expansion { settings, expanded }
}

/// The first selection or clipboard placeholder in `subject` whose content
/// spans more than one line, with that content.
fn first_multi_line(
    subject: &str,
    ctx: &mut ResolutionContext<'_>,
) -> Option<(PlaceholderMatch, String)> {
    for found in patterns::find_all(Category::Special, subject) {
        let content = match found.variable {
            Variable::SelectedText if !ctx.is_selection_single_line() => ctx.selection_text(),
            Variable::Clipboard => ctx.clipboard_text(),
            _ => continue,
        };
        if split_lines(&content).len() > 1 {
            return Some((found, content));
        }
    }
    None
}

/// Give every per-line setting `extra` copies of its value at `at`.
fn duplicate_line(settings: &mut BlockSettings, at: usize, extra: usize) {
    settings.line_length = settings.line_length.duplicated_at(at, extra);
    settings.start_text = settings.start_text.duplicated_at(at, extra);
    settings.end_text = settings.end_text.duplicated_at(at, extra);
    settings.justify = settings.justify.duplicated_at(at, extra);
    settings.gap_left = settings.gap_left.duplicated_at(at, extra);
    settings.gap_right = settings.gap_right.duplicated_at(at, extra);
    settings.pad_lines = settings.pad_lines.duplicated_at(at, extra);
}

/// Split on `\n` or `\r\n`.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Remove the indentation shared by all non-blank lines.
///
/// Blank lines do not take part in the minimum but lose up to that much
/// leading whitespace too. Lines left empty become a single space so they
/// still get a gap and padding.
pub fn strip_common_indent(lines: &[&str]) -> Vec<String> {
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_whitespace(line))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            let strip = leading_whitespace(line).min(indent);
            let stripped: String = line.chars().skip(strip).collect();
            if stripped.is_empty() {
                " ".to_string()
            } else {
                stripped
            }
        })
        .collect()
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}
