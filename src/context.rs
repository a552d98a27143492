//! Per-invocation state shared by the resolver, the expander and the layout.

use std::collections::HashMap;

use chrono::{DateTime, Local};

use crate::host::{Host, InputRequest, Selection};
use crate::language::CommentDelimiters;
use crate::settings::FieldName;

/// Everything one `build` call needs to resolve placeholders.
///
/// The input cache lives exactly as long as this value: answers given to
/// `${getInput}` are reused by `${default}` for the same field on any line,
/// and forgotten once the block is built.
pub struct ResolutionContext<'a> {
    pub host: Host<'a>,
    pub selection: Selection,
    /// Zero-based index of the selection being processed.
    pub match_index: usize,
    pub comments: CommentDelimiters,
    /// Moment the command was invoked; all date variables read from it.
    pub now: DateTime<Local>,
    /// Width of the indentation kept in front of the block.
    pub leading_width: usize,
    inputs: HashMap<FieldName, String>,
    clipboard: Option<Option<String>>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(host: Host<'a>, selection: Selection) -> Self {
        let language_id = host.document.language_id();
        Self {
            comments: CommentDelimiters::lookup(host.comments, &language_id),
            host,
            selection,
            match_index: 0,
            now: Local::now(),
            leading_width: 0,
            inputs: HashMap::new(),
            clipboard: None,
        }
    }

    pub fn with_now(mut self, now: DateTime<Local>) -> Self {
        self.now = now;
        self
    }

    pub fn with_leading_width(mut self, leading_width: usize) -> Self {
        self.leading_width = leading_width;
        self
    }

    /// Selected text; an empty selection stands for the word at the cursor.
    pub fn selection_text(&self) -> String {
        if self.selection.is_empty() {
            return self.word_at_cursor();
        }
        self.host.document.text_in(self.selection.range())
    }

    pub fn is_selection_single_line(&self) -> bool {
        self.selection.is_single_line()
    }

    /// Full text of the line holding the cursor.
    pub fn active_line(&self) -> String {
        self.host
            .document
            .line_text(self.selection.active.line)
            .unwrap_or_default()
    }

    pub fn word_at_cursor(&self) -> String {
        self.host
            .document
            .word_at(self.selection.active)
            .unwrap_or_default()
    }

    /// Width of the longest selected line, surrounding whitespace ignored.
    pub fn longest_line_width(&self) -> usize {
        longest_trimmed_line(&self.selection_text())
    }

    /// Clipboard text, read from the host at most once per invocation.
    pub fn clipboard_text(&mut self) -> String {
        let clipboard = self.host.clipboard;
        self.clipboard
            .get_or_insert_with(|| clipboard.read_text())
            .clone()
            .unwrap_or_default()
    }

    /// Ask the user for a field value and remember the answer.
    ///
    /// A dismissed prompt counts as an empty answer.
    pub fn request_input(&mut self, field: FieldName, line: usize) -> String {
        let request = InputRequest::new(field, line);
        let answer = self.host.input.prompt(&request).unwrap_or_default();
        log::debug!("input for {} on line {}: {:?}", field, line, answer);
        self.inputs.insert(field, answer.clone());
        answer
    }

    /// The last answer given for `field`, if any.
    pub fn cached_input(&self, field: FieldName) -> Option<&str> {
        self.inputs.get(&field).map(String::as_str)
    }
}

/// Character width of the longest line once trimmed; 0 when all are blank.
pub fn longest_trimmed_line(text: &str) -> usize {
    text.lines()
        .map(|line| line.trim().chars().count())
        .max()
        .unwrap_or(0)
}
