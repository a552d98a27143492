//! Read-only interfaces to the editor that hosts the comment block command.
//!
//! The layout core never talks to an editor directly. Everything it needs,
//! the selection text, file metadata, clipboard, document symbols, call
//! hierarchy and interactive input, comes through the traits below. The
//! in-memory implementations at the bottom back the CLI and the tests.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::path::PathBuf;

use crate::language::{CommentConfigProvider, LanguageTable};
use crate::settings::{FieldName, LineLength};

/// Zero-based line and character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An ordered `start..=end` span of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range, swapping the ends if needed.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// Overlap of two ranges, if they touch at all.
    pub fn intersection(&self, other: &Range) -> Option<Range> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Range { start, end })
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

/// A selection keeps its direction: `active` is where the cursor is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// Empty selection at a cursor position.
    pub fn cursor(position: Position) -> Self {
        Self::new(position, position)
    }

    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }

    pub fn range(&self) -> Range {
        Range::new(self.anchor, self.active)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    pub fn is_single_line(&self) -> bool {
        self.anchor.line == self.active.line
    }

    pub fn is_reversed(&self) -> bool {
        self.active < self.anchor
    }
}

/// Symbol kinds the lookups care about; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Struct,
    Module,
    Variable,
    Other,
}

/// One entry of a document outline.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSymbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Full extent of the symbol, body included.
    pub range: Range,
    /// The identifier, used to anchor call-hierarchy queries.
    pub selection_range: Range,
    pub children: Vec<DocumentSymbol>,
}

impl DocumentSymbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, range: Range) -> Self {
        Self {
            name: name.into(),
            kind,
            range,
            selection_range: Range::new(range.start, range.start),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<DocumentSymbol>) -> Self {
        self.children = children;
        self
    }

    pub fn is_function(&self) -> bool {
        self.kind == SymbolKind::Function
    }
}

/// A caller or callee in the call hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct CallItem {
    pub name: String,
    pub kind: SymbolKind,
    /// Whether the item is defined inside the current workspace.
    pub in_workspace: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomingCall {
    pub from: CallItem,
    /// Call sites inside the caller.
    pub from_ranges: Vec<Range>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingCall {
    pub to: CallItem,
}

/// Access to the active document.
pub trait DocumentProvider {
    /// Text covered by `range`, lines joined with `\n`.
    fn text_in(&self, range: Range) -> String;

    /// Text of one line, without its line ending.
    fn line_text(&self, line: usize) -> Option<String>;

    /// The word touching `position`, if any.
    fn word_at(&self, position: Position) -> Option<String>;

    fn file_path(&self) -> Option<PathBuf>;

    fn workspace_folder(&self) -> Option<PathBuf>;

    fn language_id(&self) -> String;
}

pub trait ClipboardProvider {
    /// Clipboard text, `None` when empty or unavailable.
    fn read_text(&self) -> Option<String>;
}

pub trait SymbolProvider {
    /// Top-level symbols of the active document in document order.
    fn document_symbols(&self) -> Vec<DocumentSymbol>;

    /// Callers of the function whose identifier starts at `at`.
    fn incoming_calls(&self, _at: Position) -> Vec<IncomingCall> {
        Vec::new()
    }

    /// Callees of the function whose identifier starts at `at`.
    fn outgoing_calls(&self, _at: Position) -> Vec<OutgoingCall> {
        Vec::new()
    }
}

/// A request for text from the user, issued by `${getInput}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputRequest {
    pub field: FieldName,
    /// Zero-based line of the block being built.
    pub line: usize,
}

impl InputRequest {
    pub fn new(field: FieldName, line: usize) -> Self {
        Self { field, line }
    }

    pub fn title(&self) -> &'static str {
        self.field.key()
    }

    pub fn placeholder(&self) -> String {
        format!(
            "Enter text, number or array for the {} option of line {}.",
            self.field.key(),
            self.line
        )
    }

    /// Short prompt describing what the field accepts.
    pub fn prompt(&self) -> &'static str {
        match self.field {
            FieldName::LineLength => "Enter an integer for 'lineLength'",
            FieldName::StartText => "Enter text for 'startText'",
            FieldName::EndText => "Enter text for 'endText'",
            FieldName::Justify => "Enter text for 'justify'. Options: left, center or right",
            FieldName::GapLeft => "Enter an integer for 'gapLeft'.  Integer >= 0",
            FieldName::GapRight => "Enter an integer for 'gapRight'.  Integer >= 0",
            FieldName::PadLines => "Enter text for 'padLines'.  One character only",
            FieldName::Subjects => "Enter text for 'subjects'",
        }
    }

    /// Check an answer before it is handed to the resolver.
    ///
    /// An empty answer is always accepted; it stands for "nothing".
    pub fn validate(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Ok(());
        }
        match self.field {
            FieldName::LineLength => value
                .parse::<LineLength>()
                .ok()
                .filter(|length| !matches!(length, LineLength::Placeholder(_)))
                .map(|_| ())
                .ok_or_else(|| "Must be an integer >= 0, 'minimum' or 'minimum + N'".to_string()),
            FieldName::GapLeft | FieldName::GapRight => value
                .trim()
                .parse::<u32>()
                .map(|_| ())
                .map_err(|_| "Must be an integer >= 0".to_string()),
            FieldName::Justify => match value.trim() {
                "left" | "center" | "right" => Ok(()),
                _ => Err("Must be one of: left, center, right".to_string()),
            },
            FieldName::PadLines => {
                if value.chars().count() == 1 {
                    Ok(())
                } else {
                    Err("Must be exactly one character".to_string())
                }
            }
            FieldName::StartText | FieldName::EndText | FieldName::Subjects => Ok(()),
        }
    }
}

pub trait InputProvider {
    /// Ask the user; `None` means the prompt was dismissed.
    fn prompt(&self, request: &InputRequest) -> Option<String>;
}

/// The full set of collaborators one build needs.
#[derive(Clone, Copy)]
pub struct Host<'a> {
    pub document: &'a dyn DocumentProvider,
    pub clipboard: &'a dyn ClipboardProvider,
    pub symbols: &'a dyn SymbolProvider,
    pub input: &'a dyn InputProvider,
    pub comments: &'a dyn CommentConfigProvider,
}

static NO_CLIPBOARD: NoClipboard = NoClipboard;
static NO_SYMBOLS: NoSymbols = NoSymbols;
static NO_INPUT: NoInput = NoInput;
static LANGUAGES: LanguageTable = LanguageTable;

impl<'a> Host<'a> {
    /// A host with only a document; everything else answers "nothing".
    pub fn new(document: &'a dyn DocumentProvider) -> Self {
        Self {
            document,
            clipboard: &NO_CLIPBOARD,
            symbols: &NO_SYMBOLS,
            input: &NO_INPUT,
            comments: &LANGUAGES,
        }
    }

    pub fn with_clipboard(mut self, clipboard: &'a dyn ClipboardProvider) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_symbols(mut self, symbols: &'a dyn SymbolProvider) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_input(mut self, input: &'a dyn InputProvider) -> Self {
        self.input = input;
        self
    }
}

// === In-memory implementations ===

/// A document held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    lines: Vec<String>,
    path: Option<PathBuf>,
    workspace: Option<PathBuf>,
    language_id: String,
}

impl MemoryDocument {
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(|l| l.trim_end_matches('\r').to_string()).collect(),
            path: None,
            workspace: None,
            language_id: "plaintext".to_string(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_workspace(mut self, workspace: impl Into<PathBuf>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    pub fn with_language(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = language_id.into();
        self
    }

    /// Selection covering the whole document.
    pub fn full_selection(&self) -> Selection {
        let last = self.lines.len().saturating_sub(1);
        let end = self.lines.last().map(|l| l.chars().count()).unwrap_or(0);
        Selection::new(Position::new(0, 0), Position::new(last, end))
    }

    fn slice_line(&self, line: usize, from: usize, to: Option<usize>) -> String {
        let Some(text) = self.lines.get(line) else {
            return String::new();
        };
        let chars = text.chars().skip(from);
        match to {
            Some(to) => chars.take(to.saturating_sub(from)).collect(),
            None => chars.collect(),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl DocumentProvider for MemoryDocument {
    fn text_in(&self, range: Range) -> String {
        let (start, end) = (range.start, range.end);
        if start.line == end.line {
            return self.slice_line(start.line, start.column, Some(end.column));
        }
        let mut parts = vec![self.slice_line(start.line, start.column, None)];
        for line in start.line + 1..end.line {
            parts.push(self.slice_line(line, 0, None));
        }
        parts.push(self.slice_line(end.line, 0, Some(end.column)));
        parts.join("\n")
    }

    fn line_text(&self, line: usize) -> Option<String> {
        self.lines.get(line).cloned()
    }

    fn word_at(&self, position: Position) -> Option<String> {
        let chars: Vec<char> = self.lines.get(position.line)?.chars().collect();
        let column = position.column.min(chars.len());

        let touches_left = column > 0 && is_word_char(chars[column - 1]);
        let touches_right = column < chars.len() && is_word_char(chars[column]);
        if !touches_left && !touches_right {
            return None;
        }

        let mut start = column;
        while start > 0 && is_word_char(chars[start - 1]) {
            start -= 1;
        }
        let mut end = column;
        while end < chars.len() && is_word_char(chars[end]) {
            end += 1;
        }
        Some(chars[start..end].iter().collect())
    }

    fn file_path(&self) -> Option<PathBuf> {
        self.path.clone()
    }

    fn workspace_folder(&self) -> Option<PathBuf> {
        self.workspace.clone()
    }

    fn language_id(&self) -> String {
        self.language_id.clone()
    }
}

/// Clipboard that is always empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl ClipboardProvider for NoClipboard {
    fn read_text(&self) -> Option<String> {
        None
    }
}

/// Clipboard with fixed content.
#[derive(Debug, Clone)]
pub struct StaticClipboard(pub String);

impl StaticClipboard {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl ClipboardProvider for StaticClipboard {
    fn read_text(&self) -> Option<String> {
        (!self.0.is_empty()).then(|| self.0.clone())
    }
}

/// A document without any symbol information.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSymbols;

impl SymbolProvider for NoSymbols {
    fn document_symbols(&self) -> Vec<DocumentSymbol> {
        Vec::new()
    }
}

/// Fixed outline and call hierarchy.
#[derive(Debug, Clone, Default)]
pub struct StaticSymbols {
    pub symbols: Vec<DocumentSymbol>,
    pub incoming: Vec<IncomingCall>,
    pub outgoing: Vec<OutgoingCall>,
}

impl StaticSymbols {
    pub fn new(symbols: Vec<DocumentSymbol>) -> Self {
        Self {
            symbols,
            ..Default::default()
        }
    }
}

impl SymbolProvider for StaticSymbols {
    fn document_symbols(&self) -> Vec<DocumentSymbol> {
        self.symbols.clone()
    }

    fn incoming_calls(&self, _at: Position) -> Vec<IncomingCall> {
        self.incoming.clone()
    }

    fn outgoing_calls(&self, _at: Position) -> Vec<OutgoingCall> {
        self.outgoing.clone()
    }
}

/// Input provider that dismisses every prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputProvider for NoInput {
    fn prompt(&self, _request: &InputRequest) -> Option<String> {
        None
    }
}

/// Answers prompts from a queue and records what was asked.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: RefCell<VecDeque<Option<String>>>,
    asked: RefCell<Vec<InputRequest>>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(|a| Some(a.into())).collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Queue a dismissal.
    pub fn then_dismiss(self) -> Self {
        self.answers.borrow_mut().push_back(None);
        self
    }

    /// Requests issued so far, in order.
    pub fn asked(&self) -> Vec<InputRequest> {
        self.asked.borrow().clone()
    }
}

impl InputProvider for ScriptedInput {
    fn prompt(&self, request: &InputRequest) -> Option<String> {
        self.asked.borrow_mut().push(*request);
        self.answers.borrow_mut().pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> MemoryDocument {
        MemoryDocument::new("fn main() {\n    let answer = 42;\n}")
    }

    #[test]
    fn test_text_in_multiline() {
        let range = Range::new(Position::new(0, 3), Position::new(1, 7));
        assert_eq!(doc().text_in(range), "main() {\n    let");
    }

    #[test]
    fn test_word_at() {
        assert_eq!(doc().word_at(Position::new(1, 9)), Some("answer".to_string()));
        // touching the end of a word counts
        assert_eq!(doc().word_at(Position::new(0, 7)), Some("main".to_string()));
        assert_eq!(doc().word_at(Position::new(1, 1)), None);
    }

    #[test]
    fn test_selection_direction() {
        let sel = Selection::new(Position::new(3, 0), Position::new(1, 4));
        assert!(sel.is_reversed());
        assert_eq!(sel.start(), Position::new(1, 4));
        assert!(!sel.is_single_line());
    }

    #[test]
    fn test_range_intersection() {
        let a = Range::new(Position::new(1, 0), Position::new(5, 0));
        let b = Range::new(Position::new(4, 2), Position::new(9, 0));
        let i = a.intersection(&b).unwrap();
        assert_eq!(i, Range::new(Position::new(4, 2), Position::new(5, 0)));

        let c = Range::new(Position::new(6, 0), Position::new(7, 0));
        assert!(a.intersection(&c).is_none());
    }

    #[test]
    fn test_validate_input() {
        let gap = InputRequest::new(FieldName::GapLeft, 0);
        assert!(gap.validate("3").is_ok());
        assert!(gap.validate("-1").is_err());
        assert!(gap.validate("").is_ok());

        let justify = InputRequest::new(FieldName::Justify, 0);
        assert!(justify.validate("right").is_ok());
        assert!(justify.validate("middle").is_err());

        let pad = InputRequest::new(FieldName::PadLines, 0);
        assert!(pad.validate("*").is_ok());
        assert!(pad.validate("**").is_err());

        let length = InputRequest::new(FieldName::LineLength, 1);
        assert!(length.validate("minimum + 4").is_ok());
        assert!(length.validate("80").is_ok());
        assert!(length.validate("wide").is_err());
    }

    #[test]
    fn test_scripted_input_records_requests() {
        let input = ScriptedInput::new(["first"]).then_dismiss();
        let request = InputRequest::new(FieldName::Subjects, 2);
        assert_eq!(input.prompt(&request), Some("first".to_string()));
        assert_eq!(input.prompt(&request), None);
        assert_eq!(input.asked().len(), 2);
        assert_eq!(request.placeholder(), "Enter text, number or array for the subjects option of line 2.");
    }
}
