//! Placeholder resolution.
//!
//! A field is rewritten by one pass per catalog category, in catalog order.
//! Each pass substitutes every match of its category at once and never
//! looks at its own output again. Anything that cannot be resolved (no
//! symbol, no file, no workspace) becomes an empty string.

use std::collections::HashSet;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use rand::Rng;
use regex::Captures;

use crate::case;
use crate::catalog::{Category, Variable};
use crate::context::ResolutionContext;
use crate::host::{DocumentSymbol, Position, Range, SymbolKind};
use crate::patterns::{self, PlaceholderMatch};
use crate::settings::FieldName;

/// Resolve every placeholder in `text` for block line `line` of `field`.
pub fn resolve(
    text: &str,
    ctx: &mut ResolutionContext<'_>,
    line: usize,
    field: FieldName,
) -> String {
    if !patterns::has_placeholder(text) {
        return text.to_string();
    }
    Category::ORDER
        .into_iter()
        .fold(text.to_string(), |current, category| {
            resolve_category(category, &current, ctx, line, field)
        })
}

/// One pass: substitute every placeholder of `category`.
pub fn resolve_category(
    category: Category,
    text: &str,
    ctx: &mut ResolutionContext<'_>,
    line: usize,
    field: FieldName,
) -> String {
    if !patterns::has_placeholder(text) {
        return text.to_string();
    }
    patterns::pattern(category)
        .replace_all(text, |caps: &Captures<'_>| {
            match PlaceholderMatch::from_captures(caps) {
                Some(found) => resolve_match(&found, ctx, line, field),
                None => caps.get(0).map_or(String::new(), |m| m.as_str().to_string()),
            }
        })
        .into_owned()
}

/// Value of one placeholder occurrence, case modifier applied.
pub fn resolve_match(
    found: &PlaceholderMatch,
    ctx: &mut ResolutionContext<'_>,
    line: usize,
    field: FieldName,
) -> String {
    let value = resolve_variable(found.variable, ctx, line, field);
    match found.modifier {
        Some(modifier) if !found.variable.is_counter() => case::apply(modifier, &value),
        _ => value,
    }
}

/// Value of a single variable.
pub fn resolve_variable(
    variable: Variable,
    ctx: &mut ResolutionContext<'_>,
    line: usize,
    field: FieldName,
) -> String {
    match variable.category() {
        Category::Special => match variable {
            Variable::Clipboard => ctx.clipboard_text(),
            _ => ctx.selection_text(),
        },
        Category::Extension => extension_variable(variable, ctx, line, field),
        Category::Path => path_variable(variable, ctx, line),
        Category::Snippet => snippet_variable(variable, ctx, field),
    }
}

fn extension_variable(
    variable: Variable,
    ctx: &mut ResolutionContext<'_>,
    line: usize,
    field: FieldName,
) -> String {
    match variable {
        Variable::GetInput => ctx.request_input(field, line),
        Variable::Default => match ctx.cached_input(field) {
            Some(answer) => answer.to_string(),
            None => {
                log::debug!("no earlier input for {} on line {}", field, line);
                String::new()
            }
        },
        Variable::IncomingCalls => incoming_calls(ctx),
        Variable::OutgoingCalls => outgoing_calls(ctx),
        _ => {
            let symbols = ctx.host.symbols.document_symbols();
            let cursor = ctx.selection.active;
            let found = match variable {
                Variable::NextSymbol => next_symbol(&symbols, cursor, |_| true),
                Variable::PreviousSymbol => previous_symbol(&symbols, cursor, |_| true),
                Variable::NextFunction => next_symbol(&symbols, cursor, DocumentSymbol::is_function),
                Variable::PreviousFunction => {
                    previous_symbol(&symbols, cursor, DocumentSymbol::is_function)
                }
                Variable::ParentFunction => parent_function(&symbols, cursor),
                Variable::ThisFunction => {
                    return this_function(&symbols, ctx.selection.range()).unwrap_or_default()
                }
                _ => None,
            };
            found.map(|symbol| symbol.name.clone()).unwrap_or_default()
        }
    }
}

// === Symbol lookups ===

/// First symbol starting after `cursor`.
pub fn next_symbol(
    symbols: &[DocumentSymbol],
    cursor: Position,
    filter: impl Fn(&DocumentSymbol) -> bool,
) -> Option<&DocumentSymbol> {
    symbols
        .iter()
        .filter(|symbol| filter(symbol))
        .find(|symbol| symbol.range.start > cursor)
}

/// Nearest symbol starting before `cursor`.
pub fn previous_symbol(
    symbols: &[DocumentSymbol],
    cursor: Position,
    filter: impl Fn(&DocumentSymbol) -> bool,
) -> Option<&DocumentSymbol> {
    symbols
        .iter()
        .filter(|symbol| filter(symbol))
        .filter(|symbol| symbol.range.start < cursor)
        .last()
}

/// Top-level function enclosing `cursor`.
pub fn parent_function(symbols: &[DocumentSymbol], cursor: Position) -> Option<&DocumentSymbol> {
    symbols
        .iter()
        .find(|symbol| symbol.is_function() && symbol.range.contains(cursor))
}

/// Innermost function touching `selection`: a function nested directly in a
/// top-level function wins over its parent. Deeper nesting is not searched.
pub fn this_function(symbols: &[DocumentSymbol], selection: Range) -> Option<String> {
    let parent = symbols
        .iter()
        .find(|symbol| symbol.is_function() && symbol.range.intersection(&selection).is_some())?;
    let child = parent
        .children
        .iter()
        .find(|child| child.is_function() && child.range.intersection(&selection).is_some());
    Some(child.unwrap_or(parent).name.clone())
}

/// `caller:line,line, other:line` for the function after the cursor.
fn incoming_calls(ctx: &ResolutionContext<'_>) -> String {
    let symbols = ctx.host.symbols.document_symbols();
    let Some(target) = next_symbol(&symbols, ctx.selection.active, DocumentSymbol::is_function)
    else {
        return String::new();
    };

    ctx.host
        .symbols
        .incoming_calls(target.selection_range.start)
        .iter()
        .map(|call| {
            let mut seen = HashSet::new();
            let lines: Vec<String> = call
                .from_ranges
                .iter()
                .map(|r| r.start.line + 1)
                .filter(|line| seen.insert(*line))
                .map(|line| line.to_string())
                .collect();
            format!("{}:{}", call.from.name, lines.join(","))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Workspace functions called by the function after the cursor.
fn outgoing_calls(ctx: &ResolutionContext<'_>) -> String {
    let symbols = ctx.host.symbols.document_symbols();
    let Some(target) = next_symbol(&symbols, ctx.selection.active, DocumentSymbol::is_function)
    else {
        return String::new();
    };

    ctx.host
        .symbols
        .outgoing_calls(target.selection_range.start)
        .iter()
        .filter(|call| call.to.kind == SymbolKind::Function && call.to.in_workspace)
        .map(|call| call.to.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// === Path variables ===

fn path_variable(variable: Variable, ctx: &ResolutionContext<'_>, line: usize) -> String {
    let cursor_line = ctx.selection.active.line;
    match variable {
        Variable::LineIndex => return (cursor_line + line).to_string(),
        Variable::LineNumber => return (cursor_line + line + 1).to_string(),
        Variable::MatchIndex => return ctx.match_index.to_string(),
        Variable::MatchNumber => return (ctx.match_index + 1).to_string(),
        Variable::PathSeparator => return MAIN_SEPARATOR.to_string(),
        _ => {}
    }

    let workspace = ctx.host.document.workspace_folder();
    match variable {
        Variable::WorkspaceFolder => return workspace.as_deref().map(display).unwrap_or_default(),
        Variable::WorkspaceFolderBasename => {
            return workspace
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        }
        _ => {}
    }

    let Some(file) = ctx.host.document.file_path() else {
        return String::new();
    };
    let relative = relative_to(&file, workspace.as_deref());

    match variable {
        Variable::File => display(&file),
        Variable::RelativeFile => display(&relative),
        Variable::FileBasename => file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        Variable::FileBasenameNoExtension => file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
        Variable::FileExtname => file
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default(),
        Variable::FileDirname => file.parent().map(display).unwrap_or_default(),
        Variable::RelativeFileDirname => match relative.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => display(parent),
            _ => ".".to_string(),
        },
        _ => String::new(),
    }
}

/// `file` relative to `workspace`, or unchanged when it lies outside.
fn relative_to(file: &Path, workspace: Option<&Path>) -> PathBuf {
    workspace
        .and_then(|root| file.strip_prefix(root).ok())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| file.to_path_buf())
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

// === Snippet variables ===

fn snippet_variable(variable: Variable, ctx: &ResolutionContext<'_>, field: FieldName) -> String {
    let now = ctx.now;
    let format = |spec: &str| now.format(spec).to_string();

    match variable {
        Variable::CurrentLine => ctx.active_line(),
        Variable::CurrentWord => ctx.word_at_cursor(),
        Variable::CurrentYear => format("%Y"),
        Variable::CurrentYearShort => format("%y"),
        Variable::CurrentMonth => format("%m"),
        Variable::CurrentMonthName => format("%B"),
        Variable::CurrentMonthNameShort => format("%b"),
        Variable::CurrentDate => format("%d"),
        Variable::CurrentDayName => format("%A"),
        Variable::CurrentDayNameShort => format("%a"),
        Variable::CurrentHour => format("%H"),
        Variable::CurrentMinute => format("%M"),
        Variable::CurrentSecond => format("%S"),
        Variable::CurrentSecondsUnix => now.timestamp().to_string(),
        Variable::CurrentTimezoneOffset => format("%:z"),
        Variable::Random => format!("{:06}", rand::thread_rng().gen_range(0..1_000_000)),
        Variable::RandomHex => format!("{:06x}", rand::thread_rng().gen_range(0..0x100_0000)),
        Variable::BlockCommentStart => ctx.comments.block_start().unwrap_or_default().to_string(),
        Variable::BlockCommentEnd => ctx.comments.block_end().unwrap_or_default().to_string(),
        Variable::LineComment => match (&ctx.comments.line, field) {
            (Some(line), _) => line.clone(),
            // languages without line comments get the block delimiters instead
            (None, FieldName::StartText) => ctx.comments.block_start().unwrap_or_default().to_string(),
            (None, FieldName::EndText) => ctx.comments.block_end().unwrap_or_default().to_string(),
            (None, _) => String::new(),
        },
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{
        CallItem, Host, IncomingCall, MemoryDocument, OutgoingCall, ScriptedInput, Selection,
        StaticClipboard, StaticSymbols,
    };
    use chrono::{Local, TimeZone};

    fn pos(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    fn span(start: usize, end: usize) -> Range {
        Range::new(pos(start, 0), pos(end, 0))
    }

    fn rust_file() -> MemoryDocument {
        MemoryDocument::new("fn alpha() {}\n\nfn beta() {\n    call();\n}\n")
            .with_path("/work/project/src/lib/main.rs")
            .with_workspace("/work/project")
            .with_language("rust")
    }

    fn outline() -> Vec<DocumentSymbol> {
        vec![
            DocumentSymbol::new("alpha", SymbolKind::Function, span(0, 0)),
            DocumentSymbol::new("CONFIG", SymbolKind::Variable, span(1, 1)),
            DocumentSymbol::new("beta", SymbolKind::Function, span(2, 8)).with_children(vec![
                DocumentSymbol::new("inner", SymbolKind::Function, span(4, 6)),
            ]),
            DocumentSymbol::new("Shape", SymbolKind::Struct, span(10, 12)),
            DocumentSymbol::new("gamma", SymbolKind::Function, span(14, 20)),
        ]
    }

    #[test]
    fn test_fast_path_returns_text_unchanged() {
        let doc = rust_file();
        let mut ctx = ResolutionContext::new(Host::new(&doc), Selection::default());
        assert_eq!(resolve("no markers here", &mut ctx, 0, FieldName::Subjects), "no markers here");
        assert_eq!(resolve("${unknownThing}", &mut ctx, 0, FieldName::Subjects), "${unknownThing}");
    }

    #[test]
    fn test_path_variables() {
        let doc = rust_file();
        let mut ctx = ResolutionContext::new(Host::new(&doc), Selection::cursor(pos(2, 0)));
        let mut r = |text: &str| resolve(text, &mut ctx, 1, FieldName::Subjects);

        assert_eq!(r("${file}"), "/work/project/src/lib/main.rs");
        assert_eq!(r("${TM_FILENAME}"), "main.rs");
        assert_eq!(r("${fileBasenameNoExtension}${fileExtname}"), "main.rs");
        assert_eq!(r("${relativeFile}"), "src/lib/main.rs");
        assert_eq!(r("${relativeFileDirname}"), "src/lib");
        assert_eq!(r("${fileDirname}"), "/work/project/src/lib");
        assert_eq!(r("${WORKSPACE_NAME}"), "project");
        assert_eq!(r("${lineIndex}/${lineNumber}"), "3/4");
        assert_eq!(r("${matchIndex} ${CURSOR_NUMBER}"), "0 1");
    }

    #[test]
    fn test_missing_file_resolves_blank() {
        let doc = MemoryDocument::new("text");
        let mut ctx = ResolutionContext::new(Host::new(&doc), Selection::default());
        assert_eq!(resolve("[${file}][${relativeFile}]", &mut ctx, 0, FieldName::Subjects), "[][]");
    }

    #[test]
    fn test_case_modifiers() {
        let doc = rust_file();
        let mut ctx = ResolutionContext::new(Host::new(&doc), Selection::default());
        assert_eq!(resolve(r"\U${fileBasename}", &mut ctx, 0, FieldName::Subjects), "MAIN.RS");
        assert_eq!(
            resolve(r"\P${TM_FILENAME_BASE}", &mut ctx, 0, FieldName::Subjects),
            "Main"
        );
    }

    #[test]
    fn test_case_modifier_skips_counters() {
        let doc = rust_file();
        let mut ctx = ResolutionContext::new(Host::new(&doc), Selection::default());
        assert_eq!(resolve(r"\U${lineNumber}", &mut ctx, 4, FieldName::Subjects), "5");
    }

    #[test]
    fn test_selection_and_clipboard() {
        let doc = MemoryDocument::new("hello world");
        let clipboard = StaticClipboard::new("pasted");
        let selection = Selection::new(pos(0, 0), pos(0, 5));
        let mut ctx = ResolutionContext::new(Host::new(&doc).with_clipboard(&clipboard), selection);
        assert_eq!(
            resolve(r"${selectedText} \U${CLIPBOARD}", &mut ctx, 0, FieldName::Subjects),
            "hello PASTED"
        );
    }

    #[test]
    fn test_input_then_default() {
        let doc = MemoryDocument::new("");
        let input = ScriptedInput::new(["Overview"]);
        let mut ctx = ResolutionContext::new(Host::new(&doc).with_input(&input), Selection::default());

        assert_eq!(resolve("${getInput}", &mut ctx, 0, FieldName::Subjects), "Overview");
        assert_eq!(resolve(r"\U${default}", &mut ctx, 1, FieldName::Subjects), "OVERVIEW");
        // other fields have their own answers
        assert_eq!(resolve("${default}", &mut ctx, 1, FieldName::StartText), "");
        assert_eq!(input.asked().len(), 1);
        assert_eq!(input.asked()[0].title(), "subjects");
    }

    #[test]
    fn test_input_may_contain_later_placeholders() {
        let doc = rust_file();
        let input = ScriptedInput::new(["see ${fileBasename}"]);
        let mut ctx = ResolutionContext::new(Host::new(&doc).with_input(&input), Selection::default());
        assert_eq!(resolve("${getInput}", &mut ctx, 0, FieldName::Subjects), "see main.rs");
    }

    #[test]
    fn test_comment_delimiters() {
        let doc = rust_file();
        let mut ctx = ResolutionContext::new(Host::new(&doc), Selection::default());
        assert_eq!(resolve("${BLOCK_COMMENT_START}", &mut ctx, 0, FieldName::StartText), "/*");
        assert_eq!(resolve("${LINE_COMMENT}", &mut ctx, 0, FieldName::EndText), "//");

        let css = MemoryDocument::new("").with_language("css");
        let mut ctx = ResolutionContext::new(Host::new(&css), Selection::default());
        assert_eq!(resolve("${LINE_COMMENT}", &mut ctx, 0, FieldName::StartText), "/*");
        assert_eq!(resolve("${LINE_COMMENT}", &mut ctx, 0, FieldName::EndText), "*/");
        assert_eq!(resolve("${LINE_COMMENT}", &mut ctx, 0, FieldName::Subjects), "");
    }

    #[test]
    fn test_date_variables() {
        let doc = MemoryDocument::new("");
        let now = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        let mut ctx = ResolutionContext::new(Host::new(&doc), Selection::default()).with_now(now);
        assert_eq!(
            resolve(
                "${CURRENT_YEAR}-${CURRENT_MONTH}-${CURRENT_DATE} ${CURRENT_HOUR}:${CURRENT_MINUTE}:${CURRENT_SECOND}",
                &mut ctx,
                0,
                FieldName::Subjects
            ),
            "2024-03-07 09:05:02"
        );
        assert_eq!(
            resolve("${CURRENT_MONTH_NAME_SHORT} ${CURRENT_DAY_NAME}", &mut ctx, 0, FieldName::Subjects),
            "Mar Thursday"
        );
        assert_eq!(
            resolve("${CURRENT_SECONDS_UNIX}", &mut ctx, 0, FieldName::Subjects),
            now.timestamp().to_string()
        );
    }

    #[test]
    fn test_random_variables() {
        let doc = MemoryDocument::new("");
        let mut ctx = ResolutionContext::new(Host::new(&doc), Selection::default());
        let random = resolve("${RANDOM}", &mut ctx, 0, FieldName::Subjects);
        assert_eq!(random.len(), 6);
        assert!(random.chars().all(|c| c.is_ascii_digit()));
        let hex = resolve("${RANDOM_HEX}", &mut ctx, 0, FieldName::Subjects);
        assert_eq!(hex.len(), 6);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_symbol_lookups() {
        let symbols = outline();
        let cursor = pos(9, 0);
        assert_eq!(next_symbol(&symbols, cursor, |_| true).unwrap().name, "Shape");
        assert_eq!(
            next_symbol(&symbols, cursor, DocumentSymbol::is_function).unwrap().name,
            "gamma"
        );
        assert_eq!(previous_symbol(&symbols, cursor, |_| true).unwrap().name, "beta");
        assert_eq!(
            previous_symbol(&symbols, pos(2, 0), |_| true).unwrap().name,
            "CONFIG"
        );
        assert!(parent_function(&symbols, cursor).is_none());
        assert_eq!(parent_function(&symbols, pos(5, 2)).unwrap().name, "beta");
    }

    #[test]
    fn test_this_function_one_level_deep() {
        let symbols = outline();
        assert_eq!(this_function(&symbols, span(5, 5)), Some("inner".to_string()));
        assert_eq!(this_function(&symbols, span(3, 3)), Some("beta".to_string()));
        assert_eq!(this_function(&symbols, span(11, 11)), None);
    }

    #[test]
    fn test_call_hierarchy() {
        let doc = rust_file();
        let item = |name: &str, kind, in_workspace| CallItem {
            name: name.to_string(),
            kind,
            in_workspace,
        };
        let symbols = StaticSymbols {
            symbols: outline(),
            incoming: vec![
                IncomingCall {
                    from: item("main", SymbolKind::Function, true),
                    from_ranges: vec![span(30, 30), span(41, 41), span(30, 30), span(41, 41)],
                },
                IncomingCall {
                    from: item("run", SymbolKind::Function, true),
                    from_ranges: vec![span(7, 7)],
                },
            ],
            outgoing: vec![
                OutgoingCall { to: item("helper", SymbolKind::Function, true) },
                OutgoingCall { to: item("println", SymbolKind::Function, false) },
                OutgoingCall { to: item("len", SymbolKind::Method, true) },
                OutgoingCall { to: item("finish", SymbolKind::Function, true) },
            ],
        };
        let mut ctx = ResolutionContext::new(Host::new(&doc).with_symbols(&symbols), Selection::cursor(pos(9, 0)));
        assert_eq!(
            resolve("${incomingCalls}", &mut ctx, 0, FieldName::Subjects),
            "main:31,42, run:8"
        );
        assert_eq!(
            resolve("${outgoingCalls}", &mut ctx, 0, FieldName::Subjects),
            "helper, finish"
        );

        // nothing after the cursor
        let mut ctx = ResolutionContext::new(Host::new(&doc).with_symbols(&symbols), Selection::cursor(pos(50, 0)));
        assert_eq!(resolve("${incomingCalls}", &mut ctx, 0, FieldName::Subjects), "");
    }

    #[test]
    fn test_function_placeholders_without_symbols() {
        let doc = rust_file();
        let mut ctx = ResolutionContext::new(Host::new(&doc), Selection::default());
        assert_eq!(
            resolve("[${nextFunction}|${thisFunction}|${parentFunction}]", &mut ctx, 0, FieldName::Subjects),
            "[||]"
        );
    }
}
