//! Registry of every placeholder name the resolver understands.
//!
//! Names are grouped into four disjoint categories. The order of the
//! categories is the order in which the resolver runs its passes.

/// Placeholder categories, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Content-bearing variables: the selection and the clipboard.
    Special,
    /// Variables computed by this crate: input requests and symbol lookups.
    Extension,
    /// File, workspace, line and match variables.
    Path,
    /// Snippet-style variables: current line/word, date/time, random, comments.
    Snippet,
}

impl Category {
    /// All categories in resolution order.
    pub const ORDER: [Category; 4] = [
        Category::Special,
        Category::Extension,
        Category::Path,
        Category::Snippet,
    ];

    /// Name table for this category.
    pub fn entries(self) -> &'static [(&'static str, Variable)] {
        match self {
            Category::Special => SPECIAL,
            Category::Extension => EXTENSION,
            Category::Path => PATH,
            Category::Snippet => SNIPPET,
        }
    }
}

/// A recognized placeholder, independent of which alias spelled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    SelectedText,
    Clipboard,

    GetInput,
    Default,
    NextSymbol,
    PreviousSymbol,
    NextFunction,
    PreviousFunction,
    ParentFunction,
    ThisFunction,
    IncomingCalls,
    OutgoingCalls,

    File,
    RelativeFile,
    FileBasename,
    FileBasenameNoExtension,
    FileExtname,
    FileDirname,
    RelativeFileDirname,
    WorkspaceFolder,
    WorkspaceFolderBasename,
    PathSeparator,
    LineIndex,
    LineNumber,
    MatchIndex,
    MatchNumber,

    CurrentLine,
    CurrentWord,
    CurrentYear,
    CurrentYearShort,
    CurrentMonth,
    CurrentMonthName,
    CurrentMonthNameShort,
    CurrentDate,
    CurrentDayName,
    CurrentDayNameShort,
    CurrentHour,
    CurrentMinute,
    CurrentSecond,
    CurrentSecondsUnix,
    CurrentTimezoneOffset,
    Random,
    RandomHex,
    BlockCommentStart,
    BlockCommentEnd,
    LineComment,
}

impl Variable {
    /// Look up a placeholder body (the text between `${` and `}`, trimmed).
    pub fn from_name(name: &str) -> Option<Variable> {
        let name = name.trim();
        Category::ORDER
            .iter()
            .flat_map(|category| category.entries().iter())
            .find(|(alias, _)| *alias == name)
            .map(|(_, variable)| *variable)
    }

    /// The category this variable is resolved in.
    pub fn category(self) -> Category {
        Category::ORDER
            .into_iter()
            .find(|category| category.entries().iter().any(|(_, v)| *v == self))
            .unwrap_or(Category::Snippet)
    }

    /// Line and match counters are numeric; case modifiers never touch them.
    pub fn is_counter(self) -> bool {
        matches!(
            self,
            Variable::LineIndex | Variable::LineNumber | Variable::MatchIndex | Variable::MatchNumber
        )
    }
}

/// Selection and clipboard. These may span several lines.
pub const SPECIAL: &[(&str, Variable)] = &[
    ("selectedText", Variable::SelectedText),
    ("TM_SELECTED_TEXT", Variable::SelectedText),
    ("CLIPBOARD", Variable::Clipboard),
];

pub const EXTENSION: &[(&str, Variable)] = &[
    ("getInput", Variable::GetInput),
    ("default", Variable::Default),
    ("nextSymbol", Variable::NextSymbol),
    ("previousSymbol", Variable::PreviousSymbol),
    ("nextFunction", Variable::NextFunction),
    ("previousFunction", Variable::PreviousFunction),
    ("parentFunction", Variable::ParentFunction),
    ("thisFunction", Variable::ThisFunction),
    ("incomingCalls", Variable::IncomingCalls),
    ("outgoingCalls", Variable::OutgoingCalls),
];

pub const PATH: &[(&str, Variable)] = &[
    ("file", Variable::File),
    ("TM_FILEPATH", Variable::File),
    ("relativeFile", Variable::RelativeFile),
    ("RELATIVE_FILEPATH", Variable::RelativeFile),
    ("fileBasename", Variable::FileBasename),
    ("TM_FILENAME", Variable::FileBasename),
    ("fileBasenameNoExtension", Variable::FileBasenameNoExtension),
    ("TM_FILENAME_BASE", Variable::FileBasenameNoExtension),
    ("fileExtname", Variable::FileExtname),
    ("fileDirname", Variable::FileDirname),
    ("TM_DIRECTORY", Variable::FileDirname),
    ("relativeFileDirname", Variable::RelativeFileDirname),
    ("fileWorkspaceFolder", Variable::WorkspaceFolder),
    ("workspaceFolder", Variable::WorkspaceFolder),
    ("WORKSPACE_FOLDER", Variable::WorkspaceFolder),
    ("workspaceFolderBasename", Variable::WorkspaceFolderBasename),
    ("WORKSPACE_NAME", Variable::WorkspaceFolderBasename),
    ("pathSeparator", Variable::PathSeparator),
    ("/", Variable::PathSeparator),
    ("lineIndex", Variable::LineIndex),
    ("TM_LINE_INDEX", Variable::LineIndex),
    ("lineNumber", Variable::LineNumber),
    ("TM_LINE_NUMBER", Variable::LineNumber),
    ("matchIndex", Variable::MatchIndex),
    ("CURSOR_INDEX", Variable::MatchIndex),
    ("matchNumber", Variable::MatchNumber),
    ("CURSOR_NUMBER", Variable::MatchNumber),
];

pub const SNIPPET: &[(&str, Variable)] = &[
    ("TM_CURRENT_LINE", Variable::CurrentLine),
    ("TM_CURRENT_WORD", Variable::CurrentWord),
    ("CURRENT_YEAR", Variable::CurrentYear),
    ("CURRENT_YEAR_SHORT", Variable::CurrentYearShort),
    ("CURRENT_MONTH", Variable::CurrentMonth),
    ("CURRENT_MONTH_NAME", Variable::CurrentMonthName),
    ("CURRENT_MONTH_NAME_SHORT", Variable::CurrentMonthNameShort),
    ("CURRENT_DATE", Variable::CurrentDate),
    ("CURRENT_DAY_NAME", Variable::CurrentDayName),
    ("CURRENT_DAY_NAME_SHORT", Variable::CurrentDayNameShort),
    ("CURRENT_HOUR", Variable::CurrentHour),
    ("CURRENT_MINUTE", Variable::CurrentMinute),
    ("CURRENT_SECOND", Variable::CurrentSecond),
    ("CURRENT_SECONDS_UNIX", Variable::CurrentSecondsUnix),
    ("CURRENT_TIMEZONE_OFFSET", Variable::CurrentTimezoneOffset),
    ("RANDOM", Variable::Random),
    ("RANDOM_HEX", Variable::RandomHex),
    ("BLOCK_COMMENT_START", Variable::BlockCommentStart),
    ("BLOCK_COMMENT_END", Variable::BlockCommentEnd),
    ("LINE_COMMENT", Variable::LineComment),
];

/// Two-character escapes that may precede a placeholder, e.g. `\U${file}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseModifier {
    /// `\U`
    Upper,
    /// `\u`
    UpperFirst,
    /// `\L`
    Lower,
    /// `\l`
    LowerFirst,
    /// `\P`
    Pascal,
    /// `\C`
    Camel,
    /// `\T`
    Title,
    /// `\S`
    ScreamingSnake,
    /// `\s`
    Snake,
    /// `\K`
    ScreamingKebab,
    /// `\k`
    Kebab,
}

impl CaseModifier {
    /// Letters accepted after the backslash.
    pub const LETTERS: &'static str = "UuLlPCTSsKk";

    /// Parse an escape such as `\U` (the backslash is optional).
    pub fn from_escape(escape: &str) -> Option<CaseModifier> {
        let letter = escape.strip_prefix('\\').unwrap_or(escape);
        let modifier = match letter {
            "U" => CaseModifier::Upper,
            "u" => CaseModifier::UpperFirst,
            "L" => CaseModifier::Lower,
            "l" => CaseModifier::LowerFirst,
            "P" => CaseModifier::Pascal,
            "C" => CaseModifier::Camel,
            "T" => CaseModifier::Title,
            "S" => CaseModifier::ScreamingSnake,
            "s" => CaseModifier::Snake,
            "K" => CaseModifier::ScreamingKebab,
            "k" => CaseModifier::Kebab,
            _ => return None,
        };
        Some(modifier)
    }
}

/// Every user-visible placeholder, formatted as `${name}`, in category order.
/// `${default}` is internal and left out.
pub fn all_placeholders() -> Vec<String> {
    Category::ORDER
        .iter()
        .flat_map(|category| category.entries().iter())
        .filter(|(_, variable)| *variable != Variable::Default)
        .map(|(name, _)| format!("${{{}}}", name))
        .collect()
}
