//! Comment delimiters per language.
//!
//! The delimiters are looked up once per build and carried in the
//! resolution context as a [`CommentDelimiters`] value.

use std::path::Path;

/// Languages that have no comment syntax at all.
const LANGUAGES_TO_SKIP: &[&str] = &[
    "code-text-binary",
    "bibtex",
    "log",
    "Log",
    "search-result",
    "plaintext",
    "juliamarkdown",
    "scminput",
    "properties",
    "csv",
    "tsv",
    "excel",
];

/// (language id, line comment, block comment)
type LanguageEntry = (&'static str, Option<&'static str>, Option<(&'static str, &'static str)>);

const LANGUAGES: &[LanguageEntry] = &[
    ("c", Some("//"), Some(("/*", "*/"))),
    ("cpp", Some("//"), Some(("/*", "*/"))),
    ("csharp", Some("//"), Some(("/*", "*/"))),
    ("css", None, Some(("/*", "*/"))),
    ("go", Some("//"), Some(("/*", "*/"))),
    ("html", None, Some(("<!--", "-->"))),
    ("java", Some("//"), Some(("/*", "*/"))),
    ("javascript", Some("//"), Some(("/*", "*/"))),
    ("javascriptreact", Some("//"), Some(("/*", "*/"))),
    ("json", Some("//"), Some(("/*", "*/"))),
    ("jsonc", Some("//"), Some(("/*", "*/"))),
    ("lua", Some("--"), Some(("--[[", "]]"))),
    ("makefile", Some("#"), None),
    ("markdown", None, Some(("<!--", "-->"))),
    ("php", Some("//"), Some(("/*", "*/"))),
    ("powershell", Some("#"), Some(("<#", "#>"))),
    ("python", Some("#"), Some(("\"\"\"", "\"\"\""))),
    ("ruby", Some("#"), Some(("=begin", "=end"))),
    ("rust", Some("//"), Some(("/*", "*/"))),
    ("scss", Some("//"), Some(("/*", "*/"))),
    ("shellscript", Some("#"), None),
    ("sql", Some("--"), Some(("/*", "*/"))),
    ("swift", Some("//"), Some(("/*", "*/"))),
    ("toml", Some("#"), None),
    ("typescript", Some("//"), Some(("/*", "*/"))),
    ("typescriptreact", Some("//"), Some(("/*", "*/"))),
    ("xml", None, Some(("<!--", "-->"))),
    ("yaml", Some("#"), None),
];

const EXTENSIONS: &[(&str, &str)] = &[
    ("c", "c"),
    ("h", "c"),
    ("cc", "cpp"),
    ("cpp", "cpp"),
    ("hpp", "cpp"),
    ("cs", "csharp"),
    ("css", "css"),
    ("go", "go"),
    ("htm", "html"),
    ("html", "html"),
    ("java", "java"),
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("jsx", "javascriptreact"),
    ("json", "json"),
    ("jsonc", "jsonc"),
    ("lua", "lua"),
    ("mk", "makefile"),
    ("md", "markdown"),
    ("php", "php"),
    ("ps1", "powershell"),
    ("py", "python"),
    ("rb", "ruby"),
    ("rs", "rust"),
    ("scss", "scss"),
    ("sh", "shellscript"),
    ("bash", "shellscript"),
    ("sql", "sql"),
    ("swift", "swift"),
    ("toml", "toml"),
    ("ts", "typescript"),
    ("tsx", "typescriptreact"),
    ("xml", "xml"),
    ("yml", "yaml"),
    ("yaml", "yaml"),
    ("txt", "plaintext"),
    ("log", "log"),
    ("csv", "csv"),
];

/// Source of comment delimiters for a language id.
pub trait CommentConfigProvider {
    fn line_comment(&self, language_id: &str) -> Option<String>;
    fn block_comment(&self, language_id: &str) -> Option<(String, String)>;
}

/// Built-in table of common languages.
#[derive(Debug, Default, Clone, Copy)]
pub struct LanguageTable;

impl LanguageTable {
    fn entry(language_id: &str) -> Option<&'static LanguageEntry> {
        if is_skipped(language_id) {
            return None;
        }
        LANGUAGES.iter().find(|(id, _, _)| *id == language_id)
    }
}

impl CommentConfigProvider for LanguageTable {
    fn line_comment(&self, language_id: &str) -> Option<String> {
        Self::entry(language_id).and_then(|(_, line, _)| line.map(str::to_string))
    }

    fn block_comment(&self, language_id: &str) -> Option<(String, String)> {
        Self::entry(language_id)
            .and_then(|(_, _, block)| block.map(|(s, e)| (s.to_string(), e.to_string())))
    }
}

fn is_skipped(language_id: &str) -> bool {
    LANGUAGES_TO_SKIP.contains(&language_id) || language_id.starts_with("csv")
}

/// Guess a language id from a file name's extension.
pub fn language_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, id)| *id)
}

/// Comment delimiters of the active document's language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDelimiters {
    pub line: Option<String>,
    pub block: Option<(String, String)>,
}

impl CommentDelimiters {
    /// Look up both delimiters once.
    pub fn lookup(provider: &dyn CommentConfigProvider, language_id: &str) -> Self {
        Self {
            line: provider.line_comment(language_id),
            block: provider.block_comment(language_id),
        }
    }

    pub fn block_start(&self) -> Option<&str> {
        self.block.as_ref().map(|(start, _)| start.as_str())
    }

    pub fn block_end(&self) -> Option<&str> {
        self.block.as_ref().map(|(_, end)| end.as_str())
    }
}
