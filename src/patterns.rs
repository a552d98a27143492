//! Placeholder matching patterns, one per catalog category.
//!
//! Each pattern captures an optional case-modifier escape (`modifier`) and
//! the placeholder body (`name`). Inner whitespace is tolerated, so
//! `${ file }` matches like `${file}`.

use std::ops::Range;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::catalog::{CaseModifier, Category, Variable};

/// Marker that every placeholder starts with.
pub const PLACEHOLDER_MARKER: &str = "${";

static SPECIAL_RE: OnceLock<Regex> = OnceLock::new();
static EXTENSION_RE: OnceLock<Regex> = OnceLock::new();
static PATH_RE: OnceLock<Regex> = OnceLock::new();
static SNIPPET_RE: OnceLock<Regex> = OnceLock::new();

/// Get the compiled pattern for a category.
pub fn pattern(category: Category) -> &'static Regex {
    let cell = match category {
        Category::Special => &SPECIAL_RE,
        Category::Extension => &EXTENSION_RE,
        Category::Path => &PATH_RE,
        Category::Snippet => &SNIPPET_RE,
    };
    cell.get_or_init(|| build_pattern(category))
}

/// Compile the alternation of a category's names.
///
/// Longer names go first so that `fileBasenameNoExtension` is tried before
/// `fileBasename`.
fn build_pattern(category: Category) -> Regex {
    let mut names: Vec<&str> = category.entries().iter().map(|(name, _)| *name).collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");

    let source = format!(
        r"(?P<modifier>\\[{}])?\$\{{\s*(?P<name>{})\s*\}}",
        CaseModifier::LETTERS,
        alternation
    );
    Regex::new(&source).expect("catalog names form a valid pattern")
}

/// Quick check used as the resolver's fast path.
pub fn has_placeholder(text: &str) -> bool {
    text.contains(PLACEHOLDER_MARKER)
}

/// One placeholder occurrence found in a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMatch {
    /// Byte range of the whole match, modifier included.
    pub range: Range<usize>,
    pub modifier: Option<CaseModifier>,
    pub variable: Variable,
}

impl PlaceholderMatch {
    /// Build a match from the captures of one of the category patterns.
    pub fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let whole = caps.get(0)?;
        let variable = Variable::from_name(caps.name("name")?.as_str())?;
        let modifier = caps
            .name("modifier")
            .and_then(|m| CaseModifier::from_escape(m.as_str()));
        Some(PlaceholderMatch {
            range: whole.range(),
            modifier,
            variable,
        })
    }
}

/// Every placeholder of `category` in `text`, left to right.
pub fn find_all(category: Category, text: &str) -> Vec<PlaceholderMatch> {
    pattern(category)
        .captures_iter(text)
        .filter_map(|caps| PlaceholderMatch::from_captures(&caps))
        .collect()
}

/// Rewrite every `${getInput}` in `text` as `${default}`, keeping any
/// case modifier. Returns `None` when there was nothing to rewrite.
pub fn defer_input_requests(text: &str) -> Option<String> {
    if !has_placeholder(text) {
        return None;
    }
    let re = pattern(Category::Extension);
    let mut found = false;
    let rewritten = re.replace_all(text, |caps: &Captures<'_>| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        match PlaceholderMatch::from_captures(caps) {
            Some(m) if m.variable == Variable::GetInput => {
                found = true;
                let modifier = caps.name("modifier").map_or("", |m| m.as_str());
                format!("{}${{default}}", modifier)
            }
            _ => whole.to_string(),
        }
    });
    found.then(|| rewritten.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defer_input_requests() {
        assert_eq!(
            defer_input_requests(r"a ${getInput} \U${ getInput } ${file}"),
            Some(r"a ${default} \U${default} ${file}".to_string())
        );
        assert_eq!(defer_input_requests("${default}"), None);
        assert_eq!(defer_input_requests("plain"), None);
    }

    #[test]
    fn test_modifier_captured_separately() {
        let found = &find_all(Category::Path, r"x \U${fileBasename} y")[0];
        assert_eq!(found.variable, Variable::FileBasename);
        assert_eq!(found.modifier, Some(CaseModifier::Upper));
        assert_eq!(found.range, 2..19);
    }

    #[test]
    fn test_longest_name_wins() {
        let found = &find_all(Category::Path, "${fileBasenameNoExtension}")[0];
        assert_eq!(found.variable, Variable::FileBasenameNoExtension);
    }

    #[test]
    fn test_inner_whitespace() {
        let found = &find_all(Category::Special, "${ CLIPBOARD }")[0];
        assert_eq!(found.variable, Variable::Clipboard);
        assert_eq!(found.modifier, None);
    }

    #[test]
    fn test_categories_do_not_overlap() {
        assert!(find_all(Category::Snippet, "${file}").is_empty());
        assert!(find_all(Category::Path, "${CURRENT_YEAR}").is_empty());
        assert!(find_all(Category::Extension, "${selectedText}").is_empty());
    }

    #[test]
    fn test_path_separator_alias() {
        let found = &find_all(Category::Path, "a${/}b")[0];
        assert_eq!(found.variable, Variable::PathSeparator);
    }

    #[test]
    fn test_find_all_in_order() {
        let found = find_all(Category::Special, r"${selectedText}: \L${CLIPBOARD}");
        let variables: Vec<Variable> = found.iter().map(|m| m.variable).collect();
        assert_eq!(variables, vec![Variable::SelectedText, Variable::Clipboard]);
        assert_eq!(found[1].modifier, Some(CaseModifier::Lower));
        assert!(find_all(Category::Special, "plain").is_empty());
    }
}
