//! Case transforms applied by case-modifier escapes.

use crate::catalog::CaseModifier;

/// Apply one case modifier to resolved text.
pub fn apply(modifier: CaseModifier, text: &str) -> String {
    match modifier {
        CaseModifier::Upper => text.to_uppercase(),
        CaseModifier::UpperFirst => map_first(text, |c| c.to_uppercase().collect()),
        CaseModifier::Lower => text.to_lowercase(),
        CaseModifier::LowerFirst => map_first(text, |c| c.to_lowercase().collect()),
        CaseModifier::Pascal => to_pascal_case(text),
        CaseModifier::Camel => to_camel_case(text),
        CaseModifier::Title => to_title_case(text),
        CaseModifier::ScreamingSnake => to_snake_case(text).to_uppercase(),
        CaseModifier::Snake => to_snake_case(text),
        CaseModifier::ScreamingKebab => to_kebab_case(text).to_uppercase(),
        CaseModifier::Kebab => to_kebab_case(text),
    }
}

fn map_first(text: &str, f: impl Fn(char) -> String) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => f(first) + chars.as_str(),
        None => String::new(),
    }
}

/// `first_second` / `first-second` / `firstSecond` => `FirstSecond`.
///
/// Splits before every ASCII capital and on `-`/`_`, then capitalizes each
/// piece. Spaces are kept.
pub fn to_pascal_case(text: &str) -> String {
    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in text.trim().chars() {
        if c == '-' || c == '_' {
            pieces.push(std::mem::take(&mut current));
        } else {
            if c.is_ascii_uppercase() && !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
    }
    pieces.push(current);

    pieces
        .iter()
        .map(|piece| map_first(piece, |c| c.to_uppercase().collect()))
        .collect()
}

/// `first_second_third` => `firstSecondThird`.
///
/// Only ASCII letters and digits survive; text without any is returned trimmed.
pub fn to_camel_case(text: &str) -> String {
    let trimmed = text.trim();
    let words: Vec<&str> = trimmed
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() {
        return trimmed.to_string();
    }

    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i == 0 {
                lower
            } else {
                map_first(&lower, |c| c.to_uppercase().collect())
            }
        })
        .collect()
}

/// Capitalize the first letter of every word, lowercase the rest.
pub fn to_title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(c);
            at_word_start = true;
        }
    }
    result
}

pub fn to_snake_case(text: &str) -> String {
    split_words(text).join("_")
}

pub fn to_kebab_case(text: &str) -> String {
    split_words(text).join("-")
}

/// Lowercased words, split on non-alphanumerics and on case boundaries
/// (`fooBar`, `HTTPServer`, `v2Api`).
fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_and_lower() {
        assert_eq!(apply(CaseModifier::Upper, "main.rs"), "MAIN.RS");
        assert_eq!(apply(CaseModifier::Lower, "MAIN.RS"), "main.rs");
    }

    #[test]
    fn test_first_letter_only() {
        assert_eq!(apply(CaseModifier::UpperFirst, "hello world"), "Hello world");
        assert_eq!(apply(CaseModifier::LowerFirst, "Hello World"), "hello World");
        assert_eq!(apply(CaseModifier::UpperFirst, ""), "");
    }

    #[test]
    fn test_pascal() {
        assert_eq!(to_pascal_case("first_second_third"), "FirstSecondThird");
        assert_eq!(to_pascal_case("first-second"), "FirstSecond");
        assert_eq!(to_pascal_case("howManyCows"), "HowManyCows");
        assert_eq!(to_pascal_case("  padded "), "Padded");
    }

    #[test]
    fn test_camel() {
        assert_eq!(to_camel_case("first_second_third"), "firstSecondThird");
        assert_eq!(to_camel_case("Build Comment Block"), "buildCommentBlock");
        assert_eq!(to_camel_case("--"), "--");
    }

    #[test]
    fn test_title() {
        assert_eq!(to_title_case("hello big WORLD"), "Hello Big World");
        assert_eq!(to_title_case("semi-colon"), "Semi-Colon");
    }

    #[test]
    fn test_snake_and_kebab() {
        assert_eq!(to_snake_case("buildCommentBlock"), "build_comment_block");
        assert_eq!(to_snake_case("HTTPServer v2"), "http_server_v2");
        assert_eq!(to_kebab_case("Build Comment-Block"), "build-comment-block");
        assert_eq!(
            apply(CaseModifier::ScreamingSnake, "nextFunction"),
            "NEXT_FUNCTION"
        );
        assert_eq!(
            apply(CaseModifier::ScreamingKebab, "next function"),
            "NEXT-FUNCTION"
        );
    }
}
