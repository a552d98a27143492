//! Template configuration: the declarative description of a comment block.
//!
//! Every per-line field may be given as a single value or as a list that is
//! shorter than the final number of lines. `subjects` is always a list and
//! its length decides the line count.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::patterns;

/// The per-line fields of a block, named by their configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    LineLength,
    StartText,
    EndText,
    Justify,
    GapLeft,
    GapRight,
    PadLines,
    Subjects,
}

impl FieldName {
    pub fn key(self) -> &'static str {
        match self {
            FieldName::LineLength => "lineLength",
            FieldName::StartText => "startText",
            FieldName::EndText => "endText",
            FieldName::Justify => "justify",
            FieldName::GapLeft => "gapLeft",
            FieldName::GapRight => "gapRight",
            FieldName::PadLines => "padLines",
            FieldName::Subjects => "subjects",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A value that can sit in one line slot of a setting.
pub trait LineValue: Clone {
    /// Placeholder text carried by the value, if it is one.
    fn placeholder(&self) -> Option<&str>;

    /// Rebuild the value from placeholder text.
    fn from_placeholder(text: String) -> Self;

    /// Copy of this value for an additional line.
    ///
    /// Pending `${getInput}` requests become `${default}` so that the
    /// prompt is shown once and every copy reuses its answer.
    fn repeated(&self) -> Self {
        match self.placeholder().and_then(patterns::defer_input_requests) {
            Some(deferred) => Self::from_placeholder(deferred),
            None => self.clone(),
        }
    }
}

impl LineValue for String {
    fn placeholder(&self) -> Option<&str> {
        patterns::has_placeholder(self).then_some(self.as_str())
    }

    fn from_placeholder(text: String) -> Self {
        text
    }
}

/// One value for every line, or one value per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Setting<T> {
    Scalar(T),
    PerLine(Vec<T>),
}

impl<T: LineValue> Setting<T> {
    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        match self {
            Setting::Scalar(_) => 1,
            Setting::PerLine(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value for `line`; a scalar applies to every line.
    pub fn get(&self, line: usize) -> Option<&T> {
        match self {
            Setting::Scalar(value) => Some(value),
            Setting::PerLine(values) => values.get(line),
        }
    }

    /// Expand to at least `count` per-line entries by repeating the last one.
    ///
    /// Lists that are already long enough are returned unchanged; an empty
    /// list has nothing to repeat and stays empty.
    pub fn filled(&self, count: usize) -> Setting<T> {
        let mut values = match self {
            Setting::Scalar(value) => vec![value.clone()],
            Setting::PerLine(values) => values.clone(),
        };
        if let Some(last) = values.last().cloned() {
            let fill = last.repeated();
            while values.len() < count {
                values.push(fill.clone());
            }
        }
        Setting::PerLine(values)
    }

    /// Give `extra` more lines the entry at `at`, inserted right after it.
    ///
    /// Scalars already cover every line and lists too short to reach `at`
    /// are left for the trailing fill.
    pub fn duplicated_at(&self, at: usize, extra: usize) -> Setting<T> {
        match self {
            Setting::Scalar(_) => self.clone(),
            Setting::PerLine(values) if values.len() <= at => self.clone(),
            Setting::PerLine(values) => {
                let copy = values[at].repeated();
                let mut expanded = values.clone();
                expanded.splice(at + 1..at + 1, std::iter::repeat(copy).take(extra));
                Setting::PerLine(expanded)
            }
        }
    }
}

/// Target width of a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValue", into = "RawValue")]
pub enum LineLength {
    /// A fixed number of columns.
    Columns(f64),
    /// The longest trimmed selected line, plus `offset`.
    Minimum { offset: u32 },
    /// Text still to be resolved, e.g. `${getInput}`.
    Placeholder(String),
}

impl Default for LineLength {
    fn default() -> Self {
        LineLength::Columns(80.0)
    }
}

impl FromStr for LineLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Ok(LineLength::Columns(0.0));
        }
        if let Some(rest) = text.strip_prefix("minimum") {
            let rest = rest.trim();
            if rest.is_empty() {
                return Ok(LineLength::Minimum { offset: 0 });
            }
            return rest
                .strip_prefix('+')
                .and_then(|n| n.trim().parse::<u32>().ok())
                .map(|offset| LineLength::Minimum { offset })
                .ok_or_else(|| format!("invalid minimum line length: {:?}", s));
        }
        if patterns::has_placeholder(text) {
            return Ok(LineLength::Placeholder(text.to_string()));
        }
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() && n >= 0.0 => Ok(LineLength::Columns(n)),
            _ => Err(format!("invalid line length: {:?}", s)),
        }
    }
}

impl fmt::Display for LineLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineLength::Columns(n) => write!(f, "{}", n),
            LineLength::Minimum { offset: 0 } => f.write_str("minimum"),
            LineLength::Minimum { offset } => write!(f, "minimum + {}", offset),
            LineLength::Placeholder(text) => f.write_str(text),
        }
    }
}

impl LineValue for LineLength {
    fn placeholder(&self) -> Option<&str> {
        match self {
            LineLength::Placeholder(text) => Some(text),
            _ => None,
        }
    }

    fn from_placeholder(text: String) -> Self {
        LineLength::Placeholder(text)
    }
}

/// A gap width: a number, or text still to be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValue", into = "RawValue")]
pub enum Numeric {
    Value(f64),
    Placeholder(String),
}

impl Numeric {
    /// Interpret resolved text as a number. Blank text counts as zero.
    pub fn parse_resolved(text: &str) -> Option<f64> {
        let text = text.trim();
        if text.is_empty() {
            return Some(0.0);
        }
        text.parse::<f64>().ok().filter(|n| n.is_finite())
    }
}

impl LineValue for Numeric {
    fn placeholder(&self) -> Option<&str> {
        match self {
            Numeric::Placeholder(text) => Some(text),
            Numeric::Value(_) => None,
        }
    }

    fn from_placeholder(text: String) -> Self {
        Numeric::Placeholder(text)
    }
}

/// Number-or-text as it appears in JSON and TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

impl TryFrom<RawValue> for LineLength {
    type Error = String;

    fn try_from(raw: RawValue) -> Result<Self, Self::Error> {
        match raw {
            RawValue::Number(n) => Ok(LineLength::Columns(n)),
            RawValue::Text(text) => text.parse(),
        }
    }
}

impl From<LineLength> for RawValue {
    fn from(length: LineLength) -> Self {
        match length {
            LineLength::Columns(n) => RawValue::Number(n),
            other => RawValue::Text(other.to_string()),
        }
    }
}

impl TryFrom<RawValue> for Numeric {
    type Error = String;

    fn try_from(raw: RawValue) -> Result<Self, Self::Error> {
        match raw {
            RawValue::Number(n) => Ok(Numeric::Value(n)),
            RawValue::Text(text) if patterns::has_placeholder(&text) => {
                Ok(Numeric::Placeholder(text))
            }
            RawValue::Text(text) => Numeric::parse_resolved(&text)
                .map(Numeric::Value)
                .ok_or_else(|| format!("expected a number, got {:?}", text)),
        }
    }
}

impl From<Numeric> for RawValue {
    fn from(value: Numeric) -> Self {
        match value {
            Numeric::Value(n) => RawValue::Number(n),
            Numeric::Placeholder(text) => RawValue::Text(text),
        }
    }
}

/// Horizontal placement of a subject within its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Justify {
    Left,
    #[default]
    Center,
    Right,
}

impl FromStr for Justify {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "center" => Ok(Justify::Center),
            "left" => Ok(Justify::Left),
            "right" => Ok(Justify::Right),
            other => Err(format!("unknown justification: {:?}", other)),
        }
    }
}

/// Complete settings for one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSettings {
    /// Select the whole current line before building (editor integration).
    pub select_current_line: bool,
    /// Keep the indentation of the selection (editor integration).
    pub keep_indentation: bool,
    pub line_length: Setting<LineLength>,
    pub start_text: Setting<String>,
    pub end_text: Setting<String>,
    pub justify: Setting<String>,
    pub gap_left: Setting<Numeric>,
    pub gap_right: Setting<Numeric>,
    pub pad_lines: Setting<String>,
    pub subjects: Vec<String>,
}

impl Default for BlockSettings {
    fn default() -> Self {
        BlockSettings {
            select_current_line: true,
            keep_indentation: false,
            line_length: Setting::Scalar(LineLength::Columns(80.0)),
            start_text: Setting::Scalar("${BLOCK_COMMENT_START}".to_string()),
            end_text: Setting::Scalar(BLOCK_COMMENT_END.to_string()),
            justify: Setting::Scalar("center".to_string()),
            gap_left: Setting::Scalar(Numeric::Value(3.0)),
            gap_right: Setting::Scalar(Numeric::Value(3.0)),
            pad_lines: Setting::Scalar("-".to_string()),
            subjects: vec![
                String::new(),
                "${selectedText}".to_string(),
                String::new(),
            ],
        }
    }
}

impl BlockSettings {
    /// Number of lines the block will have.
    pub fn line_count(&self) -> usize {
        self.subjects.len()
    }

    /// Do any of the line lengths ask for the minimum width?
    pub fn uses_minimum_length(&self) -> bool {
        match &self.line_length {
            Setting::Scalar(length) => matches!(length, LineLength::Minimum { .. }),
            Setting::PerLine(lengths) => lengths
                .iter()
                .any(|length| matches!(length, LineLength::Minimum { .. })),
        }
    }
}

/// Block settings with every key optional, as written in configuration
/// files and invocation arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_current_line: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_indentation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_length: Option<Setting<LineLength>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_text: Option<Setting<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_text: Option<Setting<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify: Option<Setting<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_left: Option<Setting<Numeric>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_right: Option<Setting<Numeric>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pad_lines: Option<Setting<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,
}

impl BlockOverrides {
    /// Keys set here win; the rest come from `base`.
    pub fn over(self, base: BlockOverrides) -> BlockOverrides {
        BlockOverrides {
            select_current_line: self.select_current_line.or(base.select_current_line),
            keep_indentation: self.keep_indentation.or(base.keep_indentation),
            line_length: self.line_length.or(base.line_length),
            start_text: self.start_text.or(base.start_text),
            end_text: self.end_text.or(base.end_text),
            justify: self.justify.or(base.justify),
            gap_left: self.gap_left.or(base.gap_left),
            gap_right: self.gap_right.or(base.gap_right),
            pad_lines: self.pad_lines.or(base.pad_lines),
            subjects: self.subjects.or(base.subjects),
        }
    }

    /// Fill unset keys from the built-in defaults.
    ///
    /// An unset `endText` follows `startText`: a block opened with
    /// `${LINE_COMMENT}` is closed with it too, anything else is closed with
    /// `${BLOCK_COMMENT_END}`.
    pub fn into_settings(self) -> BlockSettings {
        let defaults = BlockSettings::default();
        let start_text = self.start_text.unwrap_or(defaults.start_text);
        let end_text = self.end_text.unwrap_or_else(|| {
            let closing = match &start_text {
                Setting::Scalar(start) if start.starts_with(LINE_COMMENT) => LINE_COMMENT,
                _ => BLOCK_COMMENT_END,
            };
            Setting::Scalar(closing.to_string())
        });

        BlockSettings {
            select_current_line: self.select_current_line.unwrap_or(defaults.select_current_line),
            keep_indentation: self.keep_indentation.unwrap_or(defaults.keep_indentation),
            line_length: self.line_length.unwrap_or(defaults.line_length),
            start_text,
            end_text,
            justify: self.justify.unwrap_or(defaults.justify),
            gap_left: self.gap_left.unwrap_or(defaults.gap_left),
            gap_right: self.gap_right.unwrap_or(defaults.gap_right),
            pad_lines: self.pad_lines.unwrap_or(defaults.pad_lines),
            subjects: self.subjects.unwrap_or(defaults.subjects),
        }
    }
}

const LINE_COMMENT: &str = "${LINE_COMMENT}";
const BLOCK_COMMENT_END: &str = "${BLOCK_COMMENT_END}";
