//! Layout engine for comment blocks.
//!
//! This module turns block settings into the final text: it runs the
//! multi-line expansion and normalization passes, resolves every field of
//! every line, equalizes subjects, and then justifies each line between its
//! start and end text.

use crate::context::ResolutionContext;
use crate::equalize::equalize_subjects;
use crate::error::{CommentBlockError, Result};
use crate::expand::{expand, Expansion};
use crate::normalize::normalize;
use crate::resolve::resolve;
use crate::settings::{BlockSettings, FieldName, Justify, LineLength, LineValue, Numeric, Setting};

/// How wide a line should be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineWidth {
    /// Total width, delimiters included.
    Fixed(f64),
    /// Longest trimmed selected line plus `offset`; delimiters are added on top.
    Minimum { longest: usize, offset: u32 },
}

/// One fully resolved line, ready to be laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub width: LineWidth,
    pub start_text: String,
    pub end_text: String,
    pub justify: Justify,
    pub gap_left: f64,
    pub gap_right: f64,
    pub pad: String,
    pub subject: String,
}

impl LineSpec {
    /// Lay the line out.
    ///
    /// Pad lengths are not clamped: a negative length simply pads nothing,
    /// so an oversized subject pushes the end text out instead of being cut.
    pub fn render(&self) -> String {
        let start_len = char_len(&self.start_text);
        let end_len = char_len(&self.end_text);
        let subject_len = char_len(&self.subject);

        let (line_length, offset) = match self.width {
            LineWidth::Fixed(width) => (width.floor(), 0.0),
            LineWidth::Minimum { longest, offset } => (
                (longest as f64 + f64::from(offset) + start_len + end_len).floor(),
                f64::from(offset),
            ),
        };

        let (gap_left, gap_right) = if self.subject.is_empty() {
            (0.0, 0.0)
        } else {
            (self.gap_left.floor(), self.gap_right.floor())
        };

        let (pad_left, pad_right) = match self.justify {
            Justify::Left => (
                0.0,
                (line_length - start_len - gap_left - subject_len - gap_right - end_len).floor(),
            ),
            Justify::Right => {
                let pad_left =
                    (line_length - start_len - gap_left - subject_len - gap_right - end_len).ceil();
                // the offset stays on the outside, after the subject
                (pad_left - offset, offset)
            }
            Justify::Center => (
                (line_length / 2.0 - subject_len / 2.0 - gap_left - start_len).ceil(),
                (line_length / 2.0 - subject_len / 2.0 - gap_right - end_len).floor(),
            ),
        };

        let (pad_left, pad_right) = (pad_left as i64, pad_right as i64);
        let (gap_left, gap_right) = (gap_left as i64, gap_right as i64);
        let (start_len, subject_len) = (start_len as i64, subject_len as i64);

        let left = pad_end(&self.start_text, pad_left + start_len, &self.pad);
        let left = pad_end(&left, pad_left + gap_left + start_len, " ");
        let right = pad_end(&self.subject, subject_len + gap_right, " ");
        let right = pad_end(&right, subject_len + gap_right + pad_right, &self.pad);

        format!("{}{}{}", left, right, self.end_text)
    }
}

/// Pad `text` on the right with repetitions of `fill` up to `target` chars.
///
/// Never truncates: a target at or below the current length, a negative
/// target and an empty fill all return `text` as is. A multi-char fill is
/// repeated and cut to fit.
pub fn pad_end(text: &str, target: i64, fill: &str) -> String {
    let len = text.chars().count() as i64;
    if target <= len || fill.is_empty() {
        return text.to_string();
    }
    let mut padded = text.to_string();
    padded.extend(fill.chars().cycle().take((target - len) as usize));
    padded
}

fn char_len(text: &str) -> f64 {
    text.chars().count() as f64
}

/// Build a complete comment block.
///
/// Lines are joined with `\n`; there is no trailing newline.
pub fn build(settings: &BlockSettings, ctx: &mut ResolutionContext<'_>) -> Result<String> {
    let lines = resolve_lines(settings, ctx)?;
    Ok(lines
        .iter()
        .map(LineSpec::render)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Run every pass up to, but not including, the per-line arithmetic.
pub fn resolve_lines(
    settings: &BlockSettings,
    ctx: &mut ResolutionContext<'_>,
) -> Result<Vec<LineSpec>> {
    let Expansion { settings, expanded } = expand(settings, ctx);
    let settings = normalize(&settings);
    // multi-line content keeps its indentation
    let trim = ctx.is_selection_single_line() && !expanded;

    let mut resolver = LineResolver {
        settings: &settings,
        longest: None,
    };
    let mut lines = (0..settings.line_count())
        .map(|line| resolver.line(ctx, line, trim))
        .collect::<Result<Vec<_>>>()?;

    let subjects: Vec<String> = lines.iter().map(|l| l.subject.clone()).collect();
    let justify: Vec<Justify> = lines.iter().map(|l| l.justify).collect();
    for (line, subject) in lines.iter_mut().zip(equalize_subjects(&subjects, &justify)) {
        line.subject = subject;
    }

    log::debug!("resolved {} block lines", lines.len());
    Ok(lines)
}

struct LineResolver<'s> {
    settings: &'s BlockSettings,
    /// Longest selected line, measured on first use.
    longest: Option<usize>,
}

impl LineResolver<'_> {
    fn line(&mut self, ctx: &mut ResolutionContext<'_>, line: usize, trim: bool) -> Result<LineSpec> {
        let settings = self.settings;

        let length = value(&settings.line_length, FieldName::LineLength, line)?;
        let width = self.width(length, ctx, line)?;
        let start_text = text(&settings.start_text, ctx, FieldName::StartText, line)?;
        let end_text = text(&settings.end_text, ctx, FieldName::EndText, line)?;

        let justify_text = text(&settings.justify, ctx, FieldName::Justify, line)?;
        let justify = justify_text.parse::<Justify>().map_err(|_| {
            CommentBlockError::invalid_setting(FieldName::Justify.key(), line, justify_text.clone())
        })?;

        let gap_left = number(&settings.gap_left, ctx, FieldName::GapLeft, line)?;
        let gap_right = number(&settings.gap_right, ctx, FieldName::GapRight, line)?;
        let pad = text(&settings.pad_lines, ctx, FieldName::PadLines, line)?;

        let mut subject = settings
            .subjects
            .get(line)
            .map(|subject| resolve(subject, ctx, line, FieldName::Subjects))
            .unwrap_or_default();
        if trim {
            subject = subject.trim().to_string();
        }
        if matches!(width, LineWidth::Minimum { .. }) {
            subject = subject.trim_end().to_string();
        }

        Ok(LineSpec {
            width,
            start_text,
            end_text,
            justify,
            gap_left,
            gap_right,
            pad,
            subject,
        })
    }

    fn width(
        &mut self,
        length: &LineLength,
        ctx: &mut ResolutionContext<'_>,
        line: usize,
    ) -> Result<LineWidth> {
        let resolved;
        let length = match length {
            LineLength::Placeholder(placeholder) => {
                let answer = resolve(placeholder, ctx, line, FieldName::LineLength);
                resolved = answer
                    .parse::<LineLength>()
                    .ok()
                    .filter(|parsed| !matches!(parsed, LineLength::Placeholder(_)))
                    .ok_or_else(|| {
                        CommentBlockError::invalid_setting(FieldName::LineLength.key(), line, answer.clone())
                    })?;
                &resolved
            }
            other => other,
        };

        Ok(match *length {
            LineLength::Columns(columns) => LineWidth::Fixed(columns - ctx.leading_width as f64),
            LineLength::Minimum { offset } => {
                let longest = *self.longest.get_or_insert_with(|| ctx.longest_line_width());
                LineWidth::Minimum { longest, offset }
            }
            LineLength::Placeholder(_) => LineWidth::Fixed(0.0),
        })
    }
}

fn value<'s, T: LineValue>(
    setting: &'s Setting<T>,
    field: FieldName,
    line: usize,
) -> Result<&'s T> {
    setting
        .get(line)
        .ok_or_else(|| CommentBlockError::config(format!("{} has no value for line {}", field, line)))
}

fn text(
    setting: &Setting<String>,
    ctx: &mut ResolutionContext<'_>,
    field: FieldName,
    line: usize,
) -> Result<String> {
    value(setting, field, line).map(|raw| resolve(raw, ctx, line, field))
}

fn number(
    setting: &Setting<Numeric>,
    ctx: &mut ResolutionContext<'_>,
    field: FieldName,
    line: usize,
) -> Result<f64> {
    match value(setting, field, line)? {
        Numeric::Value(n) => Ok(*n),
        Numeric::Placeholder(placeholder) => {
            let answer = resolve(placeholder, ctx, line, field);
            Numeric::parse_resolved(&answer)
                .ok_or_else(|| CommentBlockError::invalid_setting(field.key(), line, answer))
        }
    }
}
