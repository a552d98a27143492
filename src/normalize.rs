//! Bring every per-line setting up to the block's line count.

use crate::settings::BlockSettings;

/// Normalize to as many lines as there are subjects.
pub fn normalize(settings: &BlockSettings) -> BlockSettings {
    normalize_to(settings, settings.line_count())
}

/// Normalize to at least `lines` lines.
///
/// Scalars become one-element lists; lists shorter than `lines` repeat
/// their last value. Subjects are the exception and grow with empty
/// strings. Longer lists are kept as they are.
pub fn normalize_to(settings: &BlockSettings, lines: usize) -> BlockSettings {
    let mut subjects = settings.subjects.clone();
    if subjects.len() < lines {
        subjects.resize(lines, String::new());
    }

    BlockSettings {
        select_current_line: settings.select_current_line,
        keep_indentation: settings.keep_indentation,
        line_length: settings.line_length.filled(lines),
        start_text: settings.start_text.filled(lines),
        end_text: settings.end_text.filled(lines),
        justify: settings.justify.filled(lines),
        gap_left: settings.gap_left.filled(lines),
        gap_right: settings.gap_right.filled(lines),
        pad_lines: settings.pad_lines.filled(lines),
        subjects,
    }
}
