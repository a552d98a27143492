//! Subject equalization.
//!
//! Consecutive lines with the same justification and a non-empty subject
//! form a group. Every subject in a group is padded with trailing spaces
//! to the group's widest subject, so the padding around the group lines up.

use crate::settings::Justify;

/// Pad grouped subjects to a common width. Lines outside any group, and
/// groups of a single line, are returned unchanged.
pub fn equalize_subjects(subjects: &[String], justify: &[Justify]) -> Vec<String> {
    let mut result = subjects.to_vec();

    for group in groups(subjects, justify) {
        let width = group
            .clone()
            .map(|line| subjects[line].chars().count())
            .max()
            .unwrap_or(0);
        for line in group {
            let missing = width - subjects[line].chars().count();
            result[line].extend(std::iter::repeat(' ').take(missing));
        }
    }
    result
}

/// Line ranges of every group with at least two members.
///
/// A line joins the group of a matching neighbour on either side, so a run
/// `left, left, left` is one group even though its middle line is the only
/// one with matching neighbours on both sides.
pub fn groups(subjects: &[String], justify: &[Justify]) -> Vec<std::ops::Range<usize>> {
    let lines = subjects.len().min(justify.len());
    let member = |line: usize| !subjects[line].is_empty();

    let mut groups = Vec::new();
    let mut start = 0;
    while start < lines {
        if !member(start) {
            start += 1;
            continue;
        }
        let mut end = start + 1;
        while end < lines && member(end) && justify[end] == justify[start] {
            end += 1;
        }
        if end - start > 1 {
            groups.push(start..end);
        }
        start = end;
    }
    groups
}
