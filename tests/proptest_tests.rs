//! Property-based tests using proptest
//!
//! These tests check the layout and settings laws over arbitrary inputs.

use comment_blocks::equalize::equalize_subjects;
use comment_blocks::host::{Host, MemoryDocument};
use comment_blocks::layout::{pad_end, LineSpec, LineWidth};
use comment_blocks::normalize::normalize_to;
use comment_blocks::settings::{FieldName, Justify, LineLength, Numeric, Setting};
use comment_blocks::{resolve, BlockSettings, ResolutionContext};
use proptest::prelude::*;

fn delimiter() -> impl Strategy<Value = String> {
    prop::string::string_regex("[/*#<>-]{0,3}").unwrap()
}

fn justify() -> impl Strategy<Value = Justify> {
    prop_oneof![Just(Justify::Left), Just(Justify::Center), Just(Justify::Right)]
}

proptest! {
    /// Left and right lines are exactly as wide as asked whenever the
    /// content fits.
    #[test]
    fn test_left_right_width_invariant(
        start in delimiter(),
        end in delimiter(),
        subject in "[a-zA-Z0-9 ]{0,20}",
        gap_left in 0u32..4,
        gap_right in 0u32..4,
        pad in "[-=~*]{1,2}",
        right in any::<bool>(),
        extra in 0u32..40,
    ) {
        let content = start.chars().count() + end.chars().count() + subject.chars().count()
            + (gap_left + gap_right) as usize;
        let width = content + extra as usize;
        let line = LineSpec {
            width: LineWidth::Fixed(width as f64),
            start_text: start,
            end_text: end,
            justify: if right { Justify::Right } else { Justify::Left },
            gap_left: f64::from(gap_left),
            gap_right: f64::from(gap_right),
            pad,
            subject,
        };
        prop_assert_eq!(line.render().chars().count(), width);
    }

    /// Centered lines may be off by one when the halves do not split evenly.
    #[test]
    fn test_center_width_within_one(
        subject in "[a-zA-Z0-9]{1,20}",
        gap in 0u32..4,
        extra in 0u32..40,
    ) {
        let width = 4 + subject.chars().count() + 2 * gap as usize + extra as usize;
        let line = LineSpec {
            width: LineWidth::Fixed(width as f64),
            start_text: "/*".to_string(),
            end_text: "*/".to_string(),
            justify: Justify::Center,
            gap_left: f64::from(gap),
            gap_right: f64::from(gap),
            pad: "-".to_string(),
            subject,
        };
        let rendered = line.render().chars().count() as i64;
        prop_assert!((rendered - width as i64).abs() <= 1);
    }

    /// Text without `${` comes back untouched.
    #[test]
    fn test_resolve_fast_path(text in "[^$]{0,60}") {
        let doc = MemoryDocument::new("selected");
        let mut ctx = ResolutionContext::new(Host::new(&doc), doc.full_selection());
        let resolved = resolve(&text, &mut ctx, 0, FieldName::Subjects);
        prop_assert_eq!(resolved, text);
    }

    /// `pad_end` never truncates and never overshoots.
    #[test]
    fn test_pad_end_length(text in "[a-z]{0,10}", target in -5i64..30, fill in "[-=]{0,3}") {
        let padded = pad_end(&text, target, &fill);
        let len = padded.chars().count() as i64;
        prop_assert!(padded.starts_with(&text));
        if fill.is_empty() {
            prop_assert_eq!(len, text.chars().count() as i64);
        } else {
            prop_assert_eq!(len, target.max(text.chars().count() as i64));
        }
    }

    /// Normalizing twice is the same as normalizing once.
    #[test]
    fn test_normalize_idempotent(
        lines in 1usize..6,
        widths in prop::collection::vec(10u32..100, 1..4),
        subjects in prop::collection::vec("[a-z]{0,5}", 0..6),
    ) {
        let settings = BlockSettings {
            line_length: Setting::PerLine(
                widths.iter().map(|w| LineLength::Columns(f64::from(*w))).collect(),
            ),
            gap_left: Setting::Scalar(Numeric::Value(2.0)),
            subjects,
            ..Default::default()
        };
        let once = normalize_to(&settings, lines);
        let twice = normalize_to(&once, lines);
        prop_assert_eq!(once, twice);
    }

    /// Short lists repeat their last value; subjects grow with blanks.
    #[test]
    fn test_trailing_fill(value in "[a-z#/*]{1,4}", lines in 1usize..8) {
        let settings = BlockSettings {
            start_text: Setting::PerLine(vec![value.clone()]),
            subjects: vec!["x".to_string()],
            ..Default::default()
        };
        let normalized = normalize_to(&settings, lines);

        prop_assert_eq!(normalized.start_text, Setting::PerLine(vec![value; lines]));
        let mut expected = vec![String::new(); lines];
        expected[0] = "x".to_string();
        prop_assert_eq!(normalized.subjects, expected);
    }

    /// Equalizing keeps every subject as a prefix and never touches blanks.
    #[test]
    fn test_equalize_only_appends(
        lines in prop::collection::vec(("[a-z]{0,6}", justify()), 0..8),
    ) {
        let (subjects, justify): (Vec<String>, Vec<Justify>) = lines.into_iter().unzip();
        let equalized = equalize_subjects(&subjects, &justify);

        prop_assert_eq!(equalized.len(), subjects.len());
        for (before, after) in subjects.iter().zip(&equalized) {
            prop_assert!(after.starts_with(before.as_str()));
            prop_assert_eq!(after.trim_end(), before.trim_end());
            if before.is_empty() {
                prop_assert!(after.is_empty());
            }
        }
    }
}
