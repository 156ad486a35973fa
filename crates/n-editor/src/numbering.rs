//! Outline numbering.
//!
//! The outline is a flat sequence of levels; section numbers fall out of a
//! single scan with one counter per level:
//!
//! ```text
//! levels   0    1      1      0    1      2
//! numbers  1    1.1    1.2    2    2.1    2.1.1
//! ```
//!
//! For an item at level `L`, every counter deeper than `L` is reset, counter
//! `L` is bumped, and the number is counters `0..=L` joined with dots. A level
//! that jumps more than one step deeper than its predecessor yields zero
//! components in between (`0` followed by `2` gives `"2.0.1"`), exactly what
//! the scan produces.

use std::fmt::Write;

/// Deepest allowed level. Level 0 is the top.
pub const MAX_LEVEL: usize = 10;

/// Number of per-level counters.
pub const LEVEL_COUNT: usize = MAX_LEVEL + 1;

/// Clamp a level into `0..=MAX_LEVEL`.
#[inline]
#[must_use]
pub const fn clamp_level(level: usize) -> usize {
    if level > MAX_LEVEL { MAX_LEVEL } else { level }
}

/// Compute section numbers for a sequence of levels.
///
/// Levels above [`MAX_LEVEL`] are treated as `MAX_LEVEL`.
#[must_use]
pub fn renumber(levels: &[usize]) -> Vec<String> {
    let mut counters = [0usize; LEVEL_COUNT];
    levels
        .iter()
        .map(|&level| {
            let level = clamp_level(level);
            counters[level + 1..].fill(0);
            counters[level] += 1;
            join(&counters[..=level])
        })
        .collect()
}

fn join(parts: &[usize]) -> String {
    let mut out = String::with_capacity(parts.len() * 2);
    for (i, n) in parts.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        let _ = write!(out, "{n}");
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn numbers(levels: &[usize]) -> Vec<String> {
        renumber(levels)
    }

    // -- Fixed sequences ----------------------------------------------------

    #[test]
    fn empty_sequence() {
        assert!(numbers(&[]).is_empty());
    }

    #[test]
    fn flat_list() {
        assert_eq!(numbers(&[0, 0, 0]), vec!["1", "2", "3"]);
    }

    #[test]
    fn two_level_outline() {
        assert_eq!(
            numbers(&[0, 1, 1, 0, 1]),
            vec!["1", "1.1", "1.2", "2", "2.1"]
        );
    }

    #[test]
    fn deeper_counters_reset_on_shallower_item() {
        assert_eq!(
            numbers(&[0, 1, 2, 2, 1, 2]),
            vec!["1", "1.1", "1.1.1", "1.1.2", "1.2", "1.2.1"]
        );
    }

    #[test]
    fn skipped_level_yields_zero_component() {
        assert_eq!(numbers(&[0, 2]), vec!["1", "1.0.1"]);
    }

    #[test]
    fn leading_nested_item() {
        assert_eq!(numbers(&[1, 1, 0]), vec!["0.1", "0.2", "1"]);
    }

    #[test]
    fn max_level_item() {
        let got = numbers(&[MAX_LEVEL]);
        assert_eq!(got[0], "0.0.0.0.0.0.0.0.0.0.1");
    }

    #[test]
    fn over_deep_level_is_clamped() {
        assert_eq!(numbers(&[MAX_LEVEL + 3]), numbers(&[MAX_LEVEL]));
    }

    #[test]
    fn clamp_level_bounds() {
        assert_eq!(clamp_level(0), 0);
        assert_eq!(clamp_level(MAX_LEVEL), MAX_LEVEL);
        assert_eq!(clamp_level(usize::MAX), MAX_LEVEL);
    }

    // -- Properties ---------------------------------------------------------

    proptest! {
        #[test]
        fn component_count_is_level_plus_one(levels in prop::collection::vec(0..=MAX_LEVEL, 0..64)) {
            let got = renumber(&levels);
            prop_assert_eq!(got.len(), levels.len());
            for (number, level) in got.iter().zip(&levels) {
                prop_assert_eq!(number.split('.').count(), level + 1);
            }
        }

        #[test]
        fn last_component_counts_siblings(levels in prop::collection::vec(0..=MAX_LEVEL, 1..64)) {
            let got = renumber(&levels);
            for (i, &level) in levels.iter().enumerate() {
                // Items at this level since the last shallower item, inclusive.
                let run = levels[..=i]
                    .iter()
                    .rev()
                    .take_while(|&&l| l >= level)
                    .filter(|&&l| l == level)
                    .count();
                let last: usize = got[i].rsplit('.').next().unwrap().parse().unwrap();
                prop_assert_eq!(last, run);
            }
        }
    }
}
