//! Splits oversized diffs into bounded review units.

use std::num::NonZeroUsize;

use git_context_engine::ResolvedDiff;
use git_context_engine::unified::split_lines;

use super::ReviewUnit;

/// Turns resolved diffs into review units.
///
/// A diff with more than `max_lines` lines becomes consecutive chunks of at
/// most `max_lines` lines, numbered from 1 with the total attached. Shorter
/// diffs pass through whole. File order and chunk order are preserved.
pub fn split_large_diffs(diffs: &[ResolvedDiff], max_lines: NonZeroUsize) -> Vec<ReviewUnit> {
    let mut units = Vec::with_capacity(diffs.len());

    for diff in diffs {
        let lines = split_lines(diff.diff_text());
        if lines.len() <= max_lines.get() {
            units.push(ReviewUnit::whole(diff));
            continue;
        }

        let total = lines.len().div_ceil(max_lines.get());
        for (i, chunk) in lines.chunks(max_lines.get()).enumerate() {
            units.push(ReviewUnit {
                file_path: diff.display_path().to_string(),
                diff_text: chunk.join("\n"),
                is_binary: false,
                chunk_index: Some(i + 1),
                chunk_total: Some(total),
            });
        }
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: usize) -> NonZeroUsize {
        NonZeroUsize::new(v).unwrap()
    }

    fn diff_with_lines(path: &str, count: usize) -> ResolvedDiff {
        let text = (1..=count)
            .map(|i| format!("+line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        ResolvedDiff::server(Some(path.into()), Some(path.into()), text)
    }

    #[test]
    fn three_n_plus_one_lines_make_four_chunks() {
        let d = diff_with_lines("big.rs", 3 * 5 + 1);
        let units = split_large_diffs(std::slice::from_ref(&d), n(5));

        assert_eq!(units.len(), 4);
        let sizes: Vec<usize> = units.iter().map(|u| u.diff_text.lines().count()).collect();
        assert_eq!(sizes, vec![5, 5, 5, 1]);
        let idx: Vec<_> = units.iter().map(|u| u.chunk_index).collect();
        assert_eq!(idx, vec![Some(1), Some(2), Some(3), Some(4)]);
        assert!(units.iter().all(|u| u.chunk_total == Some(4)));

        let joined = units
            .iter()
            .map(|u| u.diff_text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(joined, d.diff_text());
    }

    #[test]
    fn diff_at_threshold_passes_through() {
        let d = diff_with_lines("ok.rs", 5);
        let units = split_large_diffs(&[d.clone()], n(5));
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].chunk_index, None);
        assert_eq!(units[0].chunk_total, None);
        assert_eq!(units[0].diff_text, d.diff_text());
    }

    #[test]
    fn order_is_preserved_and_deleted_files_use_old_path() {
        let deleted = ResolvedDiff::server(Some("gone.rs".into()), None, "-a\n-b\n-c".into());
        let binary = ResolvedDiff::binary(Some("logo.png".into()), Some("logo.png".into()));
        let units = split_large_diffs(&[deleted, binary, diff_with_lines("z.rs", 1)], n(2));

        let paths: Vec<_> = units
            .iter()
            .map(|u| (u.file_path.as_str(), u.chunk_index))
            .collect();
        assert_eq!(
            paths,
            vec![
                ("gone.rs", Some(1)),
                ("gone.rs", Some(2)),
                ("logo.png", None),
                ("z.rs", None),
            ]
        );
        assert!(units[2].is_binary);
        assert!(units[2].diff_text.is_empty());
    }
}
