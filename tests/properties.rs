//! Property tests over the parse, fold, aggregate and rank pipeline

use gitfame::authors::aggregate;
use gitfame::blame::parse_porcelain;
use gitfame::ranking::{compare, rank};
use gitfame::{AttributionMode, CommitLedger, Hunk, SortKey};
use proptest::prelude::*;
use std::cmp::Ordering;

const NAMES: [&str; 3] = ["Alice", "Bob", "Carol"];

/// (commit index, line count, file index)
type Group = (usize, usize, usize);

fn hash(commit: usize) -> String {
    format!("{:040x}", commit + 1)
}

fn name(commit: usize) -> &'static str {
    NAMES[commit % NAMES.len()]
}

fn file(index: usize) -> String {
    format!("pkg/file{}.go", index)
}

fn groups() -> impl Strategy<Value = Vec<Group>> {
    prop::collection::vec((0usize..6, 1usize..20, 0usize..4), 1..40)
}

fn fold_all(groups: &[Group]) -> CommitLedger {
    let mut ledger = CommitLedger::new();
    for &(commit, lines, file_index) in groups {
        ledger.fold(&Hunk::new(hash(commit), Some(name(commit).to_string()), lines), &file(file_index));
    }
    ledger
}

/// Porcelain text for `groups` all belonging to one file
///
/// Only the first group of each commit carries an `author ` line, and only
/// the first line of each group has a four-field header.
fn porcelain(groups: &[Group]) -> String {
    let mut seen = std::collections::HashSet::new();
    let mut text = String::new();
    let mut final_line = 1;

    for &(commit, lines, _) in groups {
        let h = hash(commit);
        text.push_str(&format!("{} {} {} {}\n", h, final_line, final_line, lines));
        if seen.insert(commit) {
            text.push_str(&format!("author {}\n", name(commit)));
            text.push_str("author-time 1700000000\n");
            text.push_str("summary change\n");
        }
        text.push_str("filename pkg/file.go\n");
        text.push_str("\tcontent\n");
        for offset in 1..lines {
            text.push_str(&format!("{} {} {}\n\tcontent\n", h, final_line + offset, final_line + offset));
        }
        final_line += lines;
    }

    text
}

/// Split porcelain text before the header line at boundary `pick`
///
/// Boundaries are the first line and every line following a content line.
fn split_at_header(text: &str, pick: usize) -> (String, String) {
    let lines: Vec<&str> = text.lines().collect();
    let boundaries: Vec<usize> = (0..lines.len())
        .filter(|&i| i == 0 || lines[i - 1].starts_with('\t'))
        .collect();
    let at = boundaries[pick % boundaries.len()];

    let head: String = lines[..at].iter().map(|l| format!("{}\n", l)).collect();
    let tail: String = lines[at..].iter().map(|l| format!("{}\n", l)).collect();
    (head, tail)
}

proptest! {
    #[test]
    fn prop_total_lines_is_sum_of_hunks(groups in groups()) {
        let ledger = fold_all(&groups);
        let expected: usize = groups.iter().map(|g| g.1).sum();
        prop_assert_eq!(ledger.total_lines(), expected);
    }

    #[test]
    fn prop_fold_order_does_not_matter(groups in groups()) {
        let mut reversed = groups.clone();
        reversed.reverse();
        prop_assert_eq!(fold_all(&groups), fold_all(&reversed));
    }

    #[test]
    fn prop_merge_matches_sequential_fold(groups in groups(), split in 0usize..40) {
        let split = split.min(groups.len());
        let (left, right) = groups.split_at(split);
        prop_assert_eq!(fold_all(left).merge(fold_all(right)), fold_all(&groups));
    }

    #[test]
    fn prop_aggregation_conserves_totals(groups in groups()) {
        let ledger = fold_all(&groups);
        let authors = aggregate(&ledger);

        let lines: usize = authors.values().map(|a| a.line_count).sum();
        let commits: usize = authors.values().map(|a| a.commit_count).sum();
        prop_assert_eq!(lines, ledger.total_lines());
        prop_assert_eq!(commits, ledger.len());

        for author in authors.values() {
            prop_assert!(author.file_count() <= 4);
            prop_assert!(author.file_count() >= 1);
        }
    }

    #[test]
    fn prop_ranking_is_a_total_order(groups in groups(), key_index in 0usize..3) {
        let key = SortKey::ALL[key_index];
        let authors = aggregate(&fold_all(&groups));
        let ranked = rank(&authors, key);

        prop_assert_eq!(ranked.len(), authors.len());
        for pair in ranked.windows(2) {
            prop_assert_eq!(compare(pair[0], pair[1], key), Ordering::Less);
            prop_assert_eq!(compare(pair[1], pair[0], key), Ordering::Greater);
        }
    }

    #[test]
    fn prop_ranking_is_deterministic(groups in groups()) {
        let mut reversed = groups.clone();
        reversed.reverse();

        let first = aggregate(&fold_all(&groups));
        let second = aggregate(&fold_all(&reversed));
        for key in SortKey::ALL {
            let a: Vec<&str> = rank(&first, key).iter().map(|r| r.name.as_str()).collect();
            let b: Vec<&str> = rank(&second, key).iter().map(|r| r.name.as_str()).collect();
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn prop_parsed_porcelain_matches_direct_fold(groups in groups()) {
        let text = porcelain(&groups);
        let records = parse_porcelain("pkg/file.go", &text, AttributionMode::ByAuthor).unwrap();

        let mut parsed = CommitLedger::new();
        parsed.apply_all(&records, "pkg/file.go");

        let same_file: Vec<Group> = groups.iter().map(|&(c, l, _)| (c, l, 0)).collect();
        let mut expected = CommitLedger::new();
        for &(commit, lines, _) in &same_file {
            expected.fold(&Hunk::new(hash(commit), Some(name(commit).to_string()), lines), "pkg/file.go");
        }

        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn prop_split_porcelain_matches_whole_text(groups in groups(), pick in 0usize..200) {
        let text = porcelain(&groups);
        let (head, tail) = split_at_header(&text, pick);

        let mut whole = CommitLedger::new();
        let records = parse_porcelain("pkg/file.go", &text, AttributionMode::ByAuthor).unwrap();
        whole.apply_all(&records, "pkg/file.go");

        let mut split = CommitLedger::new();
        for fragment in [&head, &tail] {
            let records = parse_porcelain("pkg/file.go", fragment, AttributionMode::ByAuthor).unwrap();
            split.apply_all(&records, "pkg/file.go");
        }

        prop_assert_eq!(split.total_lines(), whole.total_lines());
        prop_assert_eq!(split, whole);
    }
}
