//! Grading-scale range overlap detection.
//!
//! Checked client-side only; the remote store does not enforce it.
use crate::draft::GradingRow;

/// Two score ranges overlap when each starts at or before the other ends.
pub fn rows_overlap(left: &GradingRow, right: &GradingRow) -> bool {
    left.min_score <= right.max_score && left.max_score >= right.min_score
}

/// All overlapping row pairs, as index pairs into `rows`.
pub fn find_overlaps(rows: &[&GradingRow]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for left in 0..rows.len() {
        for right in (left + 1)..rows.len() {
            if rows_overlap(rows[left], rows[right]) {
                pairs.push((left, right));
            }
        }
    }
    pairs
}

#[cfg(test)]
#[path = "grading_tests.rs"]
mod tests;
