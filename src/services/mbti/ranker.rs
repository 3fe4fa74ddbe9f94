use std::cmp::Ordering;

use super::types::MbtiColumn;
use crate::models::RankedEntry;

/// Maximum number of ranked rows returned per country.
pub const TOP_N: usize = 10;

/// Sorts one country's percentage-scale values descending and truncates to
/// the top 10, assigning dense ranks from 1. Missing values are excluded, so
/// the result can be shorter than 10; it never fabricates entries. Ties keep
/// the detected column order (stable sort).
pub fn top_rankings(columns: &[MbtiColumn], percents: &[Option<f64>]) -> Vec<RankedEntry> {
    let mut scored: Vec<(&MbtiColumn, f64)> = columns
        .iter()
        .zip(percents.iter())
        .filter_map(|(col, value)| value.map(|v| (col, v)))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(TOP_N);

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (col, percent))| RankedEntry {
            rank: (idx + 1) as u32,
            mbti: col.code.to_string(),
            percent,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mbti::types::KNOWN_TYPES;

    fn columns() -> Vec<MbtiColumn> {
        KNOWN_TYPES
            .iter()
            .copied()
            .map(|code| MbtiColumn { column: code.to_string(), code })
            .collect()
    }

    #[test]
    fn output_is_sorted_and_capped_at_ten() {
        let cols = columns();
        let percents: Vec<Option<f64>> = (0..16).map(|i| Some(i as f64)).collect();
        let ranked = top_rankings(&cols, &percents);

        assert_eq!(ranked.len(), TOP_N);
        assert_eq!(ranked[0].percent, 15.0);
        for pair in ranked.windows(2) {
            assert!(pair[0].percent >= pair[1].percent);
        }
    }

    #[test]
    fn ranks_are_dense_from_one() {
        let cols = columns();
        let percents: Vec<Option<f64>> = (0..16).map(|i| Some(i as f64)).collect();
        let ranked = top_rankings(&cols, &percents);
        let ranks: Vec<u32> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, (1..=10).collect::<Vec<u32>>());
    }

    #[test]
    fn missing_values_shrink_the_result() {
        let cols = columns();
        let mut percents = vec![None; 16];
        for (i, slot) in percents.iter_mut().take(6).enumerate() {
            *slot = Some(10.0 - i as f64);
        }
        let ranked = top_rankings(&cols, &percents);
        assert_eq!(ranked.len(), 6);
        assert_eq!(ranked.last().map(|e| e.rank), Some(6));
    }

    #[test]
    fn ties_keep_column_order() {
        let cols = columns();
        let mut percents = vec![None; 16];
        percents[0] = Some(5.0); // INTJ
        percents[1] = Some(5.0); // INTP
        percents[2] = Some(9.0); // ENTJ
        let ranked = top_rankings(&cols, &percents);
        let codes: Vec<&str> = ranked.iter().map(|e| e.mbti.as_str()).collect();
        assert_eq!(codes, vec!["ENTJ", "INTJ", "INTP"]);
    }

    #[test]
    fn all_missing_yields_empty() {
        let cols = columns();
        let percents = vec![None; 16];
        assert!(top_rankings(&cols, &percents).is_empty());
    }
}
