use polars::prelude::*;
use std::collections::HashSet;

use super::types::{ColumnDetection, MbtiColumn, COUNTRY_SYNONYMS, KNOWN_TYPES};
use crate::error::AppError;

/// Identifies the country-label column and the ordered MBTI column list.
///
/// Country column: case-insensitive match against the known synonyms, falling
/// back to the first column. MBTI columns: exact case-insensitive matches
/// against the 16 type codes; the substring pass only runs when the exact
/// pass finds nothing. Result keeps table order, first occurrence wins.
pub fn detect_columns(df: &DataFrame) -> Result<ColumnDetection, AppError> {
    let names = df.get_column_names();
    let first = names
        .first()
        .ok_or_else(|| AppError::InvalidInput("table has no columns".to_string()))?;

    let country_column = names
        .iter()
        .find(|name| COUNTRY_SYNONYMS.contains(name.trim().to_lowercase().as_str()))
        .unwrap_or(first)
        .to_string();

    let mut matches: Vec<MbtiColumn> = names
        .iter()
        .filter_map(|name| {
            let upper = name.trim().to_uppercase();
            KNOWN_TYPES
                .iter()
                .copied()
                .find(|code| upper == *code)
                .map(|code| MbtiColumn { column: name.to_string(), code })
        })
        .collect();

    if matches.is_empty() {
        matches = names
            .iter()
            .filter_map(|name| {
                let upper = name.trim().to_uppercase();
                KNOWN_TYPES
                    .iter()
                    .copied()
                    .find(|code| upper.contains(*code))
                    .map(|code| MbtiColumn { column: name.to_string(), code })
            })
            .collect();
    }

    let mut seen = HashSet::new();
    matches.retain(|m| seen.insert(m.column.clone()));

    if matches.is_empty() {
        return Err(AppError::NoTypeColumnsFound(
            "no MBTI type columns recognized; check the CSV header names".to_string(),
        ));
    }

    tracing::debug!(
        "detected country column {:?} and {} MBTI columns",
        country_column,
        matches.len()
    );

    Ok(ColumnDetection { country_column, mbti_columns: matches })
}
