use once_cell::sync::Lazy;
use std::collections::HashSet;

/// The 16 canonical MBTI type codes, in the conventional order.
pub const KNOWN_TYPES: [&str; 16] = [
    "INTJ", "INTP", "ENTJ", "ENTP", "INFJ", "INFP", "ENFJ", "ENFP",
    "ISTJ", "ISFJ", "ESTJ", "ESFJ", "ISTP", "ISFP", "ESTP", "ESFP",
];

/// Accepted names for the country-label column, lowercase.
pub static COUNTRY_SYNONYMS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["country", "nation", "location", "지역", "국가"].into_iter().collect());

/// One detected MBTI column: the header as it appears in the table plus the
/// canonical type code it was matched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MbtiColumn {
    pub column: String,
    pub code: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDetection {
    pub country_column: String,
    pub mbti_columns: Vec<MbtiColumn>,
}
