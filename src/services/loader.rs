use bytes::Bytes;
use moka::sync::Cache;
use polars::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::SumStats;
use crate::services::mbti::coerce::coerce_numeric;
use crate::services::mbti::detect_columns;
use crate::services::mbti::normalize::RowValues;
use crate::services::mbti::types::MbtiColumn;

/// Label substituted for a null country cell.
const UNKNOWN_LABEL: &str = "(Unknown)";

/// Identity of a dataset source: the content of the uploaded bytes, or the
/// sentinel for "use the default file".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DatasetKey {
    Default,
    Upload(u64),
}

/// A dataset after one-time derivation: MBTI columns coerced to `Float64`,
/// country column and MBTI columns detected. Never mutated afterwards.
#[derive(Debug)]
pub struct PreparedDataset {
    pub data: DataFrame,
    pub country_column: String,
    pub mbti_columns: Vec<MbtiColumn>,
}

impl PreparedDataset {
    pub fn from_frame(df: DataFrame) -> Result<Self, AppError> {
        let detection = detect_columns(&df)?;
        tracing::info!(
            "detected country column {:?} and {} MBTI columns",
            detection.country_column,
            detection.mbti_columns.len()
        );
        let data = coerce_numeric(&df, &detection.mbti_columns)?;
        Ok(Self {
            data,
            country_column: detection.country_column,
            mbti_columns: detection.mbti_columns,
        })
    }

    /// Country labels in sorted order, one per row, for selector population.
    pub fn countries(&self) -> Result<Vec<String>, AppError> {
        let series = self.data.column(&self.country_column)?;
        let mut labels = Vec::with_capacity(series.len());
        for idx in 0..series.len() {
            labels.push(label_of(series.get(idx)?));
        }
        labels.sort();
        Ok(labels)
    }

    /// First row whose country label equals `country` textually.
    pub fn find_country_row(&self, country: &str) -> Result<Option<usize>, AppError> {
        let series = self.data.column(&self.country_column)?;
        for idx in 0..series.len() {
            if label_of(series.get(idx)?) == country {
                return Ok(Some(idx));
            }
        }
        Ok(None)
    }

    /// The MBTI values of one row, in detected-column order.
    pub fn row_values(&self, row: usize) -> Result<RowValues, AppError> {
        self.mbti_columns
            .iter()
            .map(|col| {
                let series = self.data.column(&col.column)?;
                Ok(series.f64()?.get(row))
            })
            .collect()
    }

    /// Per-row sums of the type columns on the original scale.
    pub fn type_sum_stats(&self) -> Result<SumStats, AppError> {
        let mut sums = Vec::with_capacity(self.data.height());
        for row in 0..self.data.height() {
            let values = self.row_values(row)?;
            sums.push(values.iter().flatten().sum::<f64>());
        }
        Ok(SumStats::from_sums(&sums))
    }
}

fn label_of(value: AnyValue) -> String {
    match value {
        AnyValue::Null => UNKNOWN_LABEL.to_string(),
        AnyValue::String(v) => v.to_string(),
        AnyValue::StringOwned(v) => v.to_string(),
        other => other.to_string(),
    }
}

/// Process-wide memoization of prepared datasets, keyed by input identity.
/// Unbounded on purpose: the key space is one entry per distinct upload plus
/// the default file, and entries live for the process lifetime.
#[derive(Clone)]
pub struct DatasetCache {
    cache: Cache<DatasetKey, Arc<PreparedDataset>>,
    default_path: PathBuf,
}

impl DatasetCache {
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            cache: Cache::builder().build(),
            default_path: default_path.into(),
        }
    }

    /// Loads and prepares the dataset for the given upload, or for the
    /// default file when no upload is present. Failures are not cached.
    pub fn load(&self, upload: Option<&Bytes>) -> Result<Arc<PreparedDataset>, AppError> {
        let key = match upload {
            Some(bytes) => DatasetKey::Upload(content_hash(bytes)),
            None => DatasetKey::Default,
        };

        if let Some(prepared) = self.cache.get(&key) {
            tracing::debug!("dataset cache hit for {:?}", key);
            return Ok(prepared);
        }

        let df = match upload {
            Some(bytes) => read_csv_bytes(bytes)?,
            None => self.read_default_file()?,
        };
        let prepared = Arc::new(PreparedDataset::from_frame(df)?);
        self.cache.insert(key, prepared.clone());
        Ok(prepared)
    }

    fn read_default_file(&self) -> Result<DataFrame, AppError> {
        if !self.default_path.exists() {
            return Err(AppError::DataUnavailable(format!(
                "no CSV uploaded and {} was not found; upload a file or place it next to the server",
                self.default_path.display()
            )));
        }
        tracing::info!("loading default dataset from {}", self.default_path.display());
        let df = CsvReader::from_path(&self.default_path)?
            .has_header(true)
            .finish()?;
        validate_shape(df)
    }
}

fn read_csv_bytes(bytes: &Bytes) -> Result<DataFrame, AppError> {
    let cursor = Cursor::new(bytes.as_ref());
    let df = CsvReader::new(cursor)
        .has_header(true)
        .finish()
        .map_err(|e| AppError::InvalidInput(format!("failed to parse uploaded CSV: {}", e)))?;
    validate_shape(df)
}

fn validate_shape(df: DataFrame) -> Result<DataFrame, AppError> {
    if df.height() == 0 || df.width() == 0 {
        return Err(AppError::InvalidInput("CSV contains no data rows".to_string()));
    }
    Ok(df)
}

fn content_hash(bytes: &Bytes) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
Country,INTJ,INTP,ENTJ,ENTP,INFJ,INFP,ENFJ,ENFP,ISTJ,ISFJ,ESTJ,ESFJ,ISTP,ISFP,ESTP,ESFP
Korea,0.12,0.11,0.10,0.09,0.08,0.07,0.06,0.05,0.05,0.05,0.05,0.04,0.04,0.04,0.03,0.02
Japan,0.02,0.03,0.04,0.04,0.04,0.05,0.05,0.05,0.05,0.06,0.07,0.08,0.09,0.10,0.11,0.12
";

    #[test]
    fn missing_default_file_is_data_unavailable() {
        let cache = DatasetCache::new("definitely-not-here.csv");
        let err = cache.load(None).unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }

    #[test]
    fn upload_parses_and_prepares() {
        let cache = DatasetCache::new("definitely-not-here.csv");
        let body = Bytes::from_static(SAMPLE_CSV.as_bytes());
        let prepared = cache.load(Some(&body)).unwrap();
        assert_eq!(prepared.country_column, "Country");
        assert_eq!(prepared.mbti_columns.len(), 16);
        assert_eq!(prepared.countries().unwrap(), vec!["Japan", "Korea"]);
    }

    #[test]
    fn identical_uploads_hit_the_cache() {
        let cache = DatasetCache::new("definitely-not-here.csv");
        let body = Bytes::from_static(SAMPLE_CSV.as_bytes());
        let first = cache.load(Some(&body)).unwrap();
        let second = cache.load(Some(&body)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn default_file_loads_when_present() {
        let path = std::env::temp_dir().join(format!("mbti_loader_test_{}.csv", std::process::id()));
        std::fs::write(&path, SAMPLE_CSV).unwrap();

        let cache = DatasetCache::new(&path);
        let prepared = cache.load(None).unwrap();
        assert_eq!(prepared.data.height(), 2);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn country_lookup_and_row_values() {
        let cache = DatasetCache::new("definitely-not-here.csv");
        let body = Bytes::from_static(SAMPLE_CSV.as_bytes());
        let prepared = cache.load(Some(&body)).unwrap();

        let row = prepared.find_country_row("Korea").unwrap().unwrap();
        assert_eq!(row, 0);
        let values = prepared.row_values(row).unwrap();
        assert_eq!(values.len(), 16);
        assert_eq!(values[0], Some(0.12));

        assert!(prepared.find_country_row("Atlantis").unwrap().is_none());
    }

    #[test]
    fn sum_stats_cover_all_rows() {
        let cache = DatasetCache::new("definitely-not-here.csv");
        let body = Bytes::from_static(SAMPLE_CSV.as_bytes());
        let prepared = cache.load(Some(&body)).unwrap();

        let stats = prepared.type_sum_stats().unwrap();
        assert_eq!(stats.count, 2);
        assert!((stats.mean - 1.0).abs() < 1e-9);
    }
}
