use polars::prelude::*;
use rayon::prelude::*;

use super::types::MbtiColumn;
use crate::error::AppError;

/// Returns a derived copy of the frame where every detected MBTI column is
/// parsed to `Float64`. Cells that cannot be parsed (and non-finite parses)
/// become nulls rather than errors; other columns are left untouched.
pub fn coerce_numeric(df: &DataFrame, columns: &[MbtiColumn]) -> Result<DataFrame, AppError> {
    let coerced: Vec<Series> = columns
        .par_iter()
        .map(|col| df.column(&col.column).map(coerce_series))
        .collect::<PolarsResult<Vec<_>>>()?;

    let mut out = df.clone();
    for series in coerced {
        let name = series.name().to_string();
        out.replace(&name, series)?;
    }
    Ok(out)
}

fn coerce_series(series: &Series) -> Series {
    let parsed: Vec<Option<f64>> = (0..series.len())
        .map(|idx| match series.get(idx) {
            Ok(AnyValue::Float64(v)) => finite(v),
            Ok(AnyValue::Float32(v)) => finite(v as f64),
            Ok(AnyValue::Int64(v)) => Some(v as f64),
            Ok(AnyValue::Int32(v)) => Some(v as f64),
            Ok(AnyValue::Int16(v)) => Some(v as f64),
            Ok(AnyValue::Int8(v)) => Some(v as f64),
            Ok(AnyValue::UInt64(v)) => Some(v as f64),
            Ok(AnyValue::UInt32(v)) => Some(v as f64),
            Ok(AnyValue::UInt16(v)) => Some(v as f64),
            Ok(AnyValue::UInt8(v)) => Some(v as f64),
            Ok(AnyValue::String(v)) => parse_number(v),
            Ok(AnyValue::StringOwned(v)) => parse_number(&v),
            _ => None,
        })
        .collect();
    Series::new(series.name(), parsed)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().and_then(finite)
}

// NaN/inf count as missing, matching the dataframe semantics the callers
// expect from a lenient to-numeric pass.
fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
