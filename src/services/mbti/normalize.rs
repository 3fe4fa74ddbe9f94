use smallvec::SmallVec;

/// One country's MBTI measurements in detected-column order; `None` marks a
/// value that failed numeric coercion.
pub type RowValues = SmallVec<[Option<f64>; 16]>;

// A row of proportions sums to ~1; the closed interval absorbs rounding in
// the source data. Anything outside it is treated as already percent-scaled.
const PROPORTION_SUM_MIN: f64 = 0.95;
const PROPORTION_SUM_MAX: f64 = 1.05;

/// Rescales one row to a 0-100 percentage basis.
///
/// Missing values are dropped for the sum but pass through the output
/// unchanged. A row with no values left, or whose sum falls outside the
/// proportion interval, is returned as-is; that includes degenerate sums far
/// from both 1 and 100 (rows with many missing entries), which stay unscaled.
pub fn to_percent(values: &[Option<f64>]) -> RowValues {
    let mut sum = 0.0;
    let mut present = 0usize;
    for v in values.iter().flatten() {
        sum += v;
        present += 1;
    }

    if present == 0 {
        return values.iter().copied().collect();
    }

    if (PROPORTION_SUM_MIN..=PROPORTION_SUM_MAX).contains(&sum) {
        values.iter().map(|v| v.map(|x| x * 100.0)).collect()
    } else {
        values.iter().copied().collect()
    }
}
