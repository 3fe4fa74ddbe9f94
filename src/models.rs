use serde::Serialize;

/// One row of the ranked output: dense rank starting at 1, canonical type
/// code, percentage-scale value. Callers display the percent to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: u32,
    pub mbti: String,
    pub percent: f64,
}

/// Data shaped for a horizontal bar chart: category axis in descending-value
/// order, value axis in percent, one text label per bar.
#[derive(Debug, Clone, Serialize)]
pub struct BarChartSpec {
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    pub labels: Vec<String>,
}

impl BarChartSpec {
    pub fn from_entries(entries: &[RankedEntry]) -> Self {
        Self {
            categories: entries.iter().map(|e| e.mbti.clone()).collect(),
            values: entries.iter().map(|e| e.percent).collect(),
            labels: entries.iter().map(|e| format!("{:.2}", e.percent)).collect(),
        }
    }
}

/// Summary statistics over the per-country sums of the 16 type columns, on
/// the original scale. Diagnostic output for eyeballing whether a dataset is
/// proportion- or percentage-encoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SumStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl SumStats {
    pub fn from_sums(sums: &[f64]) -> Self {
        let count = sums.len();
        if count == 0 {
            return Self { count: 0, mean: 0.0, std: 0.0, min: 0.0, max: 0.0 };
        }

        let mean = sums.iter().sum::<f64>() / count as f64;
        // Sample variance; a single row has no spread.
        let std = if count < 2 {
            0.0
        } else {
            let variance = sums
                .iter()
                .map(|v| {
                    let diff = v - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (count as f64 - 1.0);
            variance.sqrt()
        };
        let min = sums.iter().copied().fold(f64::INFINITY, f64::min);
        let max = sums.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self { count, mean, std, min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_labels_use_two_decimals() {
        let entries = vec![
            RankedEntry { rank: 1, mbti: "INTJ".to_string(), percent: 12.0 },
            RankedEntry { rank: 2, mbti: "ENFP".to_string(), percent: 9.456 },
        ];
        let chart = BarChartSpec::from_entries(&entries);
        assert_eq!(chart.categories, vec!["INTJ", "ENFP"]);
        assert_eq!(chart.values, vec![12.0, 9.456]);
        assert_eq!(chart.labels, vec!["12.00", "9.46"]);
    }

    #[test]
    fn sum_stats_match_hand_computed_fixture() {
        let stats = SumStats::from_sums(&[1.0, 2.0, 3.0]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.std, 1.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
    }

    #[test]
    fn sum_stats_degenerate_inputs() {
        let one = SumStats::from_sums(&[4.0]);
        assert_eq!(one.std, 0.0);
        assert_eq!(one.mean, 4.0);

        let none = SumStats::from_sums(&[]);
        assert_eq!(none.count, 0);
        assert_eq!(none.mean, 0.0);
    }
}
