//! Shape a DetailSet into a categorical comparison chart: one category per entry (in
//! fetch order) and one series per compared numeric field.

use crate::model::DetailSet;

pub const OBSERVED_SERIES: &str = "llik(implied)";
pub const MODEL_SERIES: &str = "llik(model)";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    /// One value per category.
    pub values: Vec<f64>,
}

impl ChartSeries {
    /// Points with the category index as x, skipping non-finite values.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, y)| y.is_finite())
            .map(|(x, y)| (x as f64, *y))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComparisonChart {
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ComparisonChart {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Min and max over all finite values, padded when flat so the axis has height.
    pub fn y_bounds(&self) -> [f64; 2] {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for y in self.series.iter().flat_map(|s| s.values.iter()) {
            if y.is_finite() {
                lo = lo.min(*y);
                hi = hi.max(*y);
            }
        }
        if !lo.is_finite() {
            return [0.0, 1.0];
        }
        if (hi - lo).abs() < f64::EPSILON {
            return [lo - 1.0, hi + 1.0];
        }
        [lo, hi]
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [0.0, self.categories.len().saturating_sub(1).max(1) as f64]
    }
}

/// Observed vs model-implied values across the entries of one DetailSet.
pub fn comparison_chart(detail: &DetailSet) -> ComparisonChart {
    ComparisonChart {
        categories: detail.iter().map(|e| e.label.clone()).collect(),
        series: vec![
            ChartSeries {
                name: OBSERVED_SERIES.to_string(),
                values: detail.iter().map(|e| e.observed).collect(),
            },
            ChartSeries {
                name: MODEL_SERIES.to_string(),
                values: detail.iter().map(|e| e.model).collect(),
            },
        ],
    }
}
