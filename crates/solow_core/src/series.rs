//! Descriptive transforms of macroeconomic time series.
//!
//! Every transform produces a sequence aligned with the input periods. Entries that
//! are undefined (the first period of a lagged transform, the log of a non-positive
//! value, a zero denominator) are `None`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("series has {periods} periods but {values} values")]
    LengthMismatch { periods: usize, values: usize },

    #[error("series is empty")]
    Empty,

    #[error("observation {value} for period {period} is not finite")]
    NonFinite { period: String, value: f64 },

    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

/// An ordered series of observations labelled by period (e.g. "2019Q4").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    periods: Vec<String>,
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn new(periods: Vec<String>, values: Vec<f64>) -> Result<Self, SeriesError> {
        if periods.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                periods: periods.len(),
                values: values.len(),
            });
        }
        if values.is_empty() {
            return Err(SeriesError::Empty);
        }
        if let Some((period, &value)) = periods.iter().zip(&values).find(|(_, v)| !v.is_finite()) {
            return Err(SeriesError::NonFinite {
                period: period.clone(),
                value,
            });
        }
        Ok(Self { periods, values })
    }

    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn summary(&self) -> Summary {
        Summary::of(&self.values)
    }

    pub fn transforms(&self) -> SeriesTransforms {
        SeriesTransforms::compute(self)
    }
}

/// Location and spread of a series. `std_dev` is the sample standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    fn of(values: &[f64]) -> Self {
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            Some((ss / (count - 1) as f64).sqrt())
        } else {
            None
        };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            count,
            mean,
            std_dev,
            min,
            max,
        }
    }
}

/// The six derived sequences, each the same length as the source series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTransforms {
    pub periods: Vec<String>,
    /// x_t − x_{t−1}
    pub difference: Vec<Option<f64>>,
    /// 100 · (x_t / x_{t−1} − 1)
    pub percent_change: Vec<Option<f64>>,
    /// 100 · (ln x_t − ln x_{t−1})
    pub log_difference: Vec<Option<f64>>,
    /// 100 · x_t / x_0
    pub index: Vec<Option<f64>>,
    /// x_t − mean
    pub deviation_from_mean: Vec<Option<f64>>,
    /// (x_t − mean) / std_dev
    pub z_score: Vec<Option<f64>>,
}

impl SeriesTransforms {
    pub fn compute(series: &TimeSeries) -> Self {
        let values = &series.values;
        let summary = series.summary();

        let difference = lagged(values, |prev, cur| Some(cur - prev));
        let percent_change = lagged(values, |prev, cur| {
            (prev != 0.0).then(|| 100.0 * (cur / prev - 1.0))
        });
        let log_difference = lagged(values, |prev, cur| {
            (prev > 0.0 && cur > 0.0).then(|| 100.0 * (cur.ln() - prev.ln()))
        });

        let base = values[0];
        let index = values
            .iter()
            .map(|&v| (base != 0.0).then(|| 100.0 * v / base))
            .collect();
        let deviation_from_mean = values.iter().map(|&v| Some(v - summary.mean)).collect();
        let z_score = values
            .iter()
            .map(|&v| {
                summary
                    .std_dev
                    .filter(|sd| *sd > 0.0)
                    .map(|sd| (v - summary.mean) / sd)
            })
            .collect();

        Self {
            periods: series.periods.clone(),
            difference,
            percent_change,
            log_difference,
            index,
            deviation_from_mean,
            z_score,
        }
    }

    /// Transform names paired with their sequences, in a fixed order.
    pub fn named(&self) -> [(&'static str, &[Option<f64>]); 6] {
        [
            ("difference", self.difference.as_slice()),
            ("percent_change", self.percent_change.as_slice()),
            ("log_difference", self.log_difference.as_slice()),
            ("index", self.index.as_slice()),
            ("deviation_from_mean", self.deviation_from_mean.as_slice()),
            ("z_score", self.z_score.as_slice()),
        ]
    }
}

fn lagged(values: &[f64], f: impl Fn(f64, f64) -> Option<f64>) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    out.push(None);
    out.extend(values.windows(2).map(|w| f(w[0], w[1])));
    out
}

/// Series keyed by category name (e.g. one per expenditure component).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTable {
    categories: BTreeMap<String, TimeSeries>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces and returns any series already stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, series: TimeSeries) -> Option<TimeSeries> {
        self.categories.insert(name.into(), series)
    }

    pub fn get(&self, name: &str) -> Result<&TimeSeries, SeriesError> {
        self.categories
            .get(name)
            .ok_or_else(|| SeriesError::UnknownCategory(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn transforms(&self) -> BTreeMap<String, SeriesTransforms> {
        self.categories
            .iter()
            .map(|(name, series)| (name.clone(), series.transforms()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoryTable, SeriesError, TimeSeries};
    use approx::assert_relative_eq;

    fn series(values: &[f64]) -> TimeSeries {
        let periods = (0..values.len()).map(|i| format!("{}", 2000 + i)).collect();
        TimeSeries::new(periods, values.to_vec()).expect("series")
    }

    #[test]
    fn rejects_mismatched_or_empty_series() {
        assert_eq!(
            TimeSeries::new(vec!["2000".into()], vec![1.0, 2.0]),
            Err(SeriesError::LengthMismatch {
                periods: 1,
                values: 2
            })
        );
        assert_eq!(TimeSeries::new(vec![], vec![]), Err(SeriesError::Empty));
    }

    #[test]
    fn rejects_non_finite_observations() {
        let err = TimeSeries::new(vec!["2000".into(), "2001".into()], vec![1.0, f64::INFINITY])
            .expect_err("infinite value");
        assert_eq!(
            err,
            SeriesError::NonFinite {
                period: "2001".to_string(),
                value: f64::INFINITY
            }
        );

        let err = TimeSeries::new(vec!["2000".into(), "2001".into()], vec![f64::NAN, 1.0])
            .expect_err("nan value");
        assert!(matches!(err, SeriesError::NonFinite { ref period, .. } if period == "2000"));
    }

    #[test]
    fn transforms_are_aligned_with_periods() {
        let s = series(&[100.0, 110.0, 99.0, 120.0]);
        let t = s.transforms();
        for (name, values) in t.named() {
            assert_eq!(values.len(), 4, "{name}");
        }
        assert_eq!(t.periods, s.periods());
    }

    #[test]
    fn lagged_transforms() {
        let t = series(&[100.0, 110.0, 99.0]).transforms();
        assert_eq!(t.difference[0], None);
        assert_relative_eq!(t.difference[1].unwrap(), 10.0);
        assert_relative_eq!(t.difference[2].unwrap(), -11.0);
        assert_relative_eq!(t.percent_change[1].unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(t.percent_change[2].unwrap(), -10.0, epsilon = 1e-12);
        assert_relative_eq!(
            t.log_difference[1].unwrap(),
            100.0 * (1.1f64).ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn index_and_standardization() {
        let t = series(&[50.0, 100.0, 150.0]).transforms();
        assert_eq!(t.index, vec![Some(100.0), Some(200.0), Some(300.0)]);
        assert_eq!(
            t.deviation_from_mean,
            vec![Some(-50.0), Some(0.0), Some(50.0)]
        );
        assert_relative_eq!(t.z_score[0].unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(t.z_score[2].unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn undefined_entries_are_none() {
        let t = series(&[0.0, -1.0, 2.0]).transforms();
        assert_eq!(t.percent_change[1], None);
        assert_eq!(t.log_difference[2], None);
        assert!(t.index.iter().all(Option::is_none));

        let flat = series(&[3.0, 3.0]).transforms();
        assert!(flat.z_score.iter().all(Option::is_none));

        let single = series(&[3.0]);
        assert_eq!(single.summary().std_dev, None);
    }

    #[test]
    fn summary_statistics() {
        let summary = series(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).summary();
        assert_eq!(summary.count, 8);
        assert_relative_eq!(summary.mean, 5.0);
        assert_relative_eq!(summary.std_dev.unwrap(), (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
    }

    #[test]
    fn category_table_maps_names_to_series() {
        let mut table = CategoryTable::new();
        assert!(table.insert("consumption", series(&[1.0, 2.0])).is_none());
        table.insert("investment", series(&[4.0, 2.0]));

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.names().collect::<Vec<_>>(),
            vec!["consumption", "investment"]
        );
        assert_eq!(table.get("investment").unwrap().values(), &[4.0, 2.0]);
        assert_eq!(
            table.get("exports"),
            Err(SeriesError::UnknownCategory("exports".to_string()))
        );

        let all = table.transforms();
        assert_relative_eq!(all["investment"].percent_change[1].unwrap(), -50.0);
    }
}
