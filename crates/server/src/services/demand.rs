//! Demand regression model.
//!
//! A small decision-tree regressor over two features - product ID and
//! weather code - against units sold. Trained wholesale from the sales log;
//! never persisted. The feature space is tiny (a handful of products times
//! three weather codes), so an unpruned variance-reduction tree effectively
//! memorizes the per-cell mean, which is exactly the estimate the forecast
//! needs.

use chrono::{DateTime, Utc};
use thiserror::Error;

use raincheck_core::{ProductId, WeatherCategory};

use crate::models::SaleRecord;

/// Predicted quantity used when a fitted tree yields no usable value.
pub const FALLBACK_PREDICTION: u32 = 10;

/// Depth cap for the regression tree.
const MAX_DEPTH: usize = 12;

/// Nodes stop splitting below this many samples.
const MIN_SAMPLES_SPLIT: usize = 2;

/// Errors that can occur during training.
#[derive(Debug, Error)]
pub enum TrainError {
    /// The sales log was empty; the previous model (if any) stays active.
    #[error("no sales history to train on")]
    NoData,
}

/// One training sample: (product, weather code) -> quantity sold.
#[derive(Debug, Clone, Copy)]
pub struct SaleSample {
    pub product_id: i64,
    pub weather_code: u8,
    pub quantity: f64,
}

impl From<&SaleRecord> for SaleSample {
    fn from(record: &SaleRecord) -> Self {
        #[allow(clippy::cast_precision_loss)] // quantities are small
        let quantity = record.quantity_sold as f64;
        Self {
            product_id: record.product_id.as_i64(),
            weather_code: record.recorded_weather.code(),
            quantity,
        }
    }
}

/// In-sample or held-out fit quality.
#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    /// Mean absolute error in units.
    pub mae: f64,
    /// Coefficient of determination (1.0 = perfect).
    pub r2: f64,
}

/// A fitted demand model.
///
/// Immutable once fitted; shared behind an `Arc` and replaced wholesale by
/// retraining.
#[derive(Debug)]
pub struct DemandModel {
    tree: Node,
    /// When the model was fitted.
    pub trained_at: DateTime<Utc>,
    /// Number of samples the fit consumed.
    pub sample_count: usize,
    /// In-sample fit quality.
    pub metrics: Metrics,
}

impl DemandModel {
    /// Fit a model from sale samples.
    ///
    /// # Errors
    ///
    /// Returns `TrainError::NoData` when `samples` is empty.
    pub fn fit(samples: &[SaleSample]) -> Result<Self, TrainError> {
        if samples.is_empty() {
            return Err(TrainError::NoData);
        }

        let rows: Vec<[f64; 2]> = samples.iter().map(features).collect();
        let targets: Vec<f64> = samples.iter().map(|s| s.quantity).collect();
        let indices: Vec<usize> = (0..rows.len()).collect();

        let tree = grow(&rows, &targets, &indices, 0);
        let metrics = score(&tree, &rows, &targets);

        Ok(Self {
            tree,
            trained_at: Utc::now(),
            sample_count: samples.len(),
            metrics,
        })
    }

    /// Predict units sold for a product under a weather category.
    ///
    /// Clamped non-negative and rounded to whole units. Falls back to
    /// [`FALLBACK_PREDICTION`] if the tree yields a non-finite value, so a
    /// loaded model never fails a forecast day.
    #[must_use]
    pub fn predict(&self, product: ProductId, category: WeatherCategory) -> u32 {
        #[allow(clippy::cast_precision_loss)] // row IDs are small
        let row = [product.as_i64() as f64, f64::from(category.code())];
        let raw = self.tree.predict(&row);

        if !raw.is_finite() {
            return FALLBACK_PREDICTION;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let quantity = raw.round().max(0.0) as u32;
        quantity
    }

    /// Evaluate the model against (held-out) samples.
    #[must_use]
    pub fn evaluate(&self, samples: &[SaleSample]) -> Metrics {
        let rows: Vec<[f64; 2]> = samples.iter().map(features).collect();
        let targets: Vec<f64> = samples.iter().map(|s| s.quantity).collect();
        score(&self.tree, &rows, &targets)
    }
}

fn features(sample: &SaleSample) -> [f64; 2] {
    #[allow(clippy::cast_precision_loss)] // row IDs are small
    [sample.product_id as f64, f64::from(sample.weather_code)]
}

// =============================================================================
// Regression tree
// =============================================================================

/// A fitted tree node.
#[derive(Debug)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, row: &[f64; 2]) -> f64 {
        match self {
            Self::Leaf(value) => *value,
            Self::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let value = if *feature == 0 { row[0] } else { row[1] };
                if value <= *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }
}

/// Grow a tree over the given sample indices by recursive variance
/// reduction. `indices` is never empty.
fn grow(rows: &[[f64; 2]], targets: &[f64], indices: &[usize], depth: usize) -> Node {
    let node_mean = mean(targets, indices);

    if depth >= MAX_DEPTH || indices.len() < MIN_SAMPLES_SPLIT {
        return Node::Leaf(node_mean);
    }

    let Some((feature, threshold)) = best_split(rows, targets, indices) else {
        return Node::Leaf(node_mean);
    };

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .partition(|&&i| feature_value(rows, i, feature) <= threshold);

    // A valid split always separates at least one sample to each side.
    Node::Split {
        feature,
        threshold,
        left: Box::new(grow(rows, targets, &left, depth + 1)),
        right: Box::new(grow(rows, targets, &right, depth + 1)),
    }
}

/// The split minimizing summed squared error, or `None` when no split
/// improves on the current node.
fn best_split(rows: &[[f64; 2]], targets: &[f64], indices: &[usize]) -> Option<(usize, f64)> {
    let parent_sse = sse(targets, indices);
    let mut best: Option<(usize, f64, f64)> = None;

    for feature in 0..2 {
        let mut values: Vec<f64> = indices
            .iter()
            .map(|&i| feature_value(rows, i, feature))
            .collect();
        values.sort_by(f64::total_cmp);
        values.dedup();

        for pair in values.windows(2) {
            let &[low, high] = pair else { continue };
            let threshold = (low + high) / 2.0;
            let (left, right): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .partition(|&&i| feature_value(rows, i, feature) <= threshold);
            if left.is_empty() || right.is_empty() {
                continue;
            }

            let split_sse = sse(targets, &left) + sse(targets, &right);
            if split_sse + f64::EPSILON < parent_sse
                && best.is_none_or(|(_, _, best_sse)| split_sse < best_sse)
            {
                best = Some((feature, threshold, split_sse));
            }
        }
    }

    best.map(|(feature, threshold, _)| (feature, threshold))
}

fn feature_value(rows: &[[f64; 2]], index: usize, feature: usize) -> f64 {
    rows.get(index).map_or(f64::NAN, |row| {
        if feature == 0 { row[0] } else { row[1] }
    })
}

fn mean(targets: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    let sum: f64 = indices.iter().filter_map(|&i| targets.get(i)).sum();
    #[allow(clippy::cast_precision_loss)]
    let count = indices.len() as f64;
    sum / count
}

/// Summed squared error of the node around its mean.
fn sse(targets: &[f64], indices: &[usize]) -> f64 {
    let node_mean = mean(targets, indices);
    indices
        .iter()
        .filter_map(|&i| targets.get(i))
        .map(|&t| (t - node_mean).powi(2))
        .sum()
}

fn score(tree: &Node, rows: &[[f64; 2]], targets: &[f64]) -> Metrics {
    if rows.is_empty() {
        return Metrics { mae: 0.0, r2: 1.0 };
    }

    let predictions: Vec<f64> = rows.iter().map(|row| tree.predict(row)).collect();

    let abs_sum: f64 = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t).abs())
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let n = rows.len() as f64;
    let mae = abs_sum / n;

    let target_mean: f64 = targets.iter().sum::<f64>() / n;
    let ss_tot: f64 = targets.iter().map(|t| (t - target_mean).powi(2)).sum();
    let ss_res: f64 = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (t - p).powi(2))
        .sum();

    // A constant target is fit perfectly by the root mean.
    let r2 = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

    Metrics { mae, r2 }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample(product_id: i64, category: WeatherCategory, quantity: f64) -> SaleSample {
        SaleSample {
            product_id,
            weather_code: category.code(),
            quantity,
        }
    }

    /// Two products with opposite weather sensitivity, like the seeded
    /// history: cold drinks sell on clear days, warm food sells in rain.
    fn seeded_history() -> Vec<SaleSample> {
        let mut samples = Vec::new();
        for _ in 0..10 {
            samples.push(sample(1, WeatherCategory::Clear, 50.0));
            samples.push(sample(1, WeatherCategory::Rain, 10.0));
            samples.push(sample(1, WeatherCategory::Cloudy, 22.0));
            samples.push(sample(2, WeatherCategory::Clear, 12.0));
            samples.push(sample(2, WeatherCategory::Rain, 45.0));
            samples.push(sample(2, WeatherCategory::Cloudy, 20.0));
        }
        samples
    }

    #[test]
    fn test_fit_empty_history_fails() {
        let err = DemandModel::fit(&[]).unwrap_err();
        assert!(matches!(err, TrainError::NoData));
    }

    #[test]
    fn test_fit_recovers_weather_conditioned_pattern() {
        let model = DemandModel::fit(&seeded_history()).unwrap();

        assert_eq!(model.predict(ProductId::new(1), WeatherCategory::Clear), 50);
        assert_eq!(model.predict(ProductId::new(1), WeatherCategory::Rain), 10);
        assert_eq!(model.predict(ProductId::new(2), WeatherCategory::Rain), 45);
        assert_eq!(model.predict(ProductId::new(2), WeatherCategory::Clear), 12);
    }

    #[test]
    fn test_fit_on_noiseless_data_scores_perfectly() {
        let model = DemandModel::fit(&seeded_history()).unwrap();
        assert!(model.metrics.mae < 1e-9);
        assert!(model.metrics.r2 > 0.999);
        assert_eq!(model.sample_count, 60);
    }

    #[test]
    fn test_single_sample_predicts_its_quantity() {
        let model = DemandModel::fit(&[sample(3, WeatherCategory::Cloudy, 40.0)]).unwrap();
        assert_eq!(model.predict(ProductId::new(3), WeatherCategory::Cloudy), 40);
        // An unseen product still gets the only value the tree knows.
        assert_eq!(model.predict(ProductId::new(9), WeatherCategory::Clear), 40);
    }

    #[test]
    fn test_prediction_is_never_negative() {
        let samples = vec![
            sample(1, WeatherCategory::Clear, 0.0),
            sample(1, WeatherCategory::Rain, 0.0),
        ];
        let model = DemandModel::fit(&samples).unwrap();
        assert_eq!(model.predict(ProductId::new(1), WeatherCategory::Rain), 0);
    }

    #[test]
    fn test_noisy_cell_predicts_cell_mean() {
        let samples = vec![
            sample(1, WeatherCategory::Rain, 30.0),
            sample(1, WeatherCategory::Rain, 50.0),
            sample(1, WeatherCategory::Clear, 10.0),
        ];
        let model = DemandModel::fit(&samples).unwrap();
        assert_eq!(model.predict(ProductId::new(1), WeatherCategory::Rain), 40);
    }

    #[test]
    fn test_evaluate_held_out() {
        let model = DemandModel::fit(&seeded_history()).unwrap();
        let held_out = vec![
            sample(1, WeatherCategory::Clear, 48.0),
            sample(2, WeatherCategory::Rain, 47.0),
        ];
        let metrics = model.evaluate(&held_out);
        assert!(metrics.mae <= 2.0);
    }

    #[test]
    fn test_sample_from_record() {
        use chrono::NaiveDate;
        use raincheck_core::{MerchantId, SaleId};

        let record = SaleRecord {
            id: SaleId::new(1),
            merchant_id: MerchantId::new("m-1"),
            product_id: ProductId::new(4),
            quantity_sold: 17,
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            recorded_weather: WeatherCategory::Rain,
        };

        let s = SaleSample::from(&record);
        assert_eq!(s.product_id, 4);
        assert_eq!(s.weather_code, 2);
        assert!((s.quantity - 17.0).abs() < f64::EPSILON);
    }
}
