use rand::seq::SliceRandom;
use tracing::debug;

use super::SeriesGenerator;
use crate::error::{PipelineError, PipelineResult};
use crate::types::Dataset;

/// Default share of training rows labelled as a success.
pub const DEFAULT_SUCCESS_RATE: f64 = 0.1;

/// Turns generated draws into training and evaluation datasets.
pub struct DatasetBuilder {
    generator: SeriesGenerator,
}

impl DatasetBuilder {
    pub fn new(generator: SeriesGenerator) -> Self {
        Self { generator }
    }

    pub fn seed(&self) -> Option<u64> {
        self.generator.seed()
    }

    /// Unlabeled dataset of `count` fresh draws.
    pub fn build_plain(&mut self, count: usize) -> PipelineResult<Dataset> {
        let draws = self.generator.generate_draws(count)?;
        Ok(Dataset::unlabeled(draws))
    }

    /// Dataset of `count` draws with exactly `round(count * success_rate)` ones.
    ///
    /// Halves round away from zero: 5 rows at 0.5 get 3 ones.
    ///
    /// The ones are shuffled across rows with the generator's random source and
    /// carry no relation to the draw values.
    pub fn build_labeled(&mut self, count: usize, success_rate: f64) -> PipelineResult<Dataset> {
        if !(0.0..=1.0).contains(&success_rate) {
            return Err(PipelineError::invalid_argument(format!(
                "success_rate must be within [0, 1], got {}",
                success_rate
            )));
        }
        let draws = self.generator.generate_draws(count)?;

        let successes = success_count(count, success_rate);
        let mut labels = vec![1u8; successes];
        labels.resize(count, 0);
        labels.shuffle(self.generator.rng_mut());

        debug!("Labeled dataset: {} rows, {} successes", count, successes);
        Dataset::labeled(draws, labels)
    }
}

fn success_count(count: usize, success_rate: f64) -> usize {
    ((count as f64 * success_rate).round() as usize).min(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(seed: u64) -> DatasetBuilder {
        DatasetBuilder::new(SeriesGenerator::new(Some(seed)))
    }

    #[test]
    fn test_build_labeled_has_exact_success_count() {
        let ds = builder(123).build_labeled(1000, DEFAULT_SUCCESS_RATE).unwrap();
        assert_eq!(ds.len(), 1000);
        assert_eq!(ds.success_count(), 100);
        let zeros = ds.labels().unwrap().iter().filter(|&&l| l == 0).count();
        assert_eq!(zeros, 900);
    }

    #[test]
    fn test_label_placement_is_shuffled() {
        let ds = builder(123).build_labeled(1000, DEFAULT_SUCCESS_RATE).unwrap();
        let labels = ds.labels().unwrap();
        // an unshuffled column would start with the 100 ones
        assert!(labels[..100].iter().any(|&l| l == 0));
    }

    #[test]
    fn test_success_count_rounds() {
        assert_eq!(success_count(15, 0.1), 2);
        assert_eq!(success_count(14, 0.1), 1);
        assert_eq!(success_count(4, 0.1), 0);
        assert_eq!(success_count(10, 1.0), 10);
        assert_eq!(success_count(5, 0.5), 3);
        assert_eq!(success_count(25, 0.1), 3);
    }

    #[test]
    fn test_degenerate_rates_are_legal() {
        let all_zero = builder(1).build_labeled(4, 0.1).unwrap();
        assert_eq!(all_zero.success_count(), 0);
        let all_one = builder(1).build_labeled(20, 1.0).unwrap();
        assert_eq!(all_one.success_count(), 20);
    }

    #[test]
    fn test_rejects_out_of_range_rate() {
        let err = builder(1).build_labeled(10, 1.5).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidArgument(_)));
        assert!(builder(1).build_labeled(10, -0.1).is_err());
    }

    #[test]
    fn test_build_plain_has_no_labels() {
        let ds = builder(5).build_plain(100).unwrap();
        assert_eq!(ds.len(), 100);
        assert!(ds.labels().is_none());
        assert_eq!(ds.success_count(), 0);
    }

    #[test]
    fn test_seeded_builders_agree() {
        let a = builder(42).build_labeled(300, 0.2).unwrap();
        let b = builder(42).build_labeled(300, 0.2).unwrap();
        assert_eq!(a, b);
    }
}
