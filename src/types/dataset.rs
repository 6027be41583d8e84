use ndarray::{Array1, Array2};

use super::draw::{Draw, DrawFeatures, FeatureSchema};
use crate::error::{PipelineError, PipelineResult};

/// Feature matrix tagged with the schema it was built from.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub schema: FeatureSchema,
    pub values: Array2<f64>,
}

/// Ordered, immutable collection of draws with an optional label column.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    draws: Vec<Draw>,
    labels: Option<Vec<u8>>,
}

impl Dataset {
    pub fn unlabeled(draws: Vec<Draw>) -> Self {
        Self { draws, labels: None }
    }

    pub fn labeled(draws: Vec<Draw>, labels: Vec<u8>) -> PipelineResult<Self> {
        if draws.len() != labels.len() {
            return Err(PipelineError::invalid_argument(format!(
                "label column has {} rows but dataset has {}",
                labels.len(),
                draws.len()
            )));
        }
        if let Some(bad) = labels.iter().find(|&&l| l > 1) {
            return Err(PipelineError::invalid_argument(format!(
                "labels must be 0 or 1, found {}",
                bad
            )));
        }
        Ok(Self {
            draws,
            labels: Some(labels),
        })
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn labels(&self) -> Option<&[u8]> {
        self.labels.as_deref()
    }

    /// Number of rows labelled 1 (zero for unlabeled datasets).
    pub fn success_count(&self) -> usize {
        self.labels()
            .map(|l| l.iter().filter(|&&v| v == 1).count())
            .unwrap_or(0)
    }

    pub fn success_rate(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.success_count() as f64 / self.len() as f64
    }

    /// Feature rows in `DrawFeatures` column order.
    pub fn feature_matrix(&self) -> FeatureMatrix {
        let schema = FeatureSchema::draw_numbers();
        let mut values = Array2::<f64>::zeros((self.len(), DrawFeatures::NUM_FEATURES));
        for (i, draw) in self.draws.iter().enumerate() {
            let arr = DrawFeatures::from(draw).to_array();
            for (j, &val) in arr.iter().enumerate() {
                values[[i, j]] = val;
            }
        }
        FeatureMatrix { schema, values }
    }

    /// Label column as class indices, `None` when the dataset is unlabeled.
    pub fn targets(&self) -> Option<Array1<usize>> {
        self.labels()
            .map(|l| l.iter().map(|&v| v as usize).collect())
    }
}

/// Evaluation dataset paired with one success probability per row.
#[derive(Debug, Clone)]
pub struct ScoredBatch {
    dataset: Dataset,
    probabilities: Vec<f64>,
}

impl ScoredBatch {
    pub fn new(dataset: Dataset, probabilities: Vec<f64>) -> PipelineResult<Self> {
        if dataset.len() != probabilities.len() {
            return Err(PipelineError::invalid_argument(format!(
                "{} probabilities for {} draws",
                probabilities.len(),
                dataset.len()
            )));
        }
        Ok(Self {
            dataset,
            probabilities,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }
}
