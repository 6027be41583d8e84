use ndarray::Array2;
use tracing::{debug, info};

use super::classifier::{ClassifierParams, FittedClassifier};
use super::scaler::StandardScaler;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{Dataset, FeatureMatrix, FeatureSchema};

/// Training report after model fit
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub samples: usize,
    pub accuracy: f64,
    pub successes_in_data: usize,
    pub failures_in_data: usize,
}

/// Fitted scaler and classifier, plus the column schema they were fitted on.
#[derive(Debug)]
struct TrainedModel {
    schema: FeatureSchema,
    scaler: StandardScaler,
    classifier: FittedClassifier,
}

impl TrainedModel {
    /// Apply the training-time scaling to `matrix`; never re-fits.
    fn scale(&self, matrix: &FeatureMatrix) -> PipelineResult<Array2<f64>> {
        if matrix.schema != self.schema {
            return Err(PipelineError::invalid_argument(format!(
                "feature columns {:?} do not match training columns {:?}",
                matrix.schema.columns(),
                self.schema.columns()
            )));
        }
        self.scaler.transform(&matrix.values)
    }
}

/// Success-probability model: scaler followed by classifier.
///
/// Starts untrained; `train` moves it to trained and may be called again to
/// replace both fitted components.
pub struct PredictiveModel {
    params: ClassifierParams,
    trained: Option<TrainedModel>,
}

impl PredictiveModel {
    pub fn new(params: ClassifierParams) -> Self {
        Self {
            params,
            trained: None,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.trained.is_some()
    }

    /// Fit the scaler on the feature columns, then the classifier on the scaled rows.
    pub fn train(&mut self, dataset: &Dataset) -> PipelineResult<TrainingReport> {
        let targets = dataset.targets().ok_or_else(|| {
            PipelineError::invalid_argument("training requires a labeled dataset")
        })?;
        if dataset.is_empty() {
            return Err(PipelineError::invalid_argument("training dataset is empty"));
        }

        let matrix = dataset.feature_matrix();
        let (scaler, scaled) = StandardScaler::fit_transform(&matrix.values)?;
        debug!(
            "Scaler fitted: means={:?}, stds={:?}",
            scaler.means().to_vec(),
            scaler.stds().to_vec()
        );

        let classifier = FittedClassifier::fit(&self.params, &scaled, &targets)?;

        let predicted = classifier.predict(&scaled);
        let correct = predicted
            .iter()
            .zip(targets.iter())
            .filter(|(p, t)| p == t)
            .count();
        let n = dataset.len();
        let accuracy = correct as f64 / n as f64;
        let successes = dataset.success_count();

        self.trained = Some(TrainedModel {
            schema: matrix.schema,
            scaler,
            classifier,
        });

        info!(
            "{} trained: {} samples, {:.1}% training accuracy, {}/{} successes",
            self.params.kind.display_name(),
            n,
            accuracy * 100.0,
            successes,
            n
        );

        Ok(TrainingReport {
            samples: n,
            accuracy,
            successes_in_data: successes,
            failures_in_data: n - successes,
        })
    }

    /// Class-1 probability for each row, in row order.
    pub fn predict_probabilities(&self, dataset: &Dataset) -> PipelineResult<Vec<f64>> {
        let model = self.require_trained()?;
        let scaled = model.scale(&dataset.feature_matrix())?;
        Ok(model.classifier.predict_proba(&scaled).to_vec())
    }

    pub fn predict_labels(&self, dataset: &Dataset) -> PipelineResult<Vec<u8>> {
        let model = self.require_trained()?;
        let scaled = model.scale(&dataset.feature_matrix())?;
        Ok(model
            .classifier
            .predict(&scaled)
            .iter()
            .map(|&c| if c == 1 { 1 } else { 0 })
            .collect())
    }

    fn require_trained(&self) -> PipelineResult<&TrainedModel> {
        self.trained
            .as_ref()
            .ok_or_else(|| PipelineError::invalid_state("model must be trained before predicting"))
    }
}
