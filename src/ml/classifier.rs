use linfa::prelude::*;
use linfa::Dataset as LinfaDataset;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use super::tree::DecisionTree;
use crate::error::{PipelineError, PipelineResult};

/// Classifier backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    RandomForest,
    LogisticRegression,
}

impl ClassifierKind {
    pub fn as_str(&self) -> &str {
        match self {
            ClassifierKind::RandomForest => "random_forest",
            ClassifierKind::LogisticRegression => "logistic_regression",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ClassifierKind::RandomForest => "RandomForestClassifier",
            ClassifierKind::LogisticRegression => "LogisticRegression",
        }
    }
}

impl FromStr for ClassifierKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random_forest" => Ok(ClassifierKind::RandomForest),
            "logistic_regression" => Ok(ClassifierKind::LogisticRegression),
            _ => Err(PipelineError::invalid_argument(format!(
                "Unknown classifier: {}",
                s
            ))),
        }
    }
}

/// Hyperparameters for every backend; each backend reads the ones it uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    #[serde(rename = "classifier")]
    pub kind: ClassifierKind,
    /// Trees in the forest.
    pub n_estimators: usize,
    /// Seed for bootstrap sampling.
    pub random_state: u64,
    pub max_depth: Option<usize>,
    /// Optimizer iterations for logistic regression.
    pub max_iterations: u64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            kind: ClassifierKind::RandomForest,
            n_estimators: 100,
            random_state: 42,
            max_depth: None,
            max_iterations: 100,
        }
    }
}

/// A fitted classifier over already-scaled features.
#[derive(Debug)]
pub enum FittedClassifier {
    Forest(RandomForest),
    Logistic(LogisticClassifier),
    /// Training data held a single class; predicts it with certainty.
    Constant { success: bool },
}

impl FittedClassifier {
    /// Fit the configured backend. `targets` holds class indices 0 and 1.
    pub fn fit(
        params: &ClassifierParams,
        features: &Array2<f64>,
        targets: &Array1<usize>,
    ) -> PipelineResult<Self> {
        if features.nrows() != targets.len() {
            return Err(PipelineError::invalid_argument(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                targets.len()
            )));
        }
        if features.nrows() == 0 {
            return Err(PipelineError::invalid_argument("empty training set"));
        }

        let successes = targets.iter().filter(|&&t| t == 1).count();
        if successes == 0 || successes == targets.len() {
            debug!("Single-class training data, using constant classifier");
            return Ok(FittedClassifier::Constant {
                success: successes > 0,
            });
        }

        match params.kind {
            ClassifierKind::RandomForest => Ok(FittedClassifier::Forest(RandomForest::fit(
                features,
                targets,
                params.n_estimators,
                params.max_depth,
                params.random_state,
            )?)),
            ClassifierKind::LogisticRegression => Ok(FittedClassifier::Logistic(
                LogisticClassifier::fit(features, targets, params.max_iterations)?,
            )),
        }
    }

    /// Class-1 probability per row.
    pub fn predict_proba(&self, features: &Array2<f64>) -> Array1<f64> {
        match self {
            FittedClassifier::Forest(forest) => forest.predict_proba(features),
            FittedClassifier::Logistic(logistic) => logistic.predict_proba(features),
            FittedClassifier::Constant { success } => {
                Array1::from_elem(features.nrows(), if *success { 1.0 } else { 0.0 })
            }
        }
    }

    pub fn predict(&self, features: &Array2<f64>) -> Array1<usize> {
        match self {
            FittedClassifier::Forest(forest) => forest
                .predict_proba(features)
                .mapv(|p| if p > 0.5 { 1 } else { 0 }),
            FittedClassifier::Logistic(logistic) => logistic.predict(features),
            FittedClassifier::Constant { success } => {
                Array1::from_elem(features.nrows(), if *success { 1 } else { 0 })
            }
        }
    }
}

/// Bagged ensemble of Gini decision trees.
#[derive(Debug)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn fit(
        features: &Array2<f64>,
        targets: &Array1<usize>,
        n_estimators: usize,
        max_depth: Option<usize>,
        random_state: u64,
    ) -> PipelineResult<Self> {
        if n_estimators == 0 {
            return Err(PipelineError::invalid_argument("n_estimators must be > 0"));
        }
        let n = features.nrows();
        let mut rng = StdRng::seed_from_u64(random_state);
        let trees: Vec<DecisionTree> = (0..n_estimators)
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
                DecisionTree::fit(features, targets, &sample, max_depth)
            })
            .collect();

        debug!(
            "Random forest fitted: {} trees, deepest {}",
            trees.len(),
            trees.iter().map(DecisionTree::depth).max().unwrap_or(0)
        );
        Ok(Self { trees })
    }

    /// Share of trees voting for class 1.
    pub fn predict_proba(&self, features: &Array2<f64>) -> Array1<f64> {
        let mut votes = Array1::<f64>::zeros(features.nrows());
        for tree in &self.trees {
            let predicted = tree.predict(features);
            votes.zip_mut_with(&predicted, |v, &p| {
                if p == 1 {
                    *v += 1.0;
                }
            });
        }
        votes / self.trees.len() as f64
    }
}

/// Binary logistic regression backed by linfa.
#[derive(Debug)]
pub struct LogisticClassifier {
    model: FittedLogisticRegression<f64, usize>,
    /// Whether linfa's positive class is label 1.
    positive_is_success: bool,
}

impl LogisticClassifier {
    pub fn fit(
        features: &Array2<f64>,
        targets: &Array1<usize>,
        max_iterations: u64,
    ) -> PipelineResult<Self> {
        let dataset = LinfaDataset::new(features.clone(), targets.clone());
        let model = LogisticRegression::default()
            .max_iterations(max_iterations)
            .fit(&dataset)
            .map_err(|e| PipelineError::backend(format!("logistic regression fit failed: {}", e)))?;

        // linfa picks its own positive class; recover it from one decisive row
        let probs = model.predict_probabilities(features);
        let predicted: Array1<usize> = model.predict(features);
        let positive_is_success = probs
            .iter()
            .zip(predicted.iter())
            .find(|(&p, _)| p != 0.5)
            .map(|(&p, &class)| (p > 0.5) == (class == 1))
            .unwrap_or(true);

        Ok(Self {
            model,
            positive_is_success,
        })
    }

    pub fn predict_proba(&self, features: &Array2<f64>) -> Array1<f64> {
        let probs = self.model.predict_probabilities(features);
        if self.positive_is_success {
            probs
        } else {
            probs.mapv(|p| 1.0 - p)
        }
    }

    pub fn predict(&self, features: &Array2<f64>) -> Array1<usize> {
        self.model.predict(features)
    }
}
