use ndarray::{Array1, Array2, Axis};

use crate::error::{PipelineError, PipelineResult};

/// Z-score normalisation with separate fit and apply steps.
///
/// Parameters are learned once from training features and reused unchanged
/// for every later `transform`.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Array1<f64>,
    stds: Array1<f64>,
}

impl StandardScaler {
    /// Learn per-column mean and population standard deviation.
    pub fn fit(features: &Array2<f64>) -> PipelineResult<Self> {
        if features.nrows() == 0 {
            return Err(PipelineError::invalid_argument(
                "cannot fit a scaler on zero rows",
            ));
        }
        let means = features
            .mean_axis(Axis(0))
            .ok_or_else(|| PipelineError::invalid_argument("cannot fit a scaler on zero rows"))?;
        let stds = features.std_axis(Axis(0), 0.0);
        Ok(Self { means, stds })
    }

    pub fn transform(&self, features: &Array2<f64>) -> PipelineResult<Array2<f64>> {
        let num_features = self.means.len();
        if features.ncols() != num_features {
            return Err(PipelineError::invalid_argument(format!(
                "scaler was fitted on {} columns, got {}",
                num_features,
                features.ncols()
            )));
        }

        let mut normalized = features.clone();
        for j in 0..num_features {
            let std = self.stds[j];
            let mut column = normalized.column_mut(j);
            if std > 1e-10 {
                column.mapv_inplace(|v| (v - self.means[j]) / std);
            } else {
                column.fill(0.0);
            }
        }
        Ok(normalized)
    }

    pub fn fit_transform(features: &Array2<f64>) -> PipelineResult<(Self, Array2<f64>)> {
        let scaler = Self::fit(features)?;
        let scaled = scaler.transform(features)?;
        Ok((scaler, scaled))
    }

    pub fn means(&self) -> &Array1<f64> {
        &self.means
    }

    pub fn stds(&self) -> &Array1<f64> {
        &self.stds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_transform_centers_and_scales() {
        let x = array![[1.0, 10.0], [3.0, 10.0], [5.0, 10.0]];
        let (scaler, scaled) = StandardScaler::fit_transform(&x).unwrap();
        assert!((scaler.means()[0] - 3.0).abs() < 1e-12);
        let std = (8.0f64 / 3.0).sqrt();
        assert!((scaler.stds()[0] - std).abs() < 1e-12);
        assert!((scaled[[0, 0]] + 2.0 / std).abs() < 1e-12);
        assert!((scaled[[1, 0]]).abs() < 1e-12);
        // constant column collapses to zero
        assert!(scaled.column(1).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_transform_reuses_fitted_parameters() {
        let train = array![[0.0], [2.0]];
        let scaler = StandardScaler::fit(&train).unwrap();
        let test = array![[4.0]];
        let scaled = scaler.transform(&test).unwrap();
        // mean 1, std 1 from the training data, not re-fit on [4.0]
        assert!((scaled[[0, 0]] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_column_mismatch_is_rejected() {
        let scaler = StandardScaler::fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert!(scaler.transform(&array![[1.0]]).is_err());
    }

    #[test]
    fn test_empty_fit_is_rejected() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(StandardScaler::fit(&empty).is_err());
    }
}
