//! Standard Scaler
//!
//! Per-feature standardization learned once from the training set. Fitting is
//! the only constructor, so an unfitted scaler cannot be used.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::error::{ModelError, ModelResult};

#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Learn per-column mean and population standard deviation.
    /// Constant columns get a scale of 1.0.
    pub fn fit(data: ArrayView2<'_, f64>) -> ModelResult<Self> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }

        let mean = data.mean_axis(Axis(0)).ok_or(ModelError::EmptyTrainingSet)?;
        let scale = data
            .std_axis(Axis(0), 0.0)
            .mapv(|std| if std > f64::EPSILON { std } else { 1.0 });

        Ok(Self { mean, scale })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> ArrayView1<'_, f64> {
        self.mean.view()
    }

    pub fn scale(&self) -> ArrayView1<'_, f64> {
        self.scale.view()
    }

    /// Standardize a single vector
    pub fn transform(&self, x: ArrayView1<'_, f64>) -> ModelResult<Array1<f64>> {
        self.check_width(x.len())?;
        Ok((&x - &self.mean) / &self.scale)
    }

    /// Standardize every row of a matrix
    pub fn transform_batch(&self, data: ArrayView2<'_, f64>) -> ModelResult<Array2<f64>> {
        self.check_width(data.ncols())?;
        Ok((&data - &self.mean) / &self.scale)
    }

    fn check_width(&self, actual: usize) -> ModelResult<()> {
        if actual != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features(),
                actual,
            });
        }
        Ok(())
    }
}
