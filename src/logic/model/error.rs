//! Model errors

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Inference requested before the startup fit finished
    #[error("Models not loaded")]
    NotReady,

    #[error("Model {0} not found")]
    ModelNotFound(String),

    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid training configuration: {0}")]
    InvalidConfig(String),
}
