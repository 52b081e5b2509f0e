use thiserror::Error;

/// Confound tables whose shape or content cannot be trusted.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{path}: missing required columns: {}", missing.join(", "))]
    MissingColumns { path: String, missing: Vec<String> },

    #[error("{path}:{line} expected {expected} fields, found {got}")]
    RaggedRow {
        path: String,
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("{path}:{line} column '{column}' has non-numeric value '{value}'")]
    InvalidValue {
        path: String,
        line: usize,
        column: String,
        value: String,
    },

    #[error("{path}: empty table (no header row)")]
    EmptyTable { path: String },

    #[error("label count {got} does not match {expected} volumes")]
    LengthMismatch { expected: usize, got: usize },
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier used before train()")]
    NotTrained,

    #[error("classifier already trained")]
    AlreadyTrained,

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("feature width {got} does not match trained width {expected}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("label count {labels} does not match {rows} feature rows")]
    LabelMismatch { rows: usize, labels: usize },
}

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid data column for plotting: {0}")]
    InvalidColumn(String),
}
