//! Artifact-vs-clean classification with a swappable learner.
//!
//! The wrapper owns feature scaling: it fits a [`StandardScaler`] once in
//! [`Classifier::train`] and reuses the frozen parameters for every
//! [`Classifier::predict`]. Learners only ever see scaled features.

mod forest;
mod scaler;

use anyhow::{Result, bail};
use tracing::info;

use crate::confounds::{ConfoundTable, TrainingSet};
use crate::error::ClassifierError;

pub use forest::{ForestConfig, RandomForest};
pub use scaler::StandardScaler;

/// Binary supervised learner over scaled feature rows.
pub trait Learner: Send + Sync {
    fn name(&self) -> &'static str;
    fn fit(&mut self, x: &[Vec<f64>], y: &[u8]) -> Result<()>;
    /// One 0/1 label per input row.
    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<u8>>;
}

#[derive(Debug)]
pub struct Classifier<L: Learner = RandomForest> {
    learner: L,
    scaler: Option<StandardScaler>,
}

impl<L: Learner> Classifier<L> {
    pub fn new(learner: L) -> Self {
        Self {
            learner,
            scaler: None,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.scaler.is_some()
    }

    pub fn scaler(&self) -> Option<&StandardScaler> {
        self.scaler.as_ref()
    }

    pub fn train(&mut self, x: &[Vec<f64>], y: &[u8]) -> Result<()> {
        if self.scaler.is_some() {
            return Err(ClassifierError::AlreadyTrained.into());
        }
        if x.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet.into());
        }
        if x.len() != y.len() {
            return Err(ClassifierError::LabelMismatch {
                rows: x.len(),
                labels: y.len(),
            }
            .into());
        }
        let scaler = StandardScaler::fit(x)?;
        let scaled = scaler.transform(x)?;
        self.learner.fit(&scaled, y)?;
        info!(
            learner = self.learner.name(),
            rows = x.len(),
            features = scaler.width(),
            "classifier trained"
        );
        self.scaler = Some(scaler);
        Ok(())
    }

    pub fn train_on(&mut self, set: &TrainingSet) -> Result<()> {
        self.train(&set.features.to_rows(), &set.labels)
    }

    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<u8>> {
        let scaler = self.scaler.as_ref().ok_or(ClassifierError::NotTrained)?;
        if x.is_empty() {
            return Ok(Vec::new());
        }
        let scaled = scaler.transform(x)?;
        let labels = self.learner.predict(&scaled)?;
        if labels.len() != x.len() {
            bail!(
                "{} returned {} labels for {} rows",
                self.learner.name(),
                labels.len(),
                x.len()
            );
        }
        Ok(labels)
    }

    pub fn predict_table(&self, table: &ConfoundTable) -> Result<Vec<u8>> {
        self.predict(&table.to_rows())
    }
}
