use anyhow::Result;

use crate::error::ClassifierError;
use crate::math::stats::{mean, std_dev};

/// Per-channel standardisation `(x - mean) / std`. Zero-variance channels
/// keep a unit scale so they map to 0.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(x: &[Vec<f64>]) -> Result<Self> {
        let width = x.first().map(|r| r.len()).ok_or(ClassifierError::EmptyTrainingSet)?;
        check_width(x, width)?;

        let mut means = Vec::with_capacity(width);
        let mut scales = Vec::with_capacity(width);
        let mut column = Vec::with_capacity(x.len());
        for j in 0..width {
            column.clear();
            column.extend(x.iter().map(|row| row[j]));
            let m = mean(&column);
            let s = std_dev(&column, m);
            means.push(m);
            scales.push(if s > 0.0 { s } else { 1.0 });
        }
        Ok(Self { means, scales })
    }

    pub fn width(&self) -> usize {
        self.means.len()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn transform(&self, x: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        check_width(x, self.width())?;
        Ok(x.iter()
            .map(|row| {
                row.iter()
                    .zip(self.means.iter().zip(&self.scales))
                    .map(|(v, (m, s))| (v - m) / s)
                    .collect()
            })
            .collect())
    }
}

fn check_width(x: &[Vec<f64>], width: usize) -> Result<()> {
    if let Some(row) = x.iter().find(|r| r.len() != width) {
        return Err(ClassifierError::FeatureMismatch {
            expected: width,
            got: row.len(),
        }
        .into());
    }
    Ok(())
}
