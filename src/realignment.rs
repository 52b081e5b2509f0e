//! Per-run realignment parameter files annotated with artifact labels.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::confounds::{ConfoundTable, ROTATION_CHANNELS, TRANSLATION_CHANNELS};
use crate::error::SchemaError;
use crate::identifier::Identifier;
use crate::math::stats::{diff_from_zero, l2_norm};

/// Average head radius used to turn rotations (radians) into arc length (mm).
pub const HEAD_RADIUS_MM: f64 = 50.0;
pub const DELIMITER: &str = "   ";

pub const EUCLIDEAN_COLUMNS: [&str; 4] =
    ["translation", "rotation", "deriv_translation", "deriv_rotation"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RealignmentMode {
    #[default]
    Euclidean,
    Raw,
}

impl RealignmentMode {
    pub fn from_no_euclidean(no_euclidean: bool) -> Self {
        if no_euclidean { Self::Raw } else { Self::Euclidean }
    }

    pub fn column_names(self) -> Vec<&'static str> {
        match self {
            Self::Euclidean => EUCLIDEAN_COLUMNS.to_vec(),
            Self::Raw => TRANSLATION_CHANNELS
                .iter()
                .chain(ROTATION_CHANNELS.iter())
                .copied()
                .collect(),
        }
    }
}

/// Motion values per volume (row-major) plus the artifact label column.
#[derive(Debug, Clone, PartialEq)]
pub struct RealignmentRows {
    pub values: Vec<Vec<f64>>,
    pub labels: Vec<u8>,
}

pub fn motion_channels() -> [&'static str; 6] {
    let [tx, ty, tz] = TRANSLATION_CHANNELS;
    let [rx, ry, rz] = ROTATION_CHANNELS;
    [tx, ty, tz, rx, ry, rz]
}

/// Validates the motion channels and label length, then derives the rows
/// for `mode`. Nothing is computed when validation fails.
pub fn compute(
    identifier: &Identifier,
    mode: RealignmentMode,
    data: &ConfoundTable,
    labels: &[u8],
) -> Result<RealignmentRows> {
    let required = motion_channels();
    let missing = data.missing(&required);
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns {
            path: identifier.realignment_file_name(),
            missing: missing.into_iter().map(str::to_string).collect(),
        }
        .into());
    }
    if labels.len() != data.n_volumes() {
        return Err(SchemaError::LengthMismatch {
            expected: data.n_volumes(),
            got: labels.len(),
        }
        .into());
    }

    let channels: Vec<&[f64]> = required
        .iter()
        .filter_map(|name| data.column(name))
        .collect();
    let n = data.n_volumes();

    let values = match mode {
        RealignmentMode::Raw => (0..n)
            .map(|v| channels.iter().map(|c| c[v]).collect())
            .collect(),
        RealignmentMode::Euclidean => {
            let translation: Vec<f64> = (0..n)
                .map(|v| l2_norm(&[channels[0][v], channels[1][v], channels[2][v]]))
                .collect();
            let rotation: Vec<f64> = (0..n)
                .map(|v| {
                    HEAD_RADIUS_MM * l2_norm(&[channels[3][v], channels[4][v], channels[5][v]])
                })
                .collect();
            let deriv_translation = diff_from_zero(&translation);
            let deriv_rotation = diff_from_zero(&rotation);
            (0..n)
                .map(|v| {
                    vec![
                        translation[v],
                        rotation[v],
                        deriv_translation[v],
                        deriv_rotation[v],
                    ]
                })
                .collect()
        }
    };

    Ok(RealignmentRows {
        values,
        labels: labels.to_vec(),
    })
}

/// One line per volume: values as `%.7f`, label as an integer, separated by
/// three spaces.
pub fn format_rows(rows: &RealignmentRows) -> String {
    let mut out = String::new();
    for (values, label) in rows.values.iter().zip(&rows.labels) {
        for v in values {
            out.push_str(&format!("{:.7}{}", v, DELIMITER));
        }
        out.push_str(&format!("{}\n", label));
    }
    out
}

pub struct Realignment {
    output_dir: PathBuf,
}

impl Realignment {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("failed to create {}", output_dir.display()))?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn output_path(&self, identifier: &Identifier) -> PathBuf {
        identifier
            .func_dir(&self.output_dir)
            .join(identifier.realignment_file_name())
    }

    pub fn write(
        &self,
        identifier: &Identifier,
        mode: RealignmentMode,
        data: &ConfoundTable,
        labels: &[u8],
    ) -> Result<PathBuf> {
        let rows = compute(identifier, mode, data, labels)?;

        let dir = identifier.func_dir(&self.output_dir);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join(identifier.realignment_file_name());
        let file =
            File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut w = BufWriter::new(file);
        w.write_all(format_rows(&rows).as_bytes())?;
        w.flush()?;

        debug!(path = %path.display(), volumes = rows.labels.len(), "realignment written");
        Ok(path)
    }
}
