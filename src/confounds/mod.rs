mod reader;

pub use reader::{ConfoundsFileReader, ConfoundsIter, TRAINING_FILE_STEM};

pub const CANONICAL_CHANNELS: [&str; 24] = [
    "csf",
    "white_matter",
    "global_signal",
    "std_dvars",
    "dvars",
    "framewise_displacement",
    "t_comp_cor_00",
    "t_comp_cor_01",
    "t_comp_cor_02",
    "t_comp_cor_03",
    "t_comp_cor_04",
    "t_comp_cor_05",
    "a_comp_cor_00",
    "a_comp_cor_01",
    "a_comp_cor_02",
    "a_comp_cor_03",
    "a_comp_cor_04",
    "a_comp_cor_05",
    "trans_x",
    "trans_y",
    "trans_z",
    "rot_x",
    "rot_y",
    "rot_z",
];

// fMRIPrep 1.1 names, index-aligned with CANONICAL_CHANNELS.
const LEGACY_V1_1_CHANNELS: [&str; 24] = [
    "CSF",
    "WhiteMatter",
    "GlobalSignal",
    "stdDVARS",
    "nonstdDVARS",
    "FramewiseDisplacement",
    "tCompCor00",
    "tCompCor01",
    "tCompCor02",
    "tCompCor03",
    "tCompCor04",
    "tCompCor05",
    "aCompCor00",
    "aCompCor01",
    "aCompCor02",
    "aCompCor03",
    "aCompCor04",
    "aCompCor05",
    "X",
    "Y",
    "Z",
    "RotX",
    "RotY",
    "RotZ",
];

pub const TRANSLATION_CHANNELS: [&str; 3] = ["trans_x", "trans_y", "trans_z"];
pub const ROTATION_CHANNELS: [&str; 3] = ["rot_x", "rot_y", "rot_z"];
pub const LABEL_COLUMN: &str = "artifact";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatVariant {
    #[default]
    Current,
    LegacyV1_1,
}

impl FormatVariant {
    pub fn name(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::LegacyV1_1 => "v1.1",
        }
    }

    pub fn run_file_suffix(self) -> &'static str {
        match self {
            Self::Current => "confounds_regressors.tsv",
            Self::LegacyV1_1 => "_confounds.tsv",
        }
    }

    pub fn source_channels(self) -> &'static [&'static str; 24] {
        match self {
            Self::Current => &CANONICAL_CHANNELS,
            Self::LegacyV1_1 => &LEGACY_V1_1_CHANNELS,
        }
    }

    /// Converts a training label token to 1/0. Only an exact `yes` counts;
    /// v1.1 exports may quote it.
    pub fn label_value(self, token: &str) -> u8 {
        let token = match self {
            Self::Current => token,
            Self::LegacyV1_1 => crate::io::table::unquote(token),
        };
        u8::from(token == "yes")
    }
}

/// Per-volume confound values for one run, stored column-major under
/// canonical channel names.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfoundTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl ConfoundTable {
    pub fn new(names: Vec<String>, columns: Vec<Vec<f64>>) -> anyhow::Result<Self> {
        if names.len() != columns.len() {
            anyhow::bail!(
                "{} column names for {} columns",
                names.len(),
                columns.len()
            );
        }
        if let Some(first) = columns.first() {
            if let Some((i, _)) = columns
                .iter()
                .enumerate()
                .find(|(_, c)| c.len() != first.len())
            {
                anyhow::bail!("column '{}' length differs from '{}'", names[i], names[0]);
            }
        }
        Ok(Self { names, columns })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn n_volumes(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn n_channels(&self) -> usize {
        self.names.len()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| self.column(name).is_none())
            .collect()
    }

    pub fn row(&self, volume: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c[volume]).collect()
    }

    /// Row-major copy, one feature vector per volume.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.n_volumes()).map(|v| self.row(v)).collect()
    }
}

/// Labelled development sample: canonical channels plus one 0/1 label per
/// volume.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub labels: Vec<u8>,
    pub features: ConfoundTable,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_artifacts(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }
}
