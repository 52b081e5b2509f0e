use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMeta {
    pub confounds_root: String,
    pub training_file_rows: usize,
    pub training_artifacts: usize,
    pub format: String,
    pub euclidean: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEntry {
    pub subject_id: String,
    pub wave: String,
    pub task: String,
    pub run: String,
    pub n_volumes: usize,
    pub n_artifacts: usize,
    pub percent: f64,
    pub realignment_file: Option<String>,
    pub plots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Totals {
    pub runs: usize,
    pub volumes: usize,
    pub artifacts: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoMotionV1 {
    pub tool: ToolMeta,
    pub study: String,
    pub input_meta: InputMeta,
    pub runs: Vec<RunEntry>,
    pub totals: Totals,
    pub warnings: Vec<String>,
}
