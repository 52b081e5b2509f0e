use std::path::PathBuf;

use crate::classifier::{Classifier, ForestConfig};
use crate::confounds::{ConfoundsFileReader, FormatVariant};
use crate::identifier::Identifier;
use crate::plot::{DEFAULT_INDICATORS, FigureOptions};
use crate::realignment::RealignmentMode;
use crate::summarize::Summarize;

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub summary_dir: PathBuf,
    pub rp_dir: PathBuf,
    pub plot_dir: PathBuf,
    pub json_path: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: PathBuf, study: &str) -> Self {
        Self {
            summary_dir: out_dir.join("summary"),
            rp_dir: out_dir.join("rp_txt"),
            plot_dir: out_dir.join("plots"),
            json_path: out_dir.join(format!("{}_report.json", study)),
            out_dir,
        }
    }
}

/// What was produced for one processed run.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub identifier: Identifier,
    pub n_volumes: usize,
    pub n_artifacts: usize,
    pub realignment_file: Option<PathBuf>,
    pub plots: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct Ctx {
    pub input: PathBuf,
    pub training_input: PathBuf,
    pub study: String,
    pub variant: FormatVariant,
    pub realignment_mode: RealignmentMode,
    pub write_rp: bool,
    pub write_plots: bool,
    pub write_json: bool,
    pub figure: FigureOptions,
    pub fig_indicators: Vec<String>,
    pub forest: ForestConfig,
    pub tool_version: String,
    pub output: OutputPaths,
    pub classifier: Option<Classifier>,
    pub summary: Summarize,
    pub runs: Vec<RunRecord>,
    pub training_rows: usize,
    pub training_artifacts: usize,
    pub warnings: Vec<String>,
}

impl Ctx {
    pub fn new(input: PathBuf, out_dir: PathBuf, study: &str, tool_version: &str) -> Self {
        let output = OutputPaths::new(out_dir, study);
        let summary = Summarize::new(output.summary_dir.clone(), study);
        Self {
            training_input: input.clone(),
            input,
            study: study.to_string(),
            variant: FormatVariant::Current,
            realignment_mode: RealignmentMode::Euclidean,
            write_rp: true,
            write_plots: true,
            write_json: false,
            figure: FigureOptions::default(),
            fig_indicators: DEFAULT_INDICATORS.iter().map(|s| s.to_string()).collect(),
            forest: ForestConfig::default(),
            tool_version: tool_version.to_string(),
            output,
            classifier: None,
            summary,
            runs: Vec::new(),
            training_rows: 0,
            training_artifacts: 0,
            warnings: Vec::new(),
        }
    }

    pub fn reader(&self) -> ConfoundsFileReader {
        ConfoundsFileReader::new(self.input.clone(), self.training_input.clone(), self.variant)
    }
}
