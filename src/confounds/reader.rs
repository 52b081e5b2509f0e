use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::confounds::{
    CANONICAL_CHANNELS, ConfoundTable, FormatVariant, LABEL_COLUMN, TrainingSet,
};
use crate::identifier::Identifier;
use crate::io::table::{TableOptions, read_delimited};

pub const TRAINING_FILE_STEM: &str = "development_sample";

/// Finds and parses confound tables under a root directory.
///
/// Discovery is re-run on every call, so each `get_confounds` starts a fresh
/// single-pass sequence.
#[derive(Debug, Clone)]
pub struct ConfoundsFileReader {
    confounds_root: PathBuf,
    training_root: PathBuf,
    variant: FormatVariant,
}

impl ConfoundsFileReader {
    pub fn new(
        confounds_root: impl Into<PathBuf>,
        training_root: impl Into<PathBuf>,
        variant: FormatVariant,
    ) -> Self {
        Self {
            confounds_root: confounds_root.into(),
            training_root: training_root.into(),
            variant,
        }
    }

    pub fn variant(&self) -> FormatVariant {
        self.variant
    }

    pub fn channel_names(&self) -> &'static [&'static str] {
        &CANONICAL_CHANNELS
    }

    /// Training files, `.tsv` before `.csv`, then by path.
    pub fn training_files(&self) -> Result<Vec<PathBuf>> {
        let tsv = format!("{}.tsv", TRAINING_FILE_STEM);
        let csv = format!("{}.csv", TRAINING_FILE_STEM);
        let mut files = discover(&self.training_root, |name| name == tsv || name == csv)?;
        files.sort_by_key(|p| (p.extension().and_then(|s| s.to_str()) != Some("tsv"), p.clone()));
        Ok(files)
    }

    pub fn run_files(&self) -> Result<Vec<PathBuf>> {
        let suffix = self.variant.run_file_suffix();
        discover(&self.confounds_root, |name| name.ends_with(suffix))
    }

    /// Parses the development sample. `Ok(None)` means no training file
    /// exists; callers must not train in that case.
    pub fn get_training_data(&self) -> Result<Option<TrainingSet>> {
        let files = self.training_files()?;
        let Some(path) = files.first() else {
            warn!(root = %self.training_root.display(), "no training file found");
            return Ok(None);
        };
        if files.len() > 1 {
            warn!(
                used = %path.display(),
                ignored = files.len() - 1,
                "multiple training files found"
            );
        }

        let table = read_delimited(path, TableOptions::for_path(path))?;
        let source = self.variant.source_channels();
        let columns = table.select_numeric(source)?;
        let labels = table
            .column_text(LABEL_COLUMN)?
            .into_iter()
            .map(|token| self.variant.label_value(token))
            .collect::<Vec<u8>>();
        let features = ConfoundTable::new(canonical_names(), columns)?;

        let set = TrainingSet { labels, features };
        info!(
            path = %path.display(),
            rows = set.len(),
            artifacts = set.n_artifacts(),
            "training data loaded"
        );
        Ok(Some(set))
    }

    pub fn get_confounds(&self) -> Result<ConfoundsIter<'_>> {
        let files = self.run_files()?;
        info!(
            root = %self.confounds_root.display(),
            files = files.len(),
            format = self.variant.name(),
            "confound files discovered"
        );
        Ok(ConfoundsIter {
            reader: self,
            files: files.into_iter(),
        })
    }

    /// Reads one run file, keeping only the canonical channels.
    pub fn read_run(&self, path: &Path) -> Result<(Identifier, ConfoundTable)> {
        let identifier = Identifier::from_path(path);
        if identifier.is_empty() {
            warn!(path = %path.display(), "file name does not match run pattern");
        }
        let table = read_delimited(path, TableOptions::tsv())?;
        let columns = table
            .select_numeric(self.variant.source_channels())
            .with_context(|| format!("failed to load confounds from {}", path.display()))?;
        let data = ConfoundTable::new(canonical_names(), columns)?;
        debug!(
            path = %path.display(),
            volumes = data.n_volumes(),
            dropped_columns = table.header.len().saturating_sub(data.n_channels()),
            "confounds parsed"
        );
        Ok((identifier, data))
    }
}

/// Lazy sequence of parsed runs; each file is read when the caller advances.
pub struct ConfoundsIter<'a> {
    reader: &'a ConfoundsFileReader,
    files: std::vec::IntoIter<PathBuf>,
}

impl Iterator for ConfoundsIter<'_> {
    type Item = Result<(Identifier, ConfoundTable)>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.files.next()?;
        Some(self.reader.read_run(&path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.files.size_hint()
    }
}

fn canonical_names() -> Vec<String> {
    CANONICAL_CHANNELS.iter().map(|s| s.to_string()).collect()
}

fn discover(root: &Path, matches: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("input directory {} does not exist", root.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_str().is_some_and(&matches) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
