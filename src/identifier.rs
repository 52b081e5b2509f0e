//! Run provenance parsed from, and formatted back into, BIDS file names.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

// Capture order: subject, wave, task, run.
static RUN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"sub-(.*)_ses-wave(\d*)_task-(.*)_\w*-(\d*)_.*").expect("valid regex")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub subject_id: String,
    pub wave: String,
    pub task: String,
    pub run: String,
}

impl Identifier {
    pub fn new(
        subject_id: impl Into<String>,
        wave: impl Into<String>,
        task: impl Into<String>,
        run: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            wave: wave.into(),
            task: task.into(),
            run: run.into(),
        }
    }

    /// Extracts the identifier from a confound file name.
    ///
    /// Names that do not follow the `sub-*_ses-wave*_task-*_<tag>-*_` layout
    /// yield an identifier with every field empty.
    pub fn parse(file_name: &str) -> Self {
        match RUN_PATTERN.captures(file_name) {
            Some(caps) => {
                let group = |i: usize| {
                    caps.get(i)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default()
                };
                Self {
                    subject_id: group(1),
                    wave: group(2),
                    task: group(3),
                    run: group(4),
                }
            }
            None => Self::default(),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.file_name()
            .and_then(|s| s.to_str())
            .map(Self::parse)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.subject_id.is_empty() && self.wave.is_empty() && self.task.is_empty() && self.run.is_empty()
    }

    pub fn subject_dir(&self) -> String {
        format!("sub-{}", self.subject_id)
    }

    pub fn session_dir(&self) -> String {
        format!("ses-wave{}", self.wave)
    }

    pub fn func_dir(&self, root: &Path) -> PathBuf {
        root.join(self.subject_dir())
            .join(self.session_dir())
            .join("func")
    }

    pub fn file_stem(&self) -> String {
        format!(
            "sub-{}_ses-wave{}_task-{}_acq-{}",
            self.subject_id, self.wave, self.task, self.run
        )
    }

    pub fn realignment_file_name(&self) -> String {
        format!("{}-realignment_parameters.txt", self.file_stem())
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "sub-{} wave-{} task-{} run-{}",
            self.subject_id, self.wave, self.task, self.run
        )
    }
}
