//! Study-wide artifact summaries, accumulated in memory and written once.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::identifier::Identifier;
use crate::io::csv_writer::{CsvField, write_header, write_row};
use crate::math::stats::percent;

pub const RUN_HEADER: [&str; 6] = ["subjectID", "wave", "task", "run", "nVols", "percent"];
pub const TASK_HEADER: [&str; 5] = ["subjectID", "wave", "task", "nVols", "percent"];
pub const TRASH_HEADER: [&str; 6] = ["subjectID", "wave", "task", "run", "volume", "trash"];

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub identifier: Identifier,
    pub n_volumes: usize,
    pub n_artifacts: usize,
    pub percent: f64,
}

/// Totals over every run sharing subject, wave and task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSummary {
    pub subject_id: String,
    pub wave: String,
    pub task: String,
    pub n_volumes: usize,
    pub n_artifacts: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashVolume {
    pub identifier: Identifier,
    pub volume: usize,
}

#[derive(Debug, Clone)]
pub struct SummaryPaths {
    pub by_run: PathBuf,
    pub by_task: PathBuf,
    pub trash_volumes: PathBuf,
}

type TaskKey = (String, String, String);

#[derive(Debug)]
pub struct Summarize {
    summary_dir: PathBuf,
    study: String,
    by_run: Vec<RunSummary>,
    by_task: Vec<TaskSummary>,
    task_index: HashMap<TaskKey, usize>,
    trash: Vec<TrashVolume>,
}

impl Summarize {
    pub fn new(summary_dir: impl Into<PathBuf>, study: impl Into<String>) -> Self {
        Self {
            summary_dir: summary_dir.into(),
            study: study.into(),
            by_run: Vec::new(),
            by_task: Vec::new(),
            task_index: HashMap::new(),
            trash: Vec::new(),
        }
    }

    pub fn by_run(&self) -> &[RunSummary] {
        &self.by_run
    }

    pub fn by_task(&self) -> &[TaskSummary] {
        &self.by_task
    }

    pub fn trash_volumes(&self) -> &[TrashVolume] {
        &self.trash
    }

    pub fn paths(&self) -> SummaryPaths {
        SummaryPaths {
            by_run: self.summary_dir.join(format!("{}_summaryRun.csv", self.study)),
            by_task: self.summary_dir.join(format!("{}_summaryTask.csv", self.study)),
            trash_volumes: self.summary_dir.join(format!("{}_trashVols.csv", self.study)),
        }
    }

    pub fn add(&mut self, identifier: &Identifier, predictions: &[u8]) -> &RunSummary {
        let n_volumes = predictions.len();
        let flagged: Vec<usize> = predictions
            .iter()
            .enumerate()
            .filter(|(_, label)| **label == 1)
            .map(|(v, _)| v)
            .collect();
        let n_artifacts = flagged.len();

        let key = (
            identifier.subject_id.clone(),
            identifier.wave.clone(),
            identifier.task.clone(),
        );
        match self.task_index.get(&key) {
            Some(&idx) => {
                let task = &mut self.by_task[idx];
                task.n_volumes += n_volumes;
                task.n_artifacts += n_artifacts;
                task.percent = percent(task.n_artifacts, task.n_volumes);
            }
            None => {
                self.task_index.insert(key, self.by_task.len());
                self.by_task.push(TaskSummary {
                    subject_id: identifier.subject_id.clone(),
                    wave: identifier.wave.clone(),
                    task: identifier.task.clone(),
                    n_volumes,
                    n_artifacts,
                    percent: percent(n_artifacts, n_volumes),
                });
            }
        }

        self.trash.extend(flagged.into_iter().map(|volume| TrashVolume {
            identifier: identifier.clone(),
            volume,
        }));

        self.by_run.push(RunSummary {
            identifier: identifier.clone(),
            n_volumes,
            n_artifacts,
            percent: percent(n_artifacts, n_volumes),
        });
        &self.by_run[self.by_run.len() - 1]
    }

    /// Writes all three tables. Output depends only on accumulated rows, so
    /// repeated calls produce identical files.
    pub fn write(&self) -> Result<SummaryPaths> {
        std::fs::create_dir_all(&self.summary_dir)
            .with_context(|| format!("failed to create {}", self.summary_dir.display()))?;
        let paths = self.paths();

        write_table(&paths.by_run, &RUN_HEADER, |w| {
            for r in &self.by_run {
                let id = &r.identifier;
                write_row(
                    w,
                    &[
                        CsvField::Text(&id.subject_id),
                        CsvField::Text(&id.wave),
                        CsvField::Text(&id.task),
                        CsvField::Text(&id.run),
                        CsvField::Int(r.n_artifacts),
                        CsvField::Float(r.percent),
                    ],
                )?;
            }
            Ok(())
        })?;

        write_table(&paths.by_task, &TASK_HEADER, |w| {
            for t in &self.by_task {
                write_row(
                    w,
                    &[
                        CsvField::Text(&t.subject_id),
                        CsvField::Text(&t.wave),
                        CsvField::Text(&t.task),
                        CsvField::Int(t.n_artifacts),
                        CsvField::Float(t.percent),
                    ],
                )?;
            }
            Ok(())
        })?;

        write_table(&paths.trash_volumes, &TRASH_HEADER, |w| {
            for t in &self.trash {
                let id = &t.identifier;
                write_row(
                    w,
                    &[
                        CsvField::Text(&id.subject_id),
                        CsvField::Text(&id.wave),
                        CsvField::Text(&id.task),
                        CsvField::Text(&id.run),
                        CsvField::Int(t.volume),
                        CsvField::Int(1),
                    ],
                )?;
            }
            Ok(())
        })?;

        info!(
            dir = %self.summary_dir.display(),
            runs = self.by_run.len(),
            tasks = self.by_task.len(),
            trash_volumes = self.trash.len(),
            "summaries written"
        );
        Ok(paths)
    }
}

fn write_table(
    path: &Path,
    header: &[&str],
    body: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write_header(&mut w, header)?;
    body(&mut w).with_context(|| format!("failed to write {}", path.display()))?;
    w.flush()?;
    Ok(())
}
