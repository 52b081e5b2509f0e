use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::math::stats::percent;
use crate::schema::v1::{AutoMotionV1, InputMeta, RunEntry, ToolMeta, Totals};

pub fn build_report(ctx: &Ctx) -> AutoMotionV1 {
    let runs: Vec<RunEntry> = ctx
        .runs
        .iter()
        .map(|r| RunEntry {
            subject_id: r.identifier.subject_id.clone(),
            wave: r.identifier.wave.clone(),
            task: r.identifier.task.clone(),
            run: r.identifier.run.clone(),
            n_volumes: r.n_volumes,
            n_artifacts: r.n_artifacts,
            percent: percent(r.n_artifacts, r.n_volumes),
            realignment_file: r
                .realignment_file
                .as_ref()
                .map(|p| p.display().to_string()),
            plots: r.plots.iter().map(|p| p.display().to_string()).collect(),
        })
        .collect();

    let volumes = runs.iter().map(|r| r.n_volumes).sum();
    let artifacts = runs.iter().map(|r| r.n_artifacts).sum();

    AutoMotionV1 {
        tool: ToolMeta {
            name: "auto-motion".to_string(),
            version: ctx.tool_version.clone(),
        },
        study: ctx.study.clone(),
        input_meta: InputMeta {
            confounds_root: ctx.input.display().to_string(),
            training_file_rows: ctx.training_rows,
            training_artifacts: ctx.training_artifacts,
            format: ctx.variant.name().to_string(),
            euclidean: ctx.realignment_mode == crate::realignment::RealignmentMode::Euclidean,
        },
        totals: Totals {
            runs: runs.len(),
            volumes,
            artifacts,
            percent: percent(artifacts, volumes),
        },
        runs,
        warnings: ctx.warnings.clone(),
    }
}

pub fn write_json(path: &Path, report: &AutoMotionV1) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
