use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::{Ctx, RunRecord};
use crate::pipeline::Stage;
use crate::plot::SvgPlotter;
use crate::realignment::Realignment;

pub struct Stage2Runs;

impl Stage2Runs {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Runs {
    fn name(&self) -> &'static str {
        "stage2_runs"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let reader = ctx.reader();
        let realignment = if ctx.write_rp {
            Some(Realignment::new(ctx.output.rp_dir.clone())?)
        } else {
            None
        };

        for item in reader.get_confounds()? {
            let (identifier, data) = item?;
            if identifier.is_empty() {
                ctx.warnings.push(format!(
                    "run {} has no parseable identifier",
                    ctx.runs.len() + 1
                ));
            }

            let labels = ctx
                .classifier
                .as_ref()
                .context("classifier must be trained before runs are processed")?
                .predict_table(&data)
                .with_context(|| format!("failed to classify {}", identifier))?;

            let realignment_file = match &realignment {
                Some(r) => Some(r.write(&identifier, ctx.realignment_mode, &data, &labels)?),
                None => None,
            };

            let mut plots = Vec::new();
            if ctx.write_plots {
                let plotter = SvgPlotter::new(
                    &ctx.output.plot_dir,
                    &identifier,
                    &data,
                    &labels,
                    ctx.figure.clone(),
                )?;
                for column in &ctx.fig_indicators {
                    plots.push(plotter.plot(column)?);
                }
            }

            let run = ctx.summary.add(&identifier, &labels);
            info!(
                subject = %identifier.subject_id,
                wave = %identifier.wave,
                task = %identifier.task,
                run = %identifier.run,
                volumes = run.n_volumes,
                artifacts = run.n_artifacts,
                "run classified"
            );
            let record = RunRecord {
                identifier,
                n_volumes: run.n_volumes,
                n_artifacts: run.n_artifacts,
                realignment_file,
                plots,
            };
            ctx.runs.push(record);
        }

        if ctx.runs.is_empty() {
            warn!(input = %ctx.input.display(), "no confound files found");
            ctx.warnings.push(format!(
                "no {} files found under {}",
                ctx.variant.run_file_suffix(),
                ctx.input.display()
            ));
        }
        Ok(())
    }
}
