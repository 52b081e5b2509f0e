use anyhow::{Context, Result};
use std::fs;
use tracing::info;

use crate::confounds::CANONICAL_CHANNELS;
use crate::ctx::Ctx;
use crate::error::PlotError;
use crate::pipeline::Stage;

pub struct Stage0Scaffold;

impl Stage0Scaffold {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage0Scaffold {
    fn name(&self) -> &'static str {
        "stage0_scaffold"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        // Reject unknown plot channels before any run is processed.
        if ctx.write_plots {
            if let Some(bad) = ctx
                .fig_indicators
                .iter()
                .find(|name| !CANONICAL_CHANNELS.contains(&name.as_str()))
            {
                return Err(PlotError::InvalidColumn(bad.clone()).into());
            }
        }

        let mut dirs = vec![&ctx.output.out_dir, &ctx.output.summary_dir];
        if ctx.write_rp {
            dirs.push(&ctx.output.rp_dir);
        }
        if ctx.write_plots {
            dirs.push(&ctx.output.plot_dir);
        }
        for dir in dirs {
            fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        }
        info!(
            out_dir = %ctx.output.out_dir.display(),
            "output_dir_ready"
        );
        Ok(())
    }
}
