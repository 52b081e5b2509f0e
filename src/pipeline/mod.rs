use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::ctx::Ctx;

pub mod stage0_scaffold;
pub mod stage1_training;
pub mod stage2_runs;
pub mod stage3_output;
pub mod stage_validate;

pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn full() -> Self {
        Self::new(vec![
            Box::new(stage0_scaffold::Stage0Scaffold::new()),
            Box::new(stage1_training::Stage1Training::new()),
            Box::new(stage2_runs::Stage2Runs::new()),
            Box::new(stage3_output::Stage3Output::new()),
        ])
    }

    /// Runs every stage in order, stopping at the first failure. The error
    /// names the failing stage; downcasts to the typed cause still work.
    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let started = Instant::now();
        info!(
            study = %ctx.study,
            format = ctx.variant.name(),
            stages = self.stages.len(),
            "pipeline started"
        );
        for stage in &self.stages {
            let name = stage.name();
            let start = Instant::now();
            info!(stage = name, "stage started");
            let result = stage.run(ctx);
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match result {
                Ok(()) => info!(stage = name, elapsed_ms, "stage finished"),
                Err(err) => {
                    warn!(stage = name, elapsed_ms, error = %err, "stage failed");
                    return Err(err.context(format!("{} failed", name)));
                }
            }
        }
        info!(
            runs = ctx.runs.len(),
            warnings = ctx.warnings.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pipeline finished"
        );
        Ok(())
    }
}
