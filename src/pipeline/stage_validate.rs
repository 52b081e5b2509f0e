use anyhow::Result;
use tracing::{info, warn};

use crate::ctx::{Ctx, RunRecord};
use crate::pipeline::Stage;

/// Parses every input with full schema checks; trains and writes nothing.
pub struct StageValidate;

impl StageValidate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for StageValidate {
    fn name(&self) -> &'static str {
        "stage_validate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let reader = ctx.reader();
        match reader.get_training_data()? {
            Some(training) => {
                ctx.training_rows = training.len();
                ctx.training_artifacts = training.n_artifacts();
            }
            None => {
                warn!(root = %ctx.training_input.display(), "training file missing");
                ctx.warnings.push(format!(
                    "no training file under {}",
                    ctx.training_input.display()
                ));
            }
        }

        for item in reader.get_confounds()? {
            let (identifier, data) = item?;
            if identifier.is_empty() {
                ctx.warnings.push(format!(
                    "run {} has no parseable identifier",
                    ctx.runs.len() + 1
                ));
            }
            ctx.runs.push(RunRecord {
                identifier,
                n_volumes: data.n_volumes(),
                n_artifacts: 0,
                realignment_file: None,
                plots: Vec::new(),
            });
        }
        info!(runs = ctx.runs.len(), "inputs_valid");
        Ok(())
    }
}
