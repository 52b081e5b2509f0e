use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::json_writer;
use crate::pipeline::Stage;

pub struct Stage3Output;

impl Stage3Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Output {
    fn name(&self) -> &'static str {
        "stage3_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        ctx.summary.write()?;
        if ctx.write_json {
            let report = json_writer::build_report(ctx);
            json_writer::write_json(&ctx.output.json_path, &report)?;
            info!(path = %ctx.output.json_path.display(), "report written");
        }
        info!("stage3_output_ready");
        Ok(())
    }
}
