use crate::ctx::Ctx;
use crate::math::stats::percent;

pub fn format_summary(ctx: &Ctx) -> String {
    let volumes: usize = ctx.runs.iter().map(|r| r.n_volumes).sum();
    let artifacts: usize = ctx.runs.iter().map(|r| r.n_artifacts).sum();

    let mut out = String::new();
    out.push_str(&format!("auto-motion v{}\n", ctx.tool_version));
    out.push_str(&format!(
        "Study: {}, format={}, training rows={}\n",
        ctx.study,
        ctx.variant.name(),
        ctx.training_rows
    ));
    out.push_str(&format!("Runs: {}\n", ctx.runs.len()));
    out.push_str(&format!(
        "Artifact volumes: {}/{} ({:.1}%)\n",
        artifacts,
        volumes,
        percent(artifacts, volumes)
    ));
    out
}
