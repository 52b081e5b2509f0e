use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use auto_motion::cli::{Cli, Commands, RunArgs, ValidateArgs};
use auto_motion::confounds::FormatVariant;
use auto_motion::ctx::Ctx;
use auto_motion::io;
use auto_motion::pipeline::Pipeline;
use auto_motion::pipeline::stage_validate::StageValidate;
use auto_motion::plot::FigureOptions;
use auto_motion::realignment::RealignmentMode;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Validate(args) => validate(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let mut ctx = Ctx::new(args.input, args.out, &args.study, env!("CARGO_PKG_VERSION"));
    if let Some(training) = args.training {
        ctx.training_input = training;
    }
    ctx.variant = variant(args.legacy);
    ctx.realignment_mode = RealignmentMode::from_no_euclidean(args.no_euclidean);
    ctx.write_rp = !args.no_rp;
    ctx.write_plots = !args.no_plot;
    ctx.write_json = args.json;
    ctx.figure = FigureOptions {
        height_in: args.fig_height,
        width_in: args.fig_width,
        dpi: args.fig_dpi,
    };
    if !args.fig_indicators.is_empty() {
        ctx.fig_indicators = args.fig_indicators;
    }
    ctx.forest.n_trees = args.trees;
    ctx.forest.seed = args.seed;
    ctx.forest.threads = args.threads;

    Pipeline::full().run(&mut ctx)?;

    print!("{}", io::summary::format_summary(&ctx));
    print_warnings(&ctx);
    Ok(())
}

fn validate(args: ValidateArgs) -> Result<()> {
    let mut ctx = Ctx::new(
        args.input,
        std::path::PathBuf::from("."),
        "validate",
        env!("CARGO_PKG_VERSION"),
    );
    if let Some(training) = args.training {
        ctx.training_input = training;
    }
    ctx.variant = variant(args.legacy);

    let pipeline = Pipeline::new(vec![Box::new(StageValidate::new())]);
    pipeline.run(&mut ctx)?;

    println!("auto-motion validate ok");
    println!("training rows: {}", ctx.training_rows);
    println!("runs: {}", ctx.runs.len());
    println!(
        "volumes: {}",
        ctx.runs.iter().map(|r| r.n_volumes).sum::<usize>()
    );
    print_warnings(&ctx);
    Ok(())
}

fn variant(legacy: bool) -> FormatVariant {
    if legacy {
        FormatVariant::LegacyV1_1
    } else {
        FormatVariant::Current
    }
}

fn print_warnings(ctx: &Ctx) {
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
}
