use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "auto-motion",
    version,
    about = "Classify motion artifact volumes in fMRIPrep confound tables"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Run(RunArgs),
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, help = "Root directory searched recursively for confound files")]
    pub input: PathBuf,

    #[arg(long, help = "Directory holding development_sample.tsv (defaults to --input)")]
    pub training: Option<PathBuf>,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, help = "Study name used to prefix summary files")]
    pub study: String,

    #[arg(long, default_value_t = false, help = "Read fMRIPrep 1.1 *_confounds.tsv files")]
    pub legacy: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Write raw realignment parameters instead of Euclidean norms"
    )]
    pub no_euclidean: bool,

    #[arg(long, default_value_t = false, help = "Skip realignment text files")]
    pub no_rp: bool,

    #[arg(long, default_value_t = false, help = "Skip diagnostic plots")]
    pub no_plot: bool,

    #[arg(long = "fig-indicator", help = "Confound channel to plot (repeatable)")]
    pub fig_indicators: Vec<String>,

    #[arg(long, default_value_t = 5.5, help = "Plot height in inches")]
    pub fig_height: f64,

    #[arg(long, default_value_t = 7.0, help = "Plot width in inches")]
    pub fig_width: f64,

    #[arg(long, default_value_t = 250, help = "Plot resolution in dots per inch")]
    pub fig_dpi: u32,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = 100, help = "Number of trees in the forest")]
    pub trees: usize,

    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, help = "Root directory searched recursively for confound files")]
    pub input: PathBuf,

    #[arg(long, help = "Directory holding development_sample.tsv (defaults to --input)")]
    pub training: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub legacy: bool,
}
