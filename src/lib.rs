//! Motion artifact classification for fMRIPrep confound tables.
//!
//! Confound files are discovered and normalised to a canonical channel set,
//! a random forest trained on a labelled development sample flags artifact
//! volumes, and per-run realignment files plus study summaries are written.

pub mod classifier;
pub mod cli;
pub mod confounds;
pub mod ctx;
pub mod error;
pub mod identifier;
pub mod io;
pub mod math;
pub mod pipeline;
pub mod plot;
pub mod realignment;
pub mod schema;
pub mod summarize;

pub use classifier::{Classifier, ForestConfig, Learner, RandomForest, StandardScaler};
pub use confounds::{ConfoundTable, ConfoundsFileReader, FormatVariant, TrainingSet};
pub use identifier::Identifier;
pub use realignment::{Realignment, RealignmentMode};
pub use summarize::Summarize;
