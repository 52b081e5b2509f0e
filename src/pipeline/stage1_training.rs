use anyhow::{Result, bail};
use tracing::info;

use crate::classifier::{Classifier, RandomForest};
use crate::confounds::TRAINING_FILE_STEM;
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage1Training;

impl Stage1Training {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Training {
    fn name(&self) -> &'static str {
        "stage1_training"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let reader = ctx.reader();
        let Some(training) = reader.get_training_data()? else {
            bail!(
                "no {}.tsv or {}.csv found under {}; cannot train classifier",
                TRAINING_FILE_STEM,
                TRAINING_FILE_STEM,
                ctx.training_input.display()
            );
        };

        let mut classifier = Classifier::new(RandomForest::new(ctx.forest.clone()));
        classifier.train_on(&training)?;

        ctx.training_rows = training.len();
        ctx.training_artifacts = training.n_artifacts();
        ctx.classifier = Some(classifier);
        info!(
            rows = ctx.training_rows,
            artifacts = ctx.training_artifacts,
            trees = ctx.forest.n_trees,
            "classifier_ready"
        );
        Ok(())
    }
}
