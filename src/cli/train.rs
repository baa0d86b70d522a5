//! Train command implementation

use anyhow::{bail, Result};
use repoquiz::classifier::{self, ClassifierStore, FeedbackLog, MIN_TRAINING_SAMPLES};

pub fn run(store: &ClassifierStore, log: &FeedbackLog) -> Result<()> {
    let samples = log.load_all()?;
    if samples.len() < MIN_TRAINING_SAMPLES {
        bail!(
            "Need at least {MIN_TRAINING_SAMPLES} labeled examples, found {}. \
             Use `repoquiz feedback` to label questions first.",
            samples.len()
        );
    }

    if classifier::train_models(store, &samples)? {
        println!(
            "Trained classifiers on {} examples\nArtifacts saved to {}",
            samples.len(),
            store.dir().display()
        );
        Ok(())
    } else {
        bail!("Training data was unusable; artifacts were left untouched")
    }
}
