//! Feedback command implementation

use anyhow::{bail, Result};
use repoquiz::classifier::{self, ClassifierStore, FeedbackLog};
use repoquiz::models::{Company, Difficulty, LabeledQuestion};
use std::str::FromStr;

pub fn run(
    store: &ClassifierStore,
    log: &FeedbackLog,
    question: &str,
    context: &str,
    difficulty: &str,
    companies: &[String],
) -> Result<()> {
    if question.trim().is_empty() {
        bail!("question text must not be empty");
    }
    let difficulty = Difficulty::from_str(difficulty).map_err(anyhow::Error::msg)?;
    if companies.is_empty() {
        bail!("at least one company label is required (e.g. --companies FAANG,FinTech)");
    }
    let companies = companies
        .iter()
        .map(|s| Company::from_str(s).map_err(anyhow::Error::msg))
        .collect::<Result<Vec<Company>>>()?;

    let labeled = LabeledQuestion::new(question, context, difficulty, companies);
    let retrained = classifier::record_feedback(store, log, &labeled)?;
    let total = log.len()?;

    println!("Recorded feedback ({total} labeled examples)");
    if retrained {
        println!("Models retrained and saved to {}", store.dir().display());
    }
    Ok(())
}
