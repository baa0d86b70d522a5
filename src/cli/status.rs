//! Status command implementation

use anyhow::Result;
use repoquiz::classifier::{ClassifierStore, FeedbackLog};

fn mark(present: bool) -> &'static str {
    if present {
        "present"
    } else {
        "absent"
    }
}

pub fn run(store: &ClassifierStore, log: &FeedbackLog) -> Result<()> {
    let status = store.status();
    println!("Artifact store: {}", store.dir().display());
    println!("  vectorizer:            {}", mark(status.vectorizer));
    println!("  difficulty classifier: {}", mark(status.difficulty));
    println!("  company classifier:    {}", mark(status.companies));
    if !status.vectorizer {
        println!("  (rule-based fallback is active)");
    }

    println!();
    println!("{}", log.stats()?);
    Ok(())
}
