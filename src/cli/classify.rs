//! Classify command implementation

use anyhow::Result;
use repoquiz::classifier::{self, ClassifierStore};
use repoquiz::models::RepoFeatures;
use repoquiz::repo;
use std::path::Path;

pub fn run(
    store: &ClassifierStore,
    question: &str,
    context: &str,
    path: Option<&Path>,
    json: bool,
) -> Result<()> {
    // Without a repository the feature-threshold rules simply see zeros
    let features = match path {
        Some(p) => super::analyze::load_context(p, repo::MAX_FILES)?
            .features
            .clone(),
        None => RepoFeatures::default(),
    };

    let difficulty = classifier::classify_question_difficulty(store, question, context);
    let companies = classifier::classify_question_companies(store, question, context, &features);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "question": question,
                "difficulty": difficulty,
                "companies": companies,
            }))?
        );
    } else {
        let companies: Vec<String> = companies.iter().map(ToString::to_string).collect();
        println!("difficulty: {difficulty}");
        println!("companies:  {}", companies.join(", "));
    }
    Ok(())
}
