//! Import command implementation

use anyhow::{Context, Result};
use repoquiz::classifier::{self, ClassifierStore};
use repoquiz::models::CompanyExample;
use std::path::Path;

pub fn run(store: &ClassifierStore, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let items: Vec<CompanyExample> =
        serde_json::from_str(&raw).context("Failed to parse company dataset")?;

    let count = classifier::import_company_dataset(store, &items)?;
    println!("Imported {count} company-labeled examples");
    Ok(())
}
