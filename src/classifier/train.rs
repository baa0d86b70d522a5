//! Training and retraining pipeline
//!
//! Refits the vectorizer and both models from accumulated feedback and
//! persists all three artifacts as one generation. Training is
//! all-or-nothing: either every artifact is replaced or none are. Data-shape
//! problems detectable in advance (too few samples, empty vocabulary) are
//! reported as a `false` outcome rather than an error.

use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use super::feedback::FeedbackLog;
use super::model::{CompanyModel, DifficultyModel};
use super::store::{ArtifactSet, ClassifierStore};
use super::vectorizer::TfidfVectorizer;
use super::ClassifierError;
use crate::models::{Company, CompanyExample, LabeledQuestion};

/// Automatic retrain fires when the feedback log length becomes a multiple
/// of this after an append
pub const RETRAIN_INTERVAL: usize = 10;

/// Minimum samples for a (manual) training run
pub const MIN_TRAINING_SAMPLES: usize = 5;

/// Separately-imported company dataset log
pub const COMPANY_DATA_FILE: &str = "company_training_data.jsonl";

/// Fit vectorizer + difficulty model + company model from labeled feedback
/// and persist them as one artifact generation.
///
/// Returns `Ok(true)` on success, `Ok(false)` when the data is unusable
/// (checked before any fit, leaving prior artifacts untouched), and `Err`
/// only for fit/persist failures — which also leave prior artifacts
/// untouched, since persistence happens last and atomically.
pub fn train_models(
    store: &ClassifierStore,
    samples: &[LabeledQuestion],
) -> Result<bool, ClassifierError> {
    if samples.len() < MIN_TRAINING_SAMPLES {
        tracing::warn!(
            "not training: {} samples accumulated, {MIN_TRAINING_SAMPLES} required",
            samples.len()
        );
        return Ok(false);
    }

    let corpus: Vec<String> = samples.iter().map(|s| s.training_text()).collect();
    let mut vectorizer = TfidfVectorizer::default();
    vectorizer.fit(&corpus);
    if vectorizer.is_empty() {
        tracing::warn!("not training: corpus produced an empty vocabulary");
        return Ok(false);
    }

    let vectors: Vec<Vec<f64>> = corpus.iter().map(|t| vectorizer.transform(t)).collect();
    let difficulty_labels: Vec<_> = samples.iter().map(|s| s.difficulty).collect();
    let company_labels: Vec<Vec<Company>> =
        samples.iter().map(|s| s.companies.clone()).collect();

    let difficulty = DifficultyModel::fit(&vectors, &difficulty_labels)?;
    let companies = CompanyModel::fit(&vectors, &company_labels)?;

    store.save(&ArtifactSet {
        vectorizer,
        difficulty: Some(difficulty),
        companies: Some(companies),
    })?;

    tracing::info!("trained classifiers on {} samples", samples.len());
    Ok(true)
}

/// Append one labeled question to the feedback log and retrain when the log
/// length reaches a multiple of [`RETRAIN_INTERVAL`].
///
/// Returns whether a retrain ran (and succeeded).
pub fn record_feedback(
    store: &ClassifierStore,
    log: &FeedbackLog,
    labeled: &LabeledQuestion,
) -> Result<bool, ClassifierError> {
    let len = log.append(labeled)?;
    if len >= RETRAIN_INTERVAL && len % RETRAIN_INTERVAL == 0 {
        tracing::info!("feedback log reached {len} entries; retraining");
        return train_models(store, &log.load_all()?);
    }
    Ok(false)
}

/// Bulk-import an externally supplied company-labeled dataset.
///
/// Every item is validated before any model work: a single invalid item
/// rejects the whole batch. The persisted vectorizer is reused when present
/// (keeping any difficulty model paired with its vocabulary); otherwise a
/// fresh one is fit over the imported corpus. Only the company model is
/// (re)fit. Returns the number of imported items.
pub fn import_company_dataset(
    store: &ClassifierStore,
    items: &[CompanyExample],
) -> Result<usize, ClassifierError> {
    if items.len() < MIN_TRAINING_SAMPLES {
        return Err(ClassifierError::Validation(format!(
            "company dataset has {} items, {MIN_TRAINING_SAMPLES} required",
            items.len()
        )));
    }

    let mut label_sets: Vec<Vec<Company>> = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if item.question.trim().is_empty() {
            return Err(ClassifierError::Validation(format!(
                "item {i}: missing question text"
            )));
        }
        if item.companies.is_empty() {
            return Err(ClassifierError::Validation(format!(
                "item {i}: companies list is empty"
            )));
        }
        let mut labels = Vec::with_capacity(item.companies.len());
        for raw in &item.companies {
            let company = Company::from_str(raw)
                .map_err(|e| ClassifierError::Validation(format!("item {i}: {e}")))?;
            labels.push(company);
        }
        label_sets.push(labels);
    }

    let corpus: Vec<String> = items
        .iter()
        .map(|item| format!("{} {}", item.question, item.context))
        .collect();

    let existing = store.load();
    let (vectorizer, difficulty) = match existing {
        Some(set) => (set.vectorizer, set.difficulty),
        None => {
            let mut fresh = TfidfVectorizer::default();
            fresh.fit(&corpus);
            if fresh.is_empty() {
                return Err(ClassifierError::Validation(
                    "company dataset produced an empty vocabulary".into(),
                ));
            }
            (fresh, None)
        }
    };

    let vectors: Vec<Vec<f64>> = corpus.iter().map(|t| vectorizer.transform(t)).collect();
    let companies = CompanyModel::fit(&vectors, &label_sets)?;

    store.save(&ArtifactSet {
        vectorizer,
        difficulty,
        companies: Some(companies),
    })?;
    append_company_log(store.dir(), items)?;

    tracing::info!("imported {} company-labeled items", items.len());
    Ok(items.len())
}

fn append_company_log(dir: &Path, items: &[CompanyExample]) -> Result<(), ClassifierError> {
    std::fs::create_dir_all(dir)?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(COMPANY_DATA_FILE))?;
    for item in items {
        writeln!(file, "{}", serde_json::to_string(item)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use tempfile::TempDir;

    fn labeled(question: &str, difficulty: Difficulty, companies: Vec<Company>) -> LabeledQuestion {
        LabeledQuestion::new(question, "from the training corpus", difficulty, companies)
    }

    fn training_samples() -> Vec<LabeledQuestion> {
        let mut samples = Vec::new();
        for i in 0..6 {
            samples.push(labeled(
                &format!("how does the checkout cart promotion work {i}"),
                Difficulty::Easy,
                vec![Company::Retail],
            ));
            samples.push(labeled(
                &format!("explain the distributed consensus sharding design {i}"),
                Difficulty::Hard,
                vec![Company::Faang],
            ));
        }
        samples
    }

    #[test]
    fn test_too_few_samples_is_rejected_without_artifacts() {
        let dir = TempDir::new().unwrap();
        let store = ClassifierStore::with_dir(dir.path());
        let samples = training_samples()[..3].to_vec();

        assert!(!train_models(&store, &samples).unwrap());
        assert!(store.load().is_none(), "no artifacts may be written");
    }

    #[test]
    fn test_train_persists_full_artifact_set() {
        let dir = TempDir::new().unwrap();
        let store = ClassifierStore::with_dir(dir.path());

        assert!(train_models(&store, &training_samples()).unwrap());

        let set = store.load().expect("artifacts persisted");
        assert!(set.difficulty.is_some());
        assert!(set.companies.is_some());
        assert_eq!(set.difficulty.unwrap().feature_width(), set.vectorizer.len());
    }

    #[test]
    fn test_record_feedback_retrains_on_interval() {
        let dir = TempDir::new().unwrap();
        let store = ClassifierStore::with_dir(dir.path());
        let log = FeedbackLog::new(dir.path());

        let samples = training_samples();
        for (i, sample) in samples.iter().take(9).enumerate() {
            let retrained = record_feedback(&store, &log, sample).unwrap();
            assert!(!retrained, "no retrain expected at entry {}", i + 1);
        }
        assert!(store.load().is_none());

        // The 10th append crosses the interval
        assert!(record_feedback(&store, &log, &samples[9]).unwrap());
        assert!(store.load().is_some());
    }

    #[test]
    fn test_import_rejects_unknown_company_wholesale() {
        let dir = TempDir::new().unwrap();
        let store = ClassifierStore::with_dir(dir.path());

        let mut items: Vec<CompanyExample> = (0..6)
            .map(|i| CompanyExample {
                question: format!("how is the patient intake form validated {i}"),
                context: String::new(),
                companies: vec!["Healthcare".to_string()],
            })
            .collect();
        items[4].companies = vec!["Academia".to_string()];

        let err = import_company_dataset(&store, &items).unwrap_err();
        assert!(matches!(err, ClassifierError::Validation(_)));
        assert!(store.load().is_none(), "rejected import must not fit anything");
        assert!(!dir.path().join(COMPANY_DATA_FILE).exists());
    }

    #[test]
    fn test_import_fits_company_model_and_logs() {
        let dir = TempDir::new().unwrap();
        let store = ClassifierStore::with_dir(dir.path());

        let items: Vec<CompanyExample> = (0..6)
            .map(|i| CompanyExample {
                question: format!("how are fraud transactions settled {i}"),
                context: "ledger".to_string(),
                companies: vec!["FinTech".to_string()],
            })
            .collect();

        assert_eq!(import_company_dataset(&store, &items).unwrap(), 6);

        let set = store.load().expect("artifacts persisted");
        assert!(set.companies.is_some());
        assert!(set.difficulty.is_none(), "import does not invent a difficulty model");
        assert!(dir.path().join(COMPANY_DATA_FILE).exists());
    }

    #[test]
    fn test_import_reuses_existing_vectorizer() {
        let dir = TempDir::new().unwrap();
        let store = ClassifierStore::with_dir(dir.path());

        assert!(train_models(&store, &training_samples()).unwrap());
        let before = store.load().unwrap();
        let width_before = before.vectorizer.len();

        let items: Vec<CompanyExample> = (0..6)
            .map(|i| CompanyExample {
                question: format!("completely new vocabulary words appear here {i}"),
                context: String::new(),
                companies: vec!["Enterprise".to_string()],
            })
            .collect();
        import_company_dataset(&store, &items).unwrap();

        let after = store.load().unwrap();
        assert_eq!(after.vectorizer.len(), width_before, "vectorizer must be reused");
        assert!(after.difficulty.is_some(), "difficulty model stays valid");
        assert!(after.companies.is_some());
    }
}
