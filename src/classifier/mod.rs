//! Question classification: difficulty level and asking-company profile
//!
//! Dual-path design: each classifier runs either as a trained statistical
//! model (TF-IDF vectors into a tree ensemble) or as a deterministic
//! rule-based fallback. The facade tries the statistical path first and
//! falls back when no artifact generation is loadable or when the company
//! model yields an empty set. Trained artifacts appear lazily after the
//! first successful training run; until then the rules are authoritative.

pub mod features;
pub mod feedback;
pub mod model;
pub mod rules;
pub mod store;
pub mod train;
pub mod vectorizer;

pub use features::extract_repo_features;
pub use feedback::{FeedbackLog, FeedbackStats};
pub use model::{CompanyModel, DifficultyModel};
pub use rules::{RuleBasedCompanies, RuleBasedDifficulty};
pub use store::{ArtifactSet, ArtifactStatus, ClassifierStore};
pub use train::{
    import_company_dataset, record_feedback, train_models, MIN_TRAINING_SAMPLES, RETRAIN_INTERVAL,
};
pub use vectorizer::TfidfVectorizer;

use crate::models::{Company, Difficulty, QuestionItem, RepoFeatures};
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors surfaced by the classification and training subsystem
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("training failed: {0}")]
    Training(String),

    #[error("artifact store error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("model encoding error: {0}")]
    Encode(#[from] bitcode::Error),
}

/// Classification seam shared by the statistical and rule-based variants
pub trait Classify {
    type Label;

    fn classify(&self, question: &str, context: &str, features: &RepoFeatures) -> Self::Label;
}

impl Classify for RuleBasedDifficulty {
    type Label = Difficulty;

    fn classify(&self, question: &str, _context: &str, _features: &RepoFeatures) -> Difficulty {
        RuleBasedDifficulty::classify(self, question)
    }
}

impl Classify for RuleBasedCompanies {
    type Label = BTreeSet<Company>;

    fn classify(
        &self,
        question: &str,
        context: &str,
        features: &RepoFeatures,
    ) -> BTreeSet<Company> {
        RuleBasedCompanies::classify(self, question, context, features)
    }
}

/// Statistical difficulty variant: vectorize `question + " " + context`,
/// argmax over the ensemble.
pub struct StatisticalDifficulty<'a> {
    pub vectorizer: &'a TfidfVectorizer,
    pub model: &'a DifficultyModel,
}

impl Classify for StatisticalDifficulty<'_> {
    type Label = Difficulty;

    fn classify(&self, question: &str, context: &str, _features: &RepoFeatures) -> Difficulty {
        let vector = self.vectorizer.transform(&format!("{question} {context}"));
        self.model.predict(&vector)
    }
}

/// Statistical company variant; may legitimately return an empty set
pub struct StatisticalCompanies<'a> {
    pub vectorizer: &'a TfidfVectorizer,
    pub model: &'a CompanyModel,
}

impl Classify for StatisticalCompanies<'_> {
    type Label = BTreeSet<Company>;

    fn classify(
        &self,
        question: &str,
        context: &str,
        _features: &RepoFeatures,
    ) -> BTreeSet<Company> {
        let vector = self.vectorizer.transform(&format!("{question} {context}"));
        self.model.predict(&vector)
    }
}

/// Per-call facade over the dual-path dispatch.
///
/// Loads the artifact generation once and answers any number of
/// classification calls against it. Read-only with respect to persisted
/// state.
pub struct QuestionClassifier {
    artifacts: Option<ArtifactSet>,
}

impl QuestionClassifier {
    pub fn from_store(store: &ClassifierStore) -> Self {
        Self {
            artifacts: store.load(),
        }
    }

    /// Whether the difficulty path would use a trained model
    pub fn has_difficulty_model(&self) -> bool {
        self.artifacts
            .as_ref()
            .is_some_and(|set| set.difficulty.is_some())
    }

    /// Whether the company path would try a trained model
    pub fn has_company_model(&self) -> bool {
        self.artifacts
            .as_ref()
            .is_some_and(|set| set.companies.is_some())
    }

    /// Classify difficulty. The model's single prediction is always
    /// accepted when artifacts are available; otherwise the rules decide.
    pub fn difficulty(&self, question: &str, context: &str) -> Difficulty {
        if let Some(set) = &self.artifacts {
            if let Some(model) = &set.difficulty {
                let stat = StatisticalDifficulty {
                    vectorizer: &set.vectorizer,
                    model,
                };
                return stat.classify(question, context, &RepoFeatures::default());
            }
        }
        RuleBasedDifficulty.classify(question)
    }

    /// Classify companies. An empty model prediction falls back to the
    /// rules, so the result is never empty.
    pub fn companies(
        &self,
        question: &str,
        context: &str,
        features: &RepoFeatures,
    ) -> BTreeSet<Company> {
        if let Some(set) = &self.artifacts {
            if let Some(model) = &set.companies {
                let stat = StatisticalCompanies {
                    vectorizer: &set.vectorizer,
                    model,
                };
                let predicted = stat.classify(question, context, features);
                if !predicted.is_empty() {
                    return predicted;
                }
                tracing::debug!("company model returned an empty set; using rules");
            }
        }
        RuleBasedCompanies.classify(question, context, features)
    }
}

/// Classify the difficulty of one question against the persisted artifacts
pub fn classify_question_difficulty(
    store: &ClassifierStore,
    question: &str,
    context: &str,
) -> Difficulty {
    QuestionClassifier::from_store(store).difficulty(question, context)
}

/// Classify the likely asking companies of one question. Never returns an
/// empty set.
pub fn classify_question_companies(
    store: &ClassifierStore,
    question: &str,
    context: &str,
    features: &RepoFeatures,
) -> BTreeSet<Company> {
    QuestionClassifier::from_store(store).companies(question, context, features)
}

/// A question annotated with both classification labels
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedQuestion {
    pub question: String,
    pub context: String,
    pub difficulty: Difficulty,
    pub companies: BTreeSet<Company>,
}

/// Classify a batch of generated questions, loading artifacts once
pub fn classify_questions(
    store: &ClassifierStore,
    questions: &[QuestionItem],
    features: &RepoFeatures,
) -> Vec<ClassifiedQuestion> {
    let classifier = QuestionClassifier::from_store(store);

    questions
        .iter()
        .map(|q| ClassifiedQuestion {
            question: q.question.clone(),
            context: q.context.clone(),
            difficulty: classifier.difficulty(&q.question, &q.context),
            companies: classifier.companies(&q.question, &q.context, features),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cold_start_uses_rules() {
        let dir = TempDir::new().unwrap();
        let store = ClassifierStore::with_dir(dir.path());
        let classifier = QuestionClassifier::from_store(&store);

        assert!(!classifier.has_difficulty_model());
        assert!(!classifier.has_company_model());
        assert_eq!(
            classifier.difficulty("How does this work?", ""),
            Difficulty::Easy
        );
        assert_eq!(
            classifier.companies("How does this work?", "", &RepoFeatures::default()),
            BTreeSet::from([Company::Startups])
        );
    }

    #[test]
    fn test_batch_classification_labels_every_question() {
        let dir = TempDir::new().unwrap();
        let store = ClassifierStore::with_dir(dir.path());
        let questions = vec![
            QuestionItem {
                question: "How does this work?".to_string(),
                context: String::new(),
            },
            QuestionItem {
                question: "Discuss the architecture, concurrency and security model".to_string(),
                context: "core design".to_string(),
            },
        ];

        let classified = classify_questions(&store, &questions, &RepoFeatures::default());
        assert_eq!(classified.len(), 2);
        assert_eq!(classified[0].difficulty, Difficulty::Easy);
        assert_eq!(classified[1].difficulty, Difficulty::Hard);
        for c in &classified {
            assert!(!c.companies.is_empty());
        }
    }
}
