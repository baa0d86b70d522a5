//! TF-IDF text vectorizer
//!
//! A bag-of-terms weighting model fit once per training cycle and shared by
//! both trained classifiers. The fitted vocabulary defines the feature space
//! the models are valid for; mixing a vectorizer with models fit against a
//! different vocabulary is prevented upstream by the artifact store.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Vocabulary cap: top terms by corpus frequency
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Minimum term length; shorter tokens carry little signal
const MIN_TERM_LEN: usize = 3;

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|w| w.len() >= MIN_TERM_LEN)
        .map(str::to_string)
        .collect()
}

/// Term-frequency / inverse-document-frequency vectorizer with a bounded
/// vocabulary and L2-normalized output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    max_features: usize,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            max_features,
        }
    }

    /// Number of features (fitted vocabulary size)
    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Fit vocabulary and IDF weights over the full corpus.
    ///
    /// Discards any prior fit: there is no incremental update. Ties in the
    /// frequency ranking break lexicographically so refitting the same
    /// corpus always produces the same vocabulary.
    pub fn fit(&mut self, documents: &[String]) {
        let mut doc_count: HashMap<String, usize> = HashMap::new();
        let mut term_count: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = tokenize(doc);
            for term in &terms {
                *term_count.entry(term.clone()).or_insert(0) += 1;
            }
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *doc_count.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&String, &usize)> = term_count.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        self.vocabulary = ranked
            .into_iter()
            .take(self.max_features)
            .enumerate()
            .map(|(idx, (term, _))| (term.clone(), idx))
            .collect();

        self.idf = vec![0.0; self.vocabulary.len()];
        let n_docs = documents.len() as f64;
        for (term, &idx) in &self.vocabulary {
            let df = doc_count.get(term).copied().unwrap_or(1) as f64;
            self.idf[idx] = (n_docs / df).ln() + 1.0;
        }
    }

    /// Transform one document into an L2-normalized TF-IDF vector of width
    /// `self.len()`. Out-of-vocabulary terms are ignored.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut tf = vec![0.0_f64; self.vocabulary.len()];
        let terms = tokenize(document);
        for term in &terms {
            if let Some(&idx) = self.vocabulary.get(term) {
                tf[idx] += 1.0;
            }
        }

        let total: f64 = tf.iter().sum();
        if total > 0.0 {
            for v in &mut tf {
                *v /= total;
            }
        }

        let mut tfidf: Vec<f64> = tf
            .iter()
            .zip(self.idf.iter())
            .map(|(&t, &i)| t * i)
            .collect();

        let norm = tfidf.iter().map(|&x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut tfidf {
                *v /= norm;
            }
        }
        tfidf
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}
