//! Trained ensemble models for question classification
//!
//! Both classifiers are one-vs-rest ensembles of gradient boosted decision
//! trees over TF-IDF vectors: one binary GBDT per difficulty level (argmax
//! wins, so the prediction is never empty) and one per company type
//! (threshold 0.5, so the prediction may be empty and the facade falls back
//! to rules).
//!
//! The gbdt crate internally uses `f32` while vectors arrive as `f64`;
//! conversion happens at the crate boundary. The binary convention is
//! label 1.0 for "in class" and -1.0 for "not in class" with the
//! `LogLikelyhood` loss producing calibrated probabilities.

use gbdt::config::Config;
use gbdt::decision_tree::Data;
use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ClassifierError;
use crate::models::{Company, Difficulty};

/// Boosting iterations per binary ensemble
const NUM_TREES: usize = 50;
/// Maximum tree depth
const MAX_DEPTH: u32 = 4;
/// Shrinkage / learning rate
const LEARNING_RATE: f32 = 0.1;

/// Probability at or above which a company label is included
const COMPANY_THRESHOLD: f32 = 0.5;

#[inline]
fn to_f32(vector: &[f64]) -> Vec<f32> {
    vector.iter().map(|&v| v as f32).collect()
}

/// Fit one binary GBDT: `labels[i]` is 1.0 when sample `i` belongs to the
/// class, -1.0 otherwise.
fn fit_binary(vectors: &[Vec<f64>], labels: &[f32], feature_width: usize) -> GBDT {
    let mut cfg = Config::new();
    cfg.set_feature_size(feature_width);
    cfg.set_max_depth(MAX_DEPTH);
    cfg.set_iterations(NUM_TREES);
    cfg.set_shrinkage(LEARNING_RATE);
    cfg.set_loss("LogLikelyhood");
    cfg.set_debug(false);
    cfg.set_training_optimization_level(2);
    cfg.set_min_leaf_size(1);

    let mut model = GBDT::new(&cfg);
    let mut training: Vec<Data> = vectors
        .iter()
        .zip(labels.iter())
        .map(|(v, &label)| Data::new_training_data(to_f32(v), 1.0_f32, label, None))
        .collect();
    model.fit(&mut training);
    model
}

/// Probability that a single vector belongs to the ensemble's class
fn predict_binary(model: &GBDT, vector: &[f64]) -> f32 {
    let data = vec![Data::new_test_data(to_f32(vector), None)];
    model.predict(&data).first().copied().unwrap_or(0.5)
}

fn validate_shapes(
    vectors: &[Vec<f64>],
    label_count: usize,
) -> Result<usize, ClassifierError> {
    if vectors.is_empty() {
        return Err(ClassifierError::Validation(
            "no training samples provided".into(),
        ));
    }
    if vectors.len() != label_count {
        return Err(ClassifierError::Validation(format!(
            "sample count ({}) does not match label count ({label_count})",
            vectors.len()
        )));
    }
    let width = vectors[0].len();
    if width == 0 {
        return Err(ClassifierError::Validation(
            "training vectors have zero width".into(),
        ));
    }
    if vectors.iter().any(|v| v.len() != width) {
        return Err(ClassifierError::Validation(
            "training vectors have inconsistent widths".into(),
        ));
    }
    Ok(width)
}

/// Single-label 3-class difficulty classifier
#[derive(Serialize, Deserialize)]
pub struct DifficultyModel {
    /// One binary ensemble per level, in `Difficulty::ALL` order
    ensembles: Vec<GBDT>,
    feature_width: usize,
}

impl DifficultyModel {
    /// Input width this model was fit against; must equal the paired
    /// vectorizer's vocabulary size to be valid for prediction.
    pub fn feature_width(&self) -> usize {
        self.feature_width
    }

    pub fn fit(vectors: &[Vec<f64>], labels: &[Difficulty]) -> Result<Self, ClassifierError> {
        let feature_width = validate_shapes(vectors, labels.len())?;

        let ensembles = Difficulty::ALL
            .into_iter()
            .map(|level| {
                let binary: Vec<f32> = labels
                    .iter()
                    .map(|&l| if l == level { 1.0 } else { -1.0 })
                    .collect();
                fit_binary(vectors, &binary, feature_width)
            })
            .collect();

        Ok(Self {
            ensembles,
            feature_width,
        })
    }

    /// Predict exactly one level: argmax of per-class probability, ties
    /// resolving to the lower level.
    pub fn predict(&self, vector: &[f64]) -> Difficulty {
        let mut best = Difficulty::Easy;
        let mut best_prob = f32::MIN;
        for (level, ensemble) in Difficulty::ALL.into_iter().zip(&self.ensembles) {
            let prob = predict_binary(ensemble, vector);
            if prob > best_prob {
                best_prob = prob;
                best = level;
            }
        }
        best
    }
}

/// Multi-label 6-class company classifier
#[derive(Serialize, Deserialize)]
pub struct CompanyModel {
    /// One binary ensemble per company, in `Company::ALL` order
    ensembles: Vec<GBDT>,
    feature_width: usize,
}

impl CompanyModel {
    pub fn feature_width(&self) -> usize {
        self.feature_width
    }

    pub fn fit(
        vectors: &[Vec<f64>],
        label_sets: &[Vec<Company>],
    ) -> Result<Self, ClassifierError> {
        let feature_width = validate_shapes(vectors, label_sets.len())?;

        let ensembles = Company::ALL
            .into_iter()
            .map(|company| {
                let binary: Vec<f32> = label_sets
                    .iter()
                    .map(|set| if set.contains(&company) { 1.0 } else { -1.0 })
                    .collect();
                fit_binary(vectors, &binary, feature_width)
            })
            .collect();

        Ok(Self {
            ensembles,
            feature_width,
        })
    }

    /// Predict the label set. May be empty; callers fall back to the
    /// rule-based classifier in that case.
    pub fn predict(&self, vector: &[f64]) -> BTreeSet<Company> {
        Company::ALL
            .into_iter()
            .zip(&self.ensembles)
            .filter(|(_, ensemble)| predict_binary(ensemble, vector) >= COMPANY_THRESHOLD)
            .map(|(company, _)| company)
            .collect()
    }
}
