//! Persistence for classifier artifacts
//!
//! The vectorizer and the two models are only valid as a co-versioned set:
//! a model fit against one vocabulary must never run against another. The
//! store enforces this by guarding load/save with one mutex, persisting via
//! temp-file + rename so readers never observe a torn artifact, and
//! discarding any loaded model whose feature width disagrees with the
//! loaded vectorizer.
//!
//! The vectorizer is stored as JSON; the models are stored as bitcode.
//! Trained ensembles carry non-finite leaf values (pure leaves under the
//! log-likelihood loss), which JSON cannot represent: serde_json writes
//! them as `null` and the reload fails.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::model::{CompanyModel, DifficultyModel};
use super::vectorizer::TfidfVectorizer;
use super::ClassifierError;

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const DIFFICULTY_MODEL_FILE: &str = "difficulty_classifier.bin";
pub const COMPANY_MODEL_FILE: &str = "company_classifier.bin";

/// A loaded, width-consistent artifact generation.
///
/// The vectorizer is always present; either model may be absent (cold
/// start, or a company-only import before any difficulty training).
pub struct ArtifactSet {
    pub vectorizer: TfidfVectorizer,
    pub difficulty: Option<DifficultyModel>,
    pub companies: Option<CompanyModel>,
}

/// Which artifact files currently exist on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactStatus {
    pub vectorizer: bool,
    pub difficulty: bool,
    pub companies: bool,
}

/// File-backed store for the artifact set
pub struct ClassifierStore {
    dir: PathBuf,
    guard: Mutex<()>,
}

impl ClassifierStore {
    /// Store under the platform data directory (`<data_dir>/repoquiz`)
    pub fn new() -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("repoquiz");
        Self::with_dir(dir)
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn status(&self) -> ArtifactStatus {
        ArtifactStatus {
            vectorizer: self.dir.join(VECTORIZER_FILE).exists(),
            difficulty: self.dir.join(DIFFICULTY_MODEL_FILE).exists(),
            companies: self.dir.join(COMPANY_MODEL_FILE).exists(),
        }
    }

    /// Load the current artifact set.
    ///
    /// Returns `None` when no vectorizer is persisted, when it fails to
    /// deserialize, or — per model — silently drops a model that is missing,
    /// corrupt, or fit against a different vocabulary width. Artifact
    /// absence is a recognized state, not an error: callers route to the
    /// rule-based path.
    pub fn load(&self) -> Option<ArtifactSet> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);

        let vectorizer: TfidfVectorizer =
            match self.read_json(VECTORIZER_FILE) {
                Ok(v) => v,
                Err(e) => {
                    tracing::debug!("no usable vectorizer artifact: {e}");
                    return None;
                }
            };
        let width = vectorizer.len();

        let difficulty = self
            .read_model::<DifficultyModel>(DIFFICULTY_MODEL_FILE, width, |m| m.feature_width());
        let companies =
            self.read_model::<CompanyModel>(COMPANY_MODEL_FILE, width, |m| m.feature_width());

        Some(ArtifactSet {
            vectorizer,
            difficulty,
            companies,
        })
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T, ClassifierError> {
        let content = fs::read_to_string(self.dir.join(name))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn read_model<T: serde::de::DeserializeOwned>(
        &self,
        name: &str,
        expected_width: usize,
        width_of: impl Fn(&T) -> usize,
    ) -> Option<T> {
        let bytes = match fs::read(self.dir.join(name)) {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("model artifact {name} unavailable: {e}");
                return None;
            }
        };
        let model: T = match bitcode::deserialize(&bytes) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!("model artifact {name} unreadable: {e}");
                return None;
            }
        };
        let width = width_of(&model);
        if width != expected_width {
            tracing::warn!(
                "model artifact {name} was fit for feature width {width} but the \
                 vectorizer has width {expected_width}; ignoring it"
            );
            return None;
        }
        Some(model)
    }

    /// Persist an artifact set as one unit.
    ///
    /// Each file is written to a temp path and renamed into place under the
    /// store mutex; files for models absent from the set are removed so a
    /// later load cannot pair a stale model with the new vectorizer.
    pub fn save(&self, set: &ArtifactSet) -> Result<(), ClassifierError> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        fs::create_dir_all(&self.dir)?;

        self.write_atomic(VECTORIZER_FILE, &serde_json::to_vec(&set.vectorizer)?)?;
        match &set.difficulty {
            Some(model) => self.write_atomic(DIFFICULTY_MODEL_FILE, &bitcode::serialize(model)?)?,
            None => self.remove_stale(DIFFICULTY_MODEL_FILE)?,
        }
        match &set.companies {
            Some(model) => self.write_atomic(COMPANY_MODEL_FILE, &bitcode::serialize(model)?)?,
            None => self.remove_stale(COMPANY_MODEL_FILE)?,
        }

        tracing::info!("persisted classifier artifacts to {}", self.dir.display());
        Ok(())
    }

    fn write_atomic(&self, name: &str, bytes: &[u8]) -> Result<(), ClassifierError> {
        let tmp = self.dir.join(format!("{name}.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, self.dir.join(name))?;
        Ok(())
    }

    fn remove_stale(&self, name: &str) -> Result<(), ClassifierError> {
        let path = self.dir.join(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Default for ClassifierStore {
    fn default() -> Self {
        Self::new()
    }
}
