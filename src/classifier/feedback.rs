//! Feedback collection for training data
//!
//! Accumulates user-labeled questions in JSONL format. The log is
//! append-only with a size cap: once the cap is exceeded the oldest entries
//! are dropped so the file cannot grow without bound.

use crate::models::{Company, Difficulty, LabeledQuestion};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Default cap on retained feedback entries
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Append-only labeled-question log
pub struct FeedbackLog {
    path: PathBuf,
    max_entries: usize,
}

impl FeedbackLog {
    /// Log file inside the given data directory
    pub fn new(dir: &Path) -> Self {
        Self::with_path(dir.join("training_data.jsonl"))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one labeled question and return the new log length.
    ///
    /// When the cap is exceeded the file is rewritten keeping the most
    /// recent `max_entries` entries.
    pub fn append(&self, labeled: &LabeledQuestion) -> std::io::Result<usize> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(labeled)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{json}")?;

        let mut entries = self.load_all()?;
        if entries.len() > self.max_entries {
            let drop = entries.len() - self.max_entries;
            entries.drain(..drop);
            self.rewrite(&entries)?;
            tracing::debug!("feedback log capped at {} entries", self.max_entries);
        }
        Ok(entries.len().min(self.max_entries))
    }

    /// Load every retained entry, skipping unparseable lines
    pub fn load_all(&self) -> std::io::Result<Vec<LabeledQuestion>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LabeledQuestion>(&line) {
                Ok(labeled) => entries.push(labeled),
                Err(e) => tracing::debug!("skipping malformed feedback line: {e}"),
            }
        }
        Ok(entries)
    }

    pub fn len(&self) -> std::io::Result<usize> {
        Ok(self.load_all()?.len())
    }

    pub fn is_empty(&self) -> std::io::Result<bool> {
        Ok(self.len()? == 0)
    }

    fn rewrite(&self, entries: &[LabeledQuestion]) -> std::io::Result<()> {
        let mut out = String::new();
        for entry in entries {
            out.push_str(&serde_json::to_string(entry)?);
            out.push('\n');
        }
        std::fs::write(&self.path, out)
    }

    /// Summary statistics over the retained log
    pub fn stats(&self) -> std::io::Result<FeedbackStats> {
        let entries = self.load_all()?;

        let mut by_difficulty = [0_usize; 3];
        let mut by_company = [0_usize; 6];
        for entry in &entries {
            by_difficulty[entry.difficulty.index()] += 1;
            for company in &entry.companies {
                by_company[company.index()] += 1;
            }
        }

        Ok(FeedbackStats {
            total: entries.len(),
            by_difficulty,
            by_company,
        })
    }
}

/// Training data statistics
#[derive(Debug)]
pub struct FeedbackStats {
    pub total: usize,
    /// Counts indexed by `Difficulty::index`
    pub by_difficulty: [usize; 3],
    /// Counts indexed by `Company::index`
    pub by_company: [usize; 6],
}

impl std::fmt::Display for FeedbackStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Training Data Statistics:")?;
        writeln!(f, "  Total examples: {}", self.total)?;
        writeln!(f, "\n  By difficulty:")?;
        for level in Difficulty::ALL {
            writeln!(f, "    {}: {}", level, self.by_difficulty[level.index()])?;
        }
        writeln!(f, "\n  By company:")?;
        for company in Company::ALL {
            writeln!(f, "    {}: {}", company, self.by_company[company.index()])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(i: usize) -> LabeledQuestion {
        LabeledQuestion::new(
            format!("question number {i}"),
            "some context",
            Difficulty::Medium,
            vec![Company::Startups, Company::Retail],
        )
    }

    #[test]
    fn test_append_and_load() {
        let dir = TempDir::new().unwrap();
        let log = FeedbackLog::new(dir.path());

        assert_eq!(log.append(&sample(1)).unwrap(), 1);
        assert_eq!(log.append(&sample(2)).unwrap(), 2);

        let entries = log.load_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].question, "question number 1");
        assert_eq!(entries[1].difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("training_data.jsonl");
        let log = FeedbackLog::with_path(&path);
        log.append(&sample(1)).unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "this is not json").unwrap();
        log.append(&sample(2)).unwrap();

        assert_eq!(log.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_size_cap_drops_oldest() {
        let dir = TempDir::new().unwrap();
        let log = FeedbackLog::new(dir.path()).with_max_entries(3);

        for i in 0..5 {
            log.append(&sample(i)).unwrap();
        }

        let entries = log.load_all().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].question, "question number 2");
        assert_eq!(entries[2].question, "question number 4");
    }

    #[test]
    fn test_stats() {
        let dir = TempDir::new().unwrap();
        let log = FeedbackLog::new(dir.path());
        log.append(&sample(1)).unwrap();
        log.append(&LabeledQuestion::new(
            "hard one",
            "",
            Difficulty::Hard,
            vec![Company::Faang],
        ))
        .unwrap();

        let stats = log.stats().unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_difficulty[Difficulty::Medium.index()], 1);
        assert_eq!(stats.by_difficulty[Difficulty::Hard.index()], 1);
        assert_eq!(stats.by_company[Company::Faang.index()], 1);
        assert_eq!(stats.by_company[Company::Retail.index()], 1);
    }

    #[test]
    fn test_empty_log() {
        let dir = TempDir::new().unwrap();
        let log = FeedbackLog::new(dir.path());
        assert!(log.is_empty().unwrap());
        assert!(log.load_all().unwrap().is_empty());
    }
}
