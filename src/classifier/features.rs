//! Repository feature extraction
//!
//! Scans concatenated file contents and produces the fixed-schema
//! `RepoFeatures` counters plus the concatenated text itself. Counts are a
//! cheap, explainable proxy for domain signal strength: they feed the
//! rule-based company augmentation and are returned to callers as
//! justification metadata.

use crate::models::RepoFeatures;
use memchr::{memchr_iter, memmem};

// Keyword sets per counter. Matching is case-sensitive substring occurrence
// counting over the concatenated `"{path}\n{content}\n\n"` text, so file
// extensions in paths contribute alongside source-level markers.
const PYTHON_MARKERS: [&str; 3] = [".py", "import ", "def "];
const JAVASCRIPT_MARKERS: [&str; 3] = [".js", "function ", "const "];
const WEB_MARKERS: [&str; 3] = [".html", ".css", "<div"];
const API_MARKERS: [&str; 3] = ["/api", "fetch(", "http."];
const DB_MARKERS: [&str; 3] = ["SELECT", "INSERT", "database"];
const AUTH_MARKERS: [&str; 3] = ["auth", "login", "password"];
const SECURITY_MARKERS: [&str; 3] = ["security", "encrypt", "https"];
const ML_MARKERS: [&str; 3] = ["model", "train", "predict"];

/// Sum of substring occurrence counts for each marker
fn count_markers(haystack: &str, markers: &[&str]) -> u32 {
    markers
        .iter()
        .map(|m| memmem::find_iter(haystack.as_bytes(), m.as_bytes()).count() as u32)
        .sum()
}

/// Extract the feature bag and concatenated text from a repository snapshot.
///
/// `files` is a `(relative_path, content)` mapping already bounded and
/// extension-filtered by the collection step; iteration order is the input
/// order (the counters are order-independent). Never fails: an empty input
/// yields an all-zero bag and empty text.
pub fn extract_repo_features(files: &[(String, String)]) -> (RepoFeatures, String) {
    let mut full_text = String::new();
    for (path, content) in files {
        full_text.push_str(path);
        full_text.push('\n');
        full_text.push_str(content);
        full_text.push_str("\n\n");
    }

    let features = RepoFeatures {
        python_count: count_markers(&full_text, &PYTHON_MARKERS),
        javascript_count: count_markers(&full_text, &JAVASCRIPT_MARKERS),
        web_count: count_markers(&full_text, &WEB_MARKERS),
        api_count: count_markers(&full_text, &API_MARKERS),
        db_count: count_markers(&full_text, &DB_MARKERS),
        auth_count: count_markers(&full_text, &AUTH_MARKERS),
        security_count: count_markers(&full_text, &SECURITY_MARKERS),
        ml_count: count_markers(&full_text, &ML_MARKERS),
        file_count: files.len() as u32,
        total_lines: files
            .iter()
            .map(|(_, content)| memchr_iter(b'\n', content.as_bytes()).count() as u32)
            .sum(),
    };

    (features, full_text)
}
