//! Core data models for Repoquiz
//!
//! Label enums for question classification, the repository feature schema,
//! and the wire shapes exchanged with the external question generator.

use serde::{Deserialize, Serialize};

/// Question difficulty levels, ordered by increasing complexity signal
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All levels, in label-index order
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Class index used by the trained models
    pub fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "unknown difficulty '{other}' (expected Easy, Medium, or Hard)"
            )),
        }
    }
}

/// Company categories likely to ask a question.
///
/// Multi-label: a question may map to any subset. Classification never
/// returns an empty set (defaults to `Startups`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Company {
    Startups,
    #[serde(rename = "FAANG")]
    Faang,
    FinTech,
    Enterprise,
    Healthcare,
    Retail,
}

impl Company {
    /// All company types, in label-index order
    pub const ALL: [Company; 6] = [
        Company::Startups,
        Company::Faang,
        Company::FinTech,
        Company::Enterprise,
        Company::Healthcare,
        Company::Retail,
    ];

    /// Label index used by the multi-label model
    pub fn index(self) -> usize {
        match self {
            Company::Startups => 0,
            Company::Faang => 1,
            Company::FinTech => 2,
            Company::Enterprise => 3,
            Company::Healthcare => 4,
            Company::Retail => 5,
        }
    }
}

impl std::fmt::Display for Company {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Company::Startups => write!(f, "Startups"),
            Company::Faang => write!(f, "FAANG"),
            Company::FinTech => write!(f, "FinTech"),
            Company::Enterprise => write!(f, "Enterprise"),
            Company::Healthcare => write!(f, "Healthcare"),
            Company::Retail => write!(f, "Retail"),
        }
    }
}

impl std::str::FromStr for Company {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "startups" | "startup" => Ok(Company::Startups),
            "faang" => Ok(Company::Faang),
            "fintech" => Ok(Company::FinTech),
            "enterprise" => Ok(Company::Enterprise),
            "healthcare" => Ok(Company::Healthcare),
            "retail" => Ok(Company::Retail),
            other => Err(format!(
                "unknown company type '{other}' (expected one of Startups, FAANG, FinTech, Enterprise, Healthcare, Retail)"
            )),
        }
    }
}

/// Fixed-schema numeric feature bag derived from repository content.
///
/// Every counter is always present; an absent signal is simply zero.
/// Derived once per analysis request and immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoFeatures {
    pub python_count: u32,
    pub javascript_count: u32,
    pub web_count: u32,
    pub api_count: u32,
    pub db_count: u32,
    pub auth_count: u32,
    pub security_count: u32,
    pub ml_count: u32,
    pub file_count: u32,
    pub total_lines: u32,
}

/// A `(question, context)` pair as produced by the external generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionItem {
    pub question: String,
    #[serde(default)]
    pub context: String,
}

/// Output of the external question generator.
///
/// When the generator fails to produce structured JSON it falls back to a
/// `{"raw_response": ...}` shape, which must pass through classification
/// unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedQuestions {
    Parsed(Vec<QuestionItem>),
    Raw { raw_response: String },
}

/// A user-labeled training example, appended to the feedback log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledQuestion {
    pub question: String,
    #[serde(default)]
    pub context: String,
    pub difficulty: Difficulty,
    pub companies: Vec<Company>,
    #[serde(default)]
    pub timestamp: String,
}

impl LabeledQuestion {
    pub fn new(
        question: impl Into<String>,
        context: impl Into<String>,
        difficulty: Difficulty,
        companies: Vec<Company>,
    ) -> Self {
        Self {
            question: question.into(),
            context: context.into(),
            difficulty,
            companies,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Text representation used for vectorization
    pub fn training_text(&self) -> String {
        format!("{} {}", self.question, self.context)
    }
}

/// One item of an externally supplied company-labeled dataset.
///
/// Companies stay as raw strings until import-time validation so a single
/// bad value can be reported (and reject the whole batch) instead of
/// failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyExample {
    pub question: String,
    #[serde(default)]
    pub context: String,
    pub companies: Vec<String>,
}
