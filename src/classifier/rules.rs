//! Rule-based fallback classifiers
//!
//! Deterministic heuristics used whenever no trained artifact set is
//! available, or when the company model yields no usable answer. The keyword
//! tables double as the bootstrapping label source before enough feedback
//! exists to train real models.

use crate::models::{Company, Difficulty, RepoFeatures};
use std::collections::BTreeSet;

/// Technical vocabulary that pushes a question toward higher difficulty
const TECHNICAL_TERMS: [&str; 10] = [
    "architecture",
    "pattern",
    "optimization",
    "scale",
    "complexity",
    "algorithm",
    "design",
    "performance",
    "concurrency",
    "security",
];

/// Domain vocabulary per company type. Any substring hit in the lowercased
/// question+context includes that company in the result.
fn company_terms(company: Company) -> &'static [&'static str] {
    match company {
        Company::Startups => &[
            "mvp",
            "startup",
            "prototype",
            "launch",
            "iterate",
            "pivot",
            "agile",
            "lean",
            "user",
            "interface",
            "feature",
            "growth",
            "greenfield",
        ],
        Company::Faang => &[
            "scale",
            "distributed",
            "performance",
            "algorithm",
            "optimization",
            "latency",
            "throughput",
            "sharding",
            "consensus",
            "load balanc",
            "replication",
            "infrastructure",
            "big data",
        ],
        Company::FinTech => &[
            "payment",
            "transaction",
            "security",
            "compliance",
            "ledger",
            "banking",
            "fraud",
            "encryption",
            "audit",
            "settlement",
            "currency",
            "regulatory",
        ],
        Company::Enterprise => &[
            "api",
            "service",
            "microservice",
            "integration",
            "legacy",
            "middleware",
            "governance",
            "on-premise",
            "workflow",
            "directory",
            "single sign-on",
            "migration",
        ],
        Company::Healthcare => &[
            "patient",
            "health",
            "medical",
            "clinical",
            "hipaa",
            "diagnosis",
            "hospital",
            "prescription",
            "telemedicine",
            "insurance",
            "records",
            "privacy",
        ],
        Company::Retail => &[
            "customer",
            "product",
            "inventory",
            "order",
            "checkout",
            "cart",
            "catalog",
            "pricing",
            "shipment",
            "promotion",
            "loyalty",
            "e-commerce",
        ],
    }
}

/// Word-count / technical-term heuristic for question difficulty.
///
/// A pure, total function: every input maps to exactly one level.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedDifficulty;

impl RuleBasedDifficulty {
    pub fn classify(&self, question: &str) -> Difficulty {
        let word_count = question.split_whitespace().count();
        let lower = question.to_lowercase();
        let tech_count = TECHNICAL_TERMS.iter().filter(|t| lower.contains(*t)).count();

        if word_count > 20 || tech_count >= 3 {
            Difficulty::Hard
        } else if word_count > 10 || tech_count >= 1 {
            Difficulty::Medium
        } else {
            Difficulty::Easy
        }
    }
}

/// Keyword-category heuristic plus repository-level threshold rules for
/// company classification.
///
/// The threshold rules inject repository signal independent of question
/// phrasing. The result is never empty: `{Startups}` is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedCompanies;

impl RuleBasedCompanies {
    pub fn classify(
        &self,
        question: &str,
        context: &str,
        features: &RepoFeatures,
    ) -> BTreeSet<Company> {
        let text = format!("{question} {context}").to_lowercase();

        let mut companies: BTreeSet<Company> = Company::ALL
            .into_iter()
            .filter(|c| company_terms(*c).iter().any(|term| text.contains(term)))
            .collect();

        // Repository-level augmentation rules
        if features.ml_count > 10 {
            companies.insert(Company::Faang);
        }
        if features.web_count > 2 * features.api_count
            && !companies.contains(&Company::Startups)
            && !companies.contains(&Company::Retail)
        {
            companies.insert(Company::Startups);
        }
        if features.auth_count > 5 && features.security_count > 3 {
            companies.insert(Company::FinTech);
        }

        if companies.is_empty() {
            companies.insert(Company::Startups);
        }
        companies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Question text that matches no company term and no technical term
    const NEUTRAL_QUESTION: &str = "How does this work?";

    #[test]
    fn test_short_plain_question_is_easy() {
        assert_eq!(
            RuleBasedDifficulty.classify(NEUTRAL_QUESTION),
            Difficulty::Easy
        );
    }

    #[test]
    fn test_long_question_is_hard_without_technical_terms() {
        let question = "one two three four five six seven eight nine ten \
                        eleven twelve thirteen fourteen fifteen sixteen seventeen \
                        eighteen nineteen twenty twentyone twentytwo twentythree twentyfour twentyfive";
        assert_eq!(question.split_whitespace().count(), 25);
        assert_eq!(RuleBasedDifficulty.classify(question), Difficulty::Hard);
    }

    #[test]
    fn test_single_technical_term_is_medium() {
        assert_eq!(
            RuleBasedDifficulty.classify("Why this algorithm?"),
            Difficulty::Medium
        );
    }

    #[test]
    fn test_three_technical_terms_is_hard() {
        assert_eq!(
            RuleBasedDifficulty.classify("Discuss the architecture, concurrency and security here"),
            Difficulty::Hard
        );
    }

    #[test]
    fn test_difficulty_monotonic_in_technical_terms() {
        // Word count held at <= 10; adding matched terms never lowers the level
        let none = RuleBasedDifficulty.classify("How is the parser built?");
        let one = RuleBasedDifficulty.classify("How is the parser design built?");
        assert!(one >= none);
    }

    #[test]
    fn test_difficulty_is_idempotent() {
        let q = "Explain the optimization strategy used for caching at scale";
        assert_eq!(
            RuleBasedDifficulty.classify(q),
            RuleBasedDifficulty.classify(q)
        );
    }

    #[test]
    fn test_company_default_is_startups() {
        let result =
            RuleBasedCompanies.classify(NEUTRAL_QUESTION, "", &RepoFeatures::default());
        assert_eq!(result, BTreeSet::from([Company::Startups]));
    }

    #[test]
    fn test_company_keyword_matches() {
        let result = RuleBasedCompanies.classify(
            "How are payment transactions audited?",
            "",
            &RepoFeatures::default(),
        );
        assert!(result.contains(&Company::FinTech));

        let result = RuleBasedCompanies.classify(
            "How does the patient records module enforce privacy?",
            "",
            &RepoFeatures::default(),
        );
        assert!(result.contains(&Company::Healthcare));
    }

    #[test]
    fn test_company_context_is_inspected() {
        let result = RuleBasedCompanies.classify(
            NEUTRAL_QUESTION,
            "Relevant to the checkout and cart flow",
            &RepoFeatures::default(),
        );
        assert!(result.contains(&Company::Retail));
    }

    #[test]
    fn test_augmentation_rules_exact_bag() {
        // ml_count > 10 adds FAANG; auth_count > 5 && security_count > 3 adds
        // FinTech; web_count (2) is not > 2 * api_count (2), so the Startups
        // rule does not fire.
        let features = RepoFeatures {
            ml_count: 15,
            web_count: 2,
            api_count: 1,
            auth_count: 6,
            security_count: 4,
            file_count: 3,
            total_lines: 120,
            python_count: 5,
            javascript_count: 0,
            db_count: 0,
        };
        let result = RuleBasedCompanies.classify(NEUTRAL_QUESTION, "", &features);
        assert_eq!(result, BTreeSet::from([Company::Faang, Company::FinTech]));
    }

    #[test]
    fn test_web_heavy_repo_adds_startups() {
        let features = RepoFeatures {
            web_count: 9,
            api_count: 2,
            ..Default::default()
        };
        let result = RuleBasedCompanies.classify(NEUTRAL_QUESTION, "", &features);
        assert!(result.contains(&Company::Startups));
    }

    #[test]
    fn test_web_rule_skipped_when_retail_present() {
        let features = RepoFeatures {
            web_count: 9,
            api_count: 2,
            ..Default::default()
        };
        let result = RuleBasedCompanies.classify(
            "How is the inventory catalog priced?",
            "",
            &features,
        );
        assert!(result.contains(&Company::Retail));
        assert!(!result.contains(&Company::Startups));
    }

    #[test]
    fn test_company_result_never_empty() {
        let inputs = [
            ("", ""),
            ("?", ""),
            ("xyzzy", "plugh"),
            (NEUTRAL_QUESTION, ""),
        ];
        for (q, c) in inputs {
            let result = RuleBasedCompanies.classify(q, c, &RepoFeatures::default());
            assert!(!result.is_empty(), "empty set for question {q:?}");
        }
    }

    #[test]
    fn test_companies_are_idempotent() {
        let features = RepoFeatures {
            ml_count: 12,
            ..Default::default()
        };
        let a = RuleBasedCompanies.classify("How does scale affect the design?", "", &features);
        let b = RuleBasedCompanies.classify("How does scale affect the design?", "", &features);
        assert_eq!(a, b);
    }
}
