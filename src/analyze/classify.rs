//! Keyword heuristics for classifying issues and pull requests.

use once_cell::sync::Lazy;
use regex::Regex;

/// What an issue is about, judged from labels first, title second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Bug,
    Enhancement,
    Question,
    Other,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::Bug => "bug",
            IssueKind::Enhancement => "enhancement",
            IssueKind::Question => "question",
            IssueKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Critical,
    High,
    Normal,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }
}

/// Rough effort estimate from discussion volume and body size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

/// Pull request category, judged from the title's conventional-commit
/// prefix when present, keywords otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullCategory {
    Feature,
    Fix,
    Docs,
    Refactor,
    Chore,
    Other,
}

impl PullCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PullCategory::Feature => "feature",
            PullCategory::Fix => "fix",
            PullCategory::Docs => "docs",
            PullCategory::Refactor => "refactor",
            PullCategory::Chore => "chore",
            PullCategory::Other => "other",
        }
    }
}

static BUG_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(bug|crash|broken|error|regression|fails?|failure|failing)\b").unwrap()
});

static ENHANCEMENT_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(feature|enhancement|improve(ment)?|support|implement|add)\b").unwrap()
});

static QUESTION_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\?\s*$|\b(how (do|to|can)|question|why does|what is)\b").unwrap());

static CRITICAL_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(crash|data loss|security|vulnerability|urgent|critical)\b").unwrap()
});

static HIGH_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(regression|blocker|blocking|broken)\b").unwrap());

static LOW_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(typo|minor|nit|cosmetic)\b").unwrap());

/// Leading conventional-commit type: "feat(scope)!: ..." captures "feat".
static CONVENTIONAL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)([a-z]+)(\([^)]*\))?!?:").unwrap());

const CRITICAL_LABELS: &[&str] = &["critical", "urgent", "p0", "blocker"];
const HIGH_LABELS: &[&str] = &["high", "important", "p1"];
const LOW_LABELS: &[&str] = &["low", "minor", "p3", "nice-to-have"];

/// Classify an issue by its labels when they are conclusive, otherwise by
/// title keywords, in the fixed order bug, enhancement, question.
pub fn classify_issue_kind(labels: &[String], title: &str) -> IssueKind {
    for label in labels {
        let label = label.to_lowercase();
        if label.contains("bug") {
            return IssueKind::Bug;
        }
        if label.contains("enhancement") || label.contains("feature") {
            return IssueKind::Enhancement;
        }
        if label.contains("question") {
            return IssueKind::Question;
        }
    }
    if BUG_TITLE.is_match(title) {
        IssueKind::Bug
    } else if ENHANCEMENT_TITLE.is_match(title) {
        IssueKind::Enhancement
    } else if QUESTION_TITLE.is_match(title) {
        IssueKind::Question
    } else {
        IssueKind::Other
    }
}

/// Priority from labels first, title keywords second. Defaults to normal.
pub fn classify_priority(labels: &[String], title: &str) -> Priority {
    for label in labels {
        let label = label.to_lowercase();
        if CRITICAL_LABELS.iter().any(|candidate| label.contains(candidate)) {
            return Priority::Critical;
        }
        if HIGH_LABELS.iter().any(|candidate| label.contains(candidate)) {
            return Priority::High;
        }
        if LOW_LABELS.iter().any(|candidate| label.contains(candidate)) {
            return Priority::Low;
        }
    }
    if CRITICAL_TITLE.is_match(title) {
        Priority::Critical
    } else if HIGH_TITLE.is_match(title) {
        Priority::High
    } else if LOW_TITLE.is_match(title) {
        Priority::Low
    } else {
        Priority::Normal
    }
}

/// Effort estimate from how much was written and how much was discussed.
pub fn classify_complexity(body_length: usize, comments: u64) -> Complexity {
    if comments >= 15 || body_length > 4000 {
        Complexity::High
    } else if comments >= 5 || body_length > 1500 {
        Complexity::Medium
    } else {
        Complexity::Low
    }
}

/// Categorize a pull request from its title.
pub fn classify_pull_category(title: &str) -> PullCategory {
    if let Some(captures) = CONVENTIONAL_PREFIX.captures(title) {
        match captures[1].to_lowercase().as_str() {
            "feat" | "feature" => return PullCategory::Feature,
            "fix" | "bugfix" | "hotfix" => return PullCategory::Fix,
            "docs" | "doc" => return PullCategory::Docs,
            "refactor" | "perf" | "style" => return PullCategory::Refactor,
            "chore" | "build" | "ci" | "test" | "deps" => return PullCategory::Chore,
            _ => {}
        }
    }
    let lower = title.to_lowercase();
    if lower.contains("fix") {
        PullCategory::Fix
    } else if ["add ", "implement", "introduce", "support "].iter().any(|kw| lower.contains(kw)) {
        PullCategory::Feature
    } else if lower.contains("doc") {
        PullCategory::Docs
    } else if lower.contains("refactor") {
        PullCategory::Refactor
    } else if lower.contains("bump") || lower.contains("upgrade") {
        PullCategory::Chore
    } else {
        PullCategory::Other
    }
}
