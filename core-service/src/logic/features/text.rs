//! Text preprocessing & domain keywords
//!
//! Must match the preprocessing used when the vectorizer was fitted:
//! lowercase, non-alphanumerics to spaces, collapse whitespace.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").expect("static regex"));

/// Vocabulary that marks a text as plausibly vulnerability-related
pub const DOMAIN_KEYWORDS: &[&str] = &[
    "vulnerability", "vuln", "security", "exploit", "attack", "injection",
    "sql", "xss", "csrf", "buffer", "overflow", "authentication", "authorization",
    "privilege", "escalation", "traversal", "disclosure", "execution", "bypass",
    "denial", "service", "dos", "ddos", "malicious", "unauthorized", "access",
    "exposure", "leak", "breach", "penetration", "intrusion", "hack", "crack",
];

static KEYWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| DOMAIN_KEYWORDS.iter().copied().collect());

/// Normalize raw text the way the training pipeline did
pub fn preprocess(text: &str) -> String {
    let lower = text.to_lowercase();
    let cleaned = NON_ALNUM.replace_all(&lower, " ");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Any whitespace token of the processed text is a domain keyword
pub fn has_domain_keywords(processed: &str) -> bool {
    processed
        .split_whitespace()
        .any(|token| KEYWORD_SET.contains(token))
}

/// Length used by every length rule: chars of the stripped processed text
pub fn text_length(processed: &str) -> usize {
    processed.trim().chars().count()
}
