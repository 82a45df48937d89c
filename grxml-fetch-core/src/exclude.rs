//! Exclusion matching: decides whether a remote path falls under any
//! user-supplied exclusion pattern.
//!
//! Two pattern forms are supported:
//! - literal: matches the path itself and every descendant (`/temp` excludes
//!   `/temp` and `/temp/sub`, but not `/temporary`)
//! - wildcard: any pattern containing `*` is matched as a whole-path glob
//!   where `*` matches any substring, `/` included
//!
//! Patterns are independent; the first match wins and there is no negation.

use regex::Regex;

enum Rule {
    Literal(String),
    Wildcard(Regex),
}

/// Compiled set of exclusion patterns. Pure predicate, no I/O.
pub struct ExclusionMatcher {
    rules: Vec<Rule>,
}

impl ExclusionMatcher {
    /// Compile the given patterns. An empty set matches nothing.
    pub fn new(patterns: &[String]) -> Self {
        let rules = patterns
            .iter()
            .map(|pattern| {
                if pattern.contains('*') {
                    Rule::Wildcard(compile_wildcard(pattern))
                } else {
                    Rule::Literal(pattern.clone())
                }
            })
            .collect();
        Self { rules }
    }

    /// True if `path` matches any pattern.
    pub fn should_exclude(&self, path: &str) -> bool {
        self.rules.iter().any(|rule| match rule {
            Rule::Literal(pattern) => matches_exact_or_prefix(path, pattern),
            Rule::Wildcard(regex) => regex.is_match(path),
        })
    }

}

fn compile_wildcard(pattern: &str) -> Regex {
    // Escape everything, then turn the escaped `\*` back into `.*`. Anchored
    // on both ends: the glob must cover the whole path.
    let translated = regex::escape(pattern).replace(r"\*", ".*");
    Regex::new(&format!("^{translated}$")).expect("escaped pattern is always a valid regex")
}

fn matches_exact_or_prefix(path: &str, pattern: &str) -> bool {
    path == pattern || path.strip_prefix(pattern).is_some_and(|rest| rest.starts_with('/'))
}
