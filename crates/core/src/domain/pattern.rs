// Glob Patterns for Policy Matching
//
// `*` matches any run of characters (including none). Every other
// character is literal: regex metacharacters are escaped before the
// wildcard substitution, so "q.1" never matches "qx1".

use super::error::{DomainError, Result};
use regex::Regex;
use std::fmt;

/// Compiled glob pattern, anchored at both ends and case-sensitive
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    pub fn compile(pattern: &str) -> Result<Self> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");

        let regex = Regex::new(&format!("^{}$", body)).map_err(|e| DomainError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// True if any pattern in the list matches `value`
pub fn any_matches(patterns: &[GlobPattern], value: &str) -> bool {
    patterns.iter().any(|p| p.matches(value))
}
