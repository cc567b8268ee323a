//! Wildcard priority tiers for channel and location codes.

use regex::Regex;
use thiserror::Error;

/// A priority pattern could not be compiled.
#[derive(Error, Debug)]
#[error("Invalid priority pattern '{pattern}': {source}")]
pub struct PriorityError {
    /// The offending wildcard pattern.
    pub pattern: String,
    /// The underlying regex error.
    pub source: regex::Error,
}

/// Ordered wildcard patterns, best tier first.
///
/// Patterns use shell wildcards: `*` matches any run, `?` any single
/// character, `[ZNE]` a set and `[!ZNE]` its complement.
#[derive(Debug, Clone)]
pub struct PriorityList {
    tiers: Vec<Regex>,
}

impl PriorityList {
    /// Compiles the given patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern does not compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PriorityError> {
        let tiers = patterns
            .iter()
            .map(|p| {
                let pattern = p.as_ref();
                Regex::new(&wildcard_to_regex(pattern)).map_err(|source| PriorityError {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { tiers })
    }

    /// Returns true if there are no tiers, which disables filtering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Returns the best tier index matching `code`.
    #[must_use]
    pub fn rank(&self, code: &str) -> Option<usize> {
        self.tiers.iter().position(|tier| tier.is_match(code))
    }

    /// Keeps only the items at the best tier present.
    ///
    /// Items matching no tier are dropped. All items sharing the best tier
    /// are kept, in input order. An empty list keeps everything.
    pub fn filter<T, F>(&self, items: Vec<T>, key: F) -> Vec<T>
    where
        F: Fn(&T) -> &str,
    {
        if self.is_empty() {
            return items;
        }

        let ranked: Vec<_> = items
            .into_iter()
            .map(|item| (self.rank(key(&item)), item))
            .collect();
        let Some(best) = ranked.iter().filter_map(|(rank, _)| *rank).min() else {
            return Vec::new();
        };

        ranked
            .into_iter()
            .filter(|(rank, _)| *rank == Some(best))
            .map(|(_, item)| item)
            .collect()
    }
}

/// Translates a shell wildcard into an anchored regular expression.
fn wildcard_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                // A class ends at the first ']' that is not its first member.
                let mut j = i + 1;
                if chars.get(j) == Some(&'!') {
                    j += 1;
                }
                if chars.get(j) == Some(&']') {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }

                if j >= chars.len() {
                    out.push_str(r"\[");
                } else {
                    out.push('[');
                    let mut k = i + 1;
                    if chars[k] == '!' {
                        out.push('^');
                        k += 1;
                    } else if chars[k] == '^' {
                        out.push_str(r"\^");
                        k += 1;
                    }
                    for &c in &chars[k..j] {
                        if matches!(c, '\\' | '[' | ']' | '&' | '~') {
                            out.push('\\');
                        }
                        out.push(c);
                    }
                    out.push(']');
                    i = j;
                }
            }
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    out.push('$');
    out
}
