//! Anchored fallback matcher.
//!
//! Last resort for mutation targets whose computed span did not match the
//! source text. Each anchor is a keyword phrase that must directly precede the
//! target (`UPDATE`, `DELETE FROM`, `MERGE INTO`); the first anchor followed by
//! the exact old name wins and only the name itself is replaced.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{Result, RewriteError};

/// Anchor phrases tried in order when no configuration overrides them.
pub const DEFAULT_ANCHORS: &[&str] = &["UPDATE", "DELETE FROM", "MERGE INTO"];

/// Extra bytes [`AnchoredFallback::reach`] allows beyond the longest phrase
const ANCHOR_SLACK: usize = 16;

static DEFAULT_FALLBACK: LazyLock<AnchoredFallback> = LazyLock::new(|| AnchoredFallback {
    anchors: DEFAULT_ANCHORS
        .iter()
        .map(|phrase| Anchor {
            phrase: (*phrase).to_string(),
            // Default phrases are plain keywords
            regex: Regex::new(&anchor_pattern(phrase)).unwrap(),
        })
        .collect(),
});

#[derive(Debug, Clone)]
struct Anchor {
    phrase: String,
    regex: Regex,
}

/// Ordered list of compiled anchor phrases.
#[derive(Debug, Clone)]
pub struct AnchoredFallback {
    anchors: Vec<Anchor>,
}

impl Default for AnchoredFallback {
    fn default() -> Self {
        DEFAULT_FALLBACK.clone()
    }
}

/// `UPDATE` -> `(?i:\bUPDATE\s+)`, `DELETE FROM` -> `(?i:\bDELETE\s+FROM\s+)`
fn anchor_pattern(phrase: &str) -> String {
    let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
    format!(r"(?i:\b{}\s+)", words.join(r"\s+"))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl AnchoredFallback {
    /// Compile anchor phrases. Words in a phrase match any run of whitespace.
    pub fn new<S: AsRef<str>>(phrases: &[S]) -> Result<Self> {
        let anchors = phrases
            .iter()
            .map(|phrase| {
                let phrase = phrase.as_ref();
                if phrase.split_whitespace().next().is_none() {
                    return Err(RewriteError::InvalidAnchor {
                        phrase: phrase.to_string(),
                        source: regex::Error::Syntax("empty anchor phrase".to_string()),
                    });
                }
                let regex = Regex::new(&anchor_pattern(phrase)).map_err(|source| {
                    RewriteError::InvalidAnchor {
                        phrase: phrase.to_string(),
                        source,
                    }
                })?;
                Ok(Anchor {
                    phrase: phrase.to_string(),
                    regex,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { anchors })
    }

    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.anchors.iter().map(|anchor| anchor.phrase.as_str())
    }

    /// How far left of a reference's computed start its anchor keyword may begin.
    ///
    /// Covers the longest phrase plus room for whitespace and quote characters
    /// that the computed start did not account for.
    pub fn reach(&self) -> usize {
        self.anchors
            .iter()
            .map(|anchor| anchor.phrase.len())
            .max()
            .unwrap_or(0)
            + ANCHOR_SLACK
    }

    /// Replace the first `anchor + old` occurrence whose name starts inside
    /// `window`, trying anchors in order.
    ///
    /// `old` must appear exactly (case-sensitive) right after the anchor and be
    /// followed by a non-word character or the end of input. Hits outside the
    /// window are ignored so text owned by other references is never shifted.
    /// Returns `None` when no anchor matches.
    pub fn replace_first(
        &self,
        sql: &str,
        old: &str,
        new: &str,
        window: Range<usize>,
    ) -> Option<String> {
        if old.is_empty() {
            return None;
        }
        for anchor in &self.anchors {
            for found in anchor.regex.find_iter(sql) {
                let name_start = found.end();
                if name_start >= window.end {
                    break;
                }
                if name_start < window.start {
                    continue;
                }
                let Some(rest) = sql[name_start..].strip_prefix(old) else {
                    continue;
                };
                if rest.chars().next().is_some_and(is_word_char) {
                    continue;
                }
                let name_end = name_start + old.len();
                debug!(
                    anchor = %anchor.phrase,
                    table = old,
                    name_start,
                    "Applied anchored fallback replacement"
                );
                let mut out = String::with_capacity(sql.len() - old.len() + new.len());
                out.push_str(&sql[..name_start]);
                out.push_str(new);
                out.push_str(&sql[name_end..]);
                return Some(out);
            }
        }
        debug!(table = old, ?window, "No anchored fallback matched");
        None
    }
}
