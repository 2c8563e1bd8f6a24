//! Position-safe text substitution.
//!
//! Tokens are applied right to left so an earlier replacement never shifts
//! the offsets of a token still to be processed. Each token is checked against
//! the live buffer before it is replaced; a token whose span no longer holds
//! its expected name is skipped (or handed to the anchored fallback when its
//! reference kind allows it).

use std::ops::Range;

use tracing::{debug, trace};

use crate::model::{OccurrenceToken, RewriteMapping};
use crate::parser::strip_quotes;

use super::fallback::AnchoredFallback;

/// Apply `mapping` to every token span in `source` and return the new text.
///
/// Text outside the token spans is never touched except by the anchored
/// fallback, which itself only replaces an identifier.
pub fn apply_replacements(
    source: &str,
    tokens: &[OccurrenceToken],
    mapping: &RewriteMapping,
    fallback: &AnchoredFallback,
) -> String {
    if mapping.is_empty() || tokens.is_empty() {
        return source.to_string();
    }

    let mut ordered: Vec<&OccurrenceToken> = tokens.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));
    ordered.dedup_by(|a, b| a.start == b.start && a.end == b.end);

    let mut buffer = source.to_string();
    let mut replaced = 0usize;

    for (index, token) in ordered.iter().enumerate() {
        let end = token.end.min(buffer.len());
        let live = buffer.get(token.start..end);

        match live {
            Some(live) if strip_quotes(live).eq_ignore_ascii_case(&token.text) => {
                let Some(replacement) = resolve_replacement(live, &token.text, mapping) else {
                    continue;
                };
                trace!(
                    found = live,
                    replacement,
                    start = token.start,
                    end,
                    "Replacing table reference"
                );
                buffer.replace_range(token.start..end, replacement);
                replaced += 1;
            }
            _ => {
                debug!(
                    expected = %token.text,
                    found = ?live,
                    start = token.start,
                    end,
                    kind = ?token.kind,
                    "Position mismatch, skipping token"
                );
                if token.kind.policy().anchored_fallback {
                    let window = fallback_window(token, &ordered[index + 1..], fallback);
                    if let Some(updated) = try_fallback(&buffer, token, mapping, fallback, window) {
                        buffer = updated;
                        replaced += 1;
                    }
                }
            }
        }
    }

    debug!(replaced, "Applied table replacements");
    buffer
}

/// Replacement for a token whose live text is `live`, by priority:
/// the live text as written, its unquoted content, the canonical name, and
/// finally any key equal to the unquoted content ignoring case.
fn resolve_replacement<'m>(live: &str, text: &str, mapping: &'m RewriteMapping) -> Option<&'m str> {
    let content = strip_quotes(live);
    mapping
        .get(live)
        .or_else(|| (content != live).then(|| mapping.get(content)).flatten())
        .or_else(|| mapping.get(text))
        .or_else(|| mapping.find_ignore_case(content).map(|(_, value)| value))
}

/// Where a fallback hit for `token` may start its name: after every token still
/// waiting to be applied, within the anchor reach of the computed start, and
/// before the token's end.
fn fallback_window(
    token: &OccurrenceToken,
    pending: &[&OccurrenceToken],
    fallback: &AnchoredFallback,
) -> Range<usize> {
    let after_pending = pending.iter().map(|t| t.end).max().unwrap_or(0);
    let within_reach = token.start.saturating_sub(fallback.reach());
    after_pending.max(within_reach)..token.end
}

fn try_fallback(
    buffer: &str,
    token: &OccurrenceToken,
    mapping: &RewriteMapping,
    fallback: &AnchoredFallback,
    window: Range<usize>,
) -> Option<String> {
    let (key, replacement) = match mapping.get(&token.text) {
        Some(replacement) => (token.text.as_str(), replacement),
        None => mapping.find_ignore_case(&token.text)?,
    };
    fallback
        .replace_first(buffer, &token.text, replacement, window.clone())
        .or_else(|| {
            (key != token.text)
                .then(|| fallback.replace_first(buffer, key, replacement, window))
                .flatten()
        })
}
