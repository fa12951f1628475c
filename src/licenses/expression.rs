//! License expression tokenization.
//!
//! Scoring only needs the set of license identifiers an expression mentions,
//! not its boolean structure, so the expression is flattened: parentheses are
//! dropped, the `AND`/`OR`/`WITH` operators are discarded and the remaining
//! identifiers are deduplicated and sorted.

const OPERATORS: [&str; 3] = ["AND", "OR", "WITH"];

/// Whether the whole expression means "no license information"
#[must_use]
pub fn is_absent(expression: &str) -> bool {
    let trimmed = expression.trim();
    trimmed.is_empty() || is_none_token(trimmed)
}

pub(crate) fn is_none_token(token: &str) -> bool {
    token.eq_ignore_ascii_case("NONE") || token.eq_ignore_ascii_case("NOASSERTION")
}

/// Flatten an expression into its sorted, deduplicated identifier tokens.
///
/// `NONE`/`NOASSERTION` tokens are skipped. A trailing `+` is kept on the
/// token; [`lookup_key`] strips it for registry lookup.
#[must_use]
pub fn tokens(expression: &str) -> Vec<String> {
    let flattened: String = expression
        .chars()
        .map(|c| if c == '(' || c == ')' { ' ' } else { c })
        .collect();

    let mut out: Vec<String> = flattened
        .split_whitespace()
        .filter(|t| !OPERATORS.iter().any(|op| t.eq_ignore_ascii_case(op)))
        .filter(|t| !is_none_token(t))
        .map(str::to_string)
        .collect();
    out.sort();
    out.dedup();
    out
}

/// Registry lookup key for a token: the token without an `or-later` `+` suffix
#[must_use]
pub fn lookup_key(token: &str) -> &str {
    let trimmed = token.trim();
    trimmed.strip_suffix('+').unwrap_or(trimmed)
}
