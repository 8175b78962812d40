//! Timing-safe secret comparison.

use subtle::ConstantTimeEq;

/// Compare a presented secret against the stored one.
///
/// Content comparison takes the same time wherever the first differing byte
/// sits. A length mismatch returns early; only the length is observable.
///
/// # Example
/// ```
/// use hyauth_auth::secrets_match;
///
/// assert!(secrets_match("hunter2", "hunter2"));
/// assert!(!secrets_match("hunter2", "hunter3"));
/// ```
#[inline]
pub fn secrets_match(stored: &str, presented: &str) -> bool {
    stored.as_bytes().ct_eq(presented.as_bytes()).into()
}
