//! Immutable account snapshots.

use std::collections::HashMap;
use std::collections::hash_map::Iter;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::record::AccountRecord;

/// A complete view of all accounts as of one successful store load.
///
/// Snapshots are never patched: every refresh builds a new one and swaps it
/// in whole, so exactly one record exists per identity key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    accounts: HashMap<String, AccountRecord>,
}

impl Snapshot {
    /// Create an empty snapshot (denies everyone).
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a users document (`{"name": {record}, ...}`).
    ///
    /// Any decoding error rejects the document as a whole.
    pub fn from_json_slice(data: &[u8]) -> Result<Self, AuthError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Look up an account by identity key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&AccountRecord> {
        self.accounts.get(key)
    }

    /// Check if an identity key is present.
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.accounts.contains_key(key)
    }

    /// Get the number of accounts.
    #[inline]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if the snapshot has no accounts.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Iterate over `(identity, record)` pairs in arbitrary order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, String, AccountRecord> {
        self.accounts.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, AccountRecord)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, AccountRecord)>>(iter: I) -> Self {
        Self {
            accounts: iter.into_iter().map(|(k, r)| (k.into(), r)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a String, &'a AccountRecord);
    type IntoIter = Iter<'a, String, AccountRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let json = br#"{
            "alice": {"password": "pw1", "unlimited_user": true},
            "bob": {"password": "pw2", "expiration_days": 30, "account_creation_date": "2020-01-01"}
        }"#;
        let snapshot = Snapshot::from_json_slice(json).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.get("alice").unwrap().unlimited);
        assert_eq!(snapshot.get("bob").unwrap().expiration_days, 30);
        assert!(snapshot.get("carol").is_none());
    }

    #[test]
    fn test_one_bad_record_rejects_all() {
        let json = br#"{
            "alice": {"password": "pw1"},
            "bob": {"password": 42}
        }"#;
        let err = Snapshot::from_json_slice(json).unwrap_err();
        assert!(matches!(err, AuthError::Decode(_)));
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(Snapshot::from_json_slice(b"").is_err());
        assert!(Snapshot::from_json_slice(b"[]").is_err());
        assert!(Snapshot::from_json_slice(b"{\"alice\": ").is_err());
    }

    #[test]
    fn test_empty_document() {
        let snapshot = Snapshot::from_json_slice(b"{}").unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let snapshot: Snapshot = [("Alice", AccountRecord::new("pw"))].into_iter().collect();
        assert!(snapshot.contains("Alice"));
        assert!(!snapshot.contains("alice"));
    }
}
