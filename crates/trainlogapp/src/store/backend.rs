use crate::error::{Result, TrainlogError};
use std::path::PathBuf;

/// Abstract interface for raw key-value I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while `LogStore` handles the "what" (slots, JSON shapes).
pub trait KvBackend {
    /// Read the value stored under `key`.
    /// Returns Ok(None) if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    /// MUST leave the previous value intact when the write is rejected.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Where the value for `key` lives. For MemBackend, a virtual path.
    fn location(&self, key: &str) -> PathBuf;
}

/// Rejects values larger than `limit` bytes.
pub fn check_value_size(key: &str, value: &str, limit: Option<usize>) -> Result<()> {
    match limit {
        Some(limit) if value.len() > limit => Err(TrainlogError::OversizedWrite {
            key: key.to_string(),
            size: value.len(),
            limit,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_check() {
        assert!(check_value_size("k", "abc", None).is_ok());
        assert!(check_value_size("k", "abc", Some(3)).is_ok());
        match check_value_size("k", "abcd", Some(3)) {
            Err(TrainlogError::OversizedWrite { size, limit, .. }) => {
                assert_eq!((size, limit), (4, 3));
            }
            other => panic!("expected OversizedWrite, got {other:?}"),
        }
    }
}
