use sha2::{Digest, Sha256};

use crate::category::FaultCategory;

/// Computes the dedup key for a fault from its identity fields.
///
/// Deterministic content digest; the downstream collector deduplicates on
/// it, the agent only tags. Each field is length-prefixed before hashing so
/// a boundary cannot shift between adjacent fields.
pub fn fingerprint(category: FaultCategory, message: &str, file: &str, line: u32) -> String {
    let line = line.to_string();
    let mut hasher = Sha256::new();
    for field in [category.as_str(), message, file, line.as_str()] {
        hasher.update((field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_yield_identical_output() {
        let a = fingerprint(FaultCategory::RuntimeWarning, "division by zero", "a.php", 10);
        let b = fingerprint(FaultCategory::RuntimeWarning, "division by zero", "a.php", 10);
        assert_eq!(a, b);
    }

    #[test]
    fn every_field_contributes_to_the_key() {
        let base = fingerprint(FaultCategory::RuntimeWarning, "m", "f", 1);
        assert_ne!(base, fingerprint(FaultCategory::RuntimeNotice, "m", "f", 1));
        assert_ne!(base, fingerprint(FaultCategory::RuntimeWarning, "n", "f", 1));
        assert_ne!(base, fingerprint(FaultCategory::RuntimeWarning, "m", "g", 1));
        assert_ne!(base, fingerprint(FaultCategory::RuntimeWarning, "m", "f", 2));
    }

    #[test]
    fn field_boundaries_cannot_shift() {
        let a = fingerprint(FaultCategory::RuntimeGeneric, "ab", "c", 1);
        let b = fingerprint(FaultCategory::RuntimeGeneric, "a", "bc", 1);
        assert_ne!(a, b);

        let a = fingerprint(FaultCategory::RuntimeGeneric, "m", "f1", 0);
        let b = fingerprint(FaultCategory::RuntimeGeneric, "m", "f", 10);
        assert_ne!(a, b);
    }

    #[test]
    fn output_is_hex_encoded_sha256() {
        let digest = fingerprint(FaultCategory::Exception, "bad state", "b.php", 42);
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
