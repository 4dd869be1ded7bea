//! Family Attribution - Nearest Representative Hash
//!
//! Matches a sample's SHA-256 digest against every family's XOR-folded
//! representative digest by positional Hamming distance over the 256-bit
//! patterns, and returns all families tied at the minimum distance.
//!
//! The metric compares two digests of different provenance as opaque bit
//! strings; distances between unrelated hashes cluster around 128 and ties
//! are expected on pathological inputs, so callers get the full tie set
//! rather than an arbitrary winner.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::database::{decode_digest, FamilyHashDatabase, LookupError};

/// One attribution candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMatch {
    pub distance: u32,
    pub family: String,
}

/// Count of differing bit positions between two 256-bit patterns
pub fn hamming_distance(a: &[u8; 32], b: &[u8; 32]) -> u32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x ^ y).count_ones()).sum()
}

/// SHA-256 of a byte stream, as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Family attribution over a loaded hash database
#[derive(Debug, Clone, Default)]
pub struct FamilyAttributor {
    db: FamilyHashDatabase,
}

impl FamilyAttributor {
    pub fn new(db: FamilyHashDatabase) -> Self {
        Self { db }
    }

    /// Load the attributor from the database artifact
    pub fn load(path: &std::path::Path) -> Result<Self, LookupError> {
        Ok(Self::new(FamilyHashDatabase::load(path)?))
    }

    /// Number of known families
    pub fn family_count(&self) -> usize {
        self.db.len()
    }

    /// Attribute a sample by its raw bytes
    pub fn attribute_bytes(&self, data: &[u8]) -> Result<Vec<FamilyMatch>, LookupError> {
        self.attribute_digest(&sha256_hex(data))
    }

    /// Attribute a sample by its precomputed SHA-256 hex digest
    ///
    /// Returns every family tied at the minimum Hamming distance, ordered by
    /// family name. The database must be non-empty.
    pub fn attribute_digest(&self, digest: &str) -> Result<Vec<FamilyMatch>, LookupError> {
        if self.db.is_empty() {
            return Err(LookupError::EmptyDatabase);
        }

        let query = decode_digest(&digest.to_lowercase())
            .ok_or_else(|| LookupError::InvalidQuery(digest.to_string()))?;

        let mut minimum = u32::MAX;
        let mut matches: Vec<FamilyMatch> = Vec::new();

        for (family, bits) in self.db.iter() {
            let distance = hamming_distance(&query, bits);
            if distance < minimum {
                minimum = distance;
                matches.clear();
            }
            if distance == minimum {
                matches.push(FamilyMatch {
                    distance,
                    family: family.clone(),
                });
            }
        }

        log::debug!(
            "Family attribution: {} candidate(s) at distance {}",
            matches.len(),
            minimum
        );
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO: &str = "0000000000000000000000000000000000000000000000000000000000000000";
    const ONE_BIT: &str = "0000000000000000000000000000000000000000000000000000000000000001";
    const ALL_ONES: &str = "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

    fn attributor(records: &[(&str, &str)]) -> FamilyAttributor {
        FamilyAttributor::new(FamilyHashDatabase::from_records(records.iter().copied()).unwrap())
    }

    #[test]
    fn test_hamming_distance_extremes() {
        let zero = decode_digest(ZERO).unwrap();
        let ones = decode_digest(ALL_ONES).unwrap();
        assert_eq!(hamming_distance(&zero, &zero), 0);
        assert_eq!(hamming_distance(&zero, &ones), 256);
    }

    #[test]
    fn test_sha256_hex_known_value() {
        // SHA-256("abc")
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_exact_hit_is_distance_zero() {
        let att = attributor(&[("emotet", ZERO), ("qakbot", ALL_ONES)]);
        let matches = att.attribute_digest(ZERO).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].family, "emotet");
        assert_eq!(matches[0].distance, 0);
    }

    #[test]
    fn test_nearest_family_wins() {
        let att = attributor(&[("emotet", ZERO), ("qakbot", ALL_ONES)]);
        let matches = att.attribute_digest(ONE_BIT).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].family, "emotet");
        assert_eq!(matches[0].distance, 1);
    }

    #[test]
    fn test_ties_are_all_returned() {
        // Both families sit one bit away from the query, on different bits
        let att = attributor(&[
            ("emotet", "0000000000000000000000000000000000000000000000000000000000000003"),
            ("qakbot", "8000000000000000000000000000000000000000000000000000000000000001"),
        ]);
        let matches = att.attribute_digest(ONE_BIT).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].distance, 1);
        assert_eq!(matches[1].distance, 1);
        let families: Vec<&str> = matches.iter().map(|m| m.family.as_str()).collect();
        assert_eq!(families, vec!["emotet", "qakbot"]);
    }

    #[test]
    fn test_empty_database_fails_fast() {
        let att = FamilyAttributor::default();
        assert!(matches!(
            att.attribute_digest(ZERO),
            Err(LookupError::EmptyDatabase)
        ));
        assert!(matches!(
            att.attribute_bytes(b"anything"),
            Err(LookupError::EmptyDatabase)
        ));
    }

    #[test]
    fn test_invalid_query_digest_is_rejected() {
        let att = attributor(&[("emotet", ZERO)]);
        assert!(matches!(
            att.attribute_digest("not-a-digest"),
            Err(LookupError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_uppercase_query_is_accepted() {
        let att = attributor(&[("emotet", ZERO)]);
        let matches = att.attribute_digest(&ALL_ONES.to_uppercase()).unwrap();
        assert_eq!(matches[0].distance, 256);
    }

    #[test]
    fn test_bytes_attribution_matches_digest_attribution() {
        let data = b"some sample bytes";
        let digest = sha256_hex(data);
        let att = attributor(&[("emotet", ZERO), ("qakbot", ALL_ONES)]);
        assert_eq!(
            att.attribute_bytes(data).unwrap(),
            att.attribute_digest(&digest).unwrap()
        );
    }
}
