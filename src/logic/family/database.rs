//! Family Hash Database
//!
//! Immutable mapping from malware family name to its representative 256-bit
//! digest. Built offline by XOR-folding the SHA-256 digests of every labeled
//! training sample of the family; loaded once at startup from a JSON artifact
//! (`{"family": "<64 hex chars>", ...}`) and never mutated at runtime.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub enum LookupError {
    /// Artifact missing or unreadable
    Io(std::io::Error),
    /// Artifact is not the expected JSON mapping
    Parse(serde_json::Error),
    /// A database entry is not a 64-hex-char digest
    MalformedEntry { family: String, digest: String },
    /// The query digest is not a 64-hex-char digest
    InvalidQuery(String),
    /// The database holds no families
    EmptyDatabase,
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::Io(e) => write!(f, "Family database IO error: {}", e),
            LookupError::Parse(e) => write!(f, "Family database parse error: {}", e),
            LookupError::MalformedEntry { family, digest } => {
                write!(f, "Family '{}' has malformed digest '{}'", family, digest)
            }
            LookupError::InvalidQuery(digest) => {
                write!(f, "Query digest '{}' is not a 64-hex-char SHA-256", digest)
            }
            LookupError::EmptyDatabase => write!(f, "Family database is empty"),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<std::io::Error> for LookupError {
    fn from(err: std::io::Error) -> Self {
        LookupError::Io(err)
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Parse(err)
    }
}

// ============================================================================
// DIGEST DECODING
// ============================================================================

/// Decode a 64-hex-char digest into its 256-bit pattern
pub(super) fn decode_digest(digest: &str) -> Option<[u8; 32]> {
    let mut out = [0u8; 32];
    if digest.len() != 64 {
        return None;
    }
    hex::decode_to_slice(digest, &mut out).ok()?;
    Some(out)
}

// ============================================================================
// DATABASE
// ============================================================================

/// Family name -> representative 256-bit digest
#[derive(Debug, Clone, Default)]
pub struct FamilyHashDatabase {
    families: BTreeMap<String, [u8; 32]>,
}

impl FamilyHashDatabase {
    /// Load the database from its JSON artifact
    pub fn load(path: &Path) -> Result<Self, LookupError> {
        let data = fs::read(path)?;
        let entries: BTreeMap<String, String> = serde_json::from_slice(&data)?;

        let mut families = BTreeMap::new();
        for (family, digest) in entries {
            let bits = decode_digest(&digest).ok_or(LookupError::MalformedEntry {
                family: family.clone(),
                digest,
            })?;
            families.insert(family, bits);
        }

        log::info!("Family hash database loaded: {} families from {}", families.len(), path.display());
        Ok(Self { families })
    }

    /// Build the database by XOR-folding per-family sample digests
    ///
    /// `records` is an iterator of (family, sample SHA-256 hex) rows, the
    /// shape of the labeled training metadata.
    pub fn from_records<I, S>(records: I) -> Result<Self, LookupError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut families: BTreeMap<String, [u8; 32]> = BTreeMap::new();

        for (family, digest) in records {
            let bits = decode_digest(digest.as_ref()).ok_or_else(|| LookupError::MalformedEntry {
                family: family.as_ref().to_string(),
                digest: digest.as_ref().to_string(),
            })?;
            let folded = families.entry(family.as_ref().to_string()).or_insert([0u8; 32]);
            for (acc, b) in folded.iter_mut().zip(bits.iter()) {
                *acc ^= b;
            }
        }

        Ok(Self { families })
    }

    /// Write the database as its JSON artifact
    pub fn save(&self, path: &Path) -> Result<(), LookupError> {
        let entries: BTreeMap<&String, String> = self
            .families
            .iter()
            .map(|(family, bits)| (family, hex::encode(bits)))
            .collect();
        let json = serde_json::to_vec_pretty(&entries)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Iterate (family, digest bits)
    pub(super) fn iter(&self) -> impl Iterator<Item = (&String, &[u8; 32])> {
        self.families.iter()
    }

    /// Representative digest of a family, as hex
    pub fn digest_of(&self, family: &str) -> Option<String> {
        self.families.get(family).map(hex::encode)
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}
