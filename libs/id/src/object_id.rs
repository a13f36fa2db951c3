//! The 12-byte object id used as the primary key of every stored record.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::IdError;

/// Returns true if `candidate` is a structurally valid object id.
///
/// A valid id is exactly 24 ASCII hex digits, in either case. This never
/// touches storage, so a valid id may still refer to a missing record.
pub fn is_valid(candidate: &str) -> bool {
    candidate.len() == ObjectId::HEX_LEN && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Per-process generator state: the random machine/process bytes and the
/// rolling counter.
struct Generator {
    process: [u8; 5],
    counter: AtomicU32,
}

fn generator() -> &'static Generator {
    static GENERATOR: OnceLock<Generator> = OnceLock::new();
    GENERATOR.get_or_init(|| Generator {
        process: rand::random(),
        counter: AtomicU32::new(rand::random::<u32>() & 0x00ff_ffff),
    })
}

/// A document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Length of the canonical hex representation.
    pub const HEX_LEN: usize = 24;

    /// Creates a new, process-unique ID.
    #[must_use]
    pub fn new() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or_default();
        Self::from_parts(secs, generator())
    }

    fn from_parts(secs: u32, generator: &Generator) -> Self {
        let counter = generator.counter.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&generator.process);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Returns the creation time encoded in the ID, in seconds since the epoch.
    #[must_use]
    pub fn timestamp_secs(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Parses an ID from its hex representation.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }

        if s.len() != Self::HEX_LEN {
            return Err(IdError::InvalidLength {
                expected: Self::HEX_LEN,
                actual: s.len(),
            });
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| IdError::InvalidHex(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl std::str::FromStr for ObjectId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_object_id_roundtrip() {
        let id = ObjectId::new();
        let s = id.to_string();
        assert_eq!(s.len(), ObjectId::HEX_LEN);
        let parsed: ObjectId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_object_id_json_roundtrip() {
        let id = ObjectId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_object_id_uppercase_normalized() {
        let id: ObjectId = "65A1F0C2E4B0A1B2C3D4E5F6".parse().unwrap();
        assert_eq!(id.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn test_object_id_empty() {
        let result: Result<ObjectId, _> = "".parse();
        assert!(matches!(result.unwrap_err(), IdError::Empty));
    }

    #[test]
    fn test_object_id_wrong_length() {
        let result: Result<ObjectId, _> = "65a1f0c2".parse();
        assert_eq!(
            result.unwrap_err(),
            IdError::InvalidLength {
                expected: 24,
                actual: 8
            }
        );
    }

    #[test]
    fn test_object_id_non_hex() {
        let result: Result<ObjectId, _> = "zza1f0c2e4b0a1b2c3d4e5f6".parse();
        assert!(matches!(result.unwrap_err(), IdError::InvalidHex(_)));
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("65a1f0c2e4b0a1b2c3d4e5f6"));
        assert!(is_valid("65A1F0C2E4B0A1B2C3D4E5F6"));
        assert!(!is_valid(""));
        assert!(!is_valid("bulbasaur"));
        assert!(!is_valid("65a1f0c2e4b0a1b2c3d4e5f"));
        assert!(!is_valid("65a1f0c2e4b0a1b2c3d4e5f6a"));
        assert!(!is_valid("65a1f0c2e4b0a1b2c3d4e5g6"));
    }

    #[test]
    fn test_generated_ids_distinct() {
        let ids: std::collections::HashSet<_> = (0..1000).map(|_| ObjectId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_layout_encodes_timestamp_and_counter() {
        let generator = Generator {
            process: [1, 2, 3, 4, 5],
            counter: AtomicU32::new(0x00ff_fffe),
        };
        let a = ObjectId::from_parts(0x6500_0000, &generator);
        let b = ObjectId::from_parts(0x6500_0000, &generator);
        let c = ObjectId::from_parts(0x6500_0000, &generator);

        assert_eq!(a.timestamp_secs(), 0x6500_0000);
        assert_eq!(&a.bytes()[4..9], &[1, 2, 3, 4, 5]);
        assert_eq!(&a.bytes()[9..], &[0xff, 0xff, 0xfe]);
        assert_eq!(&b.bytes()[9..], &[0xff, 0xff, 0xff]);
        // Counter wraps within 3 bytes.
        assert_eq!(&c.bytes()[9..], &[0x00, 0x00, 0x00]);
    }

    proptest! {
        #[test]
        fn prop_is_valid_agrees_with_parse(s in "\\PC{0,30}") {
            prop_assert_eq!(is_valid(&s), ObjectId::parse(&s).is_ok());
        }

        #[test]
        fn prop_hex_strings_of_24_are_valid(s in "[0-9a-fA-F]{24}") {
            prop_assert!(is_valid(&s));
            let id = ObjectId::parse(&s).unwrap();
            prop_assert_eq!(id.to_string(), s.to_lowercase());
        }
    }
}
