//! Candidate identifiers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// A 12-byte candidate identifier, rendered as 24 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateId([u8; 12]);

impl CandidateId {
    pub const LEN: usize = 12;

    pub fn new(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Draw a fresh identifier from the operating system's entropy source.
    pub fn generate() -> Result<Self, TypesError> {
        let mut bytes = [0u8; Self::LEN];
        getrandom::getrandom(&mut bytes).map_err(|e| TypesError::Entropy(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Rebuild an identifier from a raw store key.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
        let arr: [u8; 12] = bytes
            .try_into()
            .map_err(|_| TypesError::InvalidCandidateId(hex::encode(bytes)))?;
        Ok(Self(arr))
    }
}

impl FromStr for CandidateId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; Self::LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| TypesError::InvalidCandidateId(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CandidateId({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serialize for CandidateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CandidateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_its_own_display() {
        let id = CandidateId::new([0xab; 12]);
        let text = id.to_string();
        assert_eq!(text.len(), 24);
        assert_eq!(text.parse::<CandidateId>().unwrap(), id);
    }

    #[test]
    fn rejects_wrong_length_and_non_hex() {
        assert!("abcd".parse::<CandidateId>().is_err());
        assert!("zz".repeat(12).parse::<CandidateId>().is_err());
        assert!(CandidateId::from_slice(&[1, 2, 3]).is_err());
    }

    #[test]
    fn generated_ids_differ() {
        let a = CandidateId::generate().unwrap();
        let b = CandidateId::generate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn serializes_as_hex_string() {
        let id = CandidateId::new([1u8; 12]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"010101010101010101010101\"");
    }
}
