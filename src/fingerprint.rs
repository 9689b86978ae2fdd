use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseFingerprintError;

/// A 64-bit perceptual fingerprint. Serialized as 16 lowercase hex characters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u64 {
        self.0
    }

    /**
     * Builds a fingerprint from a sequence of bits, first bit most significant.
     * Anything past 64 bits is ignored.
     */
    pub fn from_bit_iter<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        let mut value = 0_u64;
        let mut count = 0;
        for bit in bits.into_iter().take(64) {
            value = (value << 1) | bit as u64;
            count += 1;
        }
        // short inputs are left-aligned so the first bit stays in the top nibble
        if count < 64 && count > 0 {
            value <<= 64 - count;
        }
        Self(value)
    }

    /// Number of differing bits.
    pub fn distance(&self, other: &Fingerprint) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.len() == 16
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !valid {
            return Err(ParseFingerprintError(s.to_string()));
        }
        u64::from_str_radix(s, 16)
            .map(Fingerprint)
            .map_err(|_| ParseFingerprintError(s.to_string()))
    }
}

impl From<Fingerprint> for String {
    fn from(fp: Fingerprint) -> Self {
        fp.to_string()
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = ParseFingerprintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One row of the output table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintEntry {
    pub id: String,
    pub hash: Fingerprint,
}

impl FingerprintEntry {
    pub fn new(id: impl Into<String>, hash: Fingerprint) -> Self {
        Self {
            id: id.into(),
            hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_fixed_width() {
        assert_eq!(Fingerprint::from_bits(0).to_string(), "0000000000000000");
        assert_eq!(Fingerprint::from_bits(0xab).to_string(), "00000000000000ab");
        assert_eq!(
            Fingerprint::from_bits(u64::MAX).to_string(),
            "ffffffffffffffff"
        );
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        assert!("ffffffffffffffff".parse::<Fingerprint>().is_ok());
        assert!("FFFFFFFFFFFFFFFF".parse::<Fingerprint>().is_err());
        assert!("fffffffffffffff".parse::<Fingerprint>().is_err());
        assert!("+fffffffffffffff".parse::<Fingerprint>().is_err());
        assert!("ggggggggggggggggg".parse::<Fingerprint>().is_err());
    }

    #[test]
    fn bits_pack_msb_first() {
        let mut bits = vec![false; 64];
        bits[0] = true;
        bits[7] = true;
        let fp = Fingerprint::from_bit_iter(bits);
        assert_eq!(fp.to_string(), "8100000000000000");
    }

    #[test]
    fn distance_test() {
        let a: Fingerprint = "0000000000000000".parse().unwrap();
        let b: Fingerprint = "000000000000000f".parse().unwrap();
        assert_eq!(a.distance(&b), 4);
        assert_eq!(b.distance(&a), 4);
        assert_eq!(a.distance(&a), 0);
        assert_eq!(
            a.distance(&Fingerprint::from_bits(u64::MAX)),
            64
        );
    }

    #[test]
    fn entry_serializes_as_id_and_hex() {
        let entry = FingerprintEntry::new("OP01-001", Fingerprint::from_bits(0x1f));
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"id":"OP01-001","hash":"000000000000001f"}"#);
        let back: FingerprintEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
