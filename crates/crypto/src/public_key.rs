use std::cmp::Ordering;

use crate::{Curve, Error};

const TAG_ECDSA: u8 = 0x12;
const TAG_SM2: u8 = 0x13;

/// A committee member public key: a curve family plus the raw
/// uncompressed `04 || X || Y` point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    curve: Curve,
    point: Vec<u8>,
}

impl PublicKey {
    pub fn new(curve: Curve, point: Vec<u8>) -> Result<Self, Error> {
        let point = validate_point(curve, point)?;
        Ok(PublicKey { curve, point })
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Uncompressed point bytes, `04 || X || Y`.
    pub fn point(&self) -> &[u8] {
        &self.point
    }

    /// Parse the chain's hex key serialization.
    pub fn from_hex(hex_str: &str) -> Result<Self, Error> {
        let bytes = hex::decode(hex_str.trim_start_matches("0x"))
            .map_err(|err| Error::InvalidHex(err.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parse the curve-tagged key serialization:
    ///
    /// - `0x12 || label || point` for ECDSA keys,
    /// - `0x13 || label || point` for SM2 keys,
    /// - a bare point for the reserved P-256 fast path.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match bytes.first() {
            None => Err(Error::MalformedKey),
            Some(&TAG_ECDSA) => {
                let label = *bytes.get(1).ok_or(Error::MalformedKey)?;
                let curve = Curve::from_label(label)?;
                if curve == Curve::Sm2 {
                    // SM2 keys carry their own tag byte.
                    return Err(Error::MalformedKey);
                }
                Self::new(curve, bytes[2..].to_vec())
            }
            Some(&TAG_SM2) => {
                let label = *bytes.get(1).ok_or(Error::MalformedKey)?;
                if Curve::from_label(label)? != Curve::Sm2 {
                    return Err(Error::MalformedKey);
                }
                Self::new(Curve::Sm2, bytes[2..].to_vec())
            }
            Some(0x04) => Self::new(Curve::P256, bytes.to_vec()),
            Some(0x02) | Some(0x03) => {
                // Untagged keys are P-256 by convention; a compressed
                // one would need curve arithmetic to expand.
                Err(Error::CompressedPointUnsupported(Curve::P256.name()))
            }
            Some(_) => Err(Error::MalformedKey),
        }
    }

    /// Curve-tagged encoding understood by the verifier contracts:
    /// P-256 keys are a bare uncompressed point (reserved fast path),
    /// other ECDSA curves are `0x12 || label || point`, SM2 is
    /// `0x13 || 0x14 || point`.
    pub fn to_contract_bytes(&self) -> Vec<u8> {
        match self.curve {
            Curve::P256 => self.point.clone(),
            Curve::Sm2 => {
                let mut out = Vec::with_capacity(2 + self.point.len());
                out.push(TAG_SM2);
                out.push(self.curve.label());
                out.extend_from_slice(&self.point);
                out
            }
            _ => {
                let mut out = Vec::with_capacity(2 + self.point.len());
                out.push(TAG_ECDSA);
                out.push(self.curve.label());
                out.extend_from_slice(&self.point);
                out
            }
        }
    }
}

fn validate_point(curve: Curve, point: Vec<u8>) -> Result<Vec<u8>, Error> {
    match point.first() {
        Some(0x04) => {
            let expected = curve.uncompressed_point_len();
            if point.len() != expected {
                return Err(Error::InvalidPointLength {
                    curve: curve.name(),
                    expected,
                    got: point.len(),
                });
            }
            Ok(point)
        }
        Some(0x02) | Some(0x03) if curve == Curve::Secp256k1 && point.len() == 33 => {
            let key =
                secp256k1::PublicKey::from_slice(&point).map_err(|_| Error::MalformedKey)?;
            Ok(key.serialize_uncompressed().to_vec())
        }
        Some(0x02) | Some(0x03) => Err(Error::CompressedPointUnsupported(curve.name())),
        _ => Err(Error::MalformedKey),
    }
}

/// Canonical committee order: curve label first, then the raw point
/// bytes. The verifier contracts iterate keys in exactly this order,
/// so it is part of the wire format.
impl Ord for PublicKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.curve
            .label()
            .cmp(&other.curve.label())
            .then_with(|| self.point.cmp(&other.point))
    }
}

impl PartialOrd for PublicKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.curve, hex::encode(&self.point))
    }
}
