use crate::Error;

/// Closed set of curve families the verifier contracts understand.
///
/// The label bytes are part of the cross-chain wire format, not an
/// internal enumeration; they must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Curve {
    P224,
    P256,
    P384,
    P521,
    Secp256k1,
    Sm2,
}

impl Curve {
    pub const fn label(self) -> u8 {
        match self {
            Curve::P224 => 1,
            Curve::P256 => 2,
            Curve::P384 => 3,
            Curve::P521 => 4,
            Curve::Secp256k1 => 5,
            Curve::Sm2 => 20,
        }
    }

    pub fn from_label(label: u8) -> Result<Self, Error> {
        match label {
            1 => Ok(Curve::P224),
            2 => Ok(Curve::P256),
            3 => Ok(Curve::P384),
            4 => Ok(Curve::P521),
            5 => Ok(Curve::Secp256k1),
            20 => Ok(Curve::Sm2),
            other => Err(Error::UnknownCurveLabel(other)),
        }
    }

    pub fn from_name(name: &str) -> Result<Self, Error> {
        match name {
            "P-224" => Ok(Curve::P224),
            "P-256" => Ok(Curve::P256),
            "P-384" => Ok(Curve::P384),
            "P-521" => Ok(Curve::P521),
            "secp256k1" => Ok(Curve::Secp256k1),
            "SM2P256V1" | "SM2" => Ok(Curve::Sm2),
            other => Err(Error::UnknownCurveName(other.to_string())),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Curve::P224 => "P-224",
            Curve::P256 => "P-256",
            Curve::P384 => "P-384",
            Curve::P521 => "P-521",
            Curve::Secp256k1 => "secp256k1",
            Curve::Sm2 => "SM2P256V1",
        }
    }

    /// Field element width in bytes.
    pub const fn field_size(self) -> usize {
        match self {
            Curve::P224 => 28,
            Curve::P256 | Curve::Secp256k1 | Curve::Sm2 => 32,
            Curve::P384 => 48,
            Curve::P521 => 66,
        }
    }

    /// Length of the `04 || X || Y` uncompressed point encoding.
    pub const fn uncompressed_point_len(self) -> usize {
        1 + 2 * self.field_size()
    }
}

impl std::fmt::Display for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
