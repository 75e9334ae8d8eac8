use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use primitive_types::{H160, H256};
use secp256k1::{Message, PublicKey, SecretKey};
use sha3::{Digest, Keccak256};

lazy_static! {
    static ref SECP256K1: secp256k1::Secp256k1<secp256k1::All> = secp256k1::Secp256k1::new();
}

/// One quorum member's key material: a secp256k1 private key and the
/// 20-byte address derived from it.
#[derive(Clone)]
pub struct Account {
    secret_key: SecretKey,
    address: H160,
}

impl Account {
    pub fn from_privkey(privkey: H256) -> Result<Self> {
        let secret_key = SecretKey::from_slice(privkey.as_bytes())
            .map_err(|err| anyhow!("invalid secp256k1 secret key format, error: {}", err))?;
        let public_key = PublicKey::from_secret_key(&SECP256K1, &secret_key);
        let address = pubkey_to_address(&public_key);
        Ok(Account {
            secret_key,
            address,
        })
    }

    /// Load a key from a file holding the hex private key on the
    /// first line, the format the operator key dir uses.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let privkey_string = fs::read_to_string(path)
            .with_context(|| format!("read privkey file {}", path.display()))?
            .split_whitespace()
            .next()
            .map(ToOwned::to_owned)
            .ok_or_else(|| anyhow!("privkey file {} is empty", path.display()))?;
        let privkey = H256::from_str(privkey_string.trim().trim_start_matches("0x"))
            .map_err(|err| anyhow!("parse privkey hex: {}", err))?;
        Self::from_privkey(privkey)
    }

    pub fn address(&self) -> H160 {
        self.address
    }

    /// Recoverable signature over a 32-byte digest, 64 bytes of
    /// signature plus one recovery byte.
    pub fn sign_recoverable(&self, digest: &H256) -> Result<[u8; 65]> {
        let message = Message::from_slice(digest.as_bytes())?;
        let signature = SECP256K1.sign_ecdsa_recoverable(&message, &self.secret_key);
        let (recovery_id, data) = signature.serialize_compact();
        let mut inner = [0u8; 65];
        inner[..64].copy_from_slice(&data);
        inner[64] = recovery_id.to_i32() as u8;
        Ok(inner)
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish()
    }
}

fn pubkey_to_address(public_key: &PublicKey) -> H160 {
    let mut hasher = Keccak256::new();
    hasher.update(&public_key.serialize_uncompressed()[1..]);
    let buf = hasher.finalize();
    H160::from_slice(&buf[12..])
}
