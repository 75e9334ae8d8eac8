use serde::{Deserialize, Serialize};

use crate::{Error, PublicKey};

/// Chain configuration embedded in an anchor-chain block's consensus
/// payload at an epoch boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub peers: Vec<PeerConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerConfig {
    pub index: u32,
    /// Hex serialization of the peer's public key.
    pub id: String,
}

/// Decode the committee public keys out of a block's consensus
/// payload. Returns keys in payload order; [`encode_bookkeepers`]
/// applies the canonical order.
pub fn extract_bookkeepers(consensus_payload: &[u8]) -> Result<Vec<PublicKey>, Error> {
    let config: ChainConfig = serde_json::from_slice(consensus_payload)
        .map_err(|err| Error::MalformedConsensusPayload(err.to_string()))?;
    let mut keys = Vec::with_capacity(config.peers.len());
    for peer in &config.peers {
        let key = PublicKey::from_hex(&peer.id)?;
        log::debug!("bookkeeper #{}: {}", peer.index, key);
        keys.push(key);
    }
    Ok(keys)
}

/// Serialize the committee in canonical (sorted) order into the blob
/// the relay contracts take as their bookkeeper argument. Input order
/// must not matter: the same set of keys always yields identical
/// bytes.
pub fn encode_bookkeepers(keys: &[PublicKey]) -> Vec<u8> {
    let mut sorted: Vec<&PublicKey> = keys.iter().collect();
    sorted.sort();
    let mut blob = Vec::new();
    for key in sorted {
        blob.extend_from_slice(&key.to_contract_bytes());
    }
    blob
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Curve;

    fn uncompressed_point(curve: Curve, fill: u8) -> Vec<u8> {
        let mut point = vec![fill; curve.uncompressed_point_len()];
        point[0] = 0x04;
        point
    }

    fn tagged_hex(tag: u8, label: u8, curve: Curve, fill: u8) -> String {
        let mut bytes = vec![tag, label];
        bytes.extend_from_slice(&uncompressed_point(curve, fill));
        hex::encode(bytes)
    }

    fn payload(peer_ids: &[&str]) -> Vec<u8> {
        let config = ChainConfig {
            peers: peer_ids
                .iter()
                .enumerate()
                .map(|(i, id)| PeerConfig {
                    index: i as u32 + 1,
                    id: id.to_string(),
                })
                .collect(),
        };
        serde_json::to_vec(&config).unwrap()
    }

    #[test]
    fn test_extract_and_encode() {
        let sm2 = tagged_hex(0x13, 0x14, Curve::Sm2, 0x10);
        let p384 = tagged_hex(0x12, 0x03, Curve::P384, 0x20);
        let p256 = hex::encode(uncompressed_point(Curve::P256, 0x30));

        let keys = extract_bookkeepers(&payload(&[&sm2, &p384, &p256])).expect("extract");
        assert_eq!(keys.len(), 3);

        let blob = encode_bookkeepers(&keys);
        // Sorted by curve label: P-256 (2, bare point), P-384 (3,
        // tagged), SM2 (20, tagged).
        let expected_len = 65 + (2 + 97) + (2 + 65);
        assert_eq!(blob.len(), expected_len);
        assert_eq!(blob[0], 0x04);
        assert_eq!(&blob[65..67], &[0x12, 0x03]);
        assert_eq!(&blob[65 + 99..65 + 101], &[0x13, 0x14]);
    }

    #[test]
    fn test_encoding_is_input_order_independent() {
        let ids = [
            tagged_hex(0x13, 0x14, Curve::Sm2, 0x10),
            tagged_hex(0x12, 0x03, Curve::P384, 0x20),
            tagged_hex(0x12, 0x01, Curve::P224, 0x30),
            hex::encode(uncompressed_point(Curve::P256, 0x40)),
        ];
        let forward: Vec<&str> = ids.iter().map(String::as_str).collect();
        let mut reversed = forward.clone();
        reversed.reverse();

        let blob_a = encode_bookkeepers(&extract_bookkeepers(&payload(&forward)).unwrap());
        let blob_b = encode_bookkeepers(&extract_bookkeepers(&payload(&reversed)).unwrap());
        assert_eq!(blob_a, blob_b);
    }

    #[test]
    fn test_same_curve_keys_sort_by_point() {
        let low = tagged_hex(0x12, 0x01, Curve::P224, 0x01);
        let high = tagged_hex(0x12, 0x01, Curve::P224, 0xEE);

        let blob = encode_bookkeepers(&extract_bookkeepers(&payload(&[&high, &low])).unwrap());
        // The 0x01-filled point must come first.
        assert_eq!(blob[3], 0x01);
    }

    #[test]
    fn test_all_tagged_committee_blob_length() {
        // Four non-P-256 committee members with 65-byte points: each
        // entry is tag + label + point.
        let ids = [
            tagged_hex(0x13, 0x14, Curve::Sm2, 0x01),
            tagged_hex(0x13, 0x14, Curve::Sm2, 0x02),
            tagged_hex(0x12, 0x05, Curve::Secp256k1, 0x03),
            tagged_hex(0x12, 0x05, Curve::Secp256k1, 0x04),
        ];
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let blob = encode_bookkeepers(&extract_bookkeepers(&payload(&refs)).unwrap());
        assert_eq!(blob.len(), 4 * (1 + 1 + 65));
    }

    #[test]
    fn test_unknown_curve_in_payload_is_fatal() {
        let bogus = {
            let mut bytes = vec![0x12, 0x09];
            bytes.extend_from_slice(&uncompressed_point(Curve::P256, 0x01));
            hex::encode(bytes)
        };
        assert_eq!(
            extract_bookkeepers(&payload(&[&bogus])),
            Err(Error::UnknownCurveLabel(9))
        );
    }

    #[test]
    fn test_garbage_payload() {
        assert!(matches!(
            extract_bookkeepers(b"not json"),
            Err(Error::MalformedConsensusPayload(_))
        ));
    }
}
