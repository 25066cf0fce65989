use crate::error::MemoryError;
use crate::hash::Blake3Hasher;
use crate::signing;
use chunk_tree::{Address, Hasher, ImmutableWrite, MutableWrite, StoredRecord, Transport};
use std::collections::HashMap;
use std::sync::Mutex;

/// A mutable write's `seq` was not exactly one more than what was
/// already stored at that address.
#[derive(Debug, Clone)]
pub struct SequenceConflict {
    pub address: Address,
    pub expected_min_seq: u64,
    pub got: u64,
}

/// A mutable write's signature did not verify against its own public key.
#[derive(Debug, Clone)]
pub struct SignatureInvalid {
    pub public_key_hex: String,
}

/// The reference in-memory [`Transport`]: a `HashMap` guarded by a mutex,
/// addressing every record by `hex(digest(...))` truncated to
/// `address_size / 2` bytes (two hex characters per byte). Mutable writes
/// are addressed by `(public_key, salt)` rather than by content, since
/// that's the only way a second write to the same logical slot resolves
/// to the same address as the first.
pub struct MemoryTransport {
    hasher: Blake3Hasher,
    address_bytes: usize,
    store: Mutex<HashMap<String, StoredRecord>>,
}

impl MemoryTransport {
    pub fn new(address_size: usize) -> Self {
        assert!(address_size >= 2 && address_size % 2 == 0, "address_size must be a positive even number of hex characters");
        Self { hasher: Blake3Hasher, address_bytes: address_size / 2, store: Mutex::new(HashMap::new()) }
    }

    fn address_from_digest(&self, digest: &[u8]) -> Address {
        Address::new(hex::encode(&digest[..self.address_bytes.min(digest.len())]))
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new(40)
    }
}

impl Transport for MemoryTransport {
    type Error = MemoryError;

    async fn put_immutable(&self, write: ImmutableWrite) -> std::result::Result<Address, Self::Error> {
        let digest = self.hasher.digest(&write.v);
        let address = self.address_from_digest(&digest);
        self.store.lock().unwrap().insert(address.as_str().to_string(), StoredRecord::leaf(write.v, "memory"));
        Ok(address)
    }

    async fn put_mutable(&self, write: MutableWrite) -> std::result::Result<Address, Self::Error> {
        if !signing::verify(&write.public_key, write.seq, &write.salt, &write.v, &write.signature) {
            log::warn!("rejecting mutable write from {}: signature invalid", write.public_key.to_hex());
            return Err(SignatureInvalid { public_key_hex: write.public_key.to_hex() }.into());
        }

        let mut seed = write.public_key.0.to_vec();
        seed.extend_from_slice(&write.salt);
        let digest = self.hasher.digest(&seed);
        let address = self.address_from_digest(&digest);

        let mut store = self.store.lock().unwrap();
        if let Some(existing_seq) = store.get(address.as_str()).and_then(|r| r.seq) {
            if write.seq != existing_seq + 1 {
                log::warn!("rejecting mutable write at {address}: seq {} is not the successor of stored seq {existing_seq}", write.seq);
                return Err(SequenceConflict { address: address.clone(), expected_min_seq: existing_seq + 1, got: write.seq }.into());
            }
        }

        store.insert(
            address.as_str().to_string(),
            StoredRecord { v: write.v, seq: Some(write.seq), salt: Some(write.salt), k: Some(write.public_key), sig: Some(write.signature), id: Some("memory".into()) },
        );
        Ok(address)
    }

    async fn get(&self, address: &Address) -> std::result::Result<Option<StoredRecord>, Self::Error> {
        Ok(self.store.lock().unwrap().get(address.as_str()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::Ed25519Signer;
    use chunk_tree::Signer;

    #[tokio::test]
    async fn immutable_writes_are_idempotent() {
        let transport = MemoryTransport::default();
        let a = transport.put_immutable(ImmutableWrite { v: b"hello".to_vec() }).await.unwrap();
        let b = transport.put_immutable(ImmutableWrite { v: b"hello".to_vec() }).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn mutable_write_then_read_round_trips() {
        let transport = MemoryTransport::default();
        let signer = Ed25519Signer::generate();
        let salt = b"s".to_vec();
        let sig = signer.sign(1, &salt, b"v1");

        let addr = transport.put_mutable(MutableWrite { v: b"v1".to_vec(), seq: 1, salt, public_key: signer.public_key(), signature: sig }).await.unwrap();

        let record = transport.get(&addr).await.unwrap().unwrap();
        assert_eq!(record.v, b"v1");
        assert_eq!(record.seq, Some(1));
    }

    #[tokio::test]
    async fn stale_sequence_is_rejected() {
        let transport = MemoryTransport::default();
        let signer = Ed25519Signer::generate();
        let salt = b"s".to_vec();

        let sig1 = signer.sign(5, &salt, b"v1");
        transport.put_mutable(MutableWrite { v: b"v1".to_vec(), seq: 5, salt: salt.clone(), public_key: signer.public_key(), signature: sig1 }).await.unwrap();

        let sig2 = signer.sign(5, &salt, b"v2");
        let result = transport.put_mutable(MutableWrite { v: b"v2".to_vec(), seq: 5, salt, public_key: signer.public_key(), signature: sig2 }).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn sequence_gap_is_rejected() {
        let transport = MemoryTransport::default();
        let signer = Ed25519Signer::generate();
        let salt = b"s".to_vec();

        let sig1 = signer.sign(1, &salt, b"v1");
        transport.put_mutable(MutableWrite { v: b"v1".to_vec(), seq: 1, salt: salt.clone(), public_key: signer.public_key(), signature: sig1 }).await.unwrap();

        // seq jumps from 1 to 5, skipping the required successor 2.
        let sig2 = signer.sign(5, &salt, b"v2");
        let result = transport.put_mutable(MutableWrite { v: b"v2".to_vec(), seq: 5, salt, public_key: signer.public_key(), signature: sig2 }).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn invalid_signature_is_rejected() {
        let transport = MemoryTransport::default();
        let signer = Ed25519Signer::generate();
        let forged_sig = signer.sign(1, b"salt", b"other value");

        let result = transport.put_mutable(MutableWrite { v: b"v1".to_vec(), seq: 1, salt: b"salt".to_vec(), public_key: signer.public_key(), signature: forged_sig }).await;
        assert!(result.is_err());
    }
}
