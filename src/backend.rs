use chunk_tree::{Address, GetOptions, Hasher, PutOptions, ResolvedRecord, Signer, Transport, TreeConfig};

/// Ties a `Transport`, a `Hasher`, an optional `Signer`, and a
/// `TreeConfig` together into the one entry point callers actually use.
/// The tree-building and reassembly machinery stays generic in
/// `chunk-tree`, and this struct is just wiring plus the payload-size
/// guard that lets an oversized `put` fail before it writes a single byte.
pub struct Backend<T: Transport> {
    transport: T,
    hasher: Box<dyn Hasher>,
    signer: Option<Box<dyn Signer>>,
    config: TreeConfig,
}

impl<T: Transport> Backend<T> {
    pub fn new(transport: T, hasher: impl Hasher + 'static, signer: Option<Box<dyn Signer>>, config: TreeConfig) -> Self {
        Self { transport, hasher: Box::new(hasher), signer, config }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub async fn put(&self, payload: &[u8], opts: &PutOptions) -> chunk_tree::Result<Address, T::Error> {
        let max = self.config.max_payload();
        if payload.len() as u64 > max {
            return Err(chunk_tree::TreeErrorKind::CapacityExceeded.into());
        }

        chunk_tree::put(&self.transport, self.hasher.as_ref(), self.signer.as_deref(), payload, opts, &self.config).await
    }

    pub async fn get(&self, address: &Address, opts: &GetOptions) -> chunk_tree::Result<ResolvedRecord, T::Error> {
        chunk_tree::get(&self.transport, address, opts, &self.config).await
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Blake3Hasher;
    use crate::memory::MemoryTransport;
    use crate::signing::Ed25519Signer;

    #[tokio::test]
    async fn put_then_get_recovers_original_payload() {
        let backend = Backend::new(MemoryTransport::default(), Blake3Hasher, None, TreeConfig::new(2, 200, 40, 4));
        let payload = vec![7u8; 5_000];

        let addr = backend.put(&payload, &PutOptions::default()).await.unwrap();
        let resolved = backend.get(&addr, &GetOptions::default()).await.unwrap();

        assert_eq!(resolved.v, payload);
    }

    #[tokio::test]
    async fn oversized_payload_is_rejected_before_any_write() {
        let config = TreeConfig::new(1, 50, 40, 4);
        let backend = Backend::new(MemoryTransport::default(), Blake3Hasher, None, config.clone());
        let payload = vec![0u8; config.max_payload() as usize + 1];

        let result = backend.put(&payload, &PutOptions::default()).await;
        assert!(matches!(result.unwrap_err().kind(), chunk_tree::TreeErrorKind::CapacityExceeded));
    }

    #[tokio::test]
    async fn mutable_put_then_get_round_trips_with_a_newer_sequence() {
        let signer = Ed25519Signer::generate();
        let backend = Backend::new(MemoryTransport::default(), Blake3Hasher, Some(Box::new(signer)), TreeConfig::new(2, 200, 40, 4));

        let addr1 = backend.put(b"first", &PutOptions { seq: Some(1), salt: Some(b"slot".to_vec()) }).await.unwrap();
        let addr2 = backend.put(b"second", &PutOptions { seq: Some(2), salt: Some(b"slot".to_vec()) }).await.unwrap();
        assert_eq!(addr1, addr2, "same (public_key, salt) must resolve to the same mutable slot");

        let resolved = backend.get(&addr2, &GetOptions::default()).await.unwrap();
        assert_eq!(resolved.v, b"second");
    }
}
