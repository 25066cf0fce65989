use crate::concurrency::bounded_ordered_map;
use crate::error::{Result, TreeError, TreeErrorKind};
use crate::options::TreeConfig;
use crate::record::{Address, PointerEnvelope, ResolvedRecord};
use crate::transport::Transport;
use futures::future::BoxFuture;
use futures::FutureExt;

/// Fetches `root` and, if it is a `PointerBuffer`, recursively fetches and
/// concatenates every descendant leaf in order. A record that fails to
/// parse as a `PointerBuffer` is a leaf by definition (see
/// `PointerEnvelope::try_from_bytes`) — there is no separate leaf marker.
pub async fn reassemble<T: Transport>(transport: &T, root_addr: &Address, config: &TreeConfig) -> Result<ResolvedRecord, T::Error> {
    let root = fetch(transport, root_addr).await?;
    let original = root.v.clone();

    let v = match PointerEnvelope::try_from_bytes(&root.v) {
        Some(envelope) => expand(transport, envelope, 1, config).await?,
        None => root.v.clone(),
    };

    Ok(ResolvedRecord { v, seq: root.seq, salt: root.salt, k: root.k, sig: root.sig, id: root.id, original: Some(original) })
}

async fn fetch<T: Transport>(transport: &T, addr: &Address) -> Result<crate::record::StoredRecord, T::Error> {
    transport.get(addr).await.map_err(TreeError::transport)?.ok_or_else(|| {
        log::warn!("missing child record at {addr}");
        TreeError::from(TreeErrorKind::MissingChild(addr.clone()))
    })
}

/// Expands one `PointerBuffer` already known to live at `layer`, fetching
/// its children (layer `layer + 1`) with the configured concurrency bound
/// and recursing into any of them that are themselves pointer buffers.
fn expand<'a, T: Transport>(transport: &'a T, envelope: PointerEnvelope, layer: u32, config: &'a TreeConfig) -> BoxFuture<'a, Result<Vec<u8>, T::Error>> {
    async move {
        if layer > config.max_indirections {
            return Err(TreeError::from(TreeErrorKind::TooDeep));
        }

        let children = bounded_ordered_map(envelope.p, config.concurrent_requests, |child_addr| fetch_and_flatten(transport, child_addr, layer + 1, config)).await;

        let mut out = Vec::new();
        for child in children {
            out.extend(child?);
        }
        Ok(out)
    }
    .boxed()
}

fn fetch_and_flatten<'a, T: Transport>(transport: &'a T, addr: Address, layer: u32, config: &'a TreeConfig) -> BoxFuture<'a, Result<Vec<u8>, T::Error>> {
    async move {
        let record = fetch(transport, &addr).await?;
        match PointerEnvelope::try_from_bytes(&record.v) {
            Some(envelope) => expand(transport, envelope, layer, config).await,
            None => Ok(record.v),
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StoredRecord;
    use crate::transport::ImmutableWrite;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct TestTransport {
        store: Mutex<HashMap<String, StoredRecord>>,
    }

    #[derive(Debug)]
    struct TestTransportError;
    impl std::fmt::Display for TestTransportError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "test transport error")
        }
    }
    impl std::error::Error for TestTransportError {}

    fn fnv(data: &[u8]) -> Vec<u8> {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in data {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        h.to_le_bytes().to_vec()
    }

    impl TestTransport {
        fn put(&self, v: Vec<u8>) -> Address {
            let addr = Address::new(hex::encode(fnv(&v)));
            self.store.lock().unwrap().insert(addr.as_str().to_string(), StoredRecord::leaf(v, "test"));
            addr
        }
    }

    impl Transport for TestTransport {
        type Error = TestTransportError;

        async fn put_immutable(&self, write: ImmutableWrite) -> std::result::Result<Address, Self::Error> {
            Ok(self.put(write.v))
        }

        async fn put_mutable(&self, _write: crate::transport::MutableWrite) -> std::result::Result<Address, Self::Error> {
            unimplemented!("not exercised by these tests")
        }

        async fn get(&self, address: &Address) -> std::result::Result<Option<StoredRecord>, Self::Error> {
            Ok(self.store.lock().unwrap().get(address.as_str()).cloned())
        }
    }

    #[tokio::test]
    async fn reassembles_a_bare_leaf() {
        let transport = TestTransport::default();
        let addr = transport.put(b"just a leaf".to_vec());
        let config = TreeConfig::default();

        let resolved = reassemble(&transport, &addr, &config).await.unwrap();
        assert_eq!(resolved.v, b"just a leaf");
    }

    #[tokio::test]
    async fn reassembles_a_two_level_tree_in_order() {
        let transport = TestTransport::default();
        let config = TreeConfig::default();

        let a = transport.put(b"AAAA".to_vec());
        let b = transport.put(b"BBBB".to_vec());
        let c = transport.put(b"CCCC".to_vec());
        let root_bytes = PointerEnvelope::new(vec![a, b, c]).to_bytes();
        let root = transport.put(root_bytes);

        let resolved = reassemble(&transport, &root, &config).await.unwrap();
        assert_eq!(resolved.v, b"AAAABBBBCCCC");
    }

    #[tokio::test]
    async fn missing_child_is_a_hard_error() {
        let transport = TestTransport::default();
        let config = TreeConfig::default();

        let dangling = Address::new("f".repeat(40));
        let root_bytes = PointerEnvelope::new(vec![dangling.clone()]).to_bytes();
        let root = transport.put(root_bytes);

        let err = reassemble(&transport, &root, &config).await.unwrap_err();
        match err.into_kind() {
            TreeErrorKind::MissingChild(addr) => assert_eq!(addr, dangling),
            other => panic!("expected MissingChild, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn tree_deeper_than_max_indirections_is_rejected() {
        let transport = TestTransport::default();
        let config = TreeConfig::new(1, 1000, 40, 5);

        let leaf = transport.put(b"deep".to_vec());
        let inner_bytes = PointerEnvelope::new(vec![leaf]).to_bytes();
        let inner = transport.put(inner_bytes);
        let outer_bytes = PointerEnvelope::new(vec![inner]).to_bytes();
        let outer = transport.put(outer_bytes);

        let err = reassemble(&transport, &outer, &config).await.unwrap_err();
        assert!(matches!(err.into_kind(), TreeErrorKind::TooDeep));
    }
}
