use crate::record::{Address, PublicKey, Signature, StoredRecord};
use std::fmt::Debug;
use std::future::Future;

/// A content-addressed write. The transport derives the address itself as
/// a pure function of `v` — two calls with equal `v` must yield equal
/// addresses.
#[derive(Debug, Clone)]
pub struct ImmutableWrite {
    pub v: Vec<u8>,
}

/// An already-signed mutable write. No secret key crosses this boundary —
/// signing happens once, upstream, in the tree builder, so a transport
/// never has to be trusted with key material; the transport's job is only
/// to verify `signature` against `public_key` and enforce `seq`
/// monotonicity at the address derived from `(public_key, salt)`.
#[derive(Debug, Clone)]
pub struct MutableWrite {
    pub v: Vec<u8>,
    pub seq: u64,
    pub salt: Vec<u8>,
    pub public_key: PublicKey,
    pub signature: Signature,
}

/// The abstract address-keyed store the chunking engine is generic over.
/// Consumed, not implemented, by this crate — `chunk-store` supplies the
/// reference in-memory implementation.
pub trait Transport: Send + Sync {
    type Error: Debug + Send + Sync + 'static;

    fn put_immutable(&self, write: ImmutableWrite) -> impl Future<Output = Result<Address, Self::Error>> + Send;

    fn put_mutable(&self, write: MutableWrite) -> impl Future<Output = Result<Address, Self::Error>> + Send;

    /// Returns `Ok(None)` for "not found" — a missing record is an
    /// expected outcome at this layer, not a failure of the transport.
    fn get(&self, address: &Address) -> impl Future<Output = Result<Option<StoredRecord>, Self::Error>> + Send;
}
