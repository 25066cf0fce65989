//! The chunking/indirection engine: splitting an arbitrary payload into a
//! tree of size-bounded fragments over an abstract transport, and
//! reassembling it back on read. Generic over `Transport`, `Hasher` and
//! `Signer` — this crate has no concrete storage, hashing, or signing
//! code of its own; `chunk-store` supplies all three.

pub mod capacity;
pub mod concurrency;
pub mod error;
pub mod hasher;
pub mod options;
mod pointer_builder;
mod reassembler;
pub mod record;
pub mod signer;
pub mod slicer;
pub mod transport;

pub use error::{Result, TreeError, TreeErrorKind};
pub use hasher::Hasher;
pub use options::{GetOptions, PutOptions, TreeConfig};
pub use record::{Address, PointerEnvelope, PointerTag, PublicKey, ResolvedRecord, Signature, StoredRecord};
pub use signer::{canonical_message, Signer};
pub use transport::{ImmutableWrite, MutableWrite, Transport};

/// Slices `payload` per `config`, builds the pointer tree, and publishes
/// it. Returns the address of the outermost record — a bare leaf if the
/// payload fit in a single fragment, otherwise the root `PointerBuffer`.
pub async fn put<T: Transport>(
    transport: &T,
    hasher: &dyn Hasher,
    signer: Option<&dyn Signer>,
    payload: &[u8],
    opts: &PutOptions,
    config: &TreeConfig,
) -> Result<Address, T::Error> {
    let fragments = slicer::slice(payload, config.buffer_size_limit);
    pointer_builder::build(transport, hasher, signer, fragments, opts, config).await
}

/// Fetches `address` and, unless `opts.recursive` is set, fully
/// reassembles it into the original payload.
pub async fn get<T: Transport>(transport: &T, address: &Address, opts: &GetOptions, config: &TreeConfig) -> Result<ResolvedRecord, T::Error> {
    if opts.recursive {
        let record = transport.get(address).await.map_err(TreeError::transport)?.ok_or_else(|| TreeError::from(TreeErrorKind::MissingChild(address.clone())))?;
        return Ok(ResolvedRecord::from(record));
    }

    reassembler::reassemble(transport, address, config).await
}
