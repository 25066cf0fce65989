use crate::concurrency::bounded_ordered_map;
use crate::error::{Result, TreeError, TreeErrorKind};
use crate::hasher::Hasher;
use crate::options::{PutOptions, TreeConfig};
use crate::record::{Address, PointerEnvelope};
use crate::signer::Signer;
use crate::transport::{ImmutableWrite, MutableWrite, Transport};
use rand::rngs::OsRng;
use rand::RngCore;

/// One slot of a tree level: either a raw fragment still waiting to be
/// stored, or an address already resolved by a previous level (when
/// folding the result of one grouping pass into the next).
enum LevelItem {
    Fragment(Vec<u8>),
    Addr(Address),
}

/// Builds (and publishes) the pointer tree for `fragments`, returning the
/// address the caller should remember to read the payload back later.
///
/// Only the record whose address is ultimately returned — the bare leaf
/// when there is exactly one fragment, otherwise the outermost
/// `PointerBuffer` — is eligible for the mutable write path. Every other
/// record this function publishes (every leaf fragment when there's more
/// than one, and every intermediate `PointerBuffer` produced while
/// folding boxes of size `fan_out`) is always content-addressed: an
/// intermediate buffer's address has to be a pure function of its
/// contents, since its parent references it by that address, and a
/// caller-chosen `seq` would make that address depend on write order
/// instead.
pub async fn build<T: Transport>(
    transport: &T,
    hasher: &dyn Hasher,
    signer: Option<&dyn Signer>,
    fragments: Vec<Vec<u8>>,
    opts: &PutOptions,
    config: &TreeConfig,
) -> Result<Address, T::Error> {
    if opts.seq.is_some() && signer.is_none() {
        return Err(TreeErrorKind::NoKeysSet.into());
    }

    if fragments.len() == 1 {
        let fragment = fragments.into_iter().next().expect("len checked above");
        // Single-fragment auto-salt mixes in randomness (digest(data‖random)),
        // so it is non-deterministic across retries; callers who need
        // deterministic content addressing on this path must supply `salt`.
        return publish_root(transport, hasher, signer, fragment, opts, true).await;
    }

    let mut items: Vec<LevelItem> = fragments.into_iter().map(LevelItem::Fragment).collect();
    let mut depth: u32 = 0;

    loop {
        let addresses = resolve_level(transport, items, config.concurrent_requests).await?;

        if depth + 1 > config.max_indirections {
            log::error!("payload needs more than {} indirection levels, refusing to build a deeper tree", config.max_indirections);
            return Err(TreeErrorKind::CapacityExceeded.into());
        }

        if addresses.len() <= config.fan_out {
            let bytes = PointerEnvelope::new(addresses).to_bytes();
            // Deterministic auto-salt here (digest(PB)), unlike the
            // single-fragment path above.
            return publish_root(transport, hasher, signer, bytes, opts, false).await;
        }

        log::debug!("level {depth} has {} addresses, folding into boxes of {}", addresses.len(), config.fan_out);

        let boxes = chunk_owned(addresses, config.fan_out);
        let box_bytes: Vec<Vec<u8>> = boxes.into_iter().map(|box_addrs| PointerEnvelope::new(box_addrs).to_bytes()).collect();

        let box_results = bounded_ordered_map(box_bytes, config.concurrent_requests, |bytes| async move { publish_intermediate(transport, bytes).await }).await;

        let box_addresses: std::result::Result<Vec<Address>, TreeError<T::Error>> = box_results.into_iter().collect();
        items = box_addresses?.into_iter().map(LevelItem::Addr).collect();
        depth += 1;
    }
}

/// Resolves every item in one level to an address: stores raw fragments
/// (content-addressed, always immutable) and passes already-resolved
/// addresses straight through. One bounded pass covers the entire level —
/// both "store this level's raw fragments" and, one level up, "publish
/// this level's intermediate pointer buffers" each draw from the same
/// per-level concurrency budget, never a budget per box.
async fn resolve_level<T: Transport>(transport: &T, items: Vec<LevelItem>, concurrency: usize) -> Result<Vec<Address>, T::Error> {
    let results = bounded_ordered_map(items, concurrency, |item| async move {
        match item {
            LevelItem::Fragment(bytes) => publish_intermediate(transport, bytes).await,
            LevelItem::Addr(addr) => Ok(addr),
        }
    })
    .await;

    results.into_iter().collect()
}

async fn publish_intermediate<T: Transport>(transport: &T, v: Vec<u8>) -> Result<Address, T::Error> {
    transport.put_immutable(ImmutableWrite { v }).await.map_err(TreeError::transport)
}

async fn publish_root<T: Transport>(
    transport: &T,
    hasher: &dyn Hasher,
    signer: Option<&dyn Signer>,
    v: Vec<u8>,
    opts: &PutOptions,
    randomize_auto_salt: bool,
) -> Result<Address, T::Error> {
    let Some(seq) = opts.seq else {
        return transport.put_immutable(ImmutableWrite { v }).await.map_err(TreeError::transport);
    };

    let signer = signer.expect("checked by caller");

    let salt = match &opts.salt {
        Some(salt) => salt.clone(),
        None if randomize_auto_salt => {
            let mut seed = v.clone();
            let mut entropy = [0u8; 16];
            let mut rng = OsRng;
            rng.fill_bytes(&mut entropy);
            seed.extend_from_slice(&entropy);
            hasher.digest(&seed)
        }
        None => hasher.digest(&v),
    };

    let signature = signer.sign(seq, &salt, &v);
    let write = MutableWrite { v, seq, salt, public_key: signer.public_key(), signature };

    transport.put_mutable(write).await.map_err(TreeError::transport)
}

fn chunk_owned<T>(mut items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let mut out = Vec::new();
    while !items.is_empty() {
        let at = items.len().min(size);
        let rest = items.split_off(at);
        out.push(items);
        items = rest;
    }
    out
}
