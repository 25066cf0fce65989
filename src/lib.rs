//! Reference implementation of the chunking/indirection storage engine
//! over an in-memory transport: slices a payload into size-bounded
//! fragments, arranges them into a tree of `PointerBuffer` records, and
//! signs the outermost record when a caller asks for the mutable write
//! path. See `chunk_tree` for the transport-agnostic engine this crate
//! wires up.

pub mod backend;
pub mod error;
pub mod hash;
pub mod memory;
pub mod signing;

pub use backend::Backend;
pub use chunk_tree::{Address, GetOptions, PointerEnvelope, PutOptions, ResolvedRecord, TreeConfig, TreeError, TreeErrorKind};
pub use hash::Blake3Hasher;
pub use memory::MemoryTransport;
pub use signing::Ed25519Signer;

/// Initializes the `env_logger` backend. Callers own the decision of
/// whether and when to call this; nothing here calls it implicitly.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
