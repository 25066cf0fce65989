use chunk_tree::Hasher;

/// The reference `Hasher`: a 32-byte blake3 digest, used throughout this
/// crate for content addressing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Blake3Hasher;

impl Hasher for Blake3Hasher {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        blake3::hash(data).as_bytes().to_vec()
    }
}
