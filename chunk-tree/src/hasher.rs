/// Produces short, fixed-length content digests used as salts and, by
/// `Transport` implementations, as address material. The concrete
/// primitive (blake3, sha2, …) is an external collaborator — this crate
/// only needs the seam.
pub trait Hasher: Send + Sync {
    fn digest(&self, data: &[u8]) -> Vec<u8>;
}
