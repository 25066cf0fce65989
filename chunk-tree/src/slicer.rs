/// Deterministic byte-aligned split: every fragment is exactly `limit`
/// bytes long except possibly the last, order preserved, no compression or
/// encoding transform. An empty payload slices to a single empty fragment
/// so the one-fragment path in the tree builder always has something to
/// publish.
pub fn slice(payload: &[u8], limit: usize) -> Vec<Vec<u8>> {
    assert!(limit > 0, "buffer_size_limit must be positive");

    if payload.is_empty() {
        return vec![Vec::new()];
    }

    payload.chunks(limit).map(|chunk| chunk.to_vec()).collect()
}
