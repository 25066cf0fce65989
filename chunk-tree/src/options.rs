/// Per-call write options. `seq` present (including `seq = 0`) selects
/// the mutable write path for the root record; `salt`, when supplied, is
/// used for the root record only.
#[derive(Debug, Clone, Default)]
pub struct PutOptions {
    pub seq: Option<u64>,
    pub salt: Option<Vec<u8>>,
}

/// Per-call read options. `recursive` suppresses reassembly, returning
/// the raw fetched record (used internally when fetching children one
/// level at a time, and exposed to callers who want the same).
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    pub recursive: bool,
}

/// Engine-wide configuration: tree depth limit, the transport's own
/// size/address bounds, and how much fan-out/concurrency to allow.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    pub max_indirections: u32,
    pub buffer_size_limit: usize,
    pub address_size: usize,
    pub concurrent_requests: usize,
    /// Cached `compute_fan_out(buffer_size_limit, address_size)` — computed
    /// once at construction since it only depends on the two fields above.
    pub fan_out: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new(2, 1000, 40, 5)
    }
}

impl TreeConfig {
    pub fn new(max_indirections: u32, buffer_size_limit: usize, address_size: usize, concurrent_requests: usize) -> Self {
        let fan_out = crate::capacity::compute_fan_out(buffer_size_limit, address_size);
        assert!(fan_out >= 2, "buffer_size_limit/address_size combination allows no branching (K={fan_out})");

        Self { max_indirections, buffer_size_limit, address_size, concurrent_requests, fan_out }
    }

    pub fn max_payload(&self) -> u64 {
        crate::capacity::max_payload(self.fan_out, self.max_indirections, self.buffer_size_limit)
    }
}
