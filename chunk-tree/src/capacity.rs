use crate::record::{Address, PointerEnvelope};

/// Computes the maximum fan-out `K`: the largest number of child
/// addresses that still fit, once serialized as a `PointerEnvelope`,
/// within `buffer_size_limit` bytes. Rather than deriving a closed-form
/// `floor((B-O)/(A+sep))` from the envelope's serialized overhead, this
/// grows a candidate address list one entry at a time and measures the
/// real serialized length — the exact per-entry JSON overhead (quoting,
/// commas, first-element spacing) isn't a single separable constant at
/// this crate's encoding boundary, and the search space here is always
/// tiny (`buffer_size_limit / address_size` iterations, once per `put`).
pub fn compute_fan_out(buffer_size_limit: usize, address_size: usize) -> usize {
    let placeholder = Address::new("f".repeat(address_size));
    let mut addresses = Vec::new();

    loop {
        let mut candidate = addresses.clone();
        candidate.push(placeholder.clone());

        let envelope = PointerEnvelope::new(candidate.clone());
        if envelope.to_bytes().len() > buffer_size_limit {
            break;
        }

        addresses = candidate;
    }

    addresses.len()
}

/// The largest payload representable by a tree of the given depth and
/// fan-out: `K^max_indirections · buffer_size_limit`. Saturates rather
/// than overflows — a saturated result still correctly fails any payload
/// a real system could hold in memory.
pub fn max_payload(fan_out: usize, max_indirections: u32, buffer_size_limit: usize) -> u64 {
    (fan_out as u64)
        .saturating_pow(max_indirections)
        .saturating_mul(buffer_size_limit as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_out_is_at_least_two_for_reasonable_defaults() {
        let k = compute_fan_out(1000, 40);
        assert!(k >= 2, "K={k} must allow branching");
    }

    #[test]
    fn fan_out_respects_the_buffer_limit() {
        let k = compute_fan_out(1000, 40);
        let addresses = vec![Address::new("f".repeat(40)); k + 1];
        let oversized = PointerEnvelope::new(addresses).to_bytes().len();
        assert!(oversized > 1000, "K+1 addresses must not fit");

        let addresses = vec![Address::new("f".repeat(40)); k];
        let fits = PointerEnvelope::new(addresses).to_bytes().len();
        assert!(fits <= 1000, "K addresses must fit");
    }

    #[test]
    fn max_payload_matches_k_pow_d_times_b() {
        assert_eq!(max_payload(24, 2, 1000), 24u64.pow(2) * 1000);
    }

    #[test]
    fn max_payload_saturates_instead_of_overflowing() {
        assert_eq!(max_payload(usize::MAX, 64, usize::MAX), u64::MAX);
    }
}
