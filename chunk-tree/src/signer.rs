use crate::record::{PublicKey, Signature};

/// Produces a detached signature over the canonical `(seq, salt, v)`
/// encoding of a mutable record. The concrete primitive (ed25519, …) is
/// an external collaborator; this crate only needs the seam.
pub trait Signer: Send + Sync {
    fn public_key(&self) -> PublicKey;

    fn sign(&self, seq: u64, salt: &[u8], v: &[u8]) -> Signature;
}

/// Canonical byte encoding of the tuple a mutable write's signature
/// covers. This is the BEP44 "sign buffer" shape: a bencode dictionary of
/// `{salt?, seq, v}` with keys in sorted order, stripped of its outer
/// `d`...`e` delimiters.
///
/// # Layout
/// ```text
/// [if salt present] "4:salt" <salt-len>: <salt bytes>
/// "3:seqi" <seq as ascii decimal> "e"
/// "1:v" <v-len>: <v bytes>
/// ```
/// `salt`, `seq`, `v` sort lexicographically in that order, which is why
/// `salt` (when present) always comes first.
pub fn canonical_message(seq: u64, salt: Option<&[u8]>, v: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(v.len() + salt.map_or(0, |s| s.len()) + 32);

    if let Some(salt) = salt {
        buf.extend_from_slice(b"4:salt");
        buf.extend_from_slice(salt.len().to_string().as_bytes());
        buf.push(b':');
        buf.extend_from_slice(salt);
    }

    buf.extend_from_slice(b"3:seqi");
    buf.extend_from_slice(seq.to_string().as_bytes());
    buf.push(b'e');

    buf.extend_from_slice(b"1:v");
    buf.extend_from_slice(v.len().to_string().as_bytes());
    buf.push(b':');
    buf.extend_from_slice(v);

    buf
}
