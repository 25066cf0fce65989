use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed-width hex identifier handed back by a `Transport` write and
/// used to look the same record up again. Never synthesized by callers —
/// only ever returned by a `Transport` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ed25519-shaped public key. Kept as a plain byte array here so the
/// core engine never has to depend on a concrete signature crate — only
/// `chunk-store`'s `Signer`/`Transport` implementations know what's
/// actually inside.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey(#[serde(with = "hex_bytes32")] pub [u8; 32]);

impl PublicKey {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/// An ed25519-shaped detached signature. Same rationale as `PublicKey`.
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "hex_bytes64")] pub [u8; 64]);

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}…)", &hex::encode(self.0)[..16])
    }
}

mod hex_bytes32 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(d)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes.try_into().map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}

mod hex_bytes64 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 64], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 64], D::Error> {
        let s = String::deserialize(d)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes.try_into().map_err(|_| serde::de::Error::custom("expected 64 bytes"))
    }
}

/// A `PointerBuffer`: the only structured payload the engine ever writes
/// as a record's `v`. `wasteland_type` is the literal wire discriminator
/// by which a reassembler recognises an indirection record rather than a
/// leaf — kept under that exact field name for wire compatibility with
/// existing deployments that expect it, even though nothing else in this
/// codebase carries that name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerEnvelope {
    pub wasteland_type: PointerTag,
    pub p: Vec<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PointerTag {
    #[serde(rename = "pointers")]
    Pointers,
}

impl PointerEnvelope {
    pub fn new(p: Vec<Address>) -> Self {
        Self { wasteland_type: PointerTag::Pointers, p }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("PointerEnvelope always serializes")
    }

    /// Returns `Some` only if `bytes` deserializes into a genuine pointer
    /// envelope. A payload that merely happens to decode into *some* JSON
    /// object without the discriminator is a leaf, not a pointer buffer —
    /// this is the full extent of what distinguishes the two. A user
    /// payload whose bytes happen to coincide with this shape is
    /// indistinguishable from a real pointer buffer; that ambiguity is
    /// inherent to a self-describing wire format with no separate leaf tag.
    pub fn try_from_bytes(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }
}

/// The unit returned by a `Transport::get` and constructed (minus `id`)
/// before every `Transport::put_*` call.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub v: Vec<u8>,
    pub seq: Option<u64>,
    pub salt: Option<Vec<u8>>,
    pub k: Option<PublicKey>,
    pub sig: Option<Signature>,
    /// Transport-origin tag, set on reads only (e.g. `"memory"`).
    pub id: Option<String>,
}

impl StoredRecord {
    pub fn leaf(v: Vec<u8>, id: impl Into<String>) -> Self {
        Self { v, seq: None, salt: None, k: None, sig: None, id: Some(id.into()) }
    }
}

/// A fully reassembled read: `v` is the concatenated leaf payload, and
/// `original` holds the root record's own `v` before reassembly clobbered
/// it (useful for callers that want to inspect the raw root pointer
/// buffer after the fact).
#[derive(Debug, Clone)]
pub struct ResolvedRecord {
    pub v: Vec<u8>,
    pub seq: Option<u64>,
    pub salt: Option<Vec<u8>>,
    pub k: Option<PublicKey>,
    pub sig: Option<Signature>,
    pub id: Option<String>,
    pub original: Option<Vec<u8>>,
}

impl From<StoredRecord> for ResolvedRecord {
    fn from(r: StoredRecord) -> Self {
        Self { v: r.v, seq: r.seq, salt: r.salt, k: r.k, sig: r.sig, id: r.id, original: None }
    }
}
