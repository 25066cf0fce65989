use crate::record::Address;
use backtrace::Backtrace;
use std::fmt;

/// Everything that can go wrong while slicing, building, or reassembling
/// a pointer tree. Generic over the transport's own error type so this
/// crate never has to know what a concrete `Transport` impl's failures
/// look like.
pub enum TreeErrorKind<E> {
    /// The payload would require a tree deeper than `max_indirections`.
    CapacityExceeded,
    /// Defensive depth counter tripped during reassembly — should be
    /// unreachable if the writer enforced `CapacityExceeded` correctly,
    /// but a corrupt or adversarial tree must not be walked forever.
    TooDeep,
    /// A mutable write was requested (`seq` set) without a signer configured.
    NoKeysSet,
    /// A child address referenced by a pointer buffer resolved to "not found".
    MissingChild(Address),
    /// The underlying transport failed.
    Transport(E),
}

impl<E: fmt::Debug> fmt::Debug for TreeErrorKind<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded => write!(f, "CapacityExceeded"),
            Self::TooDeep => write!(f, "TooDeep"),
            Self::NoKeysSet => write!(f, "NoKeysSet"),
            Self::MissingChild(addr) => write!(f, "MissingChild({addr:?})"),
            Self::Transport(err) => write!(f, "Transport({err:?})"),
        }
    }
}

pub struct TreeError<E> {
    kind: TreeErrorKind<E>,
    backtrace: Backtrace,
}

impl<E> TreeError<E> {
    pub fn kind(&self) -> &TreeErrorKind<E> {
        &self.kind
    }

    pub fn into_kind(self) -> TreeErrorKind<E> {
        self.kind
    }
}

impl<E> From<TreeErrorKind<E>> for TreeError<E> {
    fn from(kind: TreeErrorKind<E>) -> Self {
        Self { kind, backtrace: Backtrace::new() }
    }
}

impl<E> TreeError<E> {
    /// Wraps a transport failure. Kept as an explicit function rather than
    /// a blanket `From<E>` impl, since `E` is caller-chosen and would make
    /// that blanket impl overlap with impls on concrete transport error
    /// types elsewhere in the crate graph.
    pub fn transport(err: E) -> Self {
        TreeErrorKind::Transport(err).into()
    }
}

impl<E: fmt::Debug> fmt::Debug for TreeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", self.kind)?;
        match std::env::var("RUST_BACKTRACE").as_deref() {
            Ok("full") => write!(f, "{:#?}", self.backtrace),
            Ok("1") => write!(f, "{:?}", self.backtrace),
            _ => write!(f, ""),
        }
    }
}

impl<E: fmt::Debug> fmt::Display for TreeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl<E: fmt::Debug> std::error::Error for TreeError<E> {}

pub type Result<T, E> = std::result::Result<T, TreeError<E>>;
