//! Error kinds carried by the core (`spec.md` §7).

use thiserror::Error;

/// Errors the core can produce. Recoverable kinds flow back to the caller as
/// `Err`; `Fatal` is the one kind the core never recovers from internally —
/// it is up to the host (the `vsfs` binary, or any other FUSE-like shim) to
/// decide how to surface it, since a library must not call
/// `std::process::abort` on its caller's behalf.
#[derive(Debug, Error)]
pub enum Error {
    /// An underlying block read or write failed.
    #[error("block i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// A path resolved to inode 0 or 1, i.e. "no such file or directory".
    #[error("no such file or directory")]
    NotFound,

    /// A path was not absolute, a component was too long, or there were too
    /// many components.
    #[error("invalid path: {0}")]
    InvalidPath(&'static str),

    /// A directory-chain write failed a second time after the caller
    /// allocated the additional blocks it asked for, or the image could not
    /// be sized at mount time. Unrecoverable.
    #[error("fatal filesystem error: {0}")]
    Fatal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
