//! VSFS core: on-disk layout, inode/block allocator, directory codec, and
//! path resolver for a user-space hierarchical filesystem backed by a
//! single fixed-size image file.
//!
//! The crate is a library only: it exposes [`Vsfs`], a value that owns a
//! [`block::Disk`] and every filesystem operation against it, so a FUSE-like
//! host can mount an image, dispatch operations, and tear it down without
//! the core ever touching a kernel-mode interface itself (`spec.md` §1's
//! "out of scope" boundary).

pub mod alloc;
pub mod bitmap;
pub mod block;
pub mod dir;
pub mod error;
pub mod inode;
pub mod layout;
pub mod mount;
pub mod ops;
pub mod path;

pub use block::Disk;
pub use error::{Error, Result};
pub use ops::Stat;

/// A mounted VSFS image: owns a [`Disk`] and exposes the operation table
/// `spec.md` §6 names as methods, so a host only needs to hold one value.
pub struct Vsfs<D: Disk> {
    disk: D,
}

impl<D: Disk> Vsfs<D> {
    /// Mounts `disk`, initializing it if it is not already a valid VSFS
    /// image (`spec.md` §4.8).
    pub fn mount(disk: D) -> Result<Self> {
        if !mount::is_initialized(&disk)? {
            mount::init(&disk)?;
        }
        Ok(Self { disk })
    }

    /// Unmounts, dropping the underlying disk handle. There is no explicit
    /// flush beyond what each operation already performed.
    pub fn unmount(self) {
        mount::destroy(self.disk);
    }

    pub fn mknod(&self, path: &str) -> Result<u32> {
        ops::mknod(&self.disk, path)
    }

    pub fn mkdir(&self, path: &str) -> Result<u32> {
        ops::mkdir(&self.disk, path)
    }

    pub fn open(&self, path: &str) -> Result<u32> {
        ops::open(&self.disk, path)
    }

    pub fn getattr(&self, path: &str) -> Result<Stat> {
        ops::getattr(&self.disk, path)
    }

    pub fn read(&self, inum: u32, buf: &mut [u8], offset: u32) -> Result<u32> {
        ops::read(&self.disk, inum, buf, offset)
    }

    pub fn write(&self, inum: u32, data: &[u8], offset: u32) -> Result<u32> {
        ops::write(&self.disk, inum, data, offset)
    }
}
