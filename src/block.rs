//! Block-addressable storage.
//!
//! The core never touches a file descriptor or a memory buffer directly; it
//! goes through this trait, which stands in for the "raw block I/O
//! primitive" `spec.md` §1 calls out as an external collaborator. Two
//! implementations are provided: [`FileDisk`], backing a real image file
//! (the production path, grounded in `mkfs/src/main.rs`'s
//! `write_sector`/`read_sector` over `FileExt::{read_at,write_at}`), and
//! [`MemDisk`], an in-memory stand-in used by the test suite so `cargo test`
//! never touches the filesystem.

use crate::layout::BLOCK_SIZE;
use std::fs::File;
use std::io;
use std::os::unix::fs::FileExt;

/// One on-disk block's worth of bytes.
pub type BlockBuf = [u8; BLOCK_SIZE];

/// Reads and writes single fixed-size blocks by index.
///
/// Implementors need not cache or batch; the core issues exactly one
/// `read_block`/`write_block` call per block it touches, and relies on each
/// write being durable once it returns (`spec.md` §5).
pub trait Disk {
    fn read_block(&self, block_no: u32, buf: &mut BlockBuf) -> io::Result<()>;
    fn write_block(&self, block_no: u32, buf: &BlockBuf) -> io::Result<()>;

    /// Total number of blocks backing this disk.
    fn num_blocks(&self) -> u32;
}

/// A `Disk` backed by a real file on a POSIX filesystem.
pub struct FileDisk {
    file: File,
    num_blocks: u32,
}

impl FileDisk {
    /// Opens an existing image file. The caller is responsible for having
    /// sized it correctly; `mount::init` is the only code that creates one.
    pub fn open(file: File, num_blocks: u32) -> Self {
        Self { file, num_blocks }
    }
}

impl Disk for FileDisk {
    fn read_block(&self, block_no: u32, buf: &mut BlockBuf) -> io::Result<()> {
        self.file.read_at(buf, block_no as u64 * BLOCK_SIZE as u64)?;
        Ok(())
    }

    fn write_block(&self, block_no: u32, buf: &BlockBuf) -> io::Result<()> {
        self.file.write_at(buf, block_no as u64 * BLOCK_SIZE as u64)?;
        Ok(())
    }

    fn num_blocks(&self) -> u32 {
        self.num_blocks
    }
}

/// An in-memory `Disk`, used by unit and integration tests.
pub struct MemDisk {
    blocks: std::cell::RefCell<Vec<BlockBuf>>,
}

impl MemDisk {
    pub fn new(num_blocks: u32) -> Self {
        Self {
            blocks: std::cell::RefCell::new(vec![[0u8; BLOCK_SIZE]; num_blocks as usize]),
        }
    }
}

impl Disk for MemDisk {
    fn read_block(&self, block_no: u32, buf: &mut BlockBuf) -> io::Result<()> {
        buf.copy_from_slice(&self.blocks.borrow()[block_no as usize]);
        Ok(())
    }

    fn write_block(&self, block_no: u32, buf: &BlockBuf) -> io::Result<()> {
        self.blocks.borrow_mut()[block_no as usize] = *buf;
        Ok(())
    }

    fn num_blocks(&self) -> u32 {
        self.blocks.borrow().len() as u32
    }
}
