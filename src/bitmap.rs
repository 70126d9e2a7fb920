//! Bitmap manager (`spec.md` §4.1).
//!
//! Despite the name, a bitmap here is a byte-per-slot occupancy map: byte
//! `0` means free, any nonzero byte means allocated. Each bitmap occupies
//! exactly one block and is always loaded and stored whole, matching the
//! teacher's `Block::alloc`/`Block::free` in `src/fs.rs`, which also scans a
//! block-sized region bit by bit rather than keeping a live in-memory copy.

use crate::block::{BlockBuf, Disk};
use crate::error::Result;
use crate::layout::BLOCK_SIZE;

/// A loaded occupancy map, borrowed from one block's worth of bytes.
pub struct Bitmap {
    bytes: BlockBuf,
}

impl Bitmap {
    fn load(disk: &impl Disk, block_no: u32) -> Result<Self> {
        let mut bytes = [0u8; BLOCK_SIZE];
        disk.read_block(block_no, &mut bytes)?;
        Ok(Self { bytes })
    }

    fn store(&self, disk: &impl Disk, block_no: u32) -> Result<()> {
        disk.write_block(block_no, &self.bytes)?;
        Ok(())
    }

    pub fn allocated(&self, index: u32) -> bool {
        self.bytes[index as usize] != 0
    }

    pub fn mark(&mut self, index: u32) {
        self.bytes[index as usize] = 1;
    }

    pub fn unmark(&mut self, index: u32) {
        self.bytes[index as usize] = 0;
    }

    /// Scans ascending from `start` (inclusive) up to `limit` (exclusive)
    /// for the first clear slot. No hint, no rotation, strictly ascending,
    /// per `spec.md` §4.2.
    pub fn find_first_clear_from(&self, start: u32, limit: u32) -> Option<u32> {
        (start..limit).find(|&i| !self.allocated(i))
    }
}

/// Loads the inode occupancy bitmap.
pub fn load_inode_bitmap(disk: &impl Disk) -> Result<Bitmap> {
    Bitmap::load(disk, crate::layout::INODE_BITMAP_BLOCK)
}

/// Persists the inode occupancy bitmap.
pub fn store_inode_bitmap(disk: &impl Disk, bitmap: &Bitmap) -> Result<()> {
    bitmap.store(disk, crate::layout::INODE_BITMAP_BLOCK)
}

/// Loads the data-block occupancy bitmap.
pub fn load_data_bitmap(disk: &impl Disk) -> Result<Bitmap> {
    Bitmap::load(disk, crate::layout::DATA_BITMAP_BLOCK)
}

/// Persists the data-block occupancy bitmap.
pub fn store_data_bitmap(disk: &impl Disk, bitmap: &Bitmap) -> Result<()> {
    bitmap.store(disk, crate::layout::DATA_BITMAP_BLOCK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::MemDisk;

    #[test]
    fn round_trips_through_disk() {
        let disk = MemDisk::new(16);
        let mut bitmap = load_data_bitmap(&disk).unwrap();
        for i in 0..9 {
            bitmap.mark(i);
        }
        store_data_bitmap(&disk, &bitmap).unwrap();

        let reloaded = load_data_bitmap(&disk).unwrap();
        for i in 0..9 {
            assert!(reloaded.allocated(i));
        }
        assert!(!reloaded.allocated(9));
    }

    #[test]
    fn scan_is_ascending_and_skips_marked() {
        let disk = MemDisk::new(16);
        let mut bitmap = load_inode_bitmap(&disk).unwrap();
        bitmap.mark(2);
        bitmap.mark(3);
        assert_eq!(bitmap.find_first_clear_from(2, 16), Some(4));
    }
}
