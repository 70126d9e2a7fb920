//! Inode and data-block allocator (`spec.md` §4.2).
//!
//! A thin wrapper over the bitmap manager. Scan order is strictly
//! ascending; there is no hint and no rotation. The core offers no
//! deallocation (`spec.md`'s "no free-on-delete" Non-goal), matching the
//! original C's `get_next_free_inode`/`get_next_free_block`.

use crate::bitmap;
use crate::block::Disk;
use crate::error::{Error, Result};
use crate::inode::num_inodes;
use crate::layout::{FIRST_USABLE_INODE, NUM_BLOCKS};

/// Finds the first free inode at or after inode 2, marks it allocated, and
/// returns its number. The caller is responsible for writing the initial
/// inode record (`spec.md` §4.2).
pub fn next_free_inode(disk: &impl Disk) -> Result<u32> {
    let mut bitmap = bitmap::load_inode_bitmap(disk)?;
    let inum = bitmap
        .find_first_clear_from(FIRST_USABLE_INODE, num_inodes())
        .ok_or_else(|| Error::Fatal("inode table exhausted".into()))?;
    bitmap.mark(inum);
    bitmap::store_inode_bitmap(disk, &bitmap)?;
    Ok(inum)
}

/// Finds the first free data block, marks it allocated, zeroes it, and
/// returns its number. The first nine blocks are always pre-marked at
/// `init`, so this never returns a reserved block. Zeroing here, rather
/// than leaving it to each caller, is what gives `spec.md` §3's "freshly
/// allocated data blocks are zeroed before first use" lifecycle rule a
/// single home, matching the teacher's `Block::alloc` zeroing the block it
/// just marked in `src/fs.rs`.
pub fn next_free_block(disk: &impl Disk) -> Result<u32> {
    let mut bitmap = bitmap::load_data_bitmap(disk)?;
    let block_no = bitmap
        .find_first_clear_from(0, NUM_BLOCKS)
        .ok_or_else(|| Error::Fatal("data blocks exhausted".into()))?;
    bitmap.mark(block_no);
    bitmap::store_data_bitmap(disk, &bitmap)?;
    disk.write_block(block_no, &[0u8; crate::layout::BLOCK_SIZE])?;
    Ok(block_no)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::MemDisk;
    use crate::layout::FIRST_DATA_BLOCK;

    #[test]
    fn inode_scan_skips_reserved_sentinels() {
        let disk = MemDisk::new(NUM_BLOCKS);
        assert_eq!(next_free_inode(&disk).unwrap(), 2);
        assert_eq!(next_free_inode(&disk).unwrap(), 3);
    }

    #[test]
    fn block_scan_skips_preallocated_region() {
        let disk = MemDisk::new(NUM_BLOCKS);
        let mut bitmap = bitmap::load_data_bitmap(&disk).unwrap();
        for i in 0..=FIRST_DATA_BLOCK {
            bitmap.mark(i);
        }
        bitmap::store_data_bitmap(&disk, &bitmap).unwrap();

        assert_eq!(next_free_block(&disk).unwrap(), FIRST_DATA_BLOCK + 1);
    }
}
