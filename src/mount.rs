//! Mount lifecycle: bootstrap a fresh image or open an existing one
//! (`spec.md` §4.8).
//!
//! There is no separate `mkfs` tool here, unlike the teacher kernel (which
//! ships `mkfs/src/main.rs` as a standalone image builder run before the
//! kernel ever boots): the original C program folds bootstrap into its own
//! `my_init`, and this crate follows that shape, so [`init`] creates-or-opens
//! in one call against any [`Disk`].

use crate::bitmap;
use crate::block::Disk;
use crate::dir::DirRecord;
use crate::error::Result;
use crate::inode::{self, DiskInode, InodeKind};
use crate::layout::{FIRST_DATA_BLOCK, ROOT_INODE};

/// Bootstraps a freshly zeroed image: marks the first nine blocks and the
/// root inode allocated, then writes the root directory's `.`/`..` chain
/// into its single pre-allocated data block (`spec.md` §3, §4.8).
///
/// Idempotent only in the sense the spec requires: calling `init` a second
/// time on an already-initialized image re-marks the same bits and
/// overwrites the same root chain, it does not detect "already
/// initialized" the way a real superblock magic number would — the core
/// carries no superblock payload (`spec.md` §3: "Reserved / superblock slot
/// (unused by core)").
pub fn init(disk: &impl Disk) -> Result<()> {
    let mut data_bitmap = bitmap::load_data_bitmap(disk)?;
    for block_no in 0..=FIRST_DATA_BLOCK {
        data_bitmap.mark(block_no);
    }
    bitmap::store_data_bitmap(disk, &data_bitmap)?;

    let mut inode_bitmap = bitmap::load_inode_bitmap(disk)?;
    inode_bitmap.mark(ROOT_INODE);
    bitmap::store_inode_bitmap(disk, &inode_bitmap)?;

    let mut root = DiskInode::empty(InodeKind::DIR);
    root.blocks = 1;
    root.pointers[0] = FIRST_DATA_BLOCK;

    let records = [DirRecord::new(".", ROOT_INODE), DirRecord::new("..", ROOT_INODE)];
    match crate::dir::write_chain(disk, &records, &root.pointers, root.blocks)? {
        crate::dir::WriteOutcome::Done(size) => root.size = size,
        crate::dir::WriteOutcome::NeedMore(_) => {
            return Err(crate::error::Error::Fatal(
                "root directory chain does not fit in its preallocated block".into(),
            ));
        }
    }

    inode::set_inode(disk, ROOT_INODE, &root)
}

/// Returns whether an image looks already initialized: the inode bitmap's
/// root slot and the first reserved data-block bitmap slot are both set.
/// Used by the CLI to decide whether to bootstrap a newly created file
/// before mounting it (`spec.md` §4.8: "If the image file does not exist:
/// create it ... Otherwise: open the image for read/write").
pub fn is_initialized(disk: &impl Disk) -> Result<bool> {
    let inode_bitmap = bitmap::load_inode_bitmap(disk)?;
    let data_bitmap = bitmap::load_data_bitmap(disk)?;
    Ok(inode_bitmap.allocated(ROOT_INODE) && data_bitmap.allocated(0))
}

/// There is no explicit flush beyond the per-operation writes the core
/// already performs (`spec.md` §4.8); `destroy` exists only so callers have
/// a symmetric lifecycle call to make, matching the operation table's
/// `init()`/`destroy()` pair in `spec.md` §6.
pub fn destroy<D: Disk>(disk: D) {
    drop(disk);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::MemDisk;
    use crate::layout::NUM_BLOCKS;

    #[test]
    fn fresh_init_matches_scenario_one() {
        let disk = MemDisk::new(NUM_BLOCKS);
        init(&disk).unwrap();

        let inode_bitmap = bitmap::load_inode_bitmap(&disk).unwrap();
        assert!(inode_bitmap.allocated(ROOT_INODE));

        let data_bitmap = bitmap::load_data_bitmap(&disk).unwrap();
        for b in 0..=FIRST_DATA_BLOCK {
            assert!(data_bitmap.allocated(b));
        }
        assert!(!data_bitmap.allocated(FIRST_DATA_BLOCK + 1));

        let root = inode::get_inode(&disk, ROOT_INODE).unwrap();
        assert!(root.is_dir());
        assert_eq!(root.blocks, 1);
        assert_eq!(root.pointers[0], FIRST_DATA_BLOCK);
        assert_eq!(root.size as usize, 2 * crate::dir::RECORD_SIZE);

        let chain = crate::dir::read_chain(&disk, &root).unwrap();
        assert_eq!(chain.len(), 2);
        assert!(chain.iter().any(|r| r.name() == "." && r.inum == ROOT_INODE));
        assert!(chain.iter().any(|r| r.name() == ".." && r.inum == ROOT_INODE));
    }

    #[test]
    fn resolve_root_after_init() {
        let disk = MemDisk::new(NUM_BLOCKS);
        init(&disk).unwrap();
        let (inum, _) = crate::path::resolve(&disk, &[]).unwrap();
        assert_eq!(inum, ROOT_INODE);
    }

    #[test]
    fn is_initialized_detects_fresh_image() {
        let disk = MemDisk::new(NUM_BLOCKS);
        assert!(!is_initialized(&disk).unwrap());
        init(&disk).unwrap();
        assert!(is_initialized(&disk).unwrap());
    }
}
