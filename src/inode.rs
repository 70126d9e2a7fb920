//! On-disk inode record and packed inode table (`spec.md` §3, §4.3).

use crate::block::{BlockBuf, Disk};
use crate::error::Result;
use crate::layout::{BLOCK_SIZE, DIRECT_POINTERS, INODE_TABLE_START};
use bytemuck::{Pod, Zeroable};

/// Inode type tag. A newtype around `u8` so it derives `Pod`/`Zeroable`
/// cleanly, in the same spirit as the teacher's `InodeType(u16)` wrapper in
/// `mkfs/src/main.rs`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct InodeKind(pub u8);

impl InodeKind {
    pub const FREE: Self = Self(0);
    pub const FILE: Self = Self(1);
    pub const DIR: Self = Self(2);
}

/// Fixed-size on-disk inode record.
///
/// `pointers[0..blocks]` are the file's direct data-block numbers; a
/// pointer value of `0` denotes "unused". There are no indirect blocks, so
/// `blocks` is capped at `DIRECT_POINTERS` (`spec.md`'s Non-goals).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DiskInode {
    pub kind: InodeKind,
    _reserved: [u8; 3],
    pub size: u32,
    pub blocks: u32,
    pub pointers: [u32; DIRECT_POINTERS],
}

const _: () = assert!(std::mem::size_of::<DiskInode>() <= BLOCK_SIZE);

impl DiskInode {
    pub const fn empty(kind: InodeKind) -> Self {
        Self {
            kind,
            _reserved: [0; 3],
            size: 0,
            blocks: 0,
            pointers: [0; DIRECT_POINTERS],
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == InodeKind::DIR
    }
}

/// Number of `DiskInode` records that fit in one block.
pub fn inodes_per_block() -> u32 {
    crate::layout::inodes_per_block(std::mem::size_of::<DiskInode>())
}

/// Total inode capacity of the 5-block inode table (`spec.md` §3).
pub fn num_inodes() -> u32 {
    crate::layout::INODE_TABLE_BLOCKS * inodes_per_block()
}

fn locate(inum: u32) -> (u32, usize) {
    let ipb = inodes_per_block();
    let block_no = INODE_TABLE_START + inum / ipb;
    let offset = (inum % ipb) as usize * std::mem::size_of::<DiskInode>();
    (block_no, offset)
}

/// Reads the inode record numbered `inum` out of the packed inode table.
pub fn get_inode(disk: &impl Disk, inum: u32) -> Result<DiskInode> {
    let (block_no, offset) = locate(inum);
    let mut buf: BlockBuf = [0u8; BLOCK_SIZE];
    disk.read_block(block_no, &mut buf)?;
    let size = std::mem::size_of::<DiskInode>();
    Ok(*bytemuck::from_bytes(&buf[offset..offset + size]))
}

/// Writes the inode record numbered `inum`, preserving its neighbors in the
/// shared block (`spec.md` §4.3: "a `set_inode` must preserve neighbors").
pub fn set_inode(disk: &impl Disk, inum: u32, inode: &DiskInode) -> Result<()> {
    let (block_no, offset) = locate(inum);
    let mut buf: BlockBuf = [0u8; BLOCK_SIZE];
    disk.read_block(block_no, &mut buf)?;
    let size = std::mem::size_of::<DiskInode>();
    buf[offset..offset + size].copy_from_slice(bytemuck::bytes_of(inode));
    disk.write_block(block_no, &buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::MemDisk;

    #[test]
    fn set_inode_preserves_neighbors() {
        let disk = MemDisk::new(16);
        let mut a = DiskInode::empty(InodeKind::FILE);
        a.size = 42;
        let mut b = DiskInode::empty(InodeKind::DIR);
        b.size = 7;

        set_inode(&disk, 2, &a).unwrap();
        set_inode(&disk, 3, &b).unwrap();

        assert_eq!(get_inode(&disk, 2).unwrap().size, 42);
        assert_eq!(get_inode(&disk, 3).unwrap().size, 7);
    }

    #[test]
    fn fits_in_one_block() {
        assert!(std::mem::size_of::<DiskInode>() <= BLOCK_SIZE);
        assert!(inodes_per_block() > 0);
    }
}
