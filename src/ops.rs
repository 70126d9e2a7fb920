//! File operations: `mknod`, `mkdir`, `open`, `getattr`, `read`, `write`
//! (`spec.md` §4.5, §4.7).

use crate::alloc;
use crate::block::{BlockBuf, Disk};
use crate::dir::DirRecord;
use crate::error::{Error, Result};
use crate::inode::{self, DiskInode, InodeKind};
use crate::layout::BLOCK_SIZE;
use crate::path;

/// A `getattr` result: inode number, kind, and size, with the fixed
/// permission bits and link count the format always reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub inum: u32,
    pub is_dir: bool,
    pub block_size: u32,
    pub blocks: u32,
    pub size: u32,
    /// rwxrwxr-x: rwx for owner and group, r-x for others.
    pub mode: u32,
    pub links: u32,
}

const DEFAULT_MODE: u32 = 0o775;

/// Creates a regular file at `path`. The parent directory is not checked for
/// existence beyond what `resolve` naturally requires.
pub fn mknod(disk: &impl Disk, path: &str) -> Result<u32> {
    let (parent_components, leaf) = path::parent_and_leaf(path)?;
    let (parent_inum, _) = path::resolve(disk, &parent_components)?;

    let inum = alloc::next_free_inode(disk)?;
    let new_inode = DiskInode::empty(InodeKind::FILE);
    inode::set_inode(disk, inum, &new_inode)?;

    crate::dir::insert_into_dir(disk, parent_inum, DirRecord::new(leaf, inum))?;
    Ok(inum)
}

/// Creates a directory at `path`, seeded with `.` and `..` entries.
pub fn mkdir(disk: &impl Disk, path: &str) -> Result<u32> {
    let (parent_components, leaf) = path::parent_and_leaf(path)?;
    let (parent_inum, _) = path::resolve(disk, &parent_components)?;

    let inum = alloc::next_free_inode(disk)?;
    let block_no = alloc::next_free_block(disk)?;

    let mut new_inode = DiskInode::empty(InodeKind::DIR);
    new_inode.pointers[0] = block_no;
    new_inode.blocks = 1;
    inode::set_inode(disk, inum, &new_inode)?;

    crate::dir::insert_into_dir(disk, inum, DirRecord::new("..", parent_inum))?;
    crate::dir::insert_into_dir(disk, inum, DirRecord::new(".", inum))?;

    crate::dir::insert_into_dir(disk, parent_inum, DirRecord::new(leaf, inum))?;
    Ok(inum)
}

/// Resolves `path` to an inode number, usable as an opaque file handle.
/// Fails with `NotFound` on inode 0 or 1 — there is no such file in a
/// freshly initialized image.
pub fn open(disk: &impl Disk, path: &str) -> Result<u32> {
    let components = path::split_path(path)?;
    let (inum, _) = path::resolve(disk, &components)?;
    if inum < crate::layout::FIRST_USABLE_INODE {
        return Err(Error::NotFound);
    }
    Ok(inum)
}

/// Resolves `path` and reports its metadata.
pub fn getattr(disk: &impl Disk, path: &str) -> Result<Stat> {
    let components = path::split_path(path)?;
    let (inum, node) = path::resolve(disk, &components)?;
    if inum < crate::layout::FIRST_USABLE_INODE {
        return Err(Error::NotFound);
    }
    Ok(Stat {
        inum,
        is_dir: node.is_dir(),
        block_size: BLOCK_SIZE as u32,
        blocks: node.blocks,
        size: node.size,
        mode: DEFAULT_MODE,
        links: 1,
    })
}

/// Copies up to `buf.len()` bytes from `inum`'s file data starting at
/// `offset` into `buf`, returning the number of bytes copied.
pub fn read(disk: &impl Disk, inum: u32, buf: &mut [u8], offset: u32) -> Result<u32> {
    let node = inode::get_inode(disk, inum)?;

    if offset >= node.size {
        return Ok(0);
    }
    let to_copy = (node.size - offset).min(buf.len() as u32);
    if to_copy == 0 {
        return Ok(0);
    }

    let b = BLOCK_SIZE as u32;
    let start_block = offset / b;
    let end_block = (offset + to_copy - 1) / b;

    let mut written = 0u32;
    let mut remaining = to_copy;
    let mut cursor_offset = offset % b;

    for block_index in start_block..=end_block {
        let block_no = node.pointers[block_index as usize];
        let mut block: BlockBuf = [0u8; BLOCK_SIZE];
        disk.read_block(block_no, &mut block)?;

        let in_block = (b - cursor_offset).min(remaining);
        let src_start = cursor_offset as usize;
        let dst_start = written as usize;
        buf[dst_start..dst_start + in_block as usize]
            .copy_from_slice(&block[src_start..src_start + in_block as usize]);

        written += in_block;
        remaining -= in_block;
        cursor_offset = 0;
    }

    Ok(written)
}

/// Writes `data` into `inum`'s file starting at `offset`, growing the file
/// and allocating new blocks as needed. Files only grow; there is no
/// truncation path.
pub fn write(disk: &impl Disk, inum: u32, data: &[u8], offset: u32) -> Result<u32> {
    let mut node = inode::get_inode(disk, inum)?;

    let b = BLOCK_SIZE as u32;
    let size = data.len() as u32;
    let required_blocks = (offset + size).div_ceil(b);

    while node.blocks < required_blocks {
        let slot = node
            .pointers
            .iter()
            .position(|&p| p == 0)
            .ok_or_else(|| Error::Fatal("write would exceed direct-pointer capacity".into()))?;
        let block_no = alloc::next_free_block(disk)?;
        node.pointers[slot] = block_no;
        node.blocks += 1;
    }

    node.size = offset + size;

    let start_block = offset / b;
    let mut block_offset = offset % b;
    let mut written = 0u32;
    let mut block_index = start_block;
    while written < size {
        let block_no = node.pointers[block_index as usize];
        let mut block: BlockBuf = [0u8; BLOCK_SIZE];
        disk.read_block(block_no, &mut block)?;

        let in_block = (b - block_offset).min(size - written);
        let dst_start = block_offset as usize;
        let src_start = written as usize;
        block[dst_start..dst_start + in_block as usize]
            .copy_from_slice(&data[src_start..src_start + in_block as usize]);
        disk.write_block(block_no, &block)?;

        written += in_block;
        block_offset = 0;
        block_index += 1;
    }

    inode::set_inode(disk, inum, &node)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::MemDisk;
    use crate::layout::NUM_BLOCKS;
    use crate::mount;

    #[test]
    fn mknod_creates_file_under_root() {
        let disk = MemDisk::new(NUM_BLOCKS);
        mount::init(&disk).unwrap();

        let inum = mknod(&disk, "/a").unwrap();
        assert_eq!(inum, 3);

        let stat = getattr(&disk, "/a").unwrap();
        assert!(!stat.is_dir);
        assert_eq!(stat.size, 0);
        assert_eq!(stat.blocks, 0);
    }

    #[test]
    fn write_then_read_round_trips() {
        let disk = MemDisk::new(NUM_BLOCKS);
        mount::init(&disk).unwrap();
        let inum = mknod(&disk, "/a").unwrap();

        let written = write(&disk, inum, b"Hello", 0).unwrap();
        assert_eq!(written, 5);

        let mut buf = [0u8; 5];
        let n = read(&disk, inum, &mut buf, 0).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buf, b"Hello");

        let stat = getattr(&disk, "/a").unwrap();
        assert_eq!(stat.size, 5);
        assert_eq!(stat.blocks, 1);
    }

    #[test]
    fn write_across_block_boundary_allocates_two_blocks() {
        let disk = MemDisk::new(NUM_BLOCKS);
        mount::init(&disk).unwrap();
        let inum = mknod(&disk, "/a").unwrap();

        let data = vec![b'x'; BLOCK_SIZE + 1];
        let written = write(&disk, inum, &data, 0).unwrap();
        assert_eq!(written as usize, BLOCK_SIZE + 1);

        let node = inode::get_inode(&disk, inum).unwrap();
        assert_eq!(node.blocks, 2);

        let mut buf = vec![0u8; BLOCK_SIZE + 1];
        let n = read(&disk, inum, &mut buf, 0).unwrap();
        assert_eq!(n as usize, BLOCK_SIZE + 1);
        assert_eq!(buf, data);
    }

    #[test]
    fn read_past_eof_returns_zero() {
        let disk = MemDisk::new(NUM_BLOCKS);
        mount::init(&disk).unwrap();
        let inum = mknod(&disk, "/a").unwrap();
        write(&disk, inum, b"hi", 0).unwrap();

        let mut buf = [0u8; 4];
        let n = read(&disk, inum, &mut buf, 2).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn nested_mkdir_chains_dotdot_to_parent() {
        let disk = MemDisk::new(NUM_BLOCKS);
        mount::init(&disk).unwrap();
        mkdir(&disk, "/d").unwrap();
        let e_inum = mkdir(&disk, "/d/e").unwrap();

        let stat = getattr(&disk, "/d/e").unwrap();
        assert!(stat.is_dir);
        assert_eq!(stat.inum, e_inum);

        let d_inum = open(&disk, "/d").unwrap();
        let e_node = inode::get_inode(&disk, e_inum).unwrap();
        let chain = crate::dir::read_chain(&disk, &e_node).unwrap();
        let dotdot = chain.iter().find(|r| r.name() == "..").unwrap();
        assert_eq!(dotdot.inum, d_inum);
    }

    #[test]
    fn missing_path_is_not_found() {
        let disk = MemDisk::new(NUM_BLOCKS);
        mount::init(&disk).unwrap();
        assert!(matches!(getattr(&disk, "/no/such"), Err(Error::NotFound)));
        assert!(matches!(open(&disk, "/no/such"), Err(Error::NotFound)));
    }
}
