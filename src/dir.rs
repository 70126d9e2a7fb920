//! Directory-record codec and insertion protocol (`spec.md` §4.4, §4.7).
//!
//! A directory's storage is the concatenation of its data blocks into a
//! logical byte stream of fixed-width records. The teacher's `Directory` in
//! `src/fs.rs` reads and writes one record at a time at a caller-given
//! offset; this module generalizes that into whole-chain
//! serialize/deserialize, since the core needs to prepend and possibly grow
//! the chain by more than one record at a time.

use crate::alloc;
use crate::block::{BlockBuf, Disk};
use crate::error::{Error, Result};
use crate::inode::{self, DiskInode};
use crate::layout::{BLOCK_SIZE, DIRECT_POINTERS, MAX_FILENAME};
use bytemuck::{Pod, Zeroable};

/// One directory entry: a fixed-width name and the inode it names.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DirRecord {
    name: [u8; MAX_FILENAME],
    pub inum: u32,
}

pub const RECORD_SIZE: usize = std::mem::size_of::<DirRecord>();

impl DirRecord {
    pub fn new(name: &str, inum: u32) -> Self {
        let mut bytes = [0u8; MAX_FILENAME];
        let src = name.as_bytes();
        bytes[..src.len()].copy_from_slice(src);
        Self { name: bytes, inum }
    }

    pub fn name(&self) -> &str {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(MAX_FILENAME);
        std::str::from_utf8(&self.name[..end]).unwrap_or("")
    }

    fn is_sentinel(&self) -> bool {
        self.inum == 0
    }
}

/// Reconstructs the ordered chain of records from a directory inode's data
/// blocks, in block order then record order within each block, stopping at
/// the declared `size` or an earlier sentinel record.
pub fn read_chain(disk: &impl Disk, inode: &DiskInode) -> Result<Vec<DirRecord>> {
    let records_per_block = BLOCK_SIZE / RECORD_SIZE;
    let mut out = Vec::new();
    let mut bytes_read = 0u32;

    'blocks: for &block_no in inode.pointers[..inode.blocks as usize].iter() {
        let mut buf: BlockBuf = [0u8; BLOCK_SIZE];
        disk.read_block(block_no, &mut buf)?;

        for slot in 0..records_per_block {
            if bytes_read >= inode.size {
                break 'blocks;
            }
            let start = slot * RECORD_SIZE;
            let rec: DirRecord = *bytemuck::from_bytes(&buf[start..start + RECORD_SIZE]);
            bytes_read += RECORD_SIZE as u32;
            if rec.is_sentinel() {
                break 'blocks;
            }
            out.push(rec);
        }
    }

    Ok(out)
}

/// Outcome of a single `write_chain` attempt.
pub enum WriteOutcome {
    /// Serialization succeeded; this is the chain's new byte size.
    Done(u32),
    /// `blocks_available` was insufficient; this many more blocks are
    /// needed before a retry can succeed.
    NeedMore(u32),
}

/// Serializes `records` into `pointers[0..blocks_available]`, in order,
/// back-to-back. Does not allocate blocks itself: if the supplied blocks
/// cannot hold the chain, returns `NeedMore` and touches no storage, so the
/// caller can grow `pointers` and retry cleanly (`spec.md` §4.4).
pub fn write_chain(
    disk: &impl Disk,
    records: &[DirRecord],
    pointers: &[u32],
    blocks_available: u32,
) -> Result<WriteOutcome> {
    let records_per_block = BLOCK_SIZE / RECORD_SIZE;
    let needed_blocks = records.len().div_ceil(records_per_block).max(1) as u32;

    if needed_blocks > blocks_available {
        return Ok(WriteOutcome::NeedMore(needed_blocks - blocks_available));
    }

    let mut chunks = records.chunks(records_per_block);
    for i in 0..blocks_available as usize {
        let mut buf: BlockBuf = [0u8; BLOCK_SIZE];
        if let Some(chunk) = chunks.next() {
            for (slot, rec) in chunk.iter().enumerate() {
                let start = slot * RECORD_SIZE;
                buf[start..start + RECORD_SIZE].copy_from_slice(bytemuck::bytes_of(rec));
            }
        }
        disk.write_block(pointers[i], &buf)?;
    }

    Ok(WriteOutcome::Done((records.len() * RECORD_SIZE) as u32))
}

/// Prepends `new_rec` to `parent_inum`'s directory chain, growing its data
/// blocks if necessary, and persists the updated inode (`spec.md` §4.7).
pub fn insert_into_dir(disk: &impl Disk, parent_inum: u32, new_rec: DirRecord) -> Result<()> {
    let mut parent = inode::get_inode(disk, parent_inum)?;

    let mut chain = read_chain(disk, &parent)?;
    chain.insert(0, new_rec);

    match write_chain(disk, &chain, &parent.pointers, parent.blocks)? {
        WriteOutcome::Done(size) => {
            parent.size = size;
        }
        WriteOutcome::NeedMore(n) => {
            grow_pointers(disk, &mut parent, n)?;
            match write_chain(disk, &chain, &parent.pointers, parent.blocks)? {
                WriteOutcome::Done(size) => parent.size = size,
                WriteOutcome::NeedMore(_) => {
                    return Err(Error::Fatal(format!(
                        "directory {parent_inum} chain overflowed twice in a row"
                    )));
                }
            }
        }
    }

    inode::set_inode(disk, parent_inum, &parent)
}

/// Allocates `n` more data blocks and appends them to `inode.pointers`,
/// bumping `inode.blocks` accordingly. Fails if that would exceed the
/// direct-pointer capacity (`spec.md`'s "no indirect blocks" Non-goal).
fn grow_pointers(disk: &impl Disk, inode: &mut DiskInode, n: u32) -> Result<()> {
    if inode.blocks as usize + n as usize > DIRECT_POINTERS {
        return Err(Error::Fatal(
            "directory would exceed direct-pointer capacity".into(),
        ));
    }
    for _ in 0..n {
        let block_no = alloc::next_free_block(disk)?;
        inode.pointers[inode.blocks as usize] = block_no;
        inode.blocks += 1;
    }
    Ok(())
}
