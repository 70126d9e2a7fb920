//! On-disk layout constants.
//!
//! Block size and block count are build-time constants: changing either is
//! an incompatible format change, matching the teacher kernel's `BSIZE`,
//! `NDIRECT`, and `DIRSIZE` in `src/fs.rs`.

/// Size of a disk block, in bytes.
pub const BLOCK_SIZE: usize = 1024;

/// Number of direct block pointers an inode carries. There are no indirect
/// blocks, so this is also the inode's block-count ceiling.
pub const DIRECT_POINTERS: usize = 12;

/// Largest byte offset a file may grow to.
pub const MAX_FILE_SIZE: usize = DIRECT_POINTERS * BLOCK_SIZE;

/// Longest name a directory record may hold, not counting a terminator.
pub const MAX_FILENAME: usize = 28;

/// Longest chain of path components `split_path` will accept.
pub const MAX_PATH_DEPTH: usize = 32;

/// Total number of blocks in a freshly initialized image.
///
/// The data-block bitmap is a single block (`BLOCK_SIZE` bytes, one byte
/// per slot), so this is also its capacity ceiling: it can never exceed
/// `BLOCK_SIZE`.
pub const NUM_BLOCKS: u32 = 1024;

/// Block holding the (unused) superblock slot.
pub const SUPERBLOCK_BLOCK: u32 = 0;
/// Block holding the inode occupancy bitmap.
pub const INODE_BITMAP_BLOCK: u32 = 1;
/// Block holding the data-block occupancy bitmap.
pub const DATA_BITMAP_BLOCK: u32 = 2;
/// First block of the packed inode table.
pub const INODE_TABLE_START: u32 = 3;
/// Number of blocks occupied by the inode table.
pub const INODE_TABLE_BLOCKS: u32 = 5;
/// First block available to the allocator; also where the root directory's
/// sole data block lives after a fresh `init`.
pub const FIRST_DATA_BLOCK: u32 = 8;

/// Inode number of the root directory.
pub const ROOT_INODE: u32 = 2;
/// Inode numbers below this are reserved sentinels (0 and 1).
pub const FIRST_USABLE_INODE: u32 = 2;

/// Number of `DiskInode` records packed into one block.
pub const fn inodes_per_block(inode_size: usize) -> u32 {
    (BLOCK_SIZE / inode_size) as u32
}
