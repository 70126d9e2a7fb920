//! Path splitting and resolution (`spec.md` §4.6).
//!
//! Every path the core accepts is absolute and slash-separated. Resolution
//! always starts from the root inode and walks one directory record lookup
//! per component; there is no relative-path support and no `.`/`..`
//! shortcutting beyond whatever records the directory chain itself holds.

use crate::dir;
use crate::error::{Error, Result};
use crate::inode::{self, DiskInode};
use crate::layout::{MAX_FILENAME, MAX_PATH_DEPTH, ROOT_INODE};
use crate::block::Disk;

/// Splits an absolute path into its components, rejecting anything the
/// format cannot represent.
///
/// `/` itself splits to an empty component list. Repeated slashes collapse,
/// matching the original C's `strtok`-based splitter.
pub fn split_path(path: &str) -> Result<Vec<&str>> {
    if !path.starts_with('/') {
        return Err(Error::InvalidPath("path must be absolute"));
    }

    let components: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if components.len() > MAX_PATH_DEPTH {
        return Err(Error::InvalidPath("too many path components"));
    }
    for c in &components {
        if c.len() > MAX_FILENAME {
            return Err(Error::InvalidPath("path component too long"));
        }
    }

    Ok(components)
}

/// Splits `path` into its parent directory's components and the leaf name,
/// e.g. `/a/b/c` becomes `(["a", "b"], "c")`. Fails on `/` itself, which has
/// no leaf.
pub fn parent_and_leaf(path: &str) -> Result<(Vec<&str>, &str)> {
    let mut components = split_path(path)?;
    let leaf = components
        .pop()
        .ok_or(Error::InvalidPath("path has no leaf component"))?;
    Ok((components, leaf))
}

/// Walks `components` from the root inode, looking up one directory record
/// per component. Returns `Error::NotFound` as soon as a component is
/// missing or a non-leaf component does not name a directory.
pub fn resolve(disk: &impl Disk, components: &[&str]) -> Result<(u32, DiskInode)> {
    let mut inum = ROOT_INODE;
    let mut node = inode::get_inode(disk, inum)?;

    for component in components {
        if !node.is_dir() {
            return Err(Error::NotFound);
        }
        let chain = dir::read_chain(disk, &node)?;
        let found = chain
            .iter()
            .find(|rec| rec.name() == *component)
            .ok_or(Error::NotFound)?;

        inum = found.inum;
        node = inode::get_inode(disk, inum)?;
    }

    Ok((inum, node))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_collapses_slashes() {
        assert_eq!(split_path("/a//b/c").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(split_path("/").unwrap(), Vec::<&str>::new());
    }

    #[test]
    fn rejects_relative_paths() {
        assert!(split_path("a/b").is_err());
    }

    #[test]
    fn passes_dot_and_dotdot_through_as_components() {
        assert_eq!(split_path("/a/./b").unwrap(), vec!["a", ".", "b"]);
        assert_eq!(split_path("/a/../b").unwrap(), vec!["a", "..", "b"]);
    }

    #[test]
    fn splits_parent_and_leaf() {
        let (parent, leaf) = parent_and_leaf("/a/b/c").unwrap();
        assert_eq!(parent, vec!["a", "b"]);
        assert_eq!(leaf, "c");
    }

    #[test]
    fn resolve_walks_dot_and_dotdot_records() {
        use crate::block::MemDisk;
        use crate::layout::NUM_BLOCKS;
        use crate::mount;
        use crate::ops;

        let disk = MemDisk::new(NUM_BLOCKS);
        mount::init(&disk).unwrap();
        let d_inum = ops::mkdir(&disk, "/d").unwrap();

        let (inum, _) = resolve(&disk, &split_path("/d/.").unwrap()).unwrap();
        assert_eq!(inum, d_inum);

        let (inum, _) = resolve(&disk, &split_path("/d/..").unwrap()).unwrap();
        assert_eq!(inum, ROOT_INODE);
    }
}
