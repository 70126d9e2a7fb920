//! Command-line driver for the VSFS core.
//!
//! Mirrors the original C program's `main()`: refuse to run as root, resolve
//! the image path (canonicalizing its parent directory when the file itself
//! does not exist yet), mount, and hand control to a small dispatch loop in
//! place of the FUSE host this crate does not implement (`spec.md` §6).

use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use vsfs::block::FileDisk;
use vsfs::layout::NUM_BLOCKS;
use vsfs::{Error, Vsfs};

#[derive(Parser, Debug)]
#[command(name = "vsfs", about = "Very Simple File System core driver")]
struct Args {
    /// Path to the backing image file. Created and initialized if it does
    /// not already exist.
    image: PathBuf,
}

fn running_as_root() -> bool {
    // SAFETY: getuid/geteuid take no arguments and never fail.
    unsafe { libc::getuid() == 0 || libc::geteuid() == 0 }
}

/// Resolves `path` to an absolute path. If `path` itself does not exist,
/// canonicalizes its parent directory instead and rejoins the file name,
/// matching the original's `realpath(argv[argc-1], NULL)` fallback.
fn resolve_image_path(path: &Path) -> io::Result<PathBuf> {
    if let Ok(canon) = path.canonicalize() {
        return Ok(canon);
    }
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "image path has no file name"))?;
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let parent = parent.canonicalize()?;
    Ok(parent.join(file_name))
}

fn open_or_create(path: &Path) -> io::Result<std::fs::File> {
    let existed = path.exists();
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    if !existed {
        file.set_len((NUM_BLOCKS as u64) * (vsfs::layout::BLOCK_SIZE as u64))?;
        file.sync_all()?;
    }
    Ok(file)
}

fn main() -> ExitCode {
    env_logger::init();

    if running_as_root() {
        eprintln!("running as root opens unacceptable security holes");
        return ExitCode::from(1);
    }

    let args = Args::parse();

    let image_path = match resolve_image_path(&args.image) {
        Ok(p) => p,
        Err(err) => {
            eprintln!("usage: vsfs <image-file>: {err}");
            return ExitCode::from(1);
        }
    };

    let file = match open_or_create(&image_path) {
        Ok(f) => f,
        Err(err) => {
            log::error!("failed to open image {}: {err}", image_path.display());
            return ExitCode::from(1);
        }
    };

    let disk = FileDisk::open(file, NUM_BLOCKS);
    let fs = match Vsfs::mount(disk) {
        Ok(fs) => fs,
        Err(Error::Fatal(msg)) => {
            log::error!("fatal during mount: {msg}");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            log::error!("failed to mount {}: {err}", image_path.display());
            return ExitCode::FAILURE;
        }
    };

    log::info!("mounted {}", image_path.display());
    let status = run_repl(&fs);
    fs.unmount();
    status
}

/// A minimal line-oriented command loop standing in for a real FUSE
/// dispatch loop, so the core is exercisable end-to-end without one
/// (`spec.md` §1 keeps the dispatch host itself out of scope).
fn run_repl<D: vsfs::Disk>(fs: &Vsfs<D>) -> ExitCode {
    let stdin = io::stdin();
    print!("vsfs> ");
    let _ = io::stdout().flush();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => break,
            ["mknod", path] => report(fs.mknod(path).map(|inum| format!("inode {inum}"))),
            ["mkdir", path] => report(fs.mkdir(path).map(|inum| format!("inode {inum}"))),
            ["open", path] => report(fs.open(path).map(|inum| format!("inode {inum}"))),
            ["stat", path] => report(fs.getattr(path).map(|s| format!("{s:?}"))),
            ["write", inum, text] => match inum.parse::<u32>() {
                Ok(inum) => report(fs.write(inum, text.as_bytes(), 0).map(|n| format!("wrote {n} bytes"))),
                Err(_) => println!("error: bad inode number"),
            },
            ["read", inum, size] => match inum.parse::<u32>() {
                Ok(inum) => {
                    let size: usize = size.parse().unwrap_or(0);
                    let mut buf = vec![0u8; size];
                    report(
                        fs.read(inum, &mut buf, 0)
                            .map(|n| String::from_utf8_lossy(&buf[..n as usize]).into_owned()),
                    )
                }
                Err(_) => println!("error: bad inode number"),
            },
            _ => println!(
                "usage: mknod|mkdir|open|stat <path> | write <inum> <text> | read <inum> <size> | quit"
            ),
        }
        print!("vsfs> ");
        let _ = io::stdout().flush();
    }

    ExitCode::SUCCESS
}

fn report(result: vsfs::Result<String>) {
    match result {
        Ok(msg) => println!("{msg}"),
        Err(Error::NotFound) => println!("error: no such file or directory"),
        Err(err) => println!("error: {err}"),
    }
}
