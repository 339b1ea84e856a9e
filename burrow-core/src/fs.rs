//! Working-directory access used by the navigator.
//!
//! All directory changes go through a [`Filesystem`], so the navigator is the
//! only place the working directory moves.

use crate::index::EntryKind;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One entry of a directory listing, before indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

pub trait Filesystem {
    /// Change the working directory, relative to the current one.
    fn change_dir(&mut self, name: &Path) -> io::Result<()>;

    /// List the working directory in iteration order.
    fn list(&mut self) -> io::Result<Vec<RawEntry>>;

    /// Absolute path of the working directory with links resolved.
    fn real_path(&self) -> io::Result<PathBuf>;
}

fn list_dir(dir: &Path) -> io::Result<Vec<RawEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        entries.push(RawEntry {
            kind: EntryKind::from(entry.file_type()?),
            name: entry.file_name(),
        });
    }
    Ok(entries)
}

/// The process working directory.
#[derive(Debug, Default)]
pub struct ProcessFs;

impl Filesystem for ProcessFs {
    fn change_dir(&mut self, name: &Path) -> io::Result<()> {
        std::env::set_current_dir(name)
    }

    fn list(&mut self) -> io::Result<Vec<RawEntry>> {
        list_dir(Path::new("."))
    }

    fn real_path(&self) -> io::Result<PathBuf> {
        fs::canonicalize(".")
    }
}

/// A working directory tracked in memory; the process directory is untouched.
///
/// Lets tests and embedders drive a [`Navigator`](crate::Navigator) without
/// moving the process out from under other threads.
#[derive(Debug, Clone)]
pub struct TrackedFs {
    cwd: PathBuf,
}

impl TrackedFs {
    pub fn new(start: &Path) -> io::Result<Self> {
        let cwd = fs::canonicalize(start)?;
        if !cwd.is_dir() {
            return Err(not_a_directory(&cwd));
        }
        Ok(Self { cwd })
    }
}

impl Filesystem for TrackedFs {
    fn change_dir(&mut self, name: &Path) -> io::Result<()> {
        let next = fs::canonicalize(self.cwd.join(name))?;
        if !next.is_dir() {
            return Err(not_a_directory(&next));
        }
        // chdir needs search permission; reading the directory is the closest check
        fs::read_dir(&next)?;
        self.cwd = next;
        Ok(())
    }

    fn list(&mut self) -> io::Result<Vec<RawEntry>> {
        list_dir(&self.cwd)
    }

    fn real_path(&self) -> io::Result<PathBuf> {
        Ok(self.cwd.clone())
    }
}

fn not_a_directory(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::Other,
        format!("not a directory: {}", path.display()),
    )
}
