//! Directory indices and the cache tree that links them.
//!
//! A [`DirIndex`] is one directory's entries plus a trie over their names.
//! Every index built during a session lives in a single [`IndexTree`] arena.
//! Entries point down at the index of the subdirectory they name once it has
//! been visited, and each index points up at its parent, so the arena mirrors
//! the visited part of the filesystem. Dropping the arena tears the whole tree
//! down in one pass.

use crate::codec;
use crate::error::BurrowError;
use crate::fs::RawEntry;
use crate::screen;
use crate::trie::Trie;
use colored::Colorize;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io::{self, Write};

/// Kind of a directory entry, as reported without following links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    Other,
}

impl From<std::fs::FileType> for EntryKind {
    fn from(file_type: std::fs::FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// Handle to a [`DirIndex`] inside an [`IndexTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexId(usize);

#[derive(Debug)]
pub struct DirEntry {
    name: OsString,
    kind: EntryKind,
    /// Index of this subdirectory, once visited
    child: Option<IndexId>,
}

impl DirEntry {
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn child(&self) -> Option<IndexId> {
        self.child
    }

    pub fn display_name(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }
}

#[derive(Debug)]
pub struct DirIndex {
    trie: Trie,
    entries: Vec<DirEntry>,
    parent: Option<IndexId>,
}

impl DirIndex {
    /// Index a directory listing, preserving its order.
    ///
    /// Each entry's position in the listing is the terminal marker stored in
    /// the trie.
    pub fn build<I>(listing: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = RawEntry>,
    {
        let mut trie = Trie::new();
        let root = trie.root();
        let mut entries = Vec::new();

        for raw in listing {
            let key = codec::codepoints(name_bytes(&raw.name)?)?;
            trie.insert(root, &key, entries.len())?;
            entries.push(DirEntry {
                name: raw.name,
                kind: raw.kind,
                child: None,
            });
        }

        tracing::debug!(entries = entries.len(), nodes = trie.len(), "built directory index");

        Ok(Self {
            trie,
            entries,
            parent: None,
        })
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn entry(&self, position: usize) -> Option<&DirEntry> {
        self.entries.get(position)
    }

    pub fn parent(&self) -> Option<IndexId> {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the entry named exactly `name`.
    pub fn position_of(&self, name: &OsStr) -> Option<usize> {
        self.entries.iter().position(|e| e.name.as_os_str() == name)
    }

    /// Write every entry name on its own line, in listing order.
    pub fn render<W: Write + ?Sized>(&self, sink: &mut W, color: bool) -> io::Result<()> {
        for entry in &self.entries {
            let name = entry.display_name();
            if color {
                match entry.kind {
                    EntryKind::Directory => write!(sink, "{}", (&*name).blue().bold())?,
                    EntryKind::Symlink => write!(sink, "{}", (&*name).cyan())?,
                    EntryKind::File | EntryKind::Other => sink.write_all(name.as_bytes())?,
                }
            } else {
                sink.write_all(name.as_bytes())?;
            }
            screen::newline(sink)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn name_bytes(name: &OsStr) -> crate::Result<&[u8]> {
    use std::os::unix::ffi::OsStrExt;
    Ok(name.as_bytes())
}

#[cfg(not(unix))]
fn name_bytes(name: &OsStr) -> crate::Result<&[u8]> {
    name.to_str()
        .map(str::as_bytes)
        .ok_or(BurrowError::InvalidEncoding { byte: 0xFF })
}

/// Arena holding every index built during a session.
#[derive(Debug, Default)]
pub struct IndexTree {
    indices: Vec<DirIndex>,
}

impl IndexTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: DirIndex) -> IndexId {
        let id = IndexId(self.indices.len());
        self.indices.push(index);
        id
    }

    pub fn get(&self, id: IndexId) -> &DirIndex {
        &self.indices[id.0]
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Cached child index for the entry at `position`, if it was visited.
    pub fn cached_child(&self, id: IndexId, position: usize) -> Option<IndexId> {
        self.get(id).entry(position).and_then(DirEntry::child)
    }

    /// Record `child` as the index of the subdirectory at `parent[position]`.
    pub fn link(&mut self, parent: IndexId, position: usize, child: IndexId) -> crate::Result<()> {
        let entry = self.indices[parent.0]
            .entries
            .get_mut(position)
            .ok_or(BurrowError::NoSuchEntry(position))?;
        entry.child = Some(child);
        self.indices[child.0].parent = Some(parent);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, kind: EntryKind) -> RawEntry {
        RawEntry {
            name: OsString::from(name),
            kind,
        }
    }

    #[test]
    fn test_build_preserves_order() {
        let index = DirIndex::build(vec![
            raw("zeta", EntryKind::File),
            raw("alpha", EntryKind::Directory),
            raw("愛", EntryKind::File),
        ])
        .unwrap();

        let names: Vec<_> = index.entries().iter().map(|e| e.display_name()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "愛"]);
        assert_eq!(index.entry(1).unwrap().kind(), EntryKind::Directory);

        let key = codec::codepoints("愛".as_bytes()).unwrap();
        let (node, rest) = index.trie().search(index.trie().root(), &key);
        assert!(rest.is_empty());
        assert_eq!(index.trie().terminal(node), Some(2));
    }

    #[test]
    fn test_build_rejects_duplicates() {
        let err = DirIndex::build(vec![
            raw("same", EntryKind::File),
            raw("same", EntryKind::Directory),
        ])
        .unwrap_err();
        assert!(matches!(err, BurrowError::DuplicateKey { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_rejects_malformed_names() {
        use std::os::unix::ffi::OsStringExt;
        let bad = RawEntry {
            name: OsString::from_vec(vec![b'a', 0xE6, b'b', b'c']),
            kind: EntryKind::File,
        };
        let err = DirIndex::build(vec![bad]).unwrap_err();
        assert!(matches!(err, BurrowError::InvalidEncoding { byte: b'b' }));
    }

    #[test]
    fn test_render_plain() {
        let index = DirIndex::build(vec![
            raw("one", EntryKind::File),
            raw("two", EntryKind::Directory),
        ])
        .unwrap();
        let mut out = Vec::new();
        index.render(&mut out, false).unwrap();
        assert_eq!(out, b"one\r\ntwo\r\n");
    }

    fn top(tree: &IndexTree, id: IndexId) -> IndexId {
        let mut current = id;
        while let Some(parent) = tree.get(current).parent() {
            current = parent;
        }
        current
    }

    #[test]
    fn test_tree_link_and_top() {
        let mut tree = IndexTree::new();
        let top_id = tree.insert(DirIndex::build(vec![raw("sub", EntryKind::Directory)]).unwrap());
        let sub = tree.insert(DirIndex::build(vec![raw("leaf", EntryKind::Directory)]).unwrap());
        let leaf = tree.insert(DirIndex::build(Vec::new()).unwrap());

        tree.link(top_id, 0, sub).unwrap();
        tree.link(sub, 0, leaf).unwrap();

        assert_eq!(tree.cached_child(top_id, 0), Some(sub));
        assert_eq!(tree.get(leaf).parent(), Some(sub));
        assert_eq!(top(&tree, leaf), top_id);
        assert!(matches!(tree.link(top_id, 5, sub), Err(BurrowError::NoSuchEntry(5))));
    }

    #[test]
    fn test_position_of() {
        let index = DirIndex::build(vec![
            raw("a", EntryKind::File),
            raw("b", EntryKind::File),
        ])
        .unwrap();
        assert_eq!(index.position_of(OsStr::new("b")), Some(1));
        assert_eq!(index.position_of(OsStr::new("c")), None);
    }
}
