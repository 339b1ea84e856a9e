//! Navigation context: the active index kept in step with the working directory.

use crate::error::BurrowError;
use crate::fs::{Filesystem, RawEntry};
use crate::index::{DirIndex, EntryKind, IndexId, IndexTree};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};

const PARENT_DIR: &str = "..";

#[derive(Debug, Clone)]
pub struct NavigatorOptions {
    /// Index entries whose name starts with a dot
    pub show_hidden: bool,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self { show_hidden: true }
    }
}

/// Result of [`Navigator::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Moved into a subdirectory
    Entered,
    /// Moved into the parent directory
    Ascended,
    /// Ascent requested at the filesystem root; nothing changed
    AtRoot,
    /// A file was selected; hand this path to the opener
    Launch(PathBuf),
}

/// Owns the index tree and the working directory, and moves both together.
pub struct Navigator<F: Filesystem> {
    fs: F,
    tree: IndexTree,
    active: IndexId,
    options: NavigatorOptions,
}

impl<F: Filesystem> Navigator<F> {
    pub fn new(fs: F) -> crate::Result<Self> {
        Self::with_options(fs, NavigatorOptions::default())
    }

    /// Index the starting directory and make it active.
    pub fn with_options(mut fs: F, options: NavigatorOptions) -> crate::Result<Self> {
        let index = DirIndex::build(read_listing(&mut fs, &options, None)?)?;
        let mut tree = IndexTree::new();
        let active = tree.insert(index);
        tracing::info!(dir = %fs.real_path()?.display(), "starting navigation");
        Ok(Self {
            fs,
            tree,
            active,
            options,
        })
    }

    pub fn active(&self) -> &DirIndex {
        self.tree.get(self.active)
    }

    pub fn active_id(&self) -> IndexId {
        self.active
    }

    pub fn tree(&self) -> &IndexTree {
        &self.tree
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Real path of the directory the active index describes.
    pub fn current_dir(&self) -> io::Result<PathBuf> {
        self.fs.real_path()
    }

    /// Commit a selection.
    ///
    /// `Some(position)` opens that entry of the active index; `None` ascends
    /// to the parent directory.
    pub fn open(&mut self, selection: Option<usize>) -> crate::Result<Outcome> {
        match selection {
            Some(position) => self.select(position),
            None => self.ascend(),
        }
    }

    fn select(&mut self, position: usize) -> crate::Result<Outcome> {
        let entry = self
            .active()
            .entry(position)
            .ok_or(BurrowError::NoSuchEntry(position))?;

        match entry.kind() {
            EntryKind::Directory => {
                let name = entry.name().to_os_string();
                self.descend(position, &name)
            }
            EntryKind::File => {
                let path = self.fs.real_path()?.join(entry.name());
                tracing::info!(path = %path.display(), "launching file");
                Ok(Outcome::Launch(path))
            }
            EntryKind::Symlink | EntryKind::Other => Err(BurrowError::Unsupported {
                name: entry.display_name().into_owned(),
            }),
        }
    }

    fn descend(&mut self, position: usize, name: &OsStr) -> crate::Result<Outcome> {
        self.fs.change_dir(Path::new(name))?;

        if let Some(child) = self.tree.cached_child(self.active, position) {
            tracing::debug!(name = %name.to_string_lossy(), "cached index hit");
            self.active = child;
            return Ok(Outcome::Entered);
        }

        let index = match read_listing(&mut self.fs, &self.options, None)
            .and_then(DirIndex::build)
        {
            Ok(index) => index,
            Err(e) => {
                self.rollback(Path::new(PARENT_DIR));
                return Err(e);
            }
        };
        let child = self.tree.insert(index);
        self.tree.link(self.active, position, child)?;
        self.active = child;
        tracing::info!(
            name = %name.to_string_lossy(),
            indices = self.tree.len(),
            "entered directory"
        );
        Ok(Outcome::Entered)
    }

    fn ascend(&mut self) -> crate::Result<Outcome> {
        if let Some(parent) = self.active().parent() {
            self.fs.change_dir(Path::new(PARENT_DIR))?;
            self.active = parent;
            tracing::debug!("ascended to cached parent");
            return Ok(Outcome::Ascended);
        }

        // Top of the visited tree: learn our own name, then index the parent
        let here = self.fs.real_path()?;
        let Some(name) = here.file_name().map(OsStr::to_os_string) else {
            tracing::debug!("ascend at filesystem root ignored");
            return Ok(Outcome::AtRoot);
        };

        self.fs.change_dir(Path::new(PARENT_DIR))?;

        let index = match read_listing(&mut self.fs, &self.options, Some(&name))
            .and_then(DirIndex::build)
        {
            Ok(index) => index,
            Err(e) => {
                self.rollback(&here);
                return Err(e);
            }
        };
        let Some(position) = index.position_of(&name) else {
            self.rollback(&here);
            return Err(BurrowError::MissingEntry {
                name: name.to_string_lossy().into_owned(),
            });
        };

        let parent = self.tree.insert(index);
        self.tree.link(parent, position, self.active)?;
        self.active = parent;
        tracing::info!(indices = self.tree.len(), "indexed parent directory");
        Ok(Outcome::Ascended)
    }

    /// Return to the active index's directory after a failed move.
    fn rollback(&mut self, to: &Path) {
        if let Err(e) = self.fs.change_dir(to) {
            tracing::warn!(error = %e, "could not restore working directory");
        }
    }
}

/// List the working directory, dropping dotfiles unless shown.
///
/// `keep` survives the hidden filter so an ascent can always find the
/// directory it came from.
fn read_listing<F: Filesystem>(
    fs: &mut F,
    options: &NavigatorOptions,
    keep: Option<&OsString>,
) -> crate::Result<Vec<RawEntry>> {
    let mut listing = fs.list()?;
    if !options.show_hidden {
        listing.retain(|e| !is_hidden(&e.name) || keep == Some(&e.name));
    }
    Ok(listing)
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::TrackedFs;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs/inner")).unwrap();
        fs::write(dir.path().join("notes.txt"), "hi").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        dir
    }

    fn position(nav: &Navigator<TrackedFs>, name: &str) -> usize {
        nav.active().position_of(OsStr::new(name)).unwrap()
    }

    #[test]
    fn test_open_file_launches_absolute_path() {
        let dir = fixture();
        let mut nav = Navigator::new(TrackedFs::new(dir.path()).unwrap()).unwrap();
        let notes = position(&nav, "notes.txt");

        let outcome = nav.open(Some(notes)).unwrap();
        let expected = fs::canonicalize(dir.path()).unwrap().join("notes.txt");
        assert_eq!(outcome, Outcome::Launch(expected));
    }

    #[test]
    fn test_descend_and_ascend_keep_directory_in_sync() {
        let dir = fixture();
        let root = fs::canonicalize(dir.path()).unwrap();
        let mut nav = Navigator::new(TrackedFs::new(dir.path()).unwrap()).unwrap();
        let start = nav.active_id();

        let docs = position(&nav, "docs");
        assert_eq!(nav.open(Some(docs)).unwrap(), Outcome::Entered);
        assert_eq!(nav.current_dir().unwrap(), root.join("docs"));
        assert_eq!(nav.active().len(), 1);
        assert_eq!(nav.active().parent(), Some(start));

        assert_eq!(nav.open(None).unwrap(), Outcome::Ascended);
        assert_eq!(nav.active_id(), start);
        assert_eq!(nav.current_dir().unwrap(), root);
        assert_eq!(nav.tree().len(), 2);
    }

    #[test]
    fn test_out_of_range_selection() {
        let dir = fixture();
        let mut nav = Navigator::new(TrackedFs::new(dir.path()).unwrap()).unwrap();
        assert!(matches!(nav.open(Some(99)), Err(BurrowError::NoSuchEntry(99))));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_unsupported() {
        let dir = fixture();
        std::os::unix::fs::symlink(dir.path().join("docs"), dir.path().join("link")).unwrap();
        let mut nav = Navigator::new(TrackedFs::new(dir.path()).unwrap()).unwrap();
        let link = position(&nav, "link");

        let err = nav.open(Some(link)).unwrap_err();
        assert!(matches!(err, BurrowError::Unsupported { ref name } if name == "link"));
        assert_eq!(
            nav.current_dir().unwrap(),
            fs::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn test_hidden_entries_filtered_but_origin_kept() {
        let dir = fixture();
        fs::create_dir(dir.path().join(".config")).unwrap();
        let options = NavigatorOptions { show_hidden: false };

        let nav = Navigator::with_options(TrackedFs::new(dir.path()).unwrap(), options.clone())
            .unwrap();
        assert!(nav.active().position_of(OsStr::new(".hidden")).is_none());

        // Starting inside a hidden directory, the ascent must still link back
        let mut nav =
            Navigator::with_options(TrackedFs::new(&dir.path().join(".config")).unwrap(), options)
                .unwrap();
        let child = nav.active_id();
        assert_eq!(nav.open(None).unwrap(), Outcome::Ascended);
        let config = position(&nav, ".config");
        assert_eq!(nav.tree().cached_child(nav.active_id(), config), Some(child));
        assert!(nav.active().position_of(OsStr::new(".hidden")).is_none());
    }

    #[test]
    fn test_ascend_at_filesystem_root() {
        let mut nav = Navigator::new(TrackedFs::new(Path::new("/")).unwrap()).unwrap();
        assert_eq!(nav.open(None).unwrap(), Outcome::AtRoot);
        assert_eq!(nav.current_dir().unwrap(), PathBuf::from("/"));
    }
}
