//! The per-directory input loop.
//!
//! A session holds a cursor into the active index's trie and the text typed
//! so far. Each decoded keystroke either moves the cursor, or commits a
//! selection through the navigator and starts a fresh session in the
//! directory it lands in.

use crate::codec;
use crate::config::KeyConfig;
use crate::error::BurrowError;
use crate::fs::Filesystem;
use crate::navigate::{Navigator, Outcome};
use crate::screen;
use crate::trie::NodeId;
use std::io::{self, Read, Write};
use std::path::PathBuf;

const DELETE: u32 = 0x7F;
const BACKSPACE: u32 = 0x08;
const CARRIAGE_RETURN: u32 = 0x0D;
const LINE_FEED: u32 = 0x0A;

/// Codepoints bound to the session's control actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    pub quit: u32,
    pub new_session: u32,
    pub ascend: u32,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            quit: 0x03,
            new_session: 0x0C,
            ascend: '/' as u32,
        }
    }
}

impl Keymap {
    pub fn from_config(keys: &KeyConfig) -> crate::Result<Self> {
        let keymap = Self {
            quit: single_key("quit", &keys.quit)?,
            new_session: single_key("new_session", &keys.new_session)?,
            ascend: single_key("ascend", &keys.ascend)?,
        };
        keymap.validate()?;
        Ok(keymap)
    }

    /// Bindings must be distinct, must not shadow backspace or enter, and
    /// must not be characters a filename could contain ('/' excepted).
    pub fn validate(&self) -> crate::Result<()> {
        let bindings = [
            ("quit", self.quit),
            ("new_session", self.new_session),
            ("ascend", self.ascend),
        ];

        for (i, (name, key)) in bindings.iter().enumerate() {
            if bindings[..i].iter().any(|(_, other)| other == key) {
                return Err(BurrowError::InvalidKeymap(format!(
                    "{} shares its key with another binding",
                    name
                )));
            }
            if matches!(*key, DELETE | BACKSPACE | CARRIAGE_RETURN | LINE_FEED) {
                return Err(BurrowError::InvalidKeymap(format!(
                    "{} cannot use backspace or enter",
                    name
                )));
            }
            let printable = char::from_u32(*key).is_some_and(|c| !c.is_control());
            if printable && *key != '/' as u32 {
                return Err(BurrowError::InvalidKeymap(format!(
                    "{} would shadow filename character {:?}",
                    name,
                    char::from_u32(*key).unwrap_or_default()
                )));
            }
        }
        Ok(())
    }
}

fn single_key(name: &str, value: &str) -> crate::Result<u32> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c as u32),
        _ => Err(BurrowError::InvalidKeymap(format!(
            "{} must be exactly one character, got {:?}",
            name, value
        ))),
    }
}

/// What a single keystroke did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing matched; the keystroke is dropped
    Ignored,
    /// Cursor moved; the typed line needs redrawing
    Redraw,
    /// A fresh session began, possibly in another directory
    Restart,
    Quit,
    Launch(PathBuf),
}

/// How the loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    Quit,
    Launch(PathBuf),
}

pub struct Session<F: Filesystem> {
    nav: Navigator<F>,
    keymap: Keymap,
    color: bool,
    cursor: NodeId,
    /// UTF-8 of the codepoints on the path from the trie root to `cursor`
    typed: Vec<u8>,
}

impl<F: Filesystem> Session<F> {
    pub fn new(nav: Navigator<F>, keymap: Keymap) -> Self {
        let cursor = nav.active().trie().root();
        Self {
            nav,
            keymap,
            color: false,
            cursor,
            typed: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn navigator(&self) -> &Navigator<F> {
        &self.nav
    }

    pub fn into_navigator(self) -> Navigator<F> {
        self.nav
    }

    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    pub fn typed(&self) -> &[u8] {
        &self.typed
    }

    /// Entry the cursor currently completes, if any.
    pub fn selected(&self) -> Option<usize> {
        self.nav.active().trie().terminal(self.cursor)
    }

    fn reset(&mut self) {
        self.cursor = self.nav.active().trie().root();
        self.typed.clear();
    }

    /// Apply one decoded keystroke.
    pub fn handle(&mut self, codepoint: u32) -> crate::Result<Step> {
        let keys = self.keymap;
        match codepoint {
            c if c == keys.quit => Ok(Step::Quit),
            c if c == keys.new_session => {
                self.reset();
                Ok(Step::Restart)
            }
            c if c == keys.ascend => self.commit(None),
            DELETE | BACKSPACE => Ok(self.back()),
            CARRIAGE_RETURN | LINE_FEED => match self.selected() {
                Some(position) => self.commit(Some(position)),
                None => Ok(Step::Ignored),
            },
            c => self.advance(c),
        }
    }

    fn back(&mut self) -> Step {
        match self.nav.active().trie().parent(self.cursor) {
            Some(parent) => {
                self.cursor = parent;
                codec::pop_codepoint(&mut self.typed);
                Step::Redraw
            }
            None => Step::Ignored,
        }
    }

    fn advance(&mut self, codepoint: u32) -> crate::Result<Step> {
        let trie = self.nav.active().trie();
        let Some(next) = trie.child(self.cursor, codepoint) else {
            return Ok(Step::Ignored);
        };

        // A leaf is a unique match: commit without waiting for enter
        if trie.child_count(next) == 0 {
            if let Some(position) = trie.terminal(next) {
                return self.commit(Some(position));
            }
        }

        codec::push_codepoint(&mut self.typed, codepoint)?;
        self.cursor = trie.skip_to_junction(next, &mut self.typed)?;
        Ok(Step::Redraw)
    }

    fn commit(&mut self, selection: Option<usize>) -> crate::Result<Step> {
        match self.nav.open(selection)? {
            Outcome::Entered | Outcome::Ascended | Outcome::AtRoot => {
                self.reset();
                Ok(Step::Restart)
            }
            Outcome::Launch(path) => Ok(Step::Launch(path)),
        }
    }

    /// Clear the screen, list the active directory and redraw the typed line.
    pub fn draw<W: Write>(&self, out: &mut W) -> io::Result<()> {
        screen::clear(out)?;
        self.nav.active().render(out, self.color)?;
        screen::typed_line(out, &self.typed)
    }

    /// Read keystrokes from `input` until the user quits or opens a file.
    ///
    /// Malformed input is dropped and reading continues; end of input counts
    /// as a quit. Every other error ends the loop.
    pub fn run<R, W>(&mut self, input: &mut R, out: &mut W) -> crate::Result<Exit>
    where
        R: Read + ?Sized,
        W: Write,
    {
        self.draw(out)?;
        loop {
            let decoded = match codec::decode(input) {
                Ok(decoded) => decoded,
                Err(e) if e.is_transient_input() => {
                    tracing::warn!(error = %e, "discarding input");
                    continue;
                }
                Err(e) if e.is_end_of_input() => {
                    tracing::info!("input closed");
                    return Ok(Exit::Quit);
                }
                Err(e) => return Err(e),
            };

            match self.handle(decoded.codepoint)? {
                Step::Ignored => {}
                Step::Redraw => screen::typed_line(out, &self.typed)?,
                Step::Restart => self.draw(out)?,
                Step::Quit => return Ok(Exit::Quit),
                Step::Launch(path) => return Ok(Exit::Launch(path)),
            }
        }
    }
}
