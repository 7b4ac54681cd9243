//! Card storage grouped by source file.

use crate::models::Card;
use crate::parser;
use rand::seq::SliceRandom;
use std::rc::Rc;

/// One loaded source file and the cards it contributed.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Display name (the file name, not the full path).
    pub name: String,
    /// Cards owned by this entry, in file order.
    pub cards: Vec<Rc<Card>>,
    /// Number of cards parsed from the file.
    pub count: usize,
}

/// Owns all loaded cards, grouped by source file, plus a flattened list the
/// session runs over.
///
/// Cards are compared by identity (`Rc::ptr_eq`), so duplicate text across
/// files still removes correctly. Invariant: the flattened list's length
/// equals the sum of per-entry counts. After `shuffle` the flattened order no
/// longer reflects the file grouping; that is accepted, the grouping only
/// matters for display and removal.
#[derive(Debug, Default)]
pub struct CardStore {
    files: Vec<FileEntry>,
    cards: Vec<Rc<Card>>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `raw` and add it as a file entry. A file that yields zero cards
    /// is not added at all — no entry, no error.
    pub fn add_file(&mut self, name: impl Into<String>, raw: &str) -> Option<&FileEntry> {
        self.add_parsed(name, parser::parse_cards(raw))
    }

    /// Add already-parsed cards as a file entry. Returns the new entry, or
    /// `None` (and adds nothing) when `cards` is empty.
    pub fn add_parsed(&mut self, name: impl Into<String>, cards: Vec<Card>) -> Option<&FileEntry> {
        if cards.is_empty() {
            return None;
        }
        let cards: Vec<Rc<Card>> = cards.into_iter().map(Rc::new).collect();
        self.cards.extend(cards.iter().cloned());
        let count = cards.len();
        self.files.push(FileEntry {
            name: name.into(),
            cards,
            count,
        });
        self.files.last()
    }

    /// Remove the file entry at `index` and its cards from the flattened
    /// list, preserving the relative order of everything else. Out-of-range
    /// indices are ignored.
    pub fn remove_file(&mut self, index: usize) {
        if index >= self.files.len() {
            return;
        }
        let entry = self.files.remove(index);
        self.cards
            .retain(|card| !entry.cards.iter().any(|own| Rc::ptr_eq(own, card)));
    }

    /// Drop all files and cards.
    pub fn clear(&mut self) {
        self.files.clear();
        self.cards.clear();
    }

    /// Shuffle the flattened card list in place (Fisher–Yates).
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::thread_rng());
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn cards(&self) -> &[Rc<Card>] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Rc<Card>> {
        self.cards.get(index)
    }

    /// Total cards across all files.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
