//! Study session state machine.
//!
//! A session runs over the store's flattened card list: Idle until a mode is
//! started, Active while the index is inside the list, Complete once the
//! index reaches the end. Within Active the card is either front-showing or
//! flipped. The controller never touches the store's file grouping; random
//! mode and mid-session shuffles reorder the flattened list in place.

use crate::models::{Confidence, StudyMode};
use crate::similarity::{similarity, AnswerTier};
use crate::store::CardStore;
use std::collections::HashSet;
use tracing::debug;

/// Per-session rating counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub easy: usize,
    pub good: usize,
    pub hard: usize,
    pub again: usize,
}

impl SessionStats {
    fn record(&mut self, confidence: Confidence) {
        match confidence {
            Confidence::Easy => self.easy += 1,
            Confidence::Good => self.good += 1,
            Confidence::Hard => self.hard += 1,
            Confidence::Again => self.again += 1,
        }
    }
}

/// Result of a quiz answer check, for presentation only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerCheck {
    pub score: f64,
    pub tier: AnswerTier,
}

/// Drives one study session over the card list.
#[derive(Debug, Default)]
pub struct SessionController {
    mode: Option<StudyMode>,
    index: usize,
    total: usize,
    flipped: bool,
    /// Quiz only: an answer has been submitted for the current card.
    answered: bool,
    learned: HashSet<usize>,
    stats: SessionStats,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session in `mode`. A no-op when the store is empty (the
    /// caller is expected to gate on that). Random mode shuffles the card
    /// list before the first card.
    pub fn start_mode(&mut self, mode: StudyMode, store: &mut CardStore) {
        if store.is_empty() {
            return;
        }
        if mode == StudyMode::Random {
            store.shuffle();
        }
        self.mode = Some(mode);
        self.index = 0;
        self.total = store.len();
        self.flipped = false;
        self.answered = false;
        self.learned.clear();
        self.stats = SessionStats::default();
        debug!(mode = mode.name(), cards = self.total, "session started");
    }

    /// Toggle front/flipped. In quiz mode the card stays front-up until an
    /// answer has been submitted.
    pub fn flip(&mut self) {
        if !self.is_active() || self.is_complete() {
            return;
        }
        if self.mode == Some(StudyMode::Quiz) && !self.answered {
            return;
        }
        self.flipped = !self.flipped;
    }

    /// Score the user's answer against the current card (quiz mode only) and
    /// force the card to flipped. Does not touch stats or the learned set.
    pub fn check_answer(&mut self, user_text: &str, store: &CardStore) -> Option<AnswerCheck> {
        if self.mode != Some(StudyMode::Quiz) || self.is_complete() {
            return None;
        }
        let card = store.card(self.index)?;
        let user = user_text.trim().to_lowercase();
        let expected = card.answer.trim().to_lowercase();
        let score = similarity(&user, &expected);

        self.answered = true;
        self.flipped = true;
        Some(AnswerCheck {
            score,
            tier: AnswerTier::classify(score),
        })
    }

    /// Record a confidence rating and advance. Ratings other than Again mark
    /// the current index as learned. Advancing past the last card completes
    /// the session.
    pub fn rate(&mut self, confidence: Confidence) {
        if !self.is_active() || self.is_complete() {
            return;
        }
        self.stats.record(confidence);
        if confidence != Confidence::Again {
            self.learned.insert(self.index);
        }
        self.index += 1;
        self.flipped = false;
        self.answered = false;
        if self.is_complete() {
            debug!(stats = ?self.stats, "session complete");
        }
    }

    /// Move back one card. No-op at the first card. Does not affect stats or
    /// the learned set.
    pub fn prev(&mut self) {
        if !self.is_active() || self.is_complete() || self.index == 0 {
            return;
        }
        self.index -= 1;
        self.flipped = false;
        self.answered = false;
    }

    /// Move forward one card. No-op at the last card, so navigation alone
    /// never completes the session; only `rate` advances past the end.
    pub fn next(&mut self) {
        if !self.is_active() || self.is_complete() || self.index + 1 >= self.total {
            return;
        }
        self.index += 1;
        self.flipped = false;
        self.answered = false;
    }

    /// Reshuffle the live card list and jump back to the first card. Stats
    /// and the learned set are deliberately kept.
    pub fn shuffle_now(&mut self, store: &mut CardStore) {
        if !self.is_active() {
            return;
        }
        store.shuffle();
        self.index = 0;
        self.flipped = false;
        self.answered = false;
    }

    /// Discard the session entirely, back to Idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn mode(&self) -> Option<StudyMode> {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode.is_some()
    }

    /// True once the index has reached the end of the card list.
    pub fn is_complete(&self) -> bool {
        self.is_active() && self.index >= self.total
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn flipped(&self) -> bool {
        self.flipped
    }

    /// Quiz only: still waiting for the answer to the current card.
    pub fn awaiting_answer(&self) -> bool {
        self.mode == Some(StudyMode::Quiz) && !self.answered && !self.is_complete()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn learned_count(&self) -> usize {
        self.learned.len()
    }

    pub fn is_learned(&self, index: usize) -> bool {
        self.learned.contains(&index)
    }

    /// Learned share of the card list, for the progress bar.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.learned.len() as f64 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(n: usize) -> CardStore {
        let mut store = CardStore::new();
        let text: String = (0..n).map(|i| format!("q{i},a{i}\n")).collect();
        store.add_file("deck.csv", &text);
        assert_eq!(store.len(), n);
        store
    }

    #[test]
    fn test_start_requires_cards() {
        let mut store = CardStore::new();
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Sequential, &mut store);
        assert!(!session.is_active());
    }

    #[test]
    fn test_rating_all_cards_completes() {
        let mut store = store_with(3);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Sequential, &mut store);

        for _ in 0..3 {
            assert!(!session.is_complete());
            session.flip();
            session.rate(Confidence::Good);
        }
        assert!(session.is_complete());
        assert_eq!(session.stats().good, 3);
        assert_eq!(session.learned_count(), 3);
    }

    #[test]
    fn test_again_does_not_mark_learned() {
        let mut store = store_with(2);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Sequential, &mut store);

        session.rate(Confidence::Again);
        assert_eq!(session.index(), 1);
        assert_eq!(session.learned_count(), 0);
        assert_eq!(session.stats().again, 1);

        session.rate(Confidence::Hard);
        assert_eq!(session.learned_count(), 1);
        assert!(session.is_complete());
    }

    #[test]
    fn test_flip_toggles() {
        let mut store = store_with(1);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Sequential, &mut store);

        assert!(!session.flipped());
        session.flip();
        assert!(session.flipped());
        session.flip();
        assert!(!session.flipped());
    }

    #[test]
    fn test_navigation_bounds() {
        let mut store = store_with(3);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Sequential, &mut store);

        session.prev();
        assert_eq!(session.index(), 0);

        session.next();
        session.next();
        assert_eq!(session.index(), 2);
        // No-op at the last card: navigation never completes a session.
        session.next();
        assert_eq!(session.index(), 2);
        assert!(!session.is_complete());
    }

    #[test]
    fn test_navigation_does_not_touch_stats() {
        let mut store = store_with(3);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Sequential, &mut store);

        session.rate(Confidence::Good);
        session.prev();
        session.next();
        assert_eq!(session.stats().good, 1);
        assert_eq!(session.learned_count(), 1);
    }

    #[test]
    fn test_navigation_resets_flip() {
        let mut store = store_with(2);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Sequential, &mut store);

        session.flip();
        session.next();
        assert!(!session.flipped());
    }

    #[test]
    fn test_shuffle_now_keeps_progress() {
        let mut store = store_with(5);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Sequential, &mut store);

        session.rate(Confidence::Good);
        session.rate(Confidence::Easy);
        let stats = session.stats();
        let learned = session.learned_count();

        session.shuffle_now(&mut store);
        assert_eq!(session.index(), 0);
        assert_eq!(session.stats(), stats);
        assert_eq!(session.learned_count(), learned);
        assert!(!session.flipped());
    }

    #[test]
    fn test_quiz_flip_gated_on_answer() {
        let mut store = store_with(1);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Quiz, &mut store);

        assert!(session.awaiting_answer());
        session.flip();
        assert!(!session.flipped());

        let check = session.check_answer("whatever", &store).unwrap();
        assert!(session.flipped());
        assert!(!session.awaiting_answer());
        assert!(check.score >= 0.0 && check.score <= 1.0);
    }

    #[test]
    fn test_quiz_check_scores_exact_answer() {
        let mut store = CardStore::new();
        store.add_file("deck.csv", "capital of France,Paris");
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Quiz, &mut store);

        let check = session.check_answer("  paris ", &store).unwrap();
        assert_eq!(check.score, 1.0);
        assert_eq!(check.tier, AnswerTier::Good);
    }

    #[test]
    fn test_check_answer_outside_quiz_mode() {
        let mut store = store_with(1);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Sequential, &mut store);
        assert!(session.check_answer("x", &store).is_none());
    }

    #[test]
    fn test_check_answer_does_not_touch_stats() {
        let mut store = store_with(1);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Quiz, &mut store);

        session.check_answer("x", &store);
        assert_eq!(session.stats(), SessionStats::default());
        assert_eq!(session.learned_count(), 0);
    }

    #[test]
    fn test_quiz_answer_required_per_card() {
        let mut store = store_with(2);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Quiz, &mut store);

        session.check_answer("x", &store);
        session.rate(Confidence::Good);
        // Next card needs its own answer before flipping again.
        assert!(session.awaiting_answer());
        session.flip();
        assert!(!session.flipped());
    }

    #[test]
    fn test_random_mode_keeps_card_count() {
        let mut store = store_with(10);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Random, &mut store);
        assert_eq!(session.total(), 10);
        assert_eq!(store.len(), 10);
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut store = store_with(2);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Sequential, &mut store);
        session.rate(Confidence::Good);

        session.reset();
        assert!(!session.is_active());
        assert_eq!(session.learned_count(), 0);
        assert_eq!(session.stats(), SessionStats::default());
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn test_rate_past_end_ignored() {
        let mut store = store_with(1);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Sequential, &mut store);

        session.rate(Confidence::Good);
        assert!(session.is_complete());
        session.rate(Confidence::Good);
        assert_eq!(session.stats().good, 1);
        assert_eq!(session.index(), 1);
    }

    #[test]
    fn test_progress() {
        let mut store = store_with(4);
        let mut session = SessionController::new();
        session.start_mode(StudyMode::Sequential, &mut store);

        session.rate(Confidence::Good);
        session.rate(Confidence::Again);
        assert_eq!(session.progress(), 0.25);
    }
}
