use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

use crate::model::{Flashcard, percentage};

use super::SessionError;

/// Summary shown once the last card has been revealed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeckCompletion {
    pub known: usize,
    pub total: usize,
    pub percent: u8,
}

/// One review pass over a deck of flashcards.
///
/// `order` is a permutation of deck indices and `position` a cursor into it.
/// `known` holds *original* deck indices, so it survives reshuffles.
#[derive(Clone, Debug)]
pub struct FlashcardSession {
    cards: Vec<Flashcard>,
    order: Vec<usize>,
    position: usize,
    revealed: bool,
    known: BTreeSet<usize>,
}

impl FlashcardSession {
    /// Start a session over `cards` in their given order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the deck has no cards.
    pub fn new(cards: Vec<Flashcard>) -> Result<Self, SessionError> {
        if cards.is_empty() {
            return Err(SessionError::Empty);
        }
        let order = (0..cards.len()).collect();
        Ok(Self {
            cards,
            order,
            position: 0,
            revealed: false,
            known: BTreeSet::new(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always false: empty decks are rejected at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn known(&self) -> &BTreeSet<usize> {
        &self.known
    }

    #[must_use]
    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    /// Original deck index of the card under the cursor.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.order[self.position]
    }

    #[must_use]
    pub fn current_card(&self) -> &Flashcard {
        &self.cards[self.current_index()]
    }

    /// Face currently showing: the answer when revealed, else the question.
    #[must_use]
    pub fn visible_face(&self) -> &str {
        let card = self.current_card();
        if self.revealed {
            card.answer()
        } else {
            card.question()
        }
    }

    #[must_use]
    pub fn is_current_known(&self) -> bool {
        self.known.contains(&self.current_index())
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.position + 1 == self.order.len()
    }

    /// Derived, not terminal: last card with its answer showing.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_last() && self.revealed
    }

    #[must_use]
    pub fn completion(&self) -> Option<DeckCompletion> {
        self.is_complete().then(|| DeckCompletion {
            known: self.known.len(),
            total: self.cards.len(),
            percent: self.known_percent(),
        })
    }

    /// Position progress, counting the current card as seen.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        percentage(self.position as u64 + 1, self.order.len() as u64)
    }

    #[must_use]
    pub fn known_percent(&self) -> u8 {
        percentage(self.known.len() as u64, self.cards.len() as u64)
    }

    pub fn flip(&mut self) {
        self.revealed = !self.revealed;
    }

    /// Advance one card. Returns `false` at the last position.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.position += 1;
        self.revealed = false;
        true
    }

    /// Step back one card. Returns `false` at position 0.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.position -= 1;
        self.revealed = false;
        true
    }

    /// Record whether the user knows the revealed card, then move on.
    ///
    /// At the last position the cursor stays put so the completion summary shows.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRevealed` while the question face is showing.
    pub fn mark_known(&mut self, known: bool) -> Result<(), SessionError> {
        if !self.revealed {
            return Err(SessionError::NotRevealed);
        }
        let index = self.current_index();
        if known {
            self.known.insert(index);
        } else {
            self.known.remove(&index);
        }
        self.next();
        Ok(())
    }

    /// Reorder the deck randomly and start over from the first card. Keeps `known`.
    pub fn shuffle(&mut self) {
        let mut rng = rand::rng();
        self.shuffle_with(&mut rng);
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order.shuffle(rng);
        self.position = 0;
        self.revealed = false;
    }

    /// Back to the original order with nothing marked known.
    pub fn reset(&mut self) {
        for (slot, index) in self.order.iter_mut().zip(0..) {
            *slot = index;
        }
        self.position = 0;
        self.revealed = false;
        self.known.clear();
    }
}
