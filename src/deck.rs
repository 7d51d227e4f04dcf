//! Produces a uniformly random permutation of the 52-card deck and hands
//! cards out in order, mirroring `_round.py`'s `_deckIterator` (which calls
//! `random.sample` on the full 52-card deck and consumes it lazily). Rust's
//! `rand::seq::SliceRandom::shuffle` is the equivalent Fisher–Yates pass.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::card::{Card, ALL_RANKS, ALL_SUITS};

/// A shuffled 52-card deck, dispensed one card at a time.
///
/// The RNG is pluggable through `Deck::with_rng` so tests (and
/// deterministic replays) can supply a seeded `rand::rngs::StdRng`; the
/// convenience constructor `Deck::new` uses the thread-local RNG.
pub struct Deck {
    cards: Vec<Card>,
    next: usize,
}

impl Deck {
    /// A fresh, shuffled 52-card deck using the thread-local RNG.
    pub fn new() -> Deck {
        Deck::with_rng(&mut rand::thread_rng())
    }

    /// A fresh, shuffled 52-card deck using the given RNG.
    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R) -> Deck {
        let mut cards = Vec::with_capacity(52);
        for &suit in &ALL_SUITS {
            for &rank in &ALL_RANKS {
                cards.push(Card::new(rank, suit));
            }
        }
        cards.shuffle(rng);
        Deck { cards, next: 0 }
    }

    /// Draws the next card. Panics if the deck is exhausted — a round only
    /// ever draws `2 * n_players + 5` cards from a fresh 52-card deck, so
    /// exhaustion would mean more players than the deck can support, a
    /// programmer error caught earlier by `Table`/`Round` construction.
    pub fn draw(&mut self) -> Card {
        let card = self.cards[self.next];
        self.next += 1;
        card
    }

    /// Draws `n` cards at once, in order.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).map(|_| self.draw()).collect()
    }

    /// Number of cards left to deal.
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.next
    }
}

impl Default for Deck {
    fn default() -> Deck {
        Deck::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn deck_has_52_unique_cards() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = Deck::with_rng(&mut rng);
        assert_eq!(deck.cards.len(), 52);
        let unique: HashSet<(usize, usize)> = deck
            .cards
            .iter()
            .map(|c| (c.rank.index(), c.suit.index()))
            .collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn draw_consumes_in_order_without_repeats() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut deck = Deck::with_rng(&mut rng);
        let mut seen = HashSet::new();
        for _ in 0..52 {
            let card = deck.draw();
            assert!(seen.insert((card.rank.index(), card.suit.index())), "duplicate draw");
        }
        assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn different_seeds_different_order() {
        let mut rng_a = StdRng::seed_from_u64(1);
        let mut rng_b = StdRng::seed_from_u64(2);
        let a = Deck::with_rng(&mut rng_a).draw_n(10);
        let b = Deck::with_rng(&mut rng_b).draw_n(10);
        assert_ne!(
            a.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            b.iter().map(|c| c.to_string()).collect::<Vec<_>>()
        );
    }
}
