//! Per-hand player state, grounded in `kuco23/pokerlib`'s `_player.py`.

use crate::card::Card;
use crate::hand_evaluator::{EvaluatedHand, HandEvaluator};

/// A seated player's state for the current hand.
///
/// `hand` is `None` until the player has at least 5 known cards (two hole
/// cards plus the flop); see `SPEC_FULL.md`'s note on why construction of
/// the evaluator is deferred that far, matching `HandEvaluator::new`'s
/// 5-card minimum.
pub struct Player {
    pub table_id: u64,
    pub id: u64,
    pub name: String,
    pub money: u64,
    pub hole_cards: Option<[Card; 2]>,
    pub hand: Option<HandEvaluator>,
    pub is_folded: bool,
    pub is_all_in: bool,
    /// Total chips committed to the pot this hand.
    pub stake: u64,
    /// Chips committed on each of the four streets: preflop, flop, turn, river.
    pub turn_stake: [u64; 4],
    pub played_turn: bool,
}

impl Player {
    pub fn new(table_id: u64, id: u64, name: impl Into<String>, money: u64) -> Player {
        Player {
            table_id,
            id,
            name: name.into(),
            money,
            hole_cards: None,
            hand: None,
            is_folded: false,
            is_all_in: false,
            stake: 0,
            turn_stake: [0; 4],
            played_turn: false,
        }
    }

    /// `is_active ≡ ¬is_folded ∧ ¬is_all_in`.
    pub fn is_active(&self) -> bool {
        !self.is_folded && !self.is_all_in
    }

    /// Resets all per-hand state. Called by the round at deal time.
    pub fn reset_state(&mut self) {
        self.hole_cards = None;
        self.hand = None;
        self.is_folded = false;
        self.is_all_in = false;
        self.stake = 0;
        self.turn_stake = [0; 4];
        self.played_turn = false;
    }

    /// The player's best classified hand, if one has been computed.
    pub fn evaluated_hand(&mut self) -> Option<&EvaluatedHand> {
        self.hand.as_mut().map(|h| h.evaluate())
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Player {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_iff_not_folded_and_not_all_in() {
        let mut p = Player::new(1, 1, "a", 100);
        assert!(p.is_active());
        p.is_folded = true;
        assert!(!p.is_active());
        p.is_folded = false;
        p.is_all_in = true;
        assert!(!p.is_active());
    }

    #[test]
    fn reset_clears_hand_state() {
        let mut p = Player::new(1, 1, "a", 100);
        p.stake = 50;
        p.turn_stake = [10, 20, 0, 0];
        p.is_folded = true;
        p.reset_state();
        assert_eq!(p.stake, 0);
        assert_eq!(p.turn_stake, [0, 0, 0, 0]);
        assert!(!p.is_folded);
    }

    #[test]
    fn equality_is_by_id_only() {
        let a = Player::new(1, 5, "a", 100);
        let b = Player::new(1, 5, "b", 9999);
        assert_eq!(a, b);
    }
}
