//! Compares a set of evaluated hands and computes the "group kicker" — the
//! specific card that distinguished the winner from the runner-up.
//!
//! Grounded in `kuco23/pokerlib`'s `HandParserGroup.getGroupKickers`. The
//! source shipped two subtly different versions of this method across its
//! revisions; this follows the canonical one: compare the winner only
//! against the single strongest hand among the rest ("`mlos = max(los)`"
//! in the original), not against every loser in turn.

use crate::card::{Card, Rank};
use crate::hand_evaluator::{EvaluatedHand, HandCategory};

/// A non-empty set of evaluated hands, with group-kicker support.
pub struct HandGroup<'a> {
    hands: Vec<&'a EvaluatedHand>,
}

impl<'a> HandGroup<'a> {
    pub fn new(hands: Vec<&'a EvaluatedHand>) -> HandGroup<'a> {
        debug_assert!(!hands.is_empty(), "HandGroup requires at least one hand");
        HandGroup { hands }
    }

    /// All hands tied for the maximum.
    pub fn winners(&self) -> Vec<&'a EvaluatedHand> {
        let best = self.hands.iter().max().copied();
        match best {
            Some(best) => self.hands.iter().filter(|h| *h == best).copied().collect(),
            None => Vec::new(),
        }
    }

    /// The group kicker: the rank of the highest card that differentiated
    /// the winner from the strongest same-category loser.
    ///
    /// Returns `None` if there is no unique winner, no loser of the same
    /// category, or the winning category isn't kicker-bearing under the
    /// category-specific comparison rule below (matching the original's
    /// blanket `None` for `Straight`/`StraightFlush`, whose ranking is
    /// positional rather than kicker-by-kicker). For `Flush`, a kicker is
    /// only reported once the top flush card matches between winner and
    /// runner-up — two flushes with different top cards report no kicker
    /// at all, per the original's `w_base[0] == ml_base[0]` gate.
    pub fn group_kicker(&self) -> Option<Rank> {
        let winner = self.hands.iter().max().copied()?;
        let losers: Vec<&EvaluatedHand> = self.hands.iter().filter(|h| **h < winner).copied().collect();
        if losers.is_empty() {
            return None;
        }

        let runner_up = losers.into_iter().max()?;
        if winner.category != runner_up.category {
            return None;
        }

        match winner.category {
            HandCategory::Straight | HandCategory::StraightFlush => None,
            HandCategory::Flush => {
                if winner.hand_base[0].rank != runner_up.hand_base[0].rank {
                    None
                } else {
                    compare_sequences(winner.hand_base.iter(), runner_up.hand_base.iter())
                }
            }
            _ => {
                if winner.hand_base.iter().map(|c| c.rank).eq(runner_up.hand_base.iter().map(|c| c.rank)) {
                    compare_sequences(winner.kickers.iter(), runner_up.kickers.iter())
                } else {
                    None
                }
            }
        }
    }
}

/// Walks two rank sequences in lockstep; the first index where they differ
/// is the group kicker.
fn compare_sequences<'a, I: Iterator<Item = &'a Card>>(winner: I, runner_up: I) -> Option<Rank> {
    for (w, l) in winner.zip(runner_up) {
        if w.rank != l.rank {
            return if w.rank > l.rank { Some(w.rank) } else { None };
        }
    }
    None
}
