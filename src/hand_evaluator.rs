//! Classifies a 5–7 card multiset into a ranked category plus an ordered
//! tiebreaker sequence.
//!
//! This ports the rank-histogram approach of `lookup_eval::evaluate_fast`/
//! `evaluate_non_flush` (scan counts high to low, first-match-wins category
//! cascade) from a packed `u32` score to real `Card`s, because `HandGroup`
//! and the showdown events need to report actual cards, not just a
//! comparable integer. The category decision cascade and straight/
//! straight-flush detection are grounded in `kuco23/pokerlib`'s
//! `_handparser.py::_setHand`/`getStraightIndexes`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::card::{Card, Rank, ALL_SUITS};
use crate::error::{EngineError, EngineResult};

/// Total order of hand categories, lowest first. Declaration order is the
/// ranking order: `derive(PartialOrd, Ord)` on a field-less enum compares by
/// variant index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

/// A fully classified hand: a category plus five cards (`hand_base` ++
/// `kickers`, truncated to 5) whose rank sequence determines the tiebreak
/// against any other `EvaluatedHand` of the same category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedHand {
    pub category: HandCategory,
    /// The category's characteristic cards, descending rank. Its length
    /// depends on the category (e.g. 4 for four-of-a-kind, 5 for a
    /// straight).
    pub hand_base: Vec<Card>,
    /// The highest remaining cards, descending rank, padding `hand_base`
    /// out to 5 cards total.
    pub kickers: Vec<Card>,
}

impl EvaluatedHand {
    /// The five cards that participate in comparison, in order.
    pub fn full_hand(&self) -> Vec<Card> {
        self.hand_base.iter().chain(self.kickers.iter()).copied().collect()
    }

    fn rank_sequence(&self) -> [Rank; 5] {
        let full = self.full_hand();
        debug_assert_eq!(full.len(), 5, "evaluated hand must carry exactly 5 comparison cards");
        let mut ranks = [Rank::Two; 5];
        for (i, card) in full.iter().enumerate() {
            ranks[i] = card.rank;
        }
        ranks
    }
}

impl PartialEq for EvaluatedHand {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category && self.rank_sequence() == other.rank_sequence()
    }
}
impl Eq for EvaluatedHand {}

impl PartialOrd for EvaluatedHand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for EvaluatedHand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.rank_sequence().cmp(&other.rank_sequence()))
    }
}

/// Incrementally classifies a growing multiset of cards.
///
/// `add_cards` is how a round folds flop/turn/river cards into an existing
/// preflop parse (mirroring `HandParser.addCards`): it invalidates the
/// cached classification rather than recomputing eagerly, so repeated
/// additions across a street don't pay for intermediate classifications
/// that are about to be superseded.
pub struct HandEvaluator {
    cards: Vec<Card>,
    wheel: bool,
    cached: Option<EvaluatedHand>,
}

impl HandEvaluator {
    /// Builds an evaluator from a multiset of at least 5 cards. Ace-low
    /// wheel straights (A-2-3-4-5) are not recognised by default; pass
    /// `wheel = true` to opt in.
    pub fn new(cards: Vec<Card>, wheel: bool) -> EngineResult<HandEvaluator> {
        if cards.len() < 5 {
            return Err(EngineError::NotEnoughCards(cards.len()));
        }
        Ok(HandEvaluator { cards, wheel, cached: None })
    }

    /// Appends more cards and invalidates the cached classification.
    pub fn add_cards<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.cards.extend(cards);
        self.cached = None;
    }

    /// Returns the classification, computing (and caching) it if needed.
    pub fn evaluate(&mut self) -> &EvaluatedHand {
        if self.cached.is_none() {
            self.cached = Some(classify(&self.cards, self.wheel));
        }
        self.cached.as_ref().unwrap()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

/// One-shot classification of a card multiset, without constructing a
/// `HandEvaluator`. Used by hosts building equity/odds tooling that doesn't
/// need incremental `add_cards` (see `SPEC_FULL.md`'s supplemented
/// `winning_probability`-style helper).
pub fn evaluate_cards(cards: &[Card], wheel: bool) -> EngineResult<EvaluatedHand> {
    if cards.len() < 5 {
        return Err(EngineError::NotEnoughCards(cards.len()));
    }
    Ok(classify(cards, wheel))
}

fn classify(cards: &[Card], wheel: bool) -> EvaluatedHand {
    let mut rank_counts = [0u8; 13];
    let mut suit_counts = [0u8; 4];
    for card in cards {
        rank_counts[card.rank.index()] += 1;
        suit_counts[card.suit.index()] += 1;
    }

    let flush_suit = ALL_SUITS.iter().find(|&&s| suit_counts[s.index()] >= 5).copied();

    let straight = straight_indices(&rank_counts, wheel);

    if let Some(suit) = flush_suit {
        let mut flush_rank_counts = [0u8; 13];
        for card in cards.iter().filter(|c| c.suit == suit) {
            flush_rank_counts[card.rank.index()] += 1;
        }
        if let Some(sf) = straight_indices(&flush_rank_counts, wheel) {
            let hand_base = sf
                .iter()
                .map(|&rank| representative(cards, rank, Some(suit)))
                .collect::<Vec<_>>();
            return finish(HandCategory::StraightFlush, hand_base, cards);
        }
    }

    let mut pair_counts = [0usize; 5]; // pair_counts[k] = number of ranks with count k
    for &count in &rank_counts {
        pair_counts[count as usize] += 1;
    }

    if pair_counts[4] >= 1 {
        let quad_rank = highest_rank_with_count(&rank_counts, 4).unwrap();
        let hand_base = dedup_same_rank(cards, quad_rank, 4);
        return finish(HandCategory::FourOfAKind, hand_base, cards);
    }

    if pair_counts[3] == 2 || (pair_counts[3] >= 1 && pair_counts[2] >= 1) {
        let trips_ranks = ranks_with_count(&rank_counts, 3);
        let trips_rank = *trips_ranks.iter().max().unwrap();
        let pair_rank = if trips_ranks.len() == 2 {
            *trips_ranks.iter().filter(|&&r| r != trips_rank).max().unwrap()
        } else {
            highest_rank_with_count(&rank_counts, 2).unwrap()
        };
        let mut hand_base = dedup_same_rank(cards, trips_rank, 3);
        hand_base.extend(dedup_same_rank(cards, pair_rank, 2));
        return finish(HandCategory::FullHouse, hand_base, cards);
    }

    if let Some(suit) = flush_suit {
        let mut flush_cards: Vec<Card> = cards.iter().filter(|c| c.suit == suit).copied().collect();
        flush_cards.sort_by(|a, b| b.rank.cmp(&a.rank));
        flush_cards.truncate(5);
        return finish(HandCategory::Flush, flush_cards, cards);
    }

    if let Some(straight_ranks) = straight {
        let hand_base = straight_ranks.iter().map(|&r| representative(cards, r, None)).collect();
        return finish(HandCategory::Straight, hand_base, cards);
    }

    if pair_counts[3] >= 1 {
        let trips_rank = highest_rank_with_count(&rank_counts, 3).unwrap();
        let hand_base = dedup_same_rank(cards, trips_rank, 3);
        return finish(HandCategory::ThreeOfAKind, hand_base, cards);
    }

    if pair_counts[2] >= 2 {
        let mut pair_ranks = ranks_with_count(&rank_counts, 2);
        pair_ranks.sort();
        pair_ranks.reverse();
        let mut hand_base = dedup_same_rank(cards, pair_ranks[0], 2);
        hand_base.extend(dedup_same_rank(cards, pair_ranks[1], 2));
        return finish(HandCategory::TwoPair, hand_base, cards);
    }

    if pair_counts[2] == 1 {
        let pair_rank = highest_rank_with_count(&rank_counts, 2).unwrap();
        let hand_base = dedup_same_rank(cards, pair_rank, 2);
        return finish(HandCategory::OnePair, hand_base, cards);
    }

    let high_rank = highest_rank_with_count(&rank_counts, 1).unwrap();
    let hand_base = vec![representative(cards, high_rank, None)];
    finish(HandCategory::HighCard, hand_base, cards)
}

/// Fills `kickers` with the highest remaining cards (descending rank,
/// excluding any rank already used in `hand_base`) until the combined
/// length reaches 5.
fn finish(category: HandCategory, hand_base: Vec<Card>, all_cards: &[Card]) -> EvaluatedHand {
    let mut used = [0u8; 13];
    for card in &hand_base {
        used[card.rank.index()] += 1;
    }

    let mut remaining: Vec<Card> = Vec::new();
    let mut by_rank = [0u8; 13];
    for card in all_cards {
        by_rank[card.rank.index()] += 1;
    }
    let mut sorted: Vec<Card> = all_cards.to_vec();
    sorted.sort_by(|a, b| b.rank.cmp(&a.rank));

    let mut taken = [0u8; 13];
    for card in sorted {
        let idx = card.rank.index();
        if taken[idx] < used[idx] {
            taken[idx] += 1;
            continue;
        }
        remaining.push(card);
    }

    let need = 5 - hand_base.len();
    let kickers = remaining.into_iter().take(need).collect();

    EvaluatedHand { category, hand_base, kickers }
}

/// Picks any `Card` of the given rank from `cards` (optionally restricted
/// to a suit, for straight-flush construction). Suit is irrelevant to
/// comparison, so any matching card is a valid representative.
fn representative(cards: &[Card], rank: Rank, suit: Option<crate::card::Suit>) -> Card {
    cards
        .iter()
        .find(|c| c.rank == rank && suit.map_or(true, |s| c.suit == s))
        .copied()
        .unwrap_or_else(|| panic!("no card of rank {:?} found", rank))
}

/// Returns up to `count` distinct cards of the given rank (for multi-card
/// hand-base groups like trips/pairs/quads, where suit doesn't matter but
/// we need `count` separate `Card` values to fill `hand_base`).
fn dedup_same_rank(cards: &[Card], rank: Rank, count: usize) -> Vec<Card> {
    cards.iter().filter(|c| c.rank == rank).take(count).copied().collect()
}

fn ranks_with_count(rank_counts: &[u8; 13], count: u8) -> Vec<Rank> {
    (0..13)
        .filter(|&i| rank_counts[i] == count)
        .map(|i| Rank::from_index(i).unwrap())
        .collect()
}

fn highest_rank_with_count(rank_counts: &[u8; 13], count: u8) -> Option<Rank> {
    (0..13).rev().find(|&i| rank_counts[i] == count).map(|i| Rank::from_index(i).unwrap())
}

/// Finds the highest straight (5 consecutive present ranks, high to low)
/// and returns its 5 ranks, highest first. No ace-low wraparound unless
/// `wheel` is set.
fn straight_indices(rank_counts: &[u8; 13], wheel: bool) -> Option<[Rank; 5]> {
    let mut run = 0;
    for r in (0..13).rev() {
        if rank_counts[r] > 0 {
            run += 1;
            if run >= 5 {
                let mut ranks = [Rank::Two; 5];
                for (k, slot) in ranks.iter_mut().enumerate() {
                    *slot = Rank::from_index(r + 4 - k).unwrap();
                }
                return Some(ranks);
            }
        } else {
            run = 0;
        }
    }

    if wheel {
        let wheel_ranks = [0usize, 1, 2, 3, 12]; // Two, Three, Four, Five, Ace
        if wheel_ranks.iter().all(|&r| rank_counts[r] > 0) {
            return Some([Rank::Five, Rank::Four, Rank::Three, Rank::Two, Rank::Ace]);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{parse_cards, Suit};

    fn eval(notation: &str) -> EvaluatedHand {
        let cards = parse_cards(notation).unwrap();
        classify(&cards, false)
    }

    #[test]
    fn high_card() {
        let hand = eval("3d4c6s8dTsJhQc");
        assert_eq!(hand.category, HandCategory::HighCard);
        assert_eq!(hand.hand_base[0].rank, Rank::Queen);
    }

    #[test]
    fn one_pair() {
        let hand = eval("3s3cTsJhQs4dAc");
        assert_eq!(hand.category, HandCategory::OnePair);
        assert_eq!(hand.hand_base[0].rank, Rank::Three);
        assert_eq!(hand.kickers[0].rank, Rank::Ace);
    }

    #[test]
    fn straight_no_wheel() {
        let hand = eval("5s5d6c7d8h9hQs");
        assert_eq!(hand.category, HandCategory::Straight);
        assert_eq!(hand.hand_base[0].rank, Rank::Nine);
        assert_eq!(hand.hand_base[4].rank, Rank::Five);
    }

    #[test]
    fn flush() {
        let hand = eval("4dQdTd8d8h6dAs");
        assert_eq!(hand.category, HandCategory::Flush);
        assert_eq!(hand.hand_base.len(), 5);
        assert_eq!(hand.hand_base[0].rank, Rank::Queen);
    }

    #[test]
    fn full_house_prefers_higher_trips() {
        let cards = parse_cards("AsAhAd2c2d3s3h").unwrap();
        let hand = classify(&cards, false);
        assert_eq!(hand.category, HandCategory::FullHouse);
        assert_eq!(hand.hand_base[0].rank, Rank::Ace);
        assert_eq!(hand.hand_base[3].rank, Rank::Three);
    }

    #[test]
    fn full_house_two_trips_lower_becomes_pair() {
        // AAA + KKK + 2 -> full house AAA over KK, not KKK over AA.
        let cards = parse_cards("AsAhAdKsKhKd2c").unwrap();
        let hand = classify(&cards, false);
        assert_eq!(hand.category, HandCategory::FullHouse);
        assert_eq!(hand.hand_base[0].rank, Rank::Ace);
        assert_eq!(hand.hand_base[2].rank, Rank::Ace);
        assert_eq!(hand.hand_base[3].rank, Rank::King);
        assert_eq!(hand.hand_base[4].rank, Rank::King);
    }

    #[test]
    fn four_of_a_kind_kicker() {
        let cards = parse_cards("6s6h6d6cQhQcAs").unwrap();
        let hand = classify(&cards, false);
        assert_eq!(hand.category, HandCategory::FourOfAKind);
        assert_eq!(hand.hand_base.len(), 4);
        assert_eq!(hand.kickers[0].rank, Rank::Ace);
    }

    #[test]
    fn straight_flush_beats_flush_and_straight() {
        let cards = parse_cards("8s9sTsJsQs2h3d").unwrap();
        let hand = classify(&cards, false);
        assert_eq!(hand.category, HandCategory::StraightFlush);
        assert_eq!(hand.hand_base[0].rank, Rank::Queen);
    }

    #[test]
    fn wheel_not_recognised_by_default() {
        let cards = parse_cards("AsKs2h3d4c5h9c").unwrap();
        let hand = classify(&cards, false);
        assert_ne!(hand.category, HandCategory::Straight);
    }

    #[test]
    fn wheel_recognised_when_enabled() {
        let cards_wheel: Vec<Card> = parse_cards("As2h3d4c5h9c7d").unwrap();
        let hand = classify(&cards_wheel, true);
        assert_eq!(hand.category, HandCategory::Straight);
        assert_eq!(hand.hand_base[0].rank, Rank::Five);
    }

    #[test]
    fn add_cards_matches_combined_construction() {
        let combined = classify(&parse_cards("AsAhKdKc2h9s3d").unwrap(), false);

        let mut incremental = HandEvaluator::new(parse_cards("AsAhKdKc2h").unwrap(), false).unwrap();
        incremental.add_cards(parse_cards("9s3d").unwrap());
        assert_eq!(incremental.evaluate(), &combined);
    }

    #[test]
    fn construction_rejects_fewer_than_five_cards() {
        assert!(HandEvaluator::new(parse_cards("AsAh").unwrap(), false).is_err());
    }

    #[test]
    fn ordering_is_total_by_category() {
        let royal = eval("AsKsQsJsTs2h3d");
        let pair = eval("2s2d4c6h8sTcJh");
        assert!(royal > pair);
    }

    #[test]
    fn adding_cards_never_weakens() {
        let pair_only = parse_cards("AsAh2c4d6s").unwrap();
        let with_extra = parse_cards("AsAh2c4d6s9hKd").unwrap();
        let base = classify(&pair_only, false);
        let extended = classify(&with_extra, false);
        assert!(extended >= base);
    }

    #[test]
    fn permutation_invariance() {
        let mut cards = parse_cards("AsKdQhJcTs2d3h").unwrap();
        let a = classify(&cards, false);
        cards.reverse();
        let b = classify(&cards, false);
        assert_eq!(a, b);
    }
}
