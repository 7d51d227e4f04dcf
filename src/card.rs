//! Cards, ranks and suits. `Rank` orders `Two < Three < ... < Ace`; there is
//! no ace-low rank and none of the comparisons here recognise the wheel
//! straight (see [`crate::hand_evaluator`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// One of the thirteen ranks, `Two` (0) through `Ace` (12). Ace is always
/// high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Two = 0,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

impl Rank {
    /// Index in `0..13`, matching the declaration order above.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Rank> {
        ALL_RANKS.get(index).copied()
    }

    fn from_char(c: char) -> Option<Rank> {
        Some(match c.to_ascii_uppercase() {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return None,
        })
    }

    fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// One of the four suits. Declaration order only matters for breaking ties
/// when more than one suit has flush-length count (see
/// [`crate::hand_evaluator`]); it carries no ranking of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Spade = 0,
    Club,
    Diamond,
    Heart,
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Spade, Suit::Club, Suit::Diamond, Suit::Heart];

impl Suit {
    pub fn index(self) -> usize {
        self as usize
    }

    fn from_char(c: char) -> Option<Suit> {
        Some(match c.to_ascii_lowercase() {
            's' => Suit::Spade,
            'c' => Suit::Club,
            'd' => Suit::Diamond,
            'h' => Suit::Heart,
            _ => return None,
        })
    }

    fn to_char(self) -> char {
        match self {
            Suit::Spade => 's',
            Suit::Club => 'c',
            Suit::Diamond => 'd',
            Suit::Heart => 'h',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// An ordered pair `(Rank, Suit)`. `Card` orders by rank only — two cards of
/// the same rank and different suit are equal under `Ord`/`Eq`, which is
/// exactly what hand comparison needs (suits never break a tie in Hold'em).
#[derive(Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
    }
}
impl Eq for Card {}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Parses two-character notation such as `"As"` or `"Td"`.
pub fn parse_card(notation: &str) -> EngineResult<Card> {
    let chars: Vec<char> = notation.chars().collect();
    if chars.len() != 2 {
        return Err(EngineError::ParseCard(notation.to_string()));
    }
    let rank = Rank::from_char(chars[0]).ok_or_else(|| EngineError::ParseCard(notation.to_string()))?;
    let suit = Suit::from_char(chars[1]).ok_or_else(|| EngineError::ParseCard(notation.to_string()))?;
    Ok(Card::new(rank, suit))
}

/// Parses a run of concatenated two-character cards, e.g. `"AsKdTh"`.
pub fn parse_cards(notation: &str) -> EngineResult<Vec<Card>> {
    let chars: Vec<char> = notation.chars().collect();
    if chars.len() % 2 != 0 {
        return Err(EngineError::ParseBoard(notation.to_string()));
    }
    chars
        .chunks(2)
        .map(|pair| parse_card(&pair.iter().collect::<String>()).map_err(|_| EngineError::ParseBoard(notation.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        for &rank in &ALL_RANKS {
            for &suit in &ALL_SUITS {
                let card = Card::new(rank, suit);
                let reparsed = parse_card(&card.to_string()).unwrap();
                assert_eq!(reparsed.rank, rank);
                assert_eq!(reparsed.suit, suit);
            }
        }
    }

    #[test]
    fn ace_is_high() {
        assert!(Rank::Ace > Rank::King);
        assert!(Rank::Two < Rank::Three);
    }

    #[test]
    fn card_equality_ignores_suit() {
        assert_eq!(Card::new(Rank::Ace, Suit::Spade), Card::new(Rank::Ace, Suit::Heart));
        assert_ne!(Card::new(Rank::Ace, Suit::Spade), Card::new(Rank::King, Suit::Spade));
    }

    #[test]
    fn parse_cards_splits_pairs() {
        let cards = parse_cards("AsKdTh").unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[1].rank, Rank::King);
        assert_eq!(cards[1].suit, Suit::Diamond);
    }

    #[test]
    fn rejects_malformed_notation() {
        assert!(parse_card("A").is_err());
        assert!(parse_card("Zx").is_err());
        assert!(parse_cards("AsK").is_err());
    }
}
