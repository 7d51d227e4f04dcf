//! Inputs the host sends and events the engine emits, per the callback
//! pattern of `kuco23/pokerlib`'s `publicOut`/`privateOut` hooks: rather than
//! virtual methods to override, a `Table`/`Round` pushes tagged event values
//! into FIFO queues that the host drains after every call.

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::hand_evaluator::HandCategory;

/// One of the four betting streets, plus the terminal marker the street
/// cursor advances past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    /// The street following this one, or `None` past the river.
    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    /// Number of new community cards dealt on entering this street.
    pub fn cards_dealt(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 1,
            Street::Turn => 2,
            Street::River => 3,
        }
    }
}

/// A public input dispatched via `Table::public_in(player_id, action)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    StartRound { round_id: u64 },
    BuyIn { name: String, money: u64, seat_index: Option<usize> },
    LeaveTable,
    Fold,
    Check,
    Call,
    Raise { raise_by: u64 },
    AllIn,
    Show,
    Muck,
}

/// Events visible to every observer at the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PublicEvent {
    // Table-scope
    PlayerJoined { player_id: u64, seat: usize },
    PlayerRemoved { player_id: u64 },
    NewRoundStarted { round_id: u64 },
    RoundNotInitialized,
    RoundInProgress,
    IncorrectNumberOfPlayers,

    // Round-scope
    NewRound,
    NewTurn { turn: Street, board: Vec<Card> },
    SmallBlind { player_id: u64, paid_amount: u64 },
    BigBlind { player_id: u64, paid_amount: u64 },
    PlayerCheck { player_id: u64 },
    PlayerFold { player_id: u64 },
    PlayerCall { player_id: u64, paid_amount: u64 },
    PlayerRaise { player_id: u64, raised_by: u64, paid_amount: u64 },
    PlayerWentAllIn { player_id: u64, paid_amount: u64 },
    PlayerIsAllIn { player_id: u64, all_in_stake: u64 },
    PlayerActionRequired { player_id: u64, to_call: u64 },
    PublicCardShow { player_id: u64, cards: [Card; 2], kicker: Option<crate::card::Rank> },
    DeclarePrematureWinner { player_id: u64, money_won: u64 },
    DeclareFinishedWinner { player_id: u64, money_won: u64, handname: HandCategory, hand: Vec<Card> },
    PlayerChoiceRequired { player_id: u64 },
    PlayerRevealCards { player_id: u64, cards: [Card; 2] },
    PlayerMuckCards { player_id: u64 },
    RoundFinished,
    RoundClosed,
}

/// Events visible only to the referenced player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrivateEvent {
    DealtCards { cards: [Card; 2] },
    BuyinTooLow { table_id: u64 },
    TableFull { table_id: u64 },
    PlayerAlreadyAtTable { table_id: u64 },
}

/// A per-player-addressed private event, paired with its recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct PrivateMessage {
    pub player_id: u64,
    pub event: PrivateEvent,
}

/// The FIFO queues a `Round`/`Table` appends events to during one call, and
/// the host drains afterwards. Events from a single `public_in` are
/// delivered in generation order, and a Round's events precede Table-level
/// events emitted after it returns.
#[derive(Debug, Default)]
pub struct EventQueues {
    public: Vec<PublicEvent>,
    private: Vec<PrivateMessage>,
}

impl EventQueues {
    pub fn new() -> EventQueues {
        EventQueues::default()
    }

    pub fn push_public(&mut self, event: PublicEvent) {
        self.public.push(event);
    }

    pub fn push_private(&mut self, player_id: u64, event: PrivateEvent) {
        self.private.push(PrivateMessage { player_id, event });
    }

    pub fn is_empty(&self) -> bool {
        self.public.is_empty() && self.private.is_empty()
    }

    /// Drains both queues in FIFO order via the host's sink callbacks.
    pub fn drain_into(&mut self, sink: &mut dyn EventSink) {
        for event in self.public.drain(..) {
            sink.public_out(event);
        }
        for message in self.private.drain(..) {
            sink.private_out(message.player_id, message.event);
        }
    }
}

/// The host-supplied sink for drained events, replacing the source's
/// overridable `publicOut`/`privateOut` methods with an injected trait
/// object.
pub trait EventSink {
    fn public_out(&mut self, event: PublicEvent);
    fn private_out(&mut self, player_id: u64, event: PrivateEvent);
}

/// A sink that simply records everything it receives, useful for tests and
/// simple hosts that poll after each call instead of reacting live.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub public: Vec<PublicEvent>,
    pub private: Vec<PrivateMessage>,
}

impl EventSink for RecordingSink {
    fn public_out(&mut self, event: PublicEvent) {
        self.public.push(event);
    }

    fn private_out(&mut self, player_id: u64, event: PrivateEvent) {
        self.private.push(PrivateMessage { player_id, event });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn street_progression_stops_at_river() {
        assert_eq!(Street::Preflop.next(), Some(Street::Flop));
        assert_eq!(Street::Flop.next(), Some(Street::Turn));
        assert_eq!(Street::Turn.next(), Some(Street::River));
        assert_eq!(Street::River.next(), None);
    }

    #[test]
    fn cards_dealt_matches_board_construction() {
        assert_eq!(Street::Preflop.cards_dealt(), 0);
        assert_eq!(Street::Flop.cards_dealt(), 3);
        assert_eq!(Street::Turn.cards_dealt(), 1);
        assert_eq!(Street::River.cards_dealt(), 1);
    }

    #[test]
    fn queues_drain_in_fifo_order_and_then_empty() {
        let mut queues = EventQueues::new();
        queues.push_public(PublicEvent::NewRound);
        queues.push_private(1, PrivateEvent::DealtCards { cards: [crate::card::parse_card("As").unwrap(), crate::card::parse_card("Kd").unwrap()] });
        queues.push_public(PublicEvent::RoundFinished);

        let mut sink = RecordingSink::default();
        queues.drain_into(&mut sink);

        assert_eq!(sink.public, vec![PublicEvent::NewRound, PublicEvent::RoundFinished]);
        assert_eq!(sink.private.len(), 1);
        assert!(queues.is_empty());
    }
}
