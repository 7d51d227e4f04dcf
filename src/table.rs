//! Owns seats, validates buy-ins, rotates the button, and routes inputs to
//! the active round, per `kuco23/pokerlib`'s `_table.py::Table`. Where the
//! source schedules seat changes to apply at the next round boundary via
//! `__iadd__`/`__isub__`, `add_player`/`remove_player` here apply
//! immediately, with only the round's own force-fold bookkeeping deferred
//! to the active `Round`.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;

use crate::config::TableConfig;
use crate::deck::Deck;
use crate::error::EngineResult;
use crate::event::{Action, EventQueues, PrivateEvent, PublicEvent};
use crate::muck::{MuckPolicy, StandardMuckPolicy};
use crate::player::Player;
use crate::round::Round;
use crate::seats::PlayerSeats;

pub struct Table {
    pub id: u64,
    config: TableConfig,
    seats: PlayerSeats,
    button: usize,
    round: Option<Round>,
    wheel: bool,
}

impl Table {
    pub fn new(id: u64, config: TableConfig) -> EngineResult<Table> {
        config.validate()?;
        let seats = PlayerSeats::new(config.num_seats);
        Ok(Table { id, config, seats, button: 0, round: None, wheel: false })
    }

    /// Opts this table's rounds into ace-low wheel straights; off by
    /// default.
    pub fn with_wheel(mut self, wheel: bool) -> Table {
        self.wheel = wheel;
        self
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn seats(&self) -> &PlayerSeats {
        &self.seats
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    fn round_in_progress(&self) -> bool {
        self.round.as_ref().map_or(false, |r| !r.closed())
    }

    /// Dispatches one input by action kind, appending resulting events to
    /// the host's queue, and finally evicts broke players.
    pub fn public_in(&mut self, player_id: u64, action: Action, events: &mut EventQueues) {
        match action {
            Action::StartRound { round_id } => self.start_round(round_id, events),
            Action::BuyIn { name, money, seat_index } => {
                self.add_player(player_id, name, money, seat_index, events)
            }
            Action::LeaveTable => self.remove_player(player_id, events),
            Action::Fold => self.dispatch_round_action(events, |round, events| round.fold(player_id, events)),
            Action::Check => self.dispatch_round_action(events, |round, events| round.check(player_id, events)),
            Action::Call => self.dispatch_round_action(events, |round, events| round.call(player_id, events)),
            Action::Raise { raise_by } => {
                self.dispatch_round_action(events, |round, events| round.raise_by(player_id, raise_by, events))
            }
            Action::AllIn => self.dispatch_round_action(events, |round, events| round.all_in(player_id, events)),
            Action::Show => self.dispatch_round_action(events, |round, events| round.show(player_id, events)),
            Action::Muck => self.dispatch_round_action(events, |round, events| round.muck(player_id, events)),
        }
        self.seats.evict_broke();
    }

    fn dispatch_round_action(&mut self, events: &mut EventQueues, f: impl FnOnce(&mut Round, &mut EventQueues)) {
        match self.round.as_mut() {
            Some(round) if !round.closed() => f(round, events),
            _ => events.push_public(PublicEvent::RoundNotInitialized),
        }
    }

    pub fn add_player(
        &mut self,
        player_id: u64,
        name: impl Into<String>,
        money: u64,
        seat_index: Option<usize>,
        events: &mut EventQueues,
    ) {
        if self.seats.player_by_id(player_id).is_some() {
            events.push_private(player_id, PrivateEvent::PlayerAlreadyAtTable { table_id: self.id });
            return;
        }
        if money < self.config.min_buyin || money > self.config.max_buyin {
            events.push_private(player_id, PrivateEvent::BuyinTooLow { table_id: self.id });
            return;
        }

        let handle = Rc::new(RefCell::new(Player::new(self.id, player_id, name, money)));
        let seated = match seat_index {
            Some(idx) => self.seats.seat_player_at(handle, idx).then_some(idx),
            None => self.seats.seat_player(handle),
        };
        match seated {
            Some(seat) => events.push_public(PublicEvent::PlayerJoined { player_id, seat }),
            None => events.push_private(player_id, PrivateEvent::TableFull { table_id: self.id }),
        }
    }

    /// Removes a seated player. If they're mid-round, their hand is
    /// force-folded first: through the normal action path if they're the
    /// current actor (so `PLAYER_FOLD` precedes `PLAYER_REMOVED`), otherwise
    /// via the round's forced-fold path.
    pub fn remove_player(&mut self, player_id: u64, events: &mut EventQueues) {
        if self.seats.player_by_id(player_id).is_none() {
            return;
        }
        if let Some(round) = self.round.as_mut() {
            if !round.closed() {
                if round.current_player_id() == player_id {
                    round.fold(player_id, events);
                } else if round.players().player_by_id(player_id).is_some() {
                    round.force_fold_non_current(player_id, events);
                }
            }
        }
        self.seats.remove_by_id(player_id);
        events.push_public(PublicEvent::PlayerRemoved { player_id });
    }

    /// Preconditions: no round in progress, at least 2 non-broke players.
    pub fn start_round(&mut self, round_id: u64, events: &mut EventQueues) {
        if self.round_in_progress() {
            events.push_public(PublicEvent::RoundInProgress);
            return;
        }

        self.seats.evict_broke();
        if self.seats.num_filled() < 2 {
            events.push_public(PublicEvent::IncorrectNumberOfPlayers);
            return;
        }

        self.button = match self.seats.next_occupied_index(self.button) {
            Some(idx) => idx,
            None => {
                warn!("table {}: no occupied seat found past {}, leaving button in place", self.id, self.button);
                self.button
            }
        };
        let button_player_id = self.seats.slots()[self.button].as_ref().expect("button seat occupied").borrow().id;

        let group = self.seats.player_group();
        let button_index = group.index_of(button_player_id).unwrap_or(0);

        events.push_public(PublicEvent::NewRoundStarted { round_id });

        let policy: Box<dyn MuckPolicy> = Box::new(StandardMuckPolicy);
        let round = Round::start(
            round_id,
            self.config.small_blind,
            self.config.big_blind,
            button_index,
            group,
            Deck::new(),
            self.wheel,
            policy,
            events,
        );
        self.round = Some(round);
    }
}
