//! The round state machine: one hand from deal through showdown.
//!
//! Grounded in `kuco23/pokerlib`'s `_round.py`. The generator-driven street
//! progression (`_turnGenerator`) is restated as the `advance_street`
//! method plus an explicit `Street` cursor; the inheritance layering of
//! `Round`/`RoundWithChoiceToShowCards` is replaced by the `MuckPolicy`
//! trait in `muck.rs`.
//!
//! Every public method takes the host's `EventQueues` explicitly rather
//! than owning one internally, so a `Table` can fold its own table-scope
//! events (e.g. `NEW_ROUND_STARTED`) into the very same FIFO the round
//! writes into, preserving one single total ordering per `public_in` call.

use log::debug;

use crate::card::{Card, Rank};
use crate::deck::Deck;
use crate::event::{EventQueues, PrivateEvent, PublicEvent, Street};
use crate::hand_evaluator::EvaluatedHand;
use crate::hand_group::HandGroup;
use crate::muck::MuckPolicy;
use crate::seats::PlayerGroup;

pub struct Round {
    pub id: u64,
    small_blind: u64,
    big_blind: u64,
    button: usize,
    current_index: usize,
    board: Vec<Card>,
    turn: Street,
    deck: Deck,
    players: PlayerGroup,
    wheel: bool,
    finished: bool,
    closed: bool,
    muck_optioned: Vec<u64>,
    last_aggressor_index: Option<usize>,
    muck_policy: Box<dyn MuckPolicy>,
}

impl Round {
    /// Deals hole cards, posts blinds, and requests the first action.
    /// `button` and all seat indices used internally are positions within
    /// `players`, not table seat indices — the round only ever sees the
    /// dense snapshot `Table::start_round` hands it.
    #[allow(clippy::too_many_arguments)]
    pub fn start(
        id: u64,
        small_blind: u64,
        big_blind: u64,
        button: usize,
        players: PlayerGroup,
        mut deck: Deck,
        wheel: bool,
        muck_policy: Box<dyn MuckPolicy>,
        events: &mut EventQueues,
    ) -> Round {
        for handle in players.iter() {
            let (player_id, cards) = {
                let mut player = handle.borrow_mut();
                player.reset_state();
                let cards = [deck.draw(), deck.draw()];
                player.hole_cards = Some(cards);
                (player.id, cards)
            };
            events.push_private(player_id, PrivateEvent::DealtCards { cards });
        }

        events.push_public(PublicEvent::NewRound);
        events.push_public(PublicEvent::NewTurn { turn: Street::Preflop, board: Vec::new() });

        let n = players.len();
        let (sb_idx, bb_idx) = if n >= 3 {
            ((button + n - 2) % n, (button + n - 1) % n)
        } else {
            ((button + n - 1) % n, button % n)
        };
        debug!("round {id} starting: {n} players, button at {button}, blinds {small_blind}/{big_blind}");

        let mut round = Round {
            id,
            small_blind,
            big_blind,
            button,
            current_index: bb_idx,
            board: Vec::new(),
            turn: Street::Preflop,
            deck,
            players,
            wheel,
            finished: false,
            closed: false,
            muck_optioned: Vec::new(),
            last_aggressor_index: None,
            muck_policy,
        };

        let (sb_paid, _) = round.contribute(sb_idx, round.small_blind);
        let sb_id = round.players.borrow(sb_idx).id;
        events.push_public(PublicEvent::SmallBlind { player_id: sb_id, paid_amount: sb_paid });

        let (bb_paid, _) = round.contribute(bb_idx, round.big_blind);
        let bb_id = round.players.borrow(bb_idx).id;
        events.push_public(PublicEvent::BigBlind { player_id: bb_id, paid_amount: bb_paid });

        round.move_to_next_player(events);
        round
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn turn(&self) -> Street {
        self.turn
    }

    pub fn board(&self) -> &[Card] {
        &self.board
    }

    pub fn players(&self) -> &PlayerGroup {
        &self.players
    }

    pub fn muck_optioned_player_ids(&self) -> &[u64] {
        &self.muck_optioned
    }

    pub fn current_player_id(&self) -> u64 {
        self.players.borrow(self.current_index).id
    }

    fn is_current(&self, player_id: u64) -> bool {
        self.current_player_id() == player_id
    }

    fn accepts_betting_input(&self, player_id: u64) -> bool {
        !self.finished && !self.closed && self.is_current(player_id)
    }

    // -- betting actions -----------------------------------------------

    pub fn fold(&mut self, player_id: u64, events: &mut EventQueues) {
        if !self.accepts_betting_input(player_id) {
            return;
        }
        let idx = self.current_index;
        self.players.borrow_mut(idx).is_folded = true;
        self.apply_action(idx, PublicEvent::PlayerFold { player_id }, events);
    }

    pub fn check(&mut self, player_id: u64, events: &mut EventQueues) {
        if !self.accepts_betting_input(player_id) {
            return;
        }
        let idx = self.current_index;
        if self.to_call(idx) != 0 {
            return;
        }
        self.apply_action(idx, PublicEvent::PlayerCheck { player_id }, events);
    }

    pub fn call(&mut self, player_id: u64, events: &mut EventQueues) {
        if !self.accepts_betting_input(player_id) {
            return;
        }
        let idx = self.current_index;
        let to_call = self.to_call(idx);
        let (paid, became_all_in) = self.contribute(idx, to_call);
        if became_all_in {
            let stake = self.players.borrow(idx).stake;
            events.push_public(PublicEvent::PlayerIsAllIn { player_id, all_in_stake: stake });
        }
        self.apply_action(idx, PublicEvent::PlayerCall { player_id, paid_amount: paid }, events);
    }

    pub fn raise_by(&mut self, player_id: u64, by: u64, events: &mut EventQueues) {
        if !self.accepts_betting_input(player_id) {
            return;
        }
        let idx = self.current_index;
        let to_call = self.to_call(idx);
        let stack = self.players.borrow(idx).money;
        if to_call >= stack {
            return;
        }
        let (paid, became_all_in) = self.contribute(idx, to_call + by);
        if became_all_in {
            let stake = self.players.borrow(idx).stake;
            events.push_public(PublicEvent::PlayerIsAllIn { player_id, all_in_stake: stake });
        }
        self.last_aggressor_index = Some(idx);
        self.apply_action(
            idx,
            PublicEvent::PlayerRaise { player_id, raised_by: by, paid_amount: paid },
            events,
        );
    }

    pub fn all_in(&mut self, player_id: u64, events: &mut EventQueues) {
        if !self.accepts_betting_input(player_id) {
            return;
        }
        let idx = self.current_index;
        let to_call = self.to_call(idx);
        let stack = self.players.borrow(idx).money;
        let (paid, _) = self.contribute(idx, stack);
        if paid > to_call {
            self.last_aggressor_index = Some(idx);
        }
        self.apply_action(idx, PublicEvent::PlayerWentAllIn { player_id, paid_amount: paid }, events);
    }

    pub fn show(&mut self, player_id: u64, events: &mut EventQueues) {
        self.resolve_muck_choice(player_id, true, events);
    }

    pub fn muck(&mut self, player_id: u64, events: &mut EventQueues) {
        self.resolve_muck_choice(player_id, false, events);
    }

    /// Force-folds a player who is *not* the current actor (the table calls
    /// this for a mid-round leave); the "after forced fold" flag in the
    /// post-action cascade means this never itself advances the turn.
    pub fn force_fold_non_current(&mut self, player_id: u64, events: &mut EventQueues) {
        if self.finished || self.closed {
            return;
        }
        if let Some(idx) = self.players.index_of(player_id) {
            self.players.borrow_mut(idx).is_folded = true;
            self.post_action_update(true, events);
        }
    }

    fn resolve_muck_choice(&mut self, player_id: u64, showed: bool, events: &mut EventQueues) {
        if !self.finished || self.closed {
            return;
        }
        let Some(pos) = self.muck_optioned.iter().position(|&id| id == player_id) else {
            return;
        };
        self.muck_optioned.remove(pos);
        if showed {
            if let Some(idx) = self.players.index_of(player_id) {
                self.reveal_player(idx, events);
            }
        } else {
            events.push_public(PublicEvent::PlayerMuckCards { player_id });
        }
        self.muck_policy.on_choice(player_id, showed);
        if self.muck_optioned.is_empty() {
            self.closed = true;
            events.push_public(PublicEvent::RoundClosed);
        }
    }

    fn apply_action(&mut self, idx: usize, event: PublicEvent, events: &mut EventQueues) {
        self.players.borrow_mut(idx).played_turn = true;
        events.push_public(event);
        self.post_action_update(false, events);
    }

    fn to_call(&self, idx: usize) -> u64 {
        let mine = self.players.borrow(idx).turn_stake[self.turn.index()];
        self.current_bet_level().saturating_sub(mine)
    }

    fn current_bet_level(&self) -> u64 {
        let street = self.turn.index();
        self.players
            .iter()
            .filter(|p| !p.borrow().is_folded)
            .map(|p| p.borrow().turn_stake[street])
            .max()
            .unwrap_or(0)
    }

    fn contribute(&mut self, idx: usize, amount: u64) -> (u64, bool) {
        let mut player = self.players.borrow_mut(idx);
        let paid = amount.min(player.money);
        let became_all_in = paid > 0 && paid == player.money && !player.is_all_in;
        player.money -= paid;
        player.stake += paid;
        let street = self.turn.index();
        player.turn_stake[street] += paid;
        if player.money == 0 {
            player.is_all_in = true;
        }
        (paid, became_all_in)
    }

    // -- post-action cascade --------------------------------------------

    fn pots_balanced(&self) -> bool {
        let street = self.turn.index();
        let active: Vec<u64> = self.players.active().iter().map(|p| p.borrow().turn_stake[street]).collect();
        let all_equal = active.windows(2).all(|w| w[0] == w[1]);
        let all_in_max = self
            .players
            .iter()
            .filter(|p| p.borrow().is_all_in)
            .map(|p| p.borrow().turn_stake[street])
            .max()
            .unwrap_or(0);
        let dominance = active.first().map_or(true, |&s| s >= all_in_max);
        all_equal && dominance
    }

    fn post_action_update(&mut self, forced_fold_update: bool, events: &mut EventQueues) {
        let n_unfolded = self.players.count_unfolded();
        let n_active = self.players.count_active();

        if n_unfolded == 0 {
            self.finished = true;
            self.closed = true;
            events.push_public(PublicEvent::RoundClosed);
            return;
        }

        if n_unfolded == 1 {
            self.deal_premature_winnings(events);
            self.finish(events);
            return;
        }

        if n_active <= 1 && self.pots_balanced() {
            self.run_out_remaining_streets(events);
            self.deal_winnings(events);
            self.finish(events);
            return;
        }

        if self.players.all_played_turn() && self.pots_balanced() {
            if self.turn == Street::River {
                self.deal_winnings(events);
                self.finish(events);
            } else {
                self.advance_street(events);
                self.current_index = self.button;
                self.move_to_next_player(events);
            }
            return;
        }

        if !forced_fold_update {
            self.move_to_next_player(events);
        }
    }

    fn move_to_next_player(&mut self, events: &mut EventQueues) {
        if let Some(next) = self.players.next_active_index(self.current_index) {
            self.current_index = next;
            let to_call = self.to_call(next);
            let player_id = self.players.borrow(next).id;
            events.push_public(PublicEvent::PlayerActionRequired { player_id, to_call });
        }
    }

    fn advance_street(&mut self, events: &mut EventQueues) {
        let Some(next) = self.turn.next() else { return };
        let drawn = self.deck.draw_n(next.cards_dealt());
        self.board.extend(drawn.iter().copied());
        for p in self.players.iter() {
            p.borrow_mut().played_turn = false;
        }
        self.turn = next;
        self.fold_board_into_hands(&drawn);
        events.push_public(PublicEvent::NewTurn { turn: next, board: self.board.clone() });
    }

    fn run_out_remaining_streets(&mut self, events: &mut EventQueues) {
        while self.turn != Street::River {
            self.advance_street(events);
        }
    }

    /// Feeds newly dealt board cards into each live player's hand evaluator,
    /// constructing it the first time enough cards (2 hole + the flop) are
    /// known — see `player.rs`'s note on deferred construction.
    fn fold_board_into_hands(&mut self, drawn: &[Card]) {
        for p in self.players.iter() {
            let mut player = p.borrow_mut();
            if player.is_folded {
                continue;
            }
            match player.hand.as_mut() {
                Some(hand) => hand.add_cards(drawn.iter().copied()),
                None => {
                    if let Some(hole) = player.hole_cards {
                        let mut cards = hole.to_vec();
                        cards.extend(drawn.iter().copied());
                        if cards.len() >= 5 {
                            if let Ok(hand) = crate::hand_evaluator::HandEvaluator::new(cards, self.wheel) {
                                player.hand = Some(hand);
                            }
                        }
                    }
                }
            }
        }
    }

    fn deal_premature_winnings(&mut self, events: &mut EventQueues) {
        let Some(idx) = self.players.iter().position(|p| !p.borrow().is_folded) else {
            return;
        };
        let total: u64 = self.players.iter().map(|p| p.borrow().stake).sum();
        for p in self.players.iter() {
            p.borrow_mut().stake = 0;
        }
        let player_id = {
            let mut winner = self.players.borrow_mut(idx);
            winner.money += total;
            winner.id
        };
        events.push_public(PublicEvent::DeclarePrematureWinner { player_id, money_won: total });

        if self.muck_policy.premature_winner_must_reveal() {
            self.reveal_player(idx, events);
        } else {
            self.muck_optioned.push(player_id);
            events.push_public(PublicEvent::PlayerChoiceRequired { player_id });
        }
    }

    /// The core side-pot algorithm: sub-pots are capped at each successive
    /// stake level, each awarded to whoever has the best hand among that
    /// sub-pot's competitors.
    fn deal_winnings(&mut self, events: &mut EventQueues) {
        let mut stake_sorted: Vec<_> = self.players.iter().filter(|p| p.borrow().is_all_in).cloned().collect();
        stake_sorted.sort_by_key(|p| p.borrow().stake);
        let mut active: Vec<_> = self.players.active();
        active.sort_by_key(|p| p.borrow().stake);
        stake_sorted.extend(active);

        let mut group_starts = Vec::new();
        if !stake_sorted.is_empty() {
            group_starts.push(0);
            for i in 1..stake_sorted.len() {
                if stake_sorted[i - 1].borrow().stake < stake_sorted[i].borrow().stake {
                    group_starts.push(i);
                }
            }
        }

        for &start in &group_starts {
            let subgame_stake = stake_sorted[start].borrow().stake;
            if subgame_stake == 0 {
                continue;
            }
            let contenders: Vec<_> = stake_sorted[start..].iter().filter(|p| !p.borrow().is_folded).cloned().collect();
            if contenders.is_empty() {
                continue;
            }
            let winners = self.hand_winners(&contenders);
            let nsplit = winners.len() as u64;
            if nsplit == 0 {
                continue;
            }

            let take_from: Vec<u64> = self
                .players
                .iter()
                .map(|p| {
                    let stake = p.borrow().stake;
                    if stake > 0 && stake <= subgame_stake {
                        stake / nsplit
                    } else if subgame_stake > 0 && subgame_stake <= stake {
                        subgame_stake / nsplit
                    } else {
                        0
                    }
                })
                .collect();

            for winner in &winners {
                let mut won = 0u64;
                for (p, &take) in self.players.iter().zip(take_from.iter()) {
                    if take == 0 {
                        continue;
                    }
                    p.borrow_mut().stake -= take;
                    won += take;
                }
                if won == 0 {
                    continue;
                }
                let (player_id, hand) = {
                    let mut w = winner.borrow_mut();
                    w.money += won;
                    (w.id, w.evaluated_hand().cloned())
                };
                if let Some(hand) = hand {
                    events.push_public(PublicEvent::DeclareFinishedWinner {
                        player_id,
                        money_won: won,
                        handname: hand.category,
                        hand: hand.full_hand(),
                    });
                }
            }
        }

        self.run_showdown(events);
    }

    fn hand_winners(&self, players: &[crate::seats::PlayerHandle]) -> Vec<crate::seats::PlayerHandle> {
        let mut best: Option<EvaluatedHand> = None;
        for p in players {
            let mut player = p.borrow_mut();
            if let Some(hand) = player.evaluated_hand() {
                if best.as_ref().map_or(true, |b| *hand > *b) {
                    best = Some(hand.clone());
                }
            }
        }
        let Some(best) = best else { return Vec::new() };
        players
            .iter()
            .filter(|p| {
                let mut player = p.borrow_mut();
                player.evaluated_hand().map_or(false, |h| *h == best)
            })
            .cloned()
            .collect()
    }

    /// Reveals hands in the prescribed order: starting from the last
    /// aggressor (or the first-to-act if the street saw no bets), walking
    /// clockwise, forcing visible any hand at least as strong as the best
    /// shown so far and offering everyone else a muck/show choice.
    fn run_showdown(&mut self, events: &mut EventQueues) {
        let n = self.players.len();
        if n == 0 {
            return;
        }
        let initiator = self
            .last_aggressor_index
            .unwrap_or_else(|| self.players.next_unfolded_index(self.button).unwrap_or(self.button));

        let mut current_best: Option<EvaluatedHand> = None;
        for k in 0..n {
            let idx = (initiator + k) % n;
            let (player_id, hand, cards, folded) = {
                let mut player = self.players.borrow_mut(idx);
                let folded = player.is_folded;
                let hand = if folded { None } else { player.evaluated_hand().cloned() };
                (player.id, hand, player.hole_cards, folded)
            };
            if folded {
                continue;
            }
            let Some(hand) = hand else { continue };

            let is_best_so_far = current_best.as_ref().map_or(true, |b| hand >= *b);
            if self.muck_policy.must_reveal(is_best_so_far) {
                let kicker = current_best
                    .as_ref()
                    .and_then(|best| HandGroup::new(vec![&hand, best]).group_kicker());
                if let Some(cards) = cards {
                    events.push_public(PublicEvent::PublicCardShow { player_id, cards, kicker });
                }
                current_best = Some(hand);
            } else {
                self.muck_optioned.push(player_id);
                events.push_public(PublicEvent::PlayerChoiceRequired { player_id });
            }
        }
    }

    fn reveal_player(&mut self, idx: usize, events: &mut EventQueues) {
        let (player_id, cards) = {
            let player = self.players.borrow(idx);
            (player.id, player.hole_cards)
        };
        if let Some(cards) = cards {
            events.push_public(PublicEvent::PlayerRevealCards { player_id, cards });
        }
    }

    fn finish(&mut self, events: &mut EventQueues) {
        if self.finished {
            return;
        }
        self.finished = true;
        events.push_public(PublicEvent::RoundFinished);
        if self.muck_optioned.is_empty() {
            self.closed = true;
            events.push_public(PublicEvent::RoundClosed);
        }
    }
}
