//! Seating and dense player-group views.
//!
//! `PlayerSeats` is the fixed-capacity, sparsely-occupied seat vector a
//! `Table` owns; `PlayerGroup` is the dense, in-seat-order view a `Round`
//! iterates over, with the circular "next/previous active/unfolded"
//! traversal betting needs. Both are grounded in `kuco23/pokerlib`'s
//! `_player.py::PlayerSeats`/`PlayerGroup`.
//!
//! A seated `Player` is shared, via `Rc<RefCell<_>>`, between the `Table`'s
//! seat vector and any `Round`'s `PlayerGroup` snapshot of it — the same
//! aliasing the Python source gets for free by passing the same list of
//! objects into both places. This is what lets `Table::remove_player`
//! force-fold a player the round is mid-hand with by mutating the one
//! shared `Player`, without the `Round` and `Table` needing to hand state
//! back and forth at the end of the hand.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::player::Player;

pub type PlayerHandle = Rc<RefCell<Player>>;

/// A fixed-length vector of occupied/free seats.
pub struct PlayerSeats {
    seats: Vec<Option<PlayerHandle>>,
}

impl PlayerSeats {
    pub fn new(num_seats: usize) -> PlayerSeats {
        PlayerSeats { seats: vec![None; num_seats] }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn seat_free(&self, index: usize) -> bool {
        index < self.seats.len() && self.seats[index].is_none()
    }

    /// Seats a player at `index`, returning `false` if the seat is taken or
    /// out of range.
    pub fn seat_player_at(&mut self, player: PlayerHandle, index: usize) -> bool {
        if self.seat_free(index) {
            self.seats[index] = Some(player);
            true
        } else {
            false
        }
    }

    /// Seats a player at the first free seat, returning its index.
    pub fn seat_player(&mut self, player: PlayerHandle) -> Option<usize> {
        let index = self.seats.iter().position(Option::is_none)?;
        self.seats[index] = Some(player);
        Some(index)
    }

    pub fn remove_by_id(&mut self, id: u64) {
        for seat in self.seats.iter_mut() {
            let matches = seat.as_ref().map_or(false, |p| p.borrow().id == id);
            if matches {
                *seat = None;
            }
        }
    }

    pub fn num_filled(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    /// Iterates occupied seats only, in seat order.
    pub fn occupied(&self) -> impl Iterator<Item = &PlayerHandle> {
        self.seats.iter().filter_map(|s| s.as_ref())
    }

    /// Iterates all slots, including empty ones, for UI rendering.
    pub fn slots(&self) -> &[Option<PlayerHandle>] {
        &self.seats
    }

    pub fn player_by_id(&self, id: u64) -> Option<&PlayerHandle> {
        self.occupied().find(|p| p.borrow().id == id)
    }

    pub fn seat_index_of(&self, id: u64) -> Option<usize> {
        self.seats.iter().position(|s| s.as_ref().map_or(false, |p| p.borrow().id == id))
    }

    /// Players with chips left, or with a live stake still worth tracking
    /// through to showdown, per `_table.py`'s `getNotBrokePlayers`/
    /// `__bool__` pattern: "stack == 0 and (stake == 0 or folded)" is
    /// broke, so this is its negation.
    pub fn not_broke(&self) -> Vec<PlayerHandle> {
        self.occupied()
            .filter(|p| {
                let p = p.borrow();
                p.money > 0 || (p.stake > 0 && !p.is_folded)
            })
            .cloned()
            .collect()
    }

    /// Removes every seated player with zero stack and either zero stake or
    /// a folded hand (a folded all-in loser has nothing further to
    /// contribute to the round they were evicted from).
    pub fn evict_broke(&mut self) {
        for seat in self.seats.iter_mut() {
            let broke = seat.as_ref().map_or(false, |p| {
                let p = p.borrow();
                p.money == 0 && (p.stake == 0 || p.is_folded)
            });
            if broke {
                *seat = None;
            }
        }
    }

    /// Snapshots the currently occupied seats, in seat order, into a
    /// `PlayerGroup` for a new `Round`.
    pub fn player_group(&self) -> PlayerGroup {
        PlayerGroup::new(self.occupied().cloned().collect())
    }

    /// The seat index immediately after `from` (inclusive wraparound) that
    /// holds a player, used to advance the button to the next occupied
    /// seat.
    pub fn next_occupied_index(&self, from: usize) -> Option<usize> {
        let n = self.seats.len();
        if n == 0 {
            return None;
        }
        (1..=n).map(|k| (from + k) % n).find(|&i| self.seats[i].is_some())
    }
}

/// A dense, in-seat-order view of the players active in the current round.
pub struct PlayerGroup {
    players: Vec<PlayerHandle>,
}

impl PlayerGroup {
    pub fn new(players: Vec<PlayerHandle>) -> PlayerGroup {
        PlayerGroup { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Indexes with Python-style modulo wraparound, matching
    /// `PlayerGroup.__getitem__`.
    pub fn get(&self, index: usize) -> &PlayerHandle {
        &self.players[index % self.players.len()]
    }

    pub fn borrow(&self, index: usize) -> Ref<'_, Player> {
        self.get(index).borrow()
    }

    pub fn borrow_mut(&self, index: usize) -> RefMut<'_, Player> {
        self.get(index).borrow_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerHandle> {
        self.players.iter()
    }

    pub fn player_by_id(&self, id: u64) -> Option<&PlayerHandle> {
        self.players.iter().find(|p| p.borrow().id == id)
    }

    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.players.iter().position(|p| p.borrow().id == id)
    }

    pub fn count_active(&self) -> usize {
        self.players.iter().filter(|p| p.borrow().is_active()).count()
    }

    pub fn count_unfolded(&self) -> usize {
        self.players.iter().filter(|p| !p.borrow().is_folded).count()
    }

    pub fn not_folded(&self) -> Vec<PlayerHandle> {
        self.players.iter().filter(|p| !p.borrow().is_folded).cloned().collect()
    }

    pub fn active(&self) -> Vec<PlayerHandle> {
        self.players.iter().filter(|p| p.borrow().is_active()).cloned().collect()
    }

    pub fn all_played_turn(&self) -> bool {
        self.players.iter().all(|p| {
            let p = p.borrow();
            p.played_turn || !p.is_active()
        })
    }

    /// The next seat index, circularly after `from`, occupied by an active
    /// (not folded, not all-in) player.
    pub fn next_active_index(&self, from: usize) -> Option<usize> {
        self.find_circular(from, |p| p.is_active())
    }

    pub fn previous_active_index(&self, from: usize) -> Option<usize> {
        self.find_circular_rev(from, |p| p.is_active())
    }

    pub fn next_unfolded_index(&self, from: usize) -> Option<usize> {
        self.find_circular(from, |p| !p.is_folded)
    }

    pub fn previous_unfolded_index(&self, from: usize) -> Option<usize> {
        self.find_circular_rev(from, |p| !p.is_folded)
    }

    fn find_circular(&self, from: usize, pred: impl Fn(&Player) -> bool) -> Option<usize> {
        let n = self.players.len();
        (1..n).map(|k| (from + k) % n).find(|&i| pred(&self.players[i].borrow()))
    }

    fn find_circular_rev(&self, from: usize, pred: impl Fn(&Player) -> bool) -> Option<usize> {
        let n = self.players.len();
        (1..n).rev().map(|k| (from + k) % n).find(|&i| pred(&self.players[i].borrow()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(id: u64, money: u64) -> PlayerHandle {
        Rc::new(RefCell::new(Player::new(1, id, format!("p{id}"), money)))
    }

    #[test]
    fn seats_start_empty_and_fill_in_order() {
        let mut seats = PlayerSeats::new(3);
        assert_eq!(seats.num_filled(), 0);
        let idx = seats.seat_player(handle(1, 100)).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(seats.num_filled(), 1);
    }

    #[test]
    fn seat_player_at_rejects_taken_seat() {
        let mut seats = PlayerSeats::new(2);
        assert!(seats.seat_player_at(handle(1, 100), 0));
        assert!(!seats.seat_player_at(handle(2, 100), 0));
    }

    #[test]
    fn remove_by_id_frees_seat() {
        let mut seats = PlayerSeats::new(2);
        seats.seat_player_at(handle(7, 100), 0);
        seats.remove_by_id(7);
        assert!(seats.seat_free(0));
    }

    #[test]
    fn evict_broke_removes_only_zero_stake_players() {
        let mut seats = PlayerSeats::new(2);
        seats.seat_player_at(handle(1, 0), 0);
        seats.seat_player_at(handle(2, 50), 1);
        seats.evict_broke();
        assert!(seats.seat_free(0));
        assert!(!seats.seat_free(1));
    }

    #[test]
    fn evict_broke_also_removes_a_broke_folded_player_with_a_live_stake() {
        let mut seats = PlayerSeats::new(2);
        let folded_allin_loser = handle(1, 0);
        folded_allin_loser.borrow_mut().stake = 300;
        folded_allin_loser.borrow_mut().is_folded = true;
        seats.seat_player_at(folded_allin_loser, 0);
        seats.seat_player_at(handle(2, 50), 1);
        seats.evict_broke();
        assert!(seats.seat_free(0), "a broke, folded player with a live stake must still be evicted");
        assert!(!seats.seat_free(1));
    }

    #[test]
    fn next_occupied_index_wraps_around() {
        let mut seats = PlayerSeats::new(4);
        seats.seat_player_at(handle(1, 100), 0);
        seats.seat_player_at(handle(2, 100), 3);
        assert_eq!(seats.next_occupied_index(0), Some(3));
        assert_eq!(seats.next_occupied_index(3), Some(0));
    }

    #[test]
    fn player_group_circular_traversal_skips_inactive() {
        let players = vec![handle(1, 100), handle(2, 100), handle(3, 100)];
        players[1].borrow_mut().is_folded = true;
        let group = PlayerGroup::new(players);
        assert_eq!(group.next_active_index(0), Some(2));
        assert_eq!(group.next_active_index(2), Some(0));
        assert_eq!(group.previous_active_index(0), Some(2));
    }

    #[test]
    fn all_played_turn_ignores_inactive_players() {
        let players = vec![handle(1, 100), handle(2, 100)];
        players[1].borrow_mut().is_all_in = true;
        let group = PlayerGroup::new(players);
        group.borrow_mut(0).played_turn = true;
        assert!(group.all_played_turn());
    }
}
