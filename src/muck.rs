//! Muck/show policy: replaces the source's `Round`/`RoundWithChoiceToShowCards`
//! inheritance layering with composition. A `Round` carries a
//! `Box<dyn MuckPolicy>` instead of being a subclass; swapping policies
//! changes showdown behavior without touching the state machine.

/// Decides, at showdown, whether a player's hand is forced visible or left
/// to their choice.
pub trait MuckPolicy {
    /// Whether a showdown participant whose hand is at least as strong as
    /// the best one revealed so far must show it, as opposed to being
    /// offered a voluntary `SHOW`/`MUCK` choice.
    fn must_reveal(&self, is_best_so_far: bool) -> bool;

    /// Whether an uncontested (premature) winner must reveal their hand.
    fn premature_winner_must_reveal(&self) -> bool;

    /// Notified after a player resolves a voluntary choice, for policies
    /// that want to react to it (logging, alternate-policy bookkeeping).
    /// The default policy does nothing.
    fn on_choice(&self, _player_id: u64, _showed: bool) {}
}

/// The standard rule: a hand at least as strong as the best shown so far is
/// forced visible; everyone else, and any premature winner, gets a choice.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardMuckPolicy;

impl MuckPolicy for StandardMuckPolicy {
    fn must_reveal(&self, is_best_so_far: bool) -> bool {
        is_best_so_far
    }

    fn premature_winner_must_reveal(&self) -> bool {
        false
    }
}

/// Every hand is forced visible; no player is ever offered a choice.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysShowPolicy;

impl MuckPolicy for AlwaysShowPolicy {
    fn must_reveal(&self, _is_best_so_far: bool) -> bool {
        true
    }

    fn premature_winner_must_reveal(&self) -> bool {
        true
    }
}

/// No hand is ever forced visible; every non-folded player gets a choice.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverShowPolicy;

impl MuckPolicy for NeverShowPolicy {
    fn must_reveal(&self, _is_best_so_far: bool) -> bool {
        false
    }

    fn premature_winner_must_reveal(&self) -> bool {
        false
    }
}
