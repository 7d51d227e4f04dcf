//! End-to-end round scenarios driven entirely through `Table::public_in`:
//! a heads-up walkthrough and the chip-conservation property.

use holdem_engine::{Action, EventQueues, PublicEvent, RecordingSink, Table, TableConfig};

fn heads_up_table(stack: u64) -> Table {
    let config = TableConfig { num_seats: 2, small_blind: 5, big_blind: 10, min_buyin: stack, max_buyin: stack };
    let mut table = Table::new(1, config).unwrap();
    let mut events = EventQueues::new();
    table.public_in(1, Action::BuyIn { name: "Alice".into(), money: stack, seat_index: None }, &mut events);
    table.public_in(2, Action::BuyIn { name: "Bob".into(), money: stack, seat_index: None }, &mut events);
    table
}

fn total_chips(table: &Table) -> u64 {
    table.seats().occupied().map(|p| p.borrow().money + p.borrow().stake).sum()
}

#[test]
fn heads_up_start_posts_blinds_and_requests_action() {
    let mut table = heads_up_table(1000);
    let mut events = EventQueues::new();
    table.public_in(1, Action::StartRound { round_id: 1 }, &mut events);

    let mut sink = RecordingSink::default();
    events.drain_into(&mut sink);

    assert!(sink.public.iter().any(|e| matches!(e, PublicEvent::NewRoundStarted { round_id: 1 })));
    assert!(sink.public.iter().any(|e| matches!(e, PublicEvent::SmallBlind { .. })));
    assert!(sink.public.iter().any(|e| matches!(e, PublicEvent::BigBlind { .. })));
    assert!(sink.public.iter().any(|e| matches!(e, PublicEvent::PlayerActionRequired { .. })));

    let round = table.round().unwrap();
    assert_eq!(round.turn(), holdem_engine::Street::Preflop);
    assert!(!round.closed());
}

#[test]
fn fold_heads_up_ends_round_immediately_without_showdown() {
    let mut table = heads_up_table(1000);
    let mut events = EventQueues::new();
    table.public_in(1, Action::StartRound { round_id: 1 }, &mut events);

    let current = table.round().unwrap().current_player_id();
    table.public_in(current, Action::Fold, &mut events);

    let mut sink = RecordingSink::default();
    events.drain_into(&mut sink);
    assert!(sink.public.iter().any(|e| matches!(e, PublicEvent::DeclarePrematureWinner { .. })));
    assert!(table.round().unwrap().closed());
    assert_eq!(total_chips(&table), 2000);
}

#[test]
fn chips_are_conserved_through_a_full_checked_down_hand() {
    let mut table = heads_up_table(1000);
    let mut events = EventQueues::new();
    table.public_in(1, Action::StartRound { round_id: 1 }, &mut events);
    assert_eq!(total_chips(&table), 2000);

    let mut guard = 0;
    while table.round().map_or(false, |r| !r.closed()) && guard < 64 {
        guard += 1;
        let player_id = table.round().unwrap().current_player_id();
        let mut step = EventQueues::new();
        table.public_in(player_id, Action::Check, &mut step);
        if step.is_empty() {
            table.public_in(player_id, Action::Call, &mut step);
        }
        if let Some(round) = table.round() {
            for &muck_id in round.muck_optioned_player_ids().to_vec().iter() {
                table.public_in(muck_id, Action::Show, &mut step);
            }
        }
        assert_eq!(total_chips(&table), 2000);
    }

    assert!(guard < 64, "round never closed");
    assert!(table.round().unwrap().closed());
}

#[test]
fn raise_above_stack_is_coerced_to_all_in() {
    let mut table = heads_up_table(200);
    let mut events = EventQueues::new();
    table.public_in(1, Action::StartRound { round_id: 1 }, &mut events);

    let current = table.round().unwrap().current_player_id();
    let mut step = EventQueues::new();
    table.public_in(current, Action::Raise { raise_by: 10_000 }, &mut step);

    let mut sink = RecordingSink::default();
    step.drain_into(&mut sink);
    assert!(sink.public.iter().any(|e| matches!(e, PublicEvent::PlayerIsAllIn { .. })));
}
