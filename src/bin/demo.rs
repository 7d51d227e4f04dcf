//! Command-line demo: seats a handful of players at a table, plays a single
//! hand to completion with a scripted or random action policy, and renders
//! the event stream and final chip counts. A second `equity` subcommand
//! exercises `evaluate_cards` directly, without a `Table`/`Round` at all, to
//! estimate win probabilities by repeated random sampling.
//!
//! This binary is the only place in the workspace that installs a logger
//! (`env_logger`) or depends on `clap`/`colored`/`comfy-table` — the library
//! itself stays free of any of that, per `SPEC_FULL.md`'s ambient-stack
//! section.

use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::Table as RenderTable;
use log::info;
use rand::seq::SliceRandom;

use holdem_engine::card::{ALL_RANKS, ALL_SUITS};
use holdem_engine::{evaluate_cards, Action, Card, EventQueues, PrivateEvent, PublicEvent, TableConfig};

#[derive(Parser, Debug)]
#[command(name = "holdem-engine-demo", about = "Plays one scripted hand of heads-up hold'em, or estimates hand equity")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Plays one scripted heads-up hand and prints the event log (default).
    Play {
        /// Starting stack for both players.
        #[arg(long, default_value_t = 1000)]
        stack: u64,

        /// Small blind.
        #[arg(long, default_value_t = 5)]
        small_blind: u64,

        /// Big blind.
        #[arg(long, default_value_t = 10)]
        big_blind: u64,
    },
    /// Estimates each hand's win probability by sampling random runouts,
    /// the `winning_probability.py` worked example ported to `evaluate_cards`.
    Equity {
        /// A hand's two hole cards, e.g. `AhKh`. Repeat for each contender.
        #[arg(long = "hand", required = true, num_args = 1)]
        hands: Vec<String>,

        /// Cards already on the board, e.g. `2c7dJs`. Defaults to none.
        #[arg(long)]
        board: Option<String>,

        /// Number of random runouts to sample.
        #[arg(long, default_value_t = 1000)]
        trials: u32,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Play { stack: 1000, small_blind: 5, big_blind: 10 }) {
        Commands::Play { stack, small_blind, big_blind } => run_play(stack, small_blind, big_blind),
        Commands::Equity { hands, board, trials } => run_equity(&hands, board.as_deref(), trials),
    }
}

fn run_play(stack: u64, small_blind: u64, big_blind: u64) {
    let config = TableConfig { num_seats: 2, small_blind, big_blind, min_buyin: stack, max_buyin: stack };
    let mut table = holdem_engine::Table::new(1, config).expect("valid table config");

    let mut events = EventQueues::new();
    table.public_in(1, Action::BuyIn { name: "Alice".into(), money: stack, seat_index: None }, &mut events);
    table.public_in(2, Action::BuyIn { name: "Bob".into(), money: stack, seat_index: None }, &mut events);
    table.public_in(1, Action::StartRound { round_id: 1 }, &mut events);

    render_events(events);
    info!("round started with {} players", table.seats().num_filled());

    // Play a simple scripted policy: everyone checks/calls until the hand
    // resolves on its own (showdown, fold, or all-in runout).
    let mut guard = 0;
    while table.round().map_or(false, |r| !r.closed()) && guard < 64 {
        guard += 1;
        let Some(round) = table.round() else { break };
        let player_id = round.current_player_id();
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
        render_events(step);
    }

    print_standings(&table);
}

/// Samples `trials` random completions of the board and tallies how often
/// each hole-card hand ends up holding the best 7-card hand, per
/// `winning_probability.py`'s `sample`-the-remaining-deck approach — here
/// built directly on `evaluate_cards` rather than a `Round`.
fn run_equity(hands: &[String], board: Option<&str>, trials: u32) {
    let hole_hands: Vec<Vec<Card>> =
        hands.iter().map(|h| holdem_engine::parse_cards(h).expect("valid hole-card notation")).collect();
    let board_cards = board.map(|b| holdem_engine::parse_cards(b).expect("valid board notation")).unwrap_or_default();
    assert!(board_cards.len() <= 5, "a board has at most 5 cards");

    // `Card`'s `PartialEq` only compares rank (suits never break a hand-value
    // tie), so excluding already-dealt cards from the remaining deck needs an
    // exact rank-and-suit match instead.
    let dealt: Vec<Card> = hole_hands.iter().flatten().chain(board_cards.iter()).copied().collect();
    let mut remaining: Vec<Card> = ALL_SUITS
        .iter()
        .flat_map(|&suit| ALL_RANKS.iter().map(move |&rank| Card::new(rank, suit)))
        .filter(|c| !dealt.iter().any(|d| d.rank == c.rank && d.suit == c.suit))
        .collect();

    let needed = 5 - board_cards.len();
    let mut wins = vec![0u32; hole_hands.len()];
    let mut ties = vec![0u32; hole_hands.len()];
    let mut rng = rand::thread_rng();

    for _ in 0..trials {
        remaining.shuffle(&mut rng);
        let runout = &remaining[..needed];

        let evaluated: Vec<_> = hole_hands
            .iter()
            .map(|hole| {
                let mut cards = hole.clone();
                cards.extend(board_cards.iter().copied());
                cards.extend(runout.iter().copied());
                evaluate_cards(&cards, false).expect("seven known cards always evaluate")
            })
            .collect();

        let best = evaluated.iter().max().cloned().expect("at least one hand");
        let winners: Vec<usize> = evaluated.iter().enumerate().filter(|(_, h)| **h == best).map(|(i, _)| i).collect();
        if winners.len() == 1 {
            wins[winners[0]] += 1;
        } else {
            for &i in &winners {
                ties[i] += 1;
            }
        }
    }

    let mut render = RenderTable::new();
    render.set_header(vec!["hand", "win %", "tie %"]);
    for (i, hand) in hands.iter().enumerate() {
        let win_pct = 100.0 * wins[i] as f64 / trials as f64;
        let tie_pct = 100.0 * ties[i] as f64 / trials as f64;
        render.add_row(vec![hand.clone(), format!("{win_pct:.1}"), format!("{tie_pct:.1}")]);
    }
    println!("{render}");
}

/// Drains one batch of events into a recording sink purely for display.
fn render_events(mut events: EventQueues) {
    let mut sink = holdem_engine::RecordingSink::default();
    events.drain_into(&mut sink);

    for event in &sink.public {
        println!("{}", describe_public(event));
    }
    for message in &sink.private {
        println!("{}", format!("  (private -> player {}) {:?}", message.player_id, message.event).dimmed());
    }
}

fn describe_public(event: &PublicEvent) -> String {
    match event {
        PublicEvent::NewRoundStarted { round_id } => format!("{} round {}", "NEW ROUND".green().bold(), round_id),
        PublicEvent::PlayerJoined { player_id, seat } => format!("player {player_id} joined seat {seat}"),
        PublicEvent::NewTurn { turn, board } => format!("{:?}: {}", turn, render_board(board)),
        PublicEvent::SmallBlind { player_id, paid_amount } => format!("player {player_id} posts small blind {paid_amount}"),
        PublicEvent::BigBlind { player_id, paid_amount } => format!("player {player_id} posts big blind {paid_amount}"),
        PublicEvent::PlayerCheck { player_id } => format!("player {player_id} checks"),
        PublicEvent::PlayerFold { player_id } => format!("player {player_id} folds").red().to_string(),
        PublicEvent::PlayerCall { player_id, paid_amount } => format!("player {player_id} calls {paid_amount}"),
        PublicEvent::PlayerRaise { player_id, raised_by, paid_amount } => {
            format!("player {player_id} raises by {raised_by} (paid {paid_amount})")
        }
        PublicEvent::PlayerActionRequired { player_id, to_call } => format!("player {player_id} to act (to call {to_call})"),
        PublicEvent::DeclareFinishedWinner { player_id, money_won, handname, .. } => {
            format!("{} player {player_id} wins {money_won} with {:?}", "WINNER".yellow().bold(), handname)
        }
        PublicEvent::RoundFinished => "round finished".to_string(),
        PublicEvent::RoundClosed => "round closed".to_string(),
        other => format!("{other:?}"),
    }
}

fn render_board(board: &[Card]) -> String {
    board.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
}

fn print_standings(table: &holdem_engine::Table) {
    let mut render = RenderTable::new();
    render.set_header(vec!["seat", "money"]);
    for (idx, slot) in table.seats().slots().iter().enumerate() {
        if let Some(player) = slot {
            render.add_row(vec![idx.to_string(), player.borrow().money.to_string()]);
        }
    }
    println!("{render}");
}
