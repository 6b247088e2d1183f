use ember::game::{Game, Outcome};
use ember::logger::init_logging;
use ember::moves::movegen::legal_moves;
use ember::moves::perft::perft;
use ember::moves::types::Move;
use ember::player::{EnginePlayer, Player};
use ember::search::{BudgetKind, SearchOptions};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::mpsc::channel;
use std::time::Instant;

fn main() {
    init_logging("logs/ember.log", "ember=info");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("perft") => run_perft(&args[1..]),
        Some("selfplay") => run_selfplay(&args[1..]),
        _ => usage(),
    }
}

fn usage() {
    println!("usage: ember <command>");
    println!("  perft <depth>                 count move-tree leaves from the start position");
    println!("  selfplay [plies] [options]    let the engine play itself");
    println!("    --depth <n>                 fixed-depth budget per move (default 5)");
    println!("    --time <ms>                 wall-clock budget per move instead");
}

fn run_perft(args: &[String]) {
    let depth: u32 = match args.first().and_then(|a| a.parse().ok()) {
        Some(d) if d >= 1 => d,
        _ => {
            usage();
            return;
        }
    };

    let mut game = Game::new_standard();
    let mut roots: Vec<Move> = Vec::with_capacity(32);
    legal_moves(&mut game, &mut roots);

    let bar = ProgressBar::new(roots.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:32} {pos}/{len} {msg}").expect("progress template"),
    );

    let started = Instant::now();
    let mut total = 0u64;
    for mv in roots {
        bar.set_message(mv.to_string());
        game.make_move(mv);
        total += if depth == 1 { 1 } else { perft(&mut game, depth - 1) };
        game.unmake_move();
        bar.inc(1);
    }
    bar.finish_and_clear();

    let secs = started.elapsed().as_secs_f64().max(1e-9);
    println!(
        "perft({depth}) = {total}  time {:.3}s  nps {}",
        secs,
        (total as f64 / secs) as u64
    );
}

fn run_selfplay(args: &[String]) {
    let mut max_plies = 60usize;
    let mut options = SearchOptions {
        search_depth: 5,
        ..SearchOptions::default()
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--depth" => {
                if let Some(d) = args.get(i + 1).and_then(|a| a.parse().ok()) {
                    options.search_depth = d;
                    options.budget = BudgetKind::Depth;
                }
                i += 2;
            }
            "--time" => {
                if let Some(ms) = args.get(i + 1).and_then(|a| a.parse().ok()) {
                    options.turn_time_ms = ms;
                    options.budget = BudgetKind::Time;
                }
                i += 2;
            }
            other => {
                if let Ok(n) = other.parse() {
                    max_plies = n;
                }
                i += 1;
            }
        }
    }

    let (sink, reports) = channel();
    let mut white = EnginePlayer::new("ember-white", options.clone()).with_analytics(sink.clone());
    let mut black = EnginePlayer::new("ember-black", options).with_analytics(sink);

    let mut game = Game::new_standard();
    for ply in 0..max_plies {
        if game.outcome() != Outcome::Ongoing {
            break;
        }
        let mover: &mut EnginePlayer = if ply % 2 == 0 { &mut white } else { &mut black };
        let request = mover.request_move(&game);
        let Some(mv) = request.wait() else {
            println!("{} produced no move, stopping", mover.name());
            break;
        };

        while let Ok(report) = reports.try_recv() {
            println!("  {report}");
        }

        assert!(game.try_move(mv), "engine produced an illegal move: {mv}");
        println!("{:>3}. {} plays {:#}", ply + 1, mover.name(), mv);
        println!("{}", game.board());
    }

    match game.outcome() {
        Outcome::Ongoing => println!("stopped after the ply limit"),
        Outcome::WhiteWins => println!("white mates"),
        Outcome::BlackWins => println!("black mates"),
        Outcome::Draw(kind) => println!("draw: {kind:?}"),
    }
}
