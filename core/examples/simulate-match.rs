//! Plays a scripted human against the AI and prints a JSON match summary.
//!
//! Usage:
//!   cargo run -p hexcade-core --example simulate-match -- [idle|brawler|turtle] [escalation] [seed]

use hexcade_core::*;
use serde::Serialize;

#[derive(Serialize)]
struct Summary {
    mode: String,
    seed: u32,
    escalation_level: u32,
    ticks: u32,
    winner: Option<Side>,
    rounds: Vec<RoundResult>,
    score: u32,
    stats: MatchStats,
    hazards_seen: u32,
    narratives: Vec<&'static str>,
}

/// Buttons for this tick. `brawler` walks in and alternates strikes;
/// `turtle` holds back and pokes.
fn script(mode: &str, tick: u32, ctl: &MatchController) -> u8 {
    let me = ctl.fighter(Side::Player);
    let foe = ctl.fighter(Side::Opponent);
    let toward = if foe.center_x() > me.center_x() {
        button::RIGHT
    } else {
        button::LEFT
    };
    let away = if toward == button::RIGHT {
        button::LEFT
    } else {
        button::RIGHT
    };
    let close = (foe.center_x() - me.center_x()).abs() < 90.0;

    match mode {
        "brawler" => {
            if !close {
                return toward;
            }
            match tick % 24 {
                0 => button::PUNCH,
                12 if me.can_use_special() => button::SPECIAL,
                12 => button::KICK,
                _ => 0,
            }
        }
        "turtle" => {
            if close && tick % 40 == 0 {
                button::PUNCH
            } else {
                away
            }
        }
        _ => 0,
    }
}

fn main() {
    let mut args = std::env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| "brawler".to_string());
    let escalation_level: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let seed: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    if !matches!(mode.as_str(), "idle" | "brawler" | "turtle") {
        eprintln!("Unknown mode: {}. Use 'idle', 'brawler' or 'turtle'", mode);
        std::process::exit(1);
    }

    let mut ctl = MatchController::with_defaults(seed);
    let mut rounds = Vec::new();
    let mut narratives = Vec::new();
    let mut hazards_seen = 0;
    let mut ticks = 0;

    // Ten minutes of simulated time is far beyond any match
    while !ctl.is_match_over() && ticks < 36_000 {
        let input = TickInput {
            player: PlayerInput::new(script(&mode, ticks, &ctl)),
            escalation_level,
        };
        for event in ctl.step(FRAME_SECONDS, &input) {
            match event {
                SimEvent::RoundOver { result } => rounds.push(result),
                SimEvent::HazardSpawned { .. } => hazards_seen += 1,
                SimEvent::Narrative { narrative } => narratives.push(narrative.message()),
                _ => {}
            }
        }
        ticks += 1;
    }

    let summary = Summary {
        mode,
        seed,
        escalation_level,
        ticks,
        winner: ctl.state().winner(),
        rounds,
        score: ctl.state().score,
        stats: *ctl.stats(),
        hazards_seen,
        narratives,
    };

    eprintln!("=== {} vs AI (level {}) ===", summary.mode, escalation_level);
    eprintln!("Ticks: {}", summary.ticks);
    eprintln!("Winner: {:?}", summary.winner);
    eprintln!(
        "Rounds: player {} - opponent {}",
        ctl.state().player_wins,
        ctl.state().opponent_wins
    );

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("failed to encode summary: {}", e);
            std::process::exit(1);
        }
    }
}
