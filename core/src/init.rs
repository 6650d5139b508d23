use crate::config::MatchConfig;
use crate::fighter::Fighter;
use crate::types::*;

/// Default match configuration with the given RNG seed.
pub fn default_config(seed: u32) -> MatchConfig {
    MatchConfig {
        seed,
        ..MatchConfig::default()
    }
}

/// Both fighters at their round-start positions, full health, facing each
/// other. Indexed by [`Side::index`].
pub fn spawn_fighters(config: &MatchConfig) -> [Fighter; 2] {
    [
        Fighter::new(
            Side::Player,
            config.player_spawn_x,
            &config.arena,
            facing::RIGHT,
        ),
        Fighter::new(
            Side::Opponent,
            config.opponent_spawn_x,
            &config.arena,
            facing::LEFT,
        ),
    ]
}

/// Tallies for a fresh match, parked in round 1's intro.
pub fn initial_match_state(config: &MatchConfig) -> MatchState {
    MatchState {
        round_number: 1,
        player_wins: 0,
        opponent_wins: 0,
        round_timer: config.round_time,
        phase: RoundPhase::Starting,
        phase_timer: config.round_intro,
        combo_count: 0,
        combo_window: 0.0,
        score: 0,
        last_round: None,
    }
}
