use serde::{Deserialize, Serialize};

use crate::catalog::{AttackCatalog, AttackEntry};
use crate::constants::*;
use crate::error::ConfigError;
use crate::types::Side;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaBounds {
    pub left: f64,
    pub right: f64,
    /// Floor line; fighters stand with their bottom edge on it.
    pub ground_y: f64,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            left: ARENA_LEFT,
            right: ARENA_RIGHT,
            ground_y: GROUND_Y,
        }
    }
}

impl ArenaBounds {
    /// Clamp a left edge so a body of `width` stays inside the walls.
    pub fn clamp_x(&self, x: f64, width: f64) -> f64 {
        x.max(self.left).min(self.right - width)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub seed: u32,
    pub arena: ArenaBounds,
    pub round_time: f64,
    pub rounds_to_win: u32,
    pub round_intro: f64,
    pub round_outro: f64,
    pub player_spawn_x: f64,
    pub opponent_spawn_x: f64,
    /// Replaces the built-in move table when present; must name every move.
    pub attacks: Option<Vec<AttackEntry>>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            arena: ArenaBounds::default(),
            round_time: ROUND_TIME_SECONDS,
            rounds_to_win: ROUNDS_TO_WIN,
            round_intro: ROUND_INTRO_SECONDS,
            round_outro: ROUND_OUTRO_SECONDS,
            player_spawn_x: PLAYER_SPAWN_X,
            opponent_spawn_x: OPPONENT_SPAWN_X,
            attacks: None,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let arena = &self.arena;
        if !(arena.right - arena.left > FIGHTER_WIDTH * 2.0) {
            return Err(ConfigError::InvalidArena {
                left: arena.left,
                right: arena.right,
            });
        }
        for (side, x) in [
            (Side::Player, self.player_spawn_x),
            (Side::Opponent, self.opponent_spawn_x),
        ] {
            if x < arena.left || x + FIGHTER_WIDTH > arena.right {
                return Err(ConfigError::SpawnOutsideArena { side, x });
            }
        }
        for (field, value) in [
            ("round_time", self.round_time),
            ("round_intro", self.round_intro),
            ("round_outro", self.round_outro),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveDuration { field, value });
            }
        }
        if self.rounds_to_win == 0 {
            return Err(ConfigError::NoRoundsToWin);
        }
        self.catalog().map(|_| ())
    }

    /// Build the move table for this match, rejecting malformed overrides.
    pub fn catalog(&self) -> Result<AttackCatalog, ConfigError> {
        match &self.attacks {
            Some(entries) => Ok(AttackCatalog::from_entries(entries.iter().cloned())?),
            None => Ok(AttackCatalog::standard()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;

    #[test]
    fn default_config_is_valid() {
        let config = MatchConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.catalog().unwrap(), AttackCatalog::standard());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: MatchConfig =
            serde_json::from_str(r#"{"seed": 7, "round_time": 30.0}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.round_time, 30.0);
        assert_eq!(config.rounds_to_win, ROUNDS_TO_WIN);
        assert_eq!(config.arena, ArenaBounds::default());
    }

    #[test]
    fn rejects_bad_timers_and_rounds() {
        let config = MatchConfig {
            round_outro: 0.0,
            ..MatchConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveDuration {
                field: "round_outro",
                value: 0.0
            })
        );

        let config = MatchConfig {
            rounds_to_win: 0,
            ..MatchConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoRoundsToWin));
    }

    #[test]
    fn rejects_spawn_past_the_wall() {
        let config = MatchConfig {
            opponent_spawn_x: ARENA_RIGHT - 10.0,
            ..MatchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnOutsideArena {
                side: Side::Opponent,
                ..
            })
        ));
    }

    #[test]
    fn malformed_move_override_fails_at_construction() {
        let json = r#"{"attacks": [{"name":"slap","damage":1,"range":10.0,
            "startup_frames":1,"active_frames":1,"recovery_frames":1,
            "hitstun_frames":1,"height":"low"}]}"#;
        let config: MatchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.catalog(),
            Err(ConfigError::Catalog(CatalogError::UnknownMove("slap".into())))
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn clamp_keeps_body_inside() {
        let arena = ArenaBounds::default();
        assert_eq!(arena.clamp_x(-30.0, 50.0), 0.0);
        assert_eq!(arena.clamp_x(790.0, 50.0), 750.0);
        assert_eq!(arena.clamp_x(300.0, 50.0), 300.0);
    }
}
