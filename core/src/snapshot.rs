use serde::{Deserialize, Serialize};

use crate::constants::ROUND_GO_SIGNAL_SECONDS;
use crate::escalation::{displayed_health_fraction, EscalationFlags};
use crate::fighter::Fighter;
use crate::hazard::Hazard;
use crate::types::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FighterView {
    pub side: Side,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub facing: i32,
    pub state: CombatState,
    pub attack: Option<AttackKind>,
    pub attack_frame: u32,
    pub attack_total_frames: u32,
    pub health: i32,
    pub max_health: i32,
    pub true_health_fraction: f64,
    /// What the health bar shows; differs from the true fraction only for
    /// the human under the falsification rule.
    pub displayed_health_fraction: f64,
    pub invincible: bool,
    pub crouching: bool,
    pub on_ground: bool,
    pub special_charge: f64,
}

impl FighterView {
    pub fn of(f: &Fighter, flags: &EscalationFlags, elapsed: f64) -> Self {
        let true_fraction = f.health_fraction();
        let displayed = match f.side {
            Side::Player => displayed_health_fraction(true_fraction, flags, elapsed),
            Side::Opponent => true_fraction,
        };
        Self {
            side: f.side,
            x: f.x,
            y: f.y,
            width: f.width,
            height: f.height,
            facing: f.facing,
            state: f.state,
            attack: f.active_attack.map(|a| a.kind),
            attack_frame: f.attack_frame_counter,
            attack_total_frames: f
                .active_attack
                .map(|a| a.definition.total_frames())
                .unwrap_or(0),
            health: f.health,
            max_health: f.max_health,
            true_health_fraction: true_fraction,
            displayed_health_fraction: displayed,
            invincible: f.is_invincible(),
            crouching: f.crouching,
            on_ground: f.on_ground,
            special_charge: f.special_charge,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HudView {
    pub round_number: u32,
    pub round_timer: f64,
    /// Whole seconds, rounded up, as the clock shows it.
    pub timer_display: u32,
    pub player_wins: u32,
    pub opponent_wins: u32,
    pub phase: RoundPhase,
    pub banner: Option<String>,
    pub combo_count: u32,
    pub combo_window: f64,
    pub score: u32,
}

impl HudView {
    pub fn of(state: &MatchState) -> Self {
        Self {
            round_number: state.round_number,
            round_timer: state.round_timer,
            timer_display: state.round_timer.max(0.0).ceil() as u32,
            player_wins: state.player_wins,
            opponent_wins: state.opponent_wins,
            phase: state.phase,
            banner: banner(state),
            combo_count: state.combo_count,
            combo_window: state.combo_window,
            score: state.score,
        }
    }
}

fn banner(state: &MatchState) -> Option<String> {
    match state.phase {
        RoundPhase::Starting if state.phase_timer > ROUND_GO_SIGNAL_SECONDS => {
            Some(format!("ROUND {}", state.round_number))
        }
        RoundPhase::Starting => Some("FIGHT!".to_string()),
        RoundPhase::Ended => match state.last_round {
            Some(RoundResult {
                reason: RoundEndReason::Knockout,
                ..
            }) => Some("K.O.".to_string()),
            Some(_) => Some("TIME".to_string()),
            None => None,
        },
        RoundPhase::MatchOver => match state.winner() {
            Some(Side::Player) => Some("YOU WIN".to_string()),
            _ => Some("YOU LOSE".to_string()),
        },
        RoundPhase::Fighting => None,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardView {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub lifetime: f64,
}

impl From<&Hazard> for HazardView {
    fn from(h: &Hazard) -> Self {
        Self {
            x: h.x,
            y: h.y,
            width: h.width,
            height: h.height,
            lifetime: h.lifetime,
        }
    }
}

/// Read-only per-frame view for the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Indexed by [`Side::index`].
    pub fighters: [FighterView; 2],
    pub hud: HudView,
    pub hazard: Option<HazardView>,
    pub escalation_level: u32,
    pub flags: EscalationFlags,
    pub stats: MatchStats,
}
