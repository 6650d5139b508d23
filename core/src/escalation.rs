use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Behavior flags derived from the externally owned escalation level.
/// Holds no state of its own; the controller re-derives it every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationFlags {
    /// Raises the AI attack roll.
    pub ai_aggressive: bool,
    /// AI reads the human's last action and reacts faster.
    pub ai_omniscient: bool,
    /// Human health bar lies upward; true damage against the human is inflated.
    pub health_display_falsified: bool,
    pub chip_damage_on_block: bool,
    pub hazard_eligible: bool,
}

impl EscalationFlags {
    pub fn from_level(level: u32) -> Self {
        Self {
            ai_aggressive: level >= ESCALATION_AGGRESSIVE,
            ai_omniscient: level >= ESCALATION_OMNISCIENT,
            health_display_falsified: level >= ESCALATION_FALSIFIED_HEALTH,
            chip_damage_on_block: level >= ESCALATION_CHIP_DAMAGE,
            hazard_eligible: level >= ESCALATION_HAZARD,
        }
    }
}

/// Health bar fraction shown for the human fighter. Presentation only: the
/// true health is never touched.
pub fn displayed_health_fraction(true_fraction: f64, flags: &EscalationFlags, elapsed: f64) -> f64 {
    if !flags.health_display_falsified {
        return true_fraction;
    }
    let wobble = FALSIFIED_HEALTH_WOBBLE * (elapsed * FALSIFIED_HEALTH_WOBBLE_RATE).sin();
    (true_fraction + FALSIFIED_HEALTH_BONUS + wobble).clamp(0.0, 1.0)
}

/// Damage actually taken by the human when the falsification rule is active.
pub fn inflate_damage(damage: i32, flags: &EscalationFlags) -> i32 {
    if flags.health_display_falsified {
        (damage as f64 * HIDDEN_DAMAGE_MULTIPLIER).round() as i32
    } else {
        damage
    }
}

/// Health lost through a block.
pub fn chip_damage(damage: i32, flags: &EscalationFlags) -> i32 {
    if flags.chip_damage_on_block {
        (damage as f64 * CHIP_DAMAGE_RATIO).floor() as i32
    } else {
        0
    }
}
