use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::escalation::EscalationFlags;
use crate::fighter::Fighter;
use crate::prng::Rng;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiDecision {
    pub intent: FighterIntent,
    /// Set when the omniscient counter consumed an observation.
    pub countered: Option<ObservedAction>,
}

/// One decision cycle of the opponent. Pure in both fighters, at most one
/// observation of the human's latest action, the flags and the match RNG.
///
/// Priority order:
///
/// 1. Omniscient counter to the observed action (ends the cycle).
/// 2. Spacing: close in when far, sometimes back off when crowded.
/// 3. Attack roll when in range.
/// 4. Occasional jump.
/// 5. Preemptive block against an incoming attack; overrides 3 and 4.
pub fn decide(
    me: &Fighter,
    foe: &Fighter,
    observation: Option<ObservedAction>,
    flags: &EscalationFlags,
    rng: &mut Rng,
) -> AiDecision {
    let mut intent = FighterIntent::NONE;

    if flags.ai_omniscient {
        match observation {
            Some(action @ (ObservedAction::Punch | ObservedAction::Kick)) => {
                intent.block = true;
                return AiDecision {
                    intent,
                    countered: Some(action),
                };
            }
            Some(ObservedAction::Special) => {
                intent.jump = true;
                return AiDecision {
                    intent,
                    countered: Some(ObservedAction::Special),
                };
            }
            Some(ObservedAction::Jump) | None => {}
        }
    }

    let offset = foe.center_x() - me.center_x();
    let distance = offset.abs();
    let toward = if offset >= 0.0 { 1.0 } else { -1.0 };

    if distance > AI_APPROACH_DISTANCE {
        intent.move_dir = toward * AI_APPROACH_SPEED_SCALE;
    } else if distance < AI_CROWD_DISTANCE && rng.chance(AI_RETREAT_CHANCE) {
        intent.move_dir = -toward;
    }

    if distance < AI_ATTACK_DISTANCE && me.state != CombatState::Attacking {
        let mut chance = AI_ATTACK_CHANCE;
        if flags.ai_aggressive {
            chance += AI_AGGRESSION_BONUS;
        }
        if rng.chance(chance) {
            intent.attack = pick_attack(me, rng);
        }
    }

    if me.on_ground && rng.chance(AI_JUMP_CHANCE) {
        intent.jump = true;
    }

    if foe.state == CombatState::Attacking && distance < AI_THREAT_DISTANCE {
        let mut chance = AI_BLOCK_CHANCE;
        if flags.ai_omniscient {
            chance += AI_OMNISCIENT_BLOCK_BONUS;
        }
        if rng.chance(chance) {
            intent = FighterIntent {
                block: true,
                ..FighterIntent::NONE
            };
        }
    }

    AiDecision {
        intent,
        countered: None,
    }
}

fn pick_attack(me: &Fighter, rng: &mut Rng) -> Option<AttackKind> {
    let roll = rng.next_f64();
    if roll < AI_PUNCH_SHARE {
        Some(AttackKind::Punch)
    } else if roll < AI_PUNCH_SHARE + AI_KICK_SHARE {
        Some(AttackKind::Kick)
    } else if me.special_charge >= SPECIAL_CHARGE_MIN {
        Some(AttackKind::Special)
    } else {
        None
    }
}

pub fn reaction_time(flags: &EscalationFlags) -> f64 {
    if flags.ai_omniscient {
        AI_OMNISCIENT_REACTION_SECONDS
    } else {
        AI_REACTION_SECONDS
    }
}

/// Reaction-delay wrapper around [`decide`]. Between decisions the last
/// movement/block intent is held.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AiController {
    reaction_timer: f64,
    last_intent: FighterIntent,
}

impl AiController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_intent(&self) -> &FighterIntent {
        &self.last_intent
    }

    /// Intent for this tick. Takes the observation out of `observation` when a
    /// decision cycle runs.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt: f64,
        me: &Fighter,
        foe: &Fighter,
        observation: &mut Option<ObservedAction>,
        flags: &EscalationFlags,
        rng: &mut Rng,
        events: &mut Vec<SimEvent>,
    ) -> FighterIntent {
        if me.state.is_locked() {
            self.last_intent = FighterIntent::NONE;
            return FighterIntent::NONE;
        }

        self.reaction_timer += dt;
        if self.reaction_timer < reaction_time(flags) {
            return self.last_intent.held();
        }
        self.reaction_timer = 0.0;

        let decision = decide(me, foe, observation.take(), flags, rng);
        if let Some(action) = decision.countered {
            log::debug!("AI countered observed {:?}", action);
            if rng.chance(AI_TAUNT_CHANCE) {
                events.push(SimEvent::Narrative {
                    narrative: Narrative::OpponentOmniscient,
                });
            }
        }
        self.last_intent = decision.intent;
        decision.intent
    }
}
