use crate::types::{AttackDefinition, AttackHeight, AttackKind};

// Distances are world units, durations are seconds, rates are per second
// unless a name says "per tick" or "frames".

// Tick rate
pub const TICK_RATE: u32 = 60;
pub const FRAME_SECONDS: f64 = 1.0 / TICK_RATE as f64;

// Arena
pub const ARENA_LEFT: f64 = 0.0;
pub const ARENA_RIGHT: f64 = 800.0;
pub const GROUND_Y: f64 = 400.0;

// Fighter body
pub const FIGHTER_WIDTH: f64 = 50.0;
pub const FIGHTER_HEIGHT: f64 = 100.0;
pub const MAX_HEALTH: i32 = 100;
pub const PLAYER_SPAWN_X: f64 = 200.0;
pub const OPPONENT_SPAWN_X: f64 = 550.0;

// Movement
pub const WALK_SPEED: f64 = 240.0;
pub const GRAVITY: f64 = 1800.0;
pub const JUMP_VELOCITY: f64 = -620.0;
/// Velocity multiplier applied each tick while stunned or knocked down.
pub const HITSTUN_DECAY: f64 = 0.9;
/// Velocity multiplier applied each grounded tick while attacking or blocking.
pub const GROUND_FRICTION: f64 = 0.8;

// Combat states
pub const BLOCK_HOLD_SECONDS: f64 = 0.2;
pub const KNOCKDOWN_SECONDS: f64 = 0.8;
pub const KNOCKDOWN_INVINCIBLE_SECONDS: f64 = 0.5;

// Pushback
pub const HIT_PUSHBACK: f64 = 260.0;
pub const BLOCK_PUSHBACK: f64 = HIT_PUSHBACK * 0.5;
pub const KNOCKDOWN_PUSHBACK: f64 = 420.0;
pub const KNOCKDOWN_LIFT: f64 = -360.0;
/// Minimum centre distance between bodies, as a share of their combined width.
pub const BODY_SEPARATION_RATIO: f64 = 0.35;

// Attack hurtbox, relative to the attacker's body
pub const ATTACK_BOX_HEIGHT_RATIO: f64 = 0.6;
pub const ATTACK_BOX_TOP_RATIO: f64 = 0.1;

// Special meter
pub const SPECIAL_CHARGE_MAX: f64 = 100.0;
pub const SPECIAL_CHARGE_MIN: f64 = 50.0;
pub const SPECIAL_CHARGE_PER_SECOND: f64 = 6.0;
pub const SPECIAL_CHARGE_PER_DAMAGE_DEALT: f64 = 1.0;
pub const SPECIAL_CHARGE_PER_DAMAGE_TAKEN: f64 = 0.5;
pub const SPECIAL_COOLDOWN_SECONDS: f64 = 1.5;

// Damage rules
pub const CHIP_DAMAGE_RATIO: f64 = 0.15;
pub const HIDDEN_DAMAGE_MULTIPLIER: f64 = 1.25;

// Combo / score
pub const COMBO_WINDOW_SECONDS: f64 = 0.8;
pub const SCORE_PER_DAMAGE: u32 = 10;

// Rounds
pub const ROUND_TIME_SECONDS: f64 = 99.0;
pub const ROUNDS_TO_WIN: u32 = 2;
pub const ROUND_INTRO_SECONDS: f64 = 2.0;
/// Remaining intro time at which the banner switches to the go signal.
pub const ROUND_GO_SIGNAL_SECONDS: f64 = 0.5;
pub const ROUND_OUTRO_SECONDS: f64 = 2.5;

// AI
pub const AI_REACTION_SECONDS: f64 = 0.15;
pub const AI_OMNISCIENT_REACTION_SECONDS: f64 = 0.05;
pub const AI_APPROACH_DISTANCE: f64 = 80.0;
pub const AI_APPROACH_SPEED_SCALE: f64 = 0.8;
pub const AI_CROWD_DISTANCE: f64 = 40.0;
pub const AI_RETREAT_CHANCE: f64 = 0.4;
pub const AI_ATTACK_DISTANCE: f64 = 80.0;
pub const AI_ATTACK_CHANCE: f64 = 0.15;
pub const AI_AGGRESSION_BONUS: f64 = 0.10;
pub const AI_PUNCH_SHARE: f64 = 0.40;
pub const AI_KICK_SHARE: f64 = 0.35;
pub const AI_JUMP_CHANCE: f64 = 0.02;
pub const AI_THREAT_DISTANCE: f64 = 100.0;
pub const AI_BLOCK_CHANCE: f64 = 0.35;
pub const AI_OMNISCIENT_BLOCK_BONUS: f64 = 0.30;
pub const AI_TAUNT_CHANCE: f64 = 0.10;

// Escalation levels
pub const ESCALATION_AGGRESSIVE: u32 = 1;
pub const ESCALATION_OMNISCIENT: u32 = 2;
pub const ESCALATION_FALSIFIED_HEALTH: u32 = 3;
pub const ESCALATION_CHIP_DAMAGE: u32 = 3;
pub const ESCALATION_HAZARD: u32 = 4;

// Health display falsification
pub const FALSIFIED_HEALTH_BONUS: f64 = 0.15;
pub const FALSIFIED_HEALTH_WOBBLE: f64 = 0.05;
pub const FALSIFIED_HEALTH_WOBBLE_RATE: f64 = 6.0;

// Hazard
pub const HAZARD_SPAWN_CHANCE: f64 = 0.003;
pub const HAZARD_LIFETIME_SECONDS: f64 = 5.0;
pub const HAZARD_TELEPORT_SECONDS: f64 = 0.8;
pub const HAZARD_CONTACT_CHANCE: f64 = 0.04;
pub const HAZARD_CONTACT_DAMAGE: i32 = 4;
pub const HAZARD_WIDTH: f64 = 40.0;
pub const HAZARD_HEIGHT: f64 = 110.0;

pub const ATTACK_ROTATION: [AttackKind; 3] =
    [AttackKind::Punch, AttackKind::Kick, AttackKind::Special];

pub fn attack_stats(kind: AttackKind) -> AttackDefinition {
    match kind {
        AttackKind::Punch => AttackDefinition {
            damage: 8,
            range: 45.0,
            startup_frames: 4,
            active_frames: 3,
            recovery_frames: 8,
            hitstun_frames: 12,
            height: AttackHeight::High,
        },
        AttackKind::Kick => AttackDefinition {
            damage: 12,
            range: 60.0,
            startup_frames: 7,
            active_frames: 4,
            recovery_frames: 12,
            hitstun_frames: 18,
            height: AttackHeight::Mid,
        },
        AttackKind::Special => AttackDefinition {
            damage: 25,
            range: 80.0,
            startup_frames: 12,
            active_frames: 6,
            recovery_frames: 20,
            hitstun_frames: 30,
            height: AttackHeight::Mid,
        },
    }
}
