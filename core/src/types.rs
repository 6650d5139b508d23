use serde::{Deserialize, Serialize};

use crate::constants::TICK_RATE;

// ── Primitives ──────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned rectangle; `x`/`y` is the top-left corner, y grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Strict intersection: rectangles that only share an edge do not overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Centre of the shared region. Only meaningful when the rectangles intersect.
    pub fn overlap_center(&self, other: &Rect) -> Vec2 {
        let left = self.x.max(other.x);
        let right = (self.x + self.width).min(other.x + other.width);
        let top = self.y.max(other.y);
        let bottom = (self.y + self.height).min(other.y + other.height);
        Vec2 {
            x: (left + right) / 2.0,
            y: (top + bottom) / 2.0,
        }
    }
}

// ── Sides ───────────────────────────────────────────────────

/// The human-controlled fighter is always `Player`; the AI is `Opponent`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player = 0,
    Opponent = 1,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Player, Side::Opponent];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Facing direction: Right = 1, Left = -1.
pub mod facing {
    pub const RIGHT: i32 = 1;
    pub const LEFT: i32 = -1;
}

// ── Input ───────────────────────────────────────────────────

/// Button bitmask constants.
pub mod button {
    pub const LEFT: u8 = 1;
    pub const RIGHT: u8 = 2;
    pub const DOWN: u8 = 4;
    pub const JUMP: u8 = 8;
    pub const PUNCH: u8 = 16;
    pub const KICK: u8 = 32;
    pub const SPECIAL: u8 = 64;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub buttons: u8,
}

pub const NULL_INPUT: PlayerInput = PlayerInput { buttons: 0 };

impl PlayerInput {
    pub fn new(buttons: u8) -> Self {
        Self { buttons }
    }

    pub fn is_pressed(&self, button: u8) -> bool {
        self.buttons & button != 0
    }

    /// Edge-triggered: held now, not held on the previous tick.
    pub fn is_just_pressed(&self, prev: &PlayerInput, button: u8) -> bool {
        self.is_pressed(button) && !prev.is_pressed(button)
    }

    /// Directional vector; x is -1/0/1, y is 1 while `DOWN` is held.
    pub fn direction(&self) -> Vec2 {
        let mut x = 0.0;
        if self.is_pressed(button::LEFT) {
            x -= 1.0;
        }
        if self.is_pressed(button::RIGHT) {
            x += 1.0;
        }
        let y = if self.is_pressed(button::DOWN) { 1.0 } else { 0.0 };
        Vec2 { x, y }
    }
}

// ── Attacks ─────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    Punch,
    Kick,
    Special,
}

impl AttackKind {
    pub fn name(self) -> &'static str {
        match self {
            AttackKind::Punch => "punch",
            AttackKind::Kick => "kick",
            AttackKind::Special => "special",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "punch" => Some(Self::Punch),
            "kick" => Some(Self::Kick),
            "special" => Some(Self::Special),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Categorization only; no blocking rule reads it yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackHeight {
    High,
    Mid,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackDefinition {
    pub damage: i32,
    pub range: f64,
    pub startup_frames: u32,
    pub active_frames: u32,
    pub recovery_frames: u32,
    pub hitstun_frames: u32,
    pub height: AttackHeight,
}

impl AttackDefinition {
    pub fn total_frames(&self) -> u32 {
        self.startup_frames + self.active_frames + self.recovery_frames
    }

    /// Whether `frame` lies in the active window.
    pub fn is_active_frame(&self, frame: u32) -> bool {
        frame >= self.startup_frames && frame < self.startup_frames + self.active_frames
    }

    /// The only frame on which the attack may land: the first active one.
    pub fn connects_on(&self, frame: u32) -> bool {
        frame == self.startup_frames
    }

    pub fn hitstun_seconds(&self) -> f64 {
        self.hitstun_frames as f64 / TICK_RATE as f64
    }
}

/// An attack bound to a fighter for the duration of its animation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundAttack {
    pub kind: AttackKind,
    pub definition: AttackDefinition,
}

// ── Fighter control ─────────────────────────────────────────

/// Exactly one of these is active per fighter at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatState {
    Idle,
    Walking,
    Jumping,
    Blocking,
    Attacking,
    Hitstun,
    Knockdown,
}

impl CombatState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombatState::Idle => "idle",
            CombatState::Walking => "walking",
            CombatState::Jumping => "jumping",
            CombatState::Blocking => "blocking",
            CombatState::Attacking => "attacking",
            CombatState::Hitstun => "hitstun",
            CombatState::Knockdown => "knockdown",
        }
    }

    /// States in which the fighter ignores control input.
    pub fn is_locked(&self) -> bool {
        matches!(
            self,
            CombatState::Attacking | CombatState::Hitstun | CombatState::Knockdown
        )
    }
}

/// A discrete action the human fighter just started, as seen by the AI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservedAction {
    Punch,
    Kick,
    Special,
    Jump,
}

impl From<AttackKind> for ObservedAction {
    fn from(kind: AttackKind) -> Self {
        match kind {
            AttackKind::Punch => ObservedAction::Punch,
            AttackKind::Kick => ObservedAction::Kick,
            AttackKind::Special => ObservedAction::Special,
        }
    }
}

/// What a controller (human input or AI) asks a fighter to do this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FighterIntent {
    /// Horizontal drive in [-1, 1], scaled by walk speed.
    pub move_dir: f64,
    pub jump: bool,
    pub block: bool,
    pub crouch: bool,
    pub attack: Option<AttackKind>,
}

impl FighterIntent {
    pub const NONE: FighterIntent = FighterIntent {
        move_dir: 0.0,
        jump: false,
        block: false,
        crouch: false,
        attack: None,
    };

    /// The sustained part of an intent: movement, block and crouch carry over,
    /// one-shot actions do not.
    pub fn held(&self) -> FighterIntent {
        FighterIntent {
            jump: false,
            attack: None,
            ..*self
        }
    }
}

// ── Match ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Starting,
    Fighting,
    Ended,
    MatchOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEndReason {
    Knockout,
    TimeUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    pub winner: Side,
    pub reason: RoundEndReason,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub round_number: u32,
    pub player_wins: u32,
    pub opponent_wins: u32,
    pub round_timer: f64,
    pub phase: RoundPhase,
    /// Countdown for the current `Starting` or `Ended` phase.
    pub phase_timer: f64,
    /// Consecutive clean hits by the human fighter.
    pub combo_count: u32,
    pub combo_window: f64,
    pub score: u32,
    pub last_round: Option<RoundResult>,
}

impl MatchState {
    pub fn wins(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_wins,
            Side::Opponent => self.opponent_wins,
        }
    }

    /// Match winner once the match is over.
    pub fn winner(&self) -> Option<Side> {
        if self.phase != RoundPhase::MatchOver {
            return None;
        }
        self.last_round.map(|r| r.winner)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    /// Clean hits landed, by attacking side.
    pub hits_landed: [u32; 2],
    /// Hits absorbed by blocking, by defending side.
    pub hits_blocked: [u32; 2],
    pub best_combo: u32,
}

// ── Events ──────────────────────────────────────────────────

/// Named audio cues; the sink is best-effort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Jump,
    Hit,
    Block,
    /// Shared cue for punch and kick.
    Strike,
    Special,
}

impl Cue {
    pub fn for_attack(kind: AttackKind) -> Cue {
        match kind {
            AttackKind::Punch | AttackKind::Kick => Cue::Strike,
            AttackKind::Special => Cue::Special,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Narrative {
    OpponentOmniscient,
    HazardManifested,
    HazardTouched,
}

impl Narrative {
    pub fn message(&self) -> &'static str {
        match self {
            Narrative::OpponentOmniscient => "the opponent knew what you would do",
            Narrative::HazardManifested => "something else has entered the ring",
            Narrative::HazardTouched => "it touched you",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    Cue { cue: Cue },
    HitSpark { at: Vec2, blocked: bool },
    RoundAnnounced { round: u32 },
    FightStarted { round: u32 },
    RoundOver { result: RoundResult },
    MatchOver { winner: Side },
    Narrative { narrative: Narrative },
    HazardSpawned { at: Vec2 },
    HazardDespawned,
}
