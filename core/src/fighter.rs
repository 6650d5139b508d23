use serde::{Deserialize, Serialize};

use crate::catalog::AttackCatalog;
use crate::config::ArenaBounds;
use crate::constants::*;
use crate::physics::{apply_gravity, move_and_collide};
use crate::types::*;

/// Per-combatant state machine.
///
/// A [`Fighter`] is rebuilt at the start of every round and mutated once per
/// tick by [`Fighter::update`]. Transitions:
///
/// - `Idle`/`Walking`/`Jumping`/`Blocking` accept an intent: attack, then
///   jump, then block, then crouch/walk.
/// - `Attacking` advances one frame per tick and returns to `Idle` after
///   startup + active + recovery frames.
/// - `Hitstun` and `Knockdown` ignore input until their timer runs out;
///   knockdown recovery grants a short invincibility.
/// - Airborne fighters in a free state read as `Jumping`; landing reads `Idle`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub side: Side,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub facing: i32,
    pub health: i32,
    pub max_health: i32,
    pub width: f64,
    pub height: f64,
    pub on_ground: bool,
    pub state: CombatState,
    /// Seconds spent in the current state.
    pub state_timer: f64,
    pub active_attack: Option<BoundAttack>,
    pub attack_frame_counter: u32,
    pub block_timer: f64,
    pub hitstun_timer: f64,
    pub knockdown_timer: f64,
    pub invincible_timer: f64,
    pub crouching: bool,
    pub special_charge: f64,
    pub special_cooldown: f64,
}

impl Fighter {
    /// A fresh fighter standing on the ground with its left edge at `x`.
    pub fn new(side: Side, x: f64, arena: &ArenaBounds, facing: i32) -> Self {
        Self {
            side,
            x,
            y: arena.ground_y - FIGHTER_HEIGHT,
            vx: 0.0,
            vy: 0.0,
            facing,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            width: FIGHTER_WIDTH,
            height: FIGHTER_HEIGHT,
            on_ground: true,
            state: CombatState::Idle,
            state_timer: 0.0,
            active_attack: None,
            attack_frame_counter: 0,
            block_timer: 0.0,
            hitstun_timer: 0.0,
            knockdown_timer: 0.0,
            invincible_timer: 0.0,
            crouching: false,
            special_charge: 0.0,
            special_cooldown: 0.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    pub fn health_fraction(&self) -> f64 {
        self.health as f64 / self.max_health as f64
    }

    pub fn can_use_special(&self) -> bool {
        self.special_charge >= SPECIAL_CHARGE_MIN && self.special_cooldown <= 0.0
    }

    /// Facing is derived state: always toward the opponent.
    pub fn face_toward(&mut self, target_x: f64) {
        let cx = self.center_x();
        if target_x > cx {
            self.facing = facing::RIGHT;
        } else if target_x < cx {
            self.facing = facing::LEFT;
        }
    }

    /// Advance one tick. Returns the discrete action the fighter started this
    /// tick, if any.
    pub fn update(
        &mut self,
        dt: f64,
        intent: &FighterIntent,
        opponent_center_x: f64,
        arena: &ArenaBounds,
        catalog: &AttackCatalog,
        events: &mut Vec<SimEvent>,
    ) -> Option<ObservedAction> {
        self.face_toward(opponent_center_x);
        self.tick_timers(dt);

        let mut started = None;
        match self.state {
            CombatState::Hitstun => {
                self.vx *= HITSTUN_DECAY;
                self.hitstun_timer -= dt;
                if self.hitstun_timer <= 0.0 {
                    self.hitstun_timer = 0.0;
                    self.enter(CombatState::Idle);
                }
            }
            CombatState::Knockdown => {
                self.vx *= HITSTUN_DECAY;
                self.knockdown_timer -= dt;
                if self.knockdown_timer <= 0.0 {
                    self.knockdown_timer = 0.0;
                    self.invincible_timer = KNOCKDOWN_INVINCIBLE_SECONDS;
                    self.enter(CombatState::Idle);
                }
            }
            CombatState::Attacking => self.advance_attack(),
            CombatState::Idle
            | CombatState::Walking
            | CombatState::Jumping
            | CombatState::Blocking => {
                started = self.accept_intent(intent, catalog, events);
            }
        }

        apply_gravity(self, dt);
        move_and_collide(self, dt, arena);
        self.settle_airborne_state();

        debug_assert!(self.invariants_hold(), "fighter invariants broken: {:?}", self);
        started
    }

    fn tick_timers(&mut self, dt: f64) {
        self.state_timer += dt;
        self.invincible_timer = (self.invincible_timer - dt).max(0.0);
        self.special_cooldown = (self.special_cooldown - dt).max(0.0);
        self.block_timer = (self.block_timer - dt).max(0.0);
        self.add_charge(SPECIAL_CHARGE_PER_SECOND * dt);
    }

    fn advance_attack(&mut self) {
        if self.on_ground {
            self.vx *= GROUND_FRICTION;
        }
        self.attack_frame_counter += 1;
        let total = self
            .active_attack
            .map(|a| a.definition.total_frames())
            .unwrap_or(0);
        if self.attack_frame_counter >= total {
            self.active_attack = None;
            self.attack_frame_counter = 0;
            self.enter(CombatState::Idle);
        }
    }

    fn accept_intent(
        &mut self,
        intent: &FighterIntent,
        catalog: &AttackCatalog,
        events: &mut Vec<SimEvent>,
    ) -> Option<ObservedAction> {
        self.crouching = false;

        if let Some(kind) = intent.attack {
            if self.start_attack(kind, catalog, events) {
                return Some(kind.into());
            }
        }

        if intent.jump && self.on_ground {
            self.vx = intent.move_dir * WALK_SPEED;
            self.vy = JUMP_VELOCITY;
            self.on_ground = false;
            self.enter(CombatState::Jumping);
            events.push(SimEvent::Cue { cue: Cue::Jump });
            return Some(ObservedAction::Jump);
        }

        if intent.block && self.on_ground {
            self.block_timer = BLOCK_HOLD_SECONDS;
            self.vx *= GROUND_FRICTION;
            if self.state != CombatState::Blocking {
                self.enter(CombatState::Blocking);
            }
            return None;
        }

        if self.state == CombatState::Blocking {
            if self.block_timer > 0.0 {
                self.vx *= GROUND_FRICTION;
                return None;
            }
            self.enter(CombatState::Idle);
        }

        if intent.crouch && self.on_ground {
            self.crouching = true;
            self.vx = 0.0;
            if self.state != CombatState::Idle {
                self.enter(CombatState::Idle);
            }
            return None;
        }

        self.vx = intent.move_dir * WALK_SPEED;
        if self.on_ground {
            let next = if intent.move_dir != 0.0 {
                CombatState::Walking
            } else {
                CombatState::Idle
            };
            if self.state != next {
                self.enter(next);
            }
        }
        None
    }

    /// Bind an attack and enter `Attacking`. A special needs a charged meter
    /// and no cooldown; the meter is spent on use.
    fn start_attack(
        &mut self,
        kind: AttackKind,
        catalog: &AttackCatalog,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        if kind == AttackKind::Special {
            if !self.can_use_special() {
                return false;
            }
            self.special_charge = 0.0;
            self.special_cooldown = SPECIAL_COOLDOWN_SECONDS;
        }
        self.active_attack = Some(BoundAttack {
            kind,
            definition: *catalog.get(kind),
        });
        self.attack_frame_counter = 0;
        self.block_timer = 0.0;
        if self.on_ground {
            self.vx = 0.0;
        }
        self.enter(CombatState::Attacking);
        events.push(SimEvent::Cue {
            cue: Cue::for_attack(kind),
        });
        true
    }

    fn settle_airborne_state(&mut self) {
        match self.state {
            CombatState::Idle | CombatState::Walking if !self.on_ground => {
                self.enter(CombatState::Jumping);
            }
            CombatState::Jumping if self.on_ground => {
                self.enter(CombatState::Idle);
            }
            _ => {}
        }
    }

    fn enter(&mut self, state: CombatState) {
        self.state = state;
        self.state_timer = 0.0;
    }

    fn add_charge(&mut self, amount: f64) {
        self.special_charge = (self.special_charge + amount).min(SPECIAL_CHARGE_MAX);
    }

    /// Health loss, clamped at zero.
    pub fn apply_damage(&mut self, amount: i32) {
        debug_assert!(amount >= 0, "negative damage {}", amount);
        self.health = (self.health - amount.max(0)).clamp(0, self.max_health);
    }

    /// A clean hit: hitstun, or knockdown for a special. `push_dir` is the
    /// attacker's facing.
    pub fn receive_hit(&mut self, attack: &BoundAttack, damage: i32, push_dir: f64) {
        self.apply_damage(damage);
        self.add_charge(damage as f64 * SPECIAL_CHARGE_PER_DAMAGE_TAKEN);
        self.active_attack = None;
        self.attack_frame_counter = 0;
        self.block_timer = 0.0;
        self.crouching = false;

        if attack.kind == AttackKind::Special {
            self.hitstun_timer = 0.0;
            self.knockdown_timer = KNOCKDOWN_SECONDS;
            self.vx = push_dir * KNOCKDOWN_PUSHBACK;
            self.vy = KNOCKDOWN_LIFT;
            self.on_ground = false;
            self.enter(CombatState::Knockdown);
        } else {
            self.hitstun_timer = attack.definition.hitstun_seconds();
            self.vx = push_dir * HIT_PUSHBACK;
            self.enter(CombatState::Hitstun);
        }
    }

    /// A blocked hit: light pushback and optional chip damage, state unchanged.
    pub fn receive_block(&mut self, chip: i32, push_dir: f64) {
        self.apply_damage(chip);
        self.vx = push_dir * BLOCK_PUSHBACK;
    }

    pub fn reward_hit(&mut self, damage: i32) {
        self.add_charge(damage as f64 * SPECIAL_CHARGE_PER_DAMAGE_DEALT);
    }

    /// Cross-field consistency of the state machine.
    pub fn invariants_hold(&self) -> bool {
        let health_ok = (0..=self.max_health).contains(&self.health);
        let attack_ok = (self.state == CombatState::Attacking) == self.active_attack.is_some();
        let stun_ok = self.state != CombatState::Hitstun || self.hitstun_timer > 0.0;
        let down_ok = self.state != CombatState::Knockdown || self.knockdown_timer > 0.0;
        let charge_ok = (0.0..=SPECIAL_CHARGE_MAX).contains(&self.special_charge);
        health_ok && attack_ok && stun_ok && down_ok && charge_ok
    }
}

/// Translate the human's buttons into an intent. Jump and attacks are
/// edge-triggered; movement, crouch and block follow held state. Holding away
/// from the opponent on the ground blocks.
pub fn human_intent(
    fighter: &Fighter,
    input: &PlayerInput,
    prev: &PlayerInput,
    opponent_center_x: f64,
) -> FighterIntent {
    let dir = input.direction();
    let toward = if opponent_center_x >= fighter.center_x() {
        facing::RIGHT as f64
    } else {
        facing::LEFT as f64
    };
    let holding_away = dir.x != 0.0 && dir.x == -toward;

    let attack = if input.is_just_pressed(prev, button::SPECIAL) {
        Some(AttackKind::Special)
    } else if input.is_just_pressed(prev, button::KICK) {
        Some(AttackKind::Kick)
    } else if input.is_just_pressed(prev, button::PUNCH) {
        Some(AttackKind::Punch)
    } else {
        None
    };

    FighterIntent {
        move_dir: dir.x,
        jump: input.is_just_pressed(prev, button::JUMP),
        block: fighter.on_ground && holding_away,
        crouch: fighter.on_ground && dir.y > 0.0,
        attack,
    }
}
