use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::escalation::{chip_damage, inflate_damage, EscalationFlags};
use crate::fighter::Fighter;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contact {
    Clean,
    Blocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HitOutcome {
    pub attacker: Side,
    pub defender: Side,
    pub attack: AttackKind,
    pub contact: Contact,
    /// Health actually removed from the defender.
    pub damage: i32,
    pub spark: Vec2,
    pub knockdown: bool,
}

/// The attack `f` can land this tick, if any.
///
/// An attack is checked on exactly one tick: the tick its frame counter
/// equals the move's startup frames. Frames before or after never connect,
/// even with full overlap.
pub fn connecting_attack(f: &Fighter) -> Option<BoundAttack> {
    if f.state != CombatState::Attacking {
        return None;
    }
    f.active_attack
        .filter(|a| a.definition.connects_on(f.attack_frame_counter))
}

/// Strike zone of an attack: `range` wide from the leading edge, covering
/// the upper body.
pub fn attack_hurtbox(attacker: &Fighter, def: &AttackDefinition) -> Rect {
    let x = if attacker.facing == facing::RIGHT {
        attacker.x + attacker.width
    } else {
        attacker.x - def.range
    };
    Rect {
        x,
        y: attacker.y + attacker.height * ATTACK_BOX_TOP_RATIO,
        width: def.range,
        height: attacker.height * ATTACK_BOX_HEIGHT_RATIO,
    }
}

/// Apply `attack` from `attacker` to `defender` if it reaches. The attack is
/// passed separately so both directions can be resolved from the same
/// pre-hit snapshot.
pub fn resolve_hit(
    attacker: &mut Fighter,
    defender: &mut Fighter,
    attack: &BoundAttack,
    flags: &EscalationFlags,
) -> Option<HitOutcome> {
    if defender.is_invincible() || defender.state == CombatState::Knockdown {
        return None;
    }

    let strike = attack_hurtbox(attacker, &attack.definition);
    let body = defender.bounds();
    if !strike.intersects(&body) {
        return None;
    }

    let push_dir = attacker.facing as f64;
    let spark = strike.overlap_center(&body);
    let base = attack.definition.damage;

    if defender.state == CombatState::Blocking {
        let chip = chip_damage(base, flags).min(defender.health);
        defender.receive_block(chip, push_dir);
        log::trace!(
            "{:?} blocked {} from {:?} (chip {})",
            defender.side,
            attack.kind.name(),
            attacker.side,
            chip
        );
        return Some(HitOutcome {
            attacker: attacker.side,
            defender: defender.side,
            attack: attack.kind,
            contact: Contact::Blocked,
            damage: chip,
            spark,
            knockdown: false,
        });
    }

    let damage = if defender.side == Side::Player {
        inflate_damage(base, flags)
    } else {
        base
    };
    let dealt = damage.min(defender.health);
    defender.receive_hit(attack, damage, push_dir);
    attacker.reward_hit(dealt);

    let knockdown = defender.state == CombatState::Knockdown;
    if knockdown {
        log::debug!("{:?} knocked down by {:?}", defender.side, attacker.side);
    }
    log::trace!(
        "{:?} hit {:?} with {} for {} (health {})",
        attacker.side,
        defender.side,
        attack.kind.name(),
        dealt,
        defender.health
    );

    Some(HitOutcome {
        attacker: attacker.side,
        defender: defender.side,
        attack: attack.kind,
        contact: Contact::Clean,
        damage: dealt,
        spark,
        knockdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaBounds;

    /// Attacker on the left facing right, defender just inside punch range.
    fn pair(attack: AttackKind) -> (Fighter, Fighter, BoundAttack) {
        let arena = ArenaBounds::default();
        let mut attacker = Fighter::new(Side::Opponent, 300.0, &arena, facing::RIGHT);
        let defender = Fighter::new(Side::Player, 370.0, &arena, facing::LEFT);
        let bound = BoundAttack {
            kind: attack,
            definition: attack_stats(attack),
        };
        attacker.state = CombatState::Attacking;
        attacker.active_attack = Some(bound);
        attacker.attack_frame_counter = bound.definition.startup_frames;
        (attacker, defender, bound)
    }

    #[test]
    fn punch_on_connecting_frame() {
        let (mut a, mut d, punch) = pair(AttackKind::Punch);
        assert_eq!(connecting_attack(&a), Some(punch));

        let outcome = resolve_hit(&mut a, &mut d, &punch, &EscalationFlags::default()).unwrap();
        assert_eq!(outcome.contact, Contact::Clean);
        assert_eq!(outcome.damage, 8);
        assert_eq!(d.health, 92);
        assert_eq!(d.state, CombatState::Hitstun);
        assert!((d.hitstun_timer - 12.0 / 60.0).abs() < 1e-9);
        assert!(d.vx > 0.0, "pushed away from attacker");
        assert!(!outcome.knockdown);
    }

    #[test]
    fn adjacent_frames_never_connect() {
        for kind in [AttackKind::Punch, AttackKind::Kick, AttackKind::Special] {
            let (mut a, _, bound) = pair(kind);
            let startup = bound.definition.startup_frames;
            for frame in [startup - 1, startup + 1] {
                a.attack_frame_counter = frame;
                assert_eq!(connecting_attack(&a), None, "{:?} frame {}", kind, frame);
            }
            // Still inside the active window, still no hit
            assert!(bound.definition.is_active_frame(startup + 1));
        }
    }

    #[test]
    fn out_of_range_misses() {
        let (mut a, mut d, punch) = pair(AttackKind::Punch);
        d.x = a.x + a.width + punch.definition.range;
        assert!(resolve_hit(&mut a, &mut d, &punch, &EscalationFlags::default()).is_none());
        assert_eq!(d.health, MAX_HEALTH);
    }

    #[test]
    fn hurtbox_faces_left() {
        let (mut a, _, punch) = pair(AttackKind::Punch);
        a.facing = facing::LEFT;
        let strike = attack_hurtbox(&a, &punch.definition);
        assert_eq!(strike.x, a.x - punch.definition.range);
        assert_eq!(strike.x + strike.width, a.x);
    }

    #[test]
    fn block_negates_damage_below_chip_level() {
        let (mut a, mut d, kick) = pair(AttackKind::Kick);
        d.state = CombatState::Blocking;
        d.block_timer = BLOCK_HOLD_SECONDS;

        let flags = EscalationFlags::from_level(2);
        let outcome = resolve_hit(&mut a, &mut d, &kick, &flags).unwrap();
        assert_eq!(outcome.contact, Contact::Blocked);
        assert_eq!(d.health, MAX_HEALTH);
        assert_eq!(d.state, CombatState::Blocking);
        assert_eq!(d.vx, BLOCK_PUSHBACK);
    }

    #[test]
    fn block_takes_chip_at_level_three() {
        let (mut a, mut d, special) = pair(AttackKind::Special);
        d.state = CombatState::Blocking;
        d.block_timer = BLOCK_HOLD_SECONDS;

        let flags = EscalationFlags::from_level(3);
        let outcome = resolve_hit(&mut a, &mut d, &special, &flags).unwrap();
        assert_eq!(outcome.damage, 3);
        assert_eq!(d.health, MAX_HEALTH - 3);
        assert_eq!(d.state, CombatState::Blocking);
        assert_eq!(d.knockdown_timer, 0.0);
    }

    #[test]
    fn only_special_knocks_down() {
        for kind in [AttackKind::Punch, AttackKind::Kick] {
            let (mut a, mut d, bound) = pair(kind);
            resolve_hit(&mut a, &mut d, &bound, &EscalationFlags::default()).unwrap();
            assert_eq!(d.state, CombatState::Hitstun);
        }
        let (mut a, mut d, special) = pair(AttackKind::Special);
        let outcome = resolve_hit(&mut a, &mut d, &special, &EscalationFlags::default()).unwrap();
        assert!(outcome.knockdown);
        assert_eq!(d.state, CombatState::Knockdown);
        assert!(!d.on_ground);
    }

    #[test]
    fn invincible_defender_is_skipped() {
        let (mut a, mut d, punch) = pair(AttackKind::Punch);
        d.invincible_timer = 0.3;
        assert!(resolve_hit(&mut a, &mut d, &punch, &EscalationFlags::default()).is_none());
    }

    #[test]
    fn hidden_inflation_only_hurts_the_human() {
        let flags = EscalationFlags::from_level(3);

        let (mut a, mut d, punch) = pair(AttackKind::Punch);
        resolve_hit(&mut a, &mut d, &punch, &flags).unwrap();
        assert_eq!(d.health, MAX_HEALTH - 10);

        let (mut a, mut d, punch) = pair(AttackKind::Punch);
        a.side = Side::Player;
        d.side = Side::Opponent;
        resolve_hit(&mut a, &mut d, &punch, &flags).unwrap();
        assert_eq!(d.health, MAX_HEALTH - 8);
    }

    #[test]
    fn landing_a_hit_builds_meter() {
        let (mut a, mut d, kick) = pair(AttackKind::Kick);
        resolve_hit(&mut a, &mut d, &kick, &EscalationFlags::default()).unwrap();
        assert_eq!(a.special_charge, 12.0);
        assert!(d.special_charge > 0.0);
    }
}
