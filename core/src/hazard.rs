use serde::{Deserialize, Serialize};

use crate::config::ArenaBounds;
use crate::constants::*;
use crate::escalation::EscalationFlags;
use crate::fighter::Fighter;
use crate::prng::Rng;
use crate::types::*;

/// Transient third presence in the ring. It never attacks the AI, never
/// counts toward round results and cannot take the human below 1 health.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub lifetime: f64,
    pub teleport_timer: f64,
}

impl Hazard {
    pub fn spawn(arena: &ArenaBounds, rng: &mut Rng) -> Self {
        Self {
            x: random_x(arena, rng),
            y: arena.ground_y - HAZARD_HEIGHT,
            width: HAZARD_WIDTH,
            height: HAZARD_HEIGHT,
            lifetime: HAZARD_LIFETIME_SECONDS,
            teleport_timer: HAZARD_TELEPORT_SECONDS,
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

    fn position(&self) -> Vec2 {
        Vec2 {
            x: self.x,
            y: self.y,
        }
    }
}

fn random_x(arena: &ArenaBounds, rng: &mut Rng) -> f64 {
    rng.range(arena.left, arena.right - HAZARD_WIDTH)
}

/// Spawn, age, teleport and apply contact damage for the hazard slot.
pub fn update_hazard(
    slot: &mut Option<Hazard>,
    dt: f64,
    flags: &EscalationFlags,
    human: &mut Fighter,
    arena: &ArenaBounds,
    rng: &mut Rng,
    events: &mut Vec<SimEvent>,
) {
    let Some(hazard) = slot.as_mut() else {
        if flags.hazard_eligible && rng.chance(HAZARD_SPAWN_CHANCE) {
            let hazard = Hazard::spawn(arena, rng);
            log::debug!("hazard spawned at x={:.1}", hazard.x);
            events.push(SimEvent::HazardSpawned {
                at: hazard.position(),
            });
            events.push(SimEvent::Narrative {
                narrative: Narrative::HazardManifested,
            });
            *slot = Some(hazard);
        }
        return;
    };

    hazard.lifetime -= dt;
    if hazard.lifetime <= 0.0 {
        log::debug!("hazard expired");
        *slot = None;
        events.push(SimEvent::HazardDespawned);
        return;
    }

    hazard.teleport_timer -= dt;
    if hazard.teleport_timer <= 0.0 {
        hazard.x = random_x(arena, rng);
        hazard.teleport_timer = HAZARD_TELEPORT_SECONDS;
    }

    if human.is_invincible() || !hazard.bounds().intersects(&human.bounds()) {
        return;
    }
    if rng.chance(HAZARD_CONTACT_CHANCE) {
        let damage = HAZARD_CONTACT_DAMAGE.min(human.health - 1).max(0);
        if damage > 0 {
            human.apply_damage(damage);
            events.push(SimEvent::Cue { cue: Cue::Hit });
            events.push(SimEvent::Narrative {
                narrative: Narrative::HazardTouched,
            });
        }
    }
}

/// Remove the hazard, announcing it if one was present.
pub fn clear_hazard(slot: &mut Option<Hazard>, events: &mut Vec<SimEvent>) {
    if slot.take().is_some() {
        events.push(SimEvent::HazardDespawned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human() -> Fighter {
        Fighter::new(Side::Player, 200.0, &ArenaBounds::default(), facing::RIGHT)
    }

    #[test]
    fn never_spawns_below_level_four() {
        let mut slot = None;
        let mut rng = Rng::new(4);
        let mut f = human();
        let mut events = Vec::new();
        let flags = EscalationFlags::from_level(3);
        for _ in 0..10_000 {
            update_hazard(&mut slot, FRAME_SECONDS, &flags, &mut f, &ArenaBounds::default(), &mut rng, &mut events);
        }
        assert!(slot.is_none());
        assert!(events.is_empty());
    }

    #[test]
    fn spawns_and_expires_at_level_four() {
        let arena = ArenaBounds::default();
        let mut slot = None;
        let mut rng = Rng::new(4);
        let mut f = human();
        f.invincible_timer = 1000.0;
        let mut events = Vec::new();
        let flags = EscalationFlags::from_level(4);

        let mut ticks = 0;
        while slot.is_none() {
            update_hazard(&mut slot, FRAME_SECONDS, &flags, &mut f, &arena, &mut rng, &mut events);
            ticks += 1;
            assert!(ticks < 10_000);
        }
        assert!(matches!(events[0], SimEvent::HazardSpawned { .. }));
        let hazard = slot.clone().unwrap();
        assert!(hazard.x >= arena.left && hazard.x + hazard.width <= arena.right);

        let lifetime_ticks = (HAZARD_LIFETIME_SECONDS / FRAME_SECONDS).ceil() as usize + 1;
        for _ in 0..lifetime_ticks {
            update_hazard(&mut slot, FRAME_SECONDS, &flags, &mut f, &arena, &mut rng, &mut events);
            if slot.is_none() {
                break;
            }
        }
        assert!(slot.is_none());
        assert_eq!(events.last(), Some(&SimEvent::HazardDespawned));
        assert_eq!(f.health, MAX_HEALTH, "invincible human untouched");
    }

    #[test]
    fn contact_damage_never_finishes_the_human() {
        let arena = ArenaBounds::default();
        let mut f = human();
        f.health = 6;
        let mut rng = Rng::new(9);
        let mut events = Vec::new();
        let flags = EscalationFlags::from_level(4);

        for _ in 0..2000 {
            let mut slot = Some(Hazard {
                x: f.x,
                teleport_timer: 10.0,
                ..Hazard::spawn(&arena, &mut rng)
            });
            update_hazard(&mut slot, FRAME_SECONDS, &flags, &mut f, &arena, &mut rng, &mut events);
        }
        assert_eq!(f.health, 1);
        assert!(events.contains(&SimEvent::Narrative {
            narrative: Narrative::HazardTouched
        }));
    }

    #[test]
    fn clear_announces_only_when_present() {
        let mut events = Vec::new();
        let mut slot: Option<Hazard> = None;
        clear_hazard(&mut slot, &mut events);
        assert!(events.is_empty());

        slot = Some(Hazard::spawn(&ArenaBounds::default(), &mut Rng::new(1)));
        clear_hazard(&mut slot, &mut events);
        assert!(slot.is_none());
        assert_eq!(events, vec![SimEvent::HazardDespawned]);
    }
}
