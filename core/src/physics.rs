use crate::config::ArenaBounds;
use crate::constants::*;
use crate::fighter::Fighter;

/// Accelerate vy downward while airborne.
pub fn apply_gravity(f: &mut Fighter, dt: f64) {
    if !f.on_ground {
        f.vy += GRAVITY * dt;
    }
}

/// Integrate position, snap to the ground line and clamp to the arena walls.
pub fn move_and_collide(f: &mut Fighter, dt: f64, arena: &ArenaBounds) {
    f.x += f.vx * dt;
    f.y += f.vy * dt;

    if f.y + f.height >= arena.ground_y {
        f.y = arena.ground_y - f.height;
        f.vy = 0.0;
        f.on_ground = true;
    } else {
        f.on_ground = false;
    }

    f.x = arena.clamp_x(f.x, f.width);
}

/// Push two bodies apart so their centres stay at least
/// `BODY_SEPARATION_RATIO` of their combined width apart. The push is
/// symmetric; a fighter pinned against a wall leaves the rest to the other.
pub fn separate_bodies(a: &mut Fighter, b: &mut Fighter, arena: &ArenaBounds) {
    let (ra, rb) = (a.bounds(), b.bounds());
    let vertical_overlap = ra.y < rb.y + rb.height && ra.y + ra.height > rb.y;
    if !vertical_overlap {
        return;
    }

    let min_gap = (a.width + b.width) * BODY_SEPARATION_RATIO;
    let dx = b.center_x() - a.center_x();
    if dx.abs() >= min_gap {
        return;
    }

    // Direction from a to b; coincident centres split along a's facing
    let dir = if dx > 0.0 {
        1.0
    } else if dx < 0.0 {
        -1.0
    } else {
        a.facing as f64
    };

    let push = (min_gap - dx.abs()) / 2.0;
    a.x = arena.clamp_x(a.x - dir * push, a.width);
    b.x = arena.clamp_x(b.x + dir * push, b.width);

    let deficit = min_gap - (b.center_x() - a.center_x()) * dir;
    if deficit > 0.0 {
        let b_moved = arena.clamp_x(b.x + dir * deficit, b.width);
        let remaining = deficit - (b_moved - b.x).abs();
        b.x = b_moved;
        a.x = arena.clamp_x(a.x - dir * remaining, a.width);
    }
}
