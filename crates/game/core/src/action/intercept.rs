//! Closed-form interception of two patrolling koopas.
//!
//! Koopas walk at one unit per tick, so each hitbox edge is a line `x(t)` with
//! slope ±1. The player can land on both koopas at once only while their
//! hitboxes overlap, which is bounded by the crossing of their leading edges
//! and the crossing of their trailing edges. Bounced trajectories are handled
//! by feeding the unfolded (virtual) hitbox of a koopa after its next bounce.

use crate::geometry::{Interval, Ticks, ceil_div};
use crate::state::Koopa;

/// Where and when the player can hit both koopas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitPoint {
    pub x: i32,
    pub t: Ticks,
}

/// A hitbox and the heading of the koopa carrying it.
#[derive(Clone, Copy, Debug)]
struct Trajectory {
    hitbox: Interval,
    left: bool,
}

impl Trajectory {
    fn current(koopa: &Koopa) -> Self {
        Self {
            hitbox: koopa.hitbox(),
            left: koopa.position().facing_left,
        }
    }

    fn bounced(koopa: &Koopa) -> Self {
        Self {
            hitbox: koopa.bounce_hitbox(),
            left: !koopa.position().facing_left,
        }
    }

    fn double_bounced(koopa: &Koopa) -> Self {
        Self {
            hitbox: koopa.double_bounce_hitbox(),
            left: koopa.position().facing_left,
        }
    }
}

/// Meeting point of `x1 + v1 t` and `x2 + v2 t`, with `t` rounded up.
///
/// `None` when the lines are parallel or meet outside the `i32` x range.
fn line_intersection(x1: i64, v1: i64, x2: i64, v2: i64) -> Option<HitPoint> {
    let t = ceil_div(x1 - x2, v2 - v1)?;
    let x = v1.checked_mul(t).and_then(|dx| x1.checked_add(dx))?;
    Some(HitPoint {
        x: i32::try_from(x).ok()?,
        t,
    })
}

/// Earliest hit on two trajectories heading toward each other.
fn hit_point(a: Trajectory, b: Trajectory, player_x: i32, run_speed: i32) -> Option<HitPoint> {
    if a.left == b.left {
        return None;
    }
    let (left_mover, right_mover) = if a.left { (a, b) } else { (b, a) };
    let left_leading = i64::from(left_mover.hitbox.min());
    let left_trailing = i64::from(left_mover.hitbox.max());
    let right_leading = i64::from(right_mover.hitbox.max());
    let right_trailing = i64::from(right_mover.hitbox.min());

    let leading = line_intersection(left_leading, -1, right_leading, 1)?;
    let trailing = line_intersection(left_trailing, -1, right_trailing, 1)?;
    if trailing.t < 0 {
        // Already past each other.
        return None;
    }

    let px = i64::from(player_x);
    let player_left = i64::from(leading.x) < px;
    let pv = i64::from(run_speed) * if player_left { -1 } else { 1 };
    let (middle, front, back) = if player_left {
        (
            line_intersection(left_trailing, -1, right_leading, 1)?,
            line_intersection(px, pv, right_leading, 1)?,
            line_intersection(px, pv, left_trailing, -1)?,
        )
    } else {
        (
            line_intersection(left_leading, -1, right_trailing, 1)?,
            line_intersection(px, pv, left_leading, -1)?,
            line_intersection(px, pv, right_trailing, 1)?,
        )
    };

    if front.t <= leading.t {
        // The player gets there first and waits for the overlap.
        Some(leading)
    } else if front.t <= middle.t {
        Some(front)
    } else if back.t <= trailing.t {
        Some(back)
    } else {
        None
    }
}

/// Resolves a double stomp, escalating through bounced trajectories.
///
/// Tries the current headings, then the earlier bouncer bounced, then both
/// bounced, then the earlier bouncer double-bounced against the other
/// bounced. Returns `None` if every stage fails.
pub fn resolve(first: &Koopa, second: &Koopa, player_x: i32, run_speed: i32) -> Option<HitPoint> {
    let attempt = |a, b| hit_point(a, b, player_x, run_speed);
    let first_bounces_first = first.time_to_bounce() < second.time_to_bounce();

    attempt(Trajectory::current(first), Trajectory::current(second))
        .or_else(|| {
            if first_bounces_first {
                attempt(Trajectory::bounced(first), Trajectory::current(second))
            } else {
                attempt(Trajectory::current(first), Trajectory::bounced(second))
            }
        })
        .or_else(|| attempt(Trajectory::bounced(first), Trajectory::bounced(second)))
        .or_else(|| {
            if first_bounces_first {
                attempt(Trajectory::double_bounced(first), Trajectory::bounced(second))
            } else {
                attempt(Trajectory::bounced(first), Trajectory::double_bounced(second))
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;
    use crate::state::{KoopaId, RoadId};

    fn koopa(id: u16, x: i32, facing_left: bool) -> Koopa {
        Koopa::new(KoopaId(id), Position::new(facing_left, RoadId(0), x), 1000)
    }

    #[test]
    fn line_intersection_rounds_time_up() {
        assert_eq!(line_intersection(484, -1, 316, 1), Some(HitPoint { x: 400, t: 84 }));
        assert_eq!(line_intersection(400, 3, 485, -1), Some(HitPoint { x: 466, t: 22 }));
        assert_eq!(line_intersection(10, 1, 20, 1), None);
    }

    #[test]
    fn line_intersection_past_i32_range_is_none() {
        let edge = i64::from(i32::MAX);
        assert_eq!(line_intersection(edge, 1, edge + 10, -1), None);
        assert_eq!(
            line_intersection(edge - 10, 1, edge, -1),
            Some(HitPoint { x: i32::MAX - 5, t: 5 })
        );
    }

    #[test]
    fn approaching_pair_with_player_between() {
        let hit = resolve(&koopa(18, 300, false), &koopa(19, 500, true), 400, 3);
        assert_eq!(hit, Some(HitPoint { x: 400, t: 84 }));
    }

    #[test]
    fn same_heading_waits_for_earlier_bounce() {
        let hit = resolve(&koopa(18, 300, true), &koopa(19, 500, true), 400, 3);
        assert_eq!(hit, Some(HitPoint { x: 114, t: 370 }));

        let hit = resolve(&koopa(18, 300, false), &koopa(19, 600, false), 100, 3);
        assert_eq!(hit, Some(HitPoint { x: 850, t: 535 }));
    }

    #[test]
    fn distant_player_needs_both_bounces() {
        let hit = resolve(&koopa(18, 300, false), &koopa(19, 500, true), 900, 3);
        assert_eq!(hit, Some(HitPoint { x: 615, t: 1070 }));
    }

    #[test]
    fn double_bounce_escalation() {
        let hit = resolve(&koopa(18, 20, true), &koopa(19, 61, true), 300, 3);
        assert_eq!(hit, Some(HitPoint { x: 495, t: 511 }));
    }

    #[test]
    fn same_heading_trajectories_never_meet_directly() {
        let a = Trajectory::current(&koopa(18, 300, true));
        let b = Trajectory::current(&koopa(19, 500, true));
        assert_eq!(hit_point(a, b, 400, 3), None);
    }
}
