//! Roaming koopas and their closed-form motion.
//!
//! A koopa walks at one unit per tick and reflects off both ends of its road.
//! All intercept math here works on the unfolded straight-line trajectory, so
//! "bounce" positions are virtual points past the road edge that the koopa
//! would have reached without reflecting.

use core::fmt;

use crate::geometry::{Interval, NEVER, Position, Ticks, ceil_div};
use crate::state::{ArtifactId, KoopaId};

/// Hitbox relative to the koopa's x.
pub const KOOPA_HITBOX: Interval = Interval::fixed(-16, 16);
/// Leftmost x a koopa walks to before turning around.
pub const KOOPA_LEFT_MARGIN: i32 = 15;
const KOOPA_SPEED: i64 = 1;

/// Koopa lifecycle. Only moves forward, except on level respawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KoopaStatus {
    #[default]
    Active,
    Stomped,
    Carried,
}

impl KoopaStatus {
    /// Two-bit value stored in the level completion code.
    pub const fn code(self) -> u32 {
        match self {
            Self::Active => 0,
            Self::Stomped => 1,
            Self::Carried => 2,
        }
    }
}

/// A koopa on one road of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Koopa {
    id: KoopaId,
    pos: Position,
    road_length: i32,
    status: KoopaStatus,
    artifact: Option<ArtifactId>,
    animation_time: Ticks,
}

impl Koopa {
    /// Creates an active koopa without an artifact.
    ///
    /// `road_length` is the length of the road the koopa patrols.
    pub fn new(id: KoopaId, pos: Position, road_length: i32) -> Self {
        Self {
            id,
            pos,
            road_length,
            status: KoopaStatus::Active,
            artifact: None,
            animation_time: 0,
        }
    }

    /// Gives the koopa an artifact and the stomp animation time that goes with it.
    #[must_use]
    pub fn with_artifact(mut self, artifact: ArtifactId, animation_time: Ticks) -> Self {
        self.artifact = Some(artifact);
        self.animation_time = animation_time;
        self
    }

    /// Rebinds the koopa to a road of the given length.
    #[must_use]
    pub fn with_road_length(mut self, road_length: i32) -> Self {
        self.road_length = road_length;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: KoopaStatus) -> Self {
        self.status = status;
        self
    }

    pub const fn id(&self) -> KoopaId {
        self.id
    }

    pub const fn position(&self) -> Position {
        self.pos
    }

    pub const fn road_length(&self) -> i32 {
        self.road_length
    }

    pub const fn status(&self) -> KoopaStatus {
        self.status
    }

    pub const fn artifact(&self) -> Option<ArtifactId> {
        self.artifact
    }

    pub const fn has_artifact(&self) -> bool {
        self.artifact.is_some()
    }

    pub const fn animation_time(&self) -> Ticks {
        self.animation_time
    }

    pub const fn is_active(&self) -> bool {
        matches!(self.status, KoopaStatus::Active)
    }

    pub(crate) fn set_status(&mut self, status: KoopaStatus) {
        self.status = status;
    }

    pub fn hitbox(&self) -> Interval {
        KOOPA_HITBOX.with_offset(self.pos.x)
    }

    /// True when `pos` is on the koopa's road and inside its hitbox.
    pub fn contains(&self, pos: &Position) -> bool {
        pos.shares_road_with(&self.pos) && self.hitbox().includes(pos.x)
    }

    /// Moves the koopa for `time` ticks, reflecting off the road ends.
    ///
    /// Stomped and carried koopas stay put, as do koopas on a road shorter
    /// than [`KOOPA_LEFT_MARGIN`].
    pub fn advance(&mut self, time: Ticks) {
        if !self.is_active() {
            return;
        }
        let margin = i64::from(KOOPA_LEFT_MARGIN);
        let width = i64::from(self.road_length) - margin + 1;
        if width <= 0 {
            return;
        }
        // Unfold the walk onto a line; one lap is out and back.
        let lap = 2 * width;
        let travel = time.rem_euclid(lap) * KOOPA_SPEED % lap;
        let offset = i64::from(self.pos.x) - margin;
        let unfolded = if self.pos.facing_left {
            offset - travel
        } else {
            offset + travel
        };
        let phase = unfolded.rem_euclid(lap);
        let (x, left) = if phase < width {
            (margin + phase, self.pos.facing_left)
        } else {
            (margin + lap - 1 - phase, !self.pos.facing_left)
        };
        let x = i32::try_from(x).unwrap_or(self.road_length);
        self.pos = self.pos.with_facing_left(left).with_x(x);
    }

    /// Virtual position on the unfolded trajectory just after the next bounce,
    /// facing the post-bounce direction.
    pub fn bounce_position(&self) -> Position {
        let x = self.pos.x;
        if self.pos.facing_left {
            Position::new(false, self.pos.road, 2 * KOOPA_LEFT_MARGIN - x - 1)
        } else {
            Position::new(true, self.pos.road, self.road_length + 1 + (self.road_length - x))
        }
    }

    /// Virtual position on the unfolded trajectory after two bounces.
    pub fn double_bounce_position(&self) -> Position {
        let x = self.pos.x;
        if self.pos.facing_left {
            Position::new(true, self.pos.road, x + self.road_length + 2)
        } else {
            Position::new(false, self.pos.road, x - self.road_length - 2)
        }
    }

    pub fn bounce_hitbox(&self) -> Interval {
        KOOPA_HITBOX.with_offset(self.bounce_position().x)
    }

    pub fn double_bounce_hitbox(&self) -> Interval {
        KOOPA_HITBOX.with_offset(self.double_bounce_position().x)
    }

    /// Ticks until the koopa next turns around.
    pub fn time_to_bounce(&self) -> Ticks {
        let x = i64::from(self.pos.x);
        let distance = if self.pos.facing_left {
            x + 1 - i64::from(KOOPA_LEFT_MARGIN)
        } else {
            i64::from(self.road_length) + 1 - x
        };
        ceil_div(distance, KOOPA_SPEED).unwrap_or(NEVER)
    }

    /// Ticks until a player at `player_pos` running toward the koopa at
    /// `player_speed` enters its hitbox.
    ///
    /// Considers both the koopa's current heading and its trajectory after the
    /// next bounce, and returns the earlier non-negative meeting time. Returns
    /// [`NEVER`] when neither trajectory closes on the player.
    pub fn time_to_hitbox_entry(&self, player_pos: &Position, player_speed: i32) -> Ticks {
        if self.contains(player_pos) {
            return 0;
        }

        let player_x = i64::from(player_pos.x);
        let koopa_x = i64::from(self.pos.x);
        let length = i64::from(self.road_length);
        let margin = i64::from(KOOPA_LEFT_MARGIN);

        // The player runs left when the koopa is to its left.
        let player_left = player_x > koopa_x;
        let hitbox = self.hitbox();
        let (hitbox_x, edge) = if player_left {
            (i64::from(hitbox.max()), i64::from(KOOPA_HITBOX.max()))
        } else {
            (i64::from(hitbox.min()), i64::from(KOOPA_HITBOX.min()))
        };
        let mirrored_x = if self.pos.facing_left {
            2 * margin - koopa_x - 1
        } else {
            2 * length - koopa_x + 1
        };
        let bounce_hitbox_x = mirrored_x + edge;

        let koopa_v = match (self.is_active(), self.pos.facing_left) {
            (false, _) => 0,
            (true, true) => -KOOPA_SPEED,
            (true, false) => KOOPA_SPEED,
        };
        let player_v = if player_left { -1 } else { 1 } * i64::from(player_speed);

        let time = ceil_div(player_x - hitbox_x, koopa_v - player_v).unwrap_or(NEVER);
        let bounce_time = if koopa_v == -player_v {
            NEVER
        } else {
            ceil_div(bounce_hitbox_x - player_x, koopa_v + player_v).unwrap_or(NEVER)
        };
        time.min(if bounce_time >= 0 { bounce_time } else { NEVER })
    }

    /// True when status and position match; identity and constants are ignored.
    pub fn same_state(&self, other: &Self) -> bool {
        self.status == other.status && self.pos == other.pos
    }
}

impl fmt::Display for Koopa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Koopa {} ({}", self.id, self.status)?;
        if let Some(artifact) = self.artifact {
            write!(f, ", artifact #{artifact}")?;
        }
        write!(f, " @ {})", self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RoadId;

    const ROAD_LENGTH: i32 = 1000;

    fn koopa(x: i32, facing_left: bool) -> Koopa {
        Koopa::new(KoopaId(18), Position::new(facing_left, RoadId(0), x), ROAD_LENGTH)
    }

    fn player(x: i32, facing_left: bool) -> Position {
        Position::new(facing_left, RoadId(0), x)
    }

    #[test]
    fn intercept_while_approaching() {
        assert_eq!(koopa(100, true).time_to_hitbox_entry(&player(140, true), 3), 12);
        assert_eq!(koopa(575, false).time_to_hitbox_entry(&player(128, true), 4), 144);
        assert_eq!(koopa(200, false).time_to_hitbox_entry(&player(600, false), 1), 192);
        assert_eq!(koopa(200, true).time_to_hitbox_entry(&player(100, false), 2), 28);
    }

    #[test]
    fn intercept_after_bounce_when_sooner() {
        assert_eq!(koopa(100, true).time_to_hitbox_entry(&player(800, true), 4), 171);
        assert_eq!(koopa(907, false).time_to_hitbox_entry(&player(384, false), 3), 174);
    }

    #[test]
    fn intercept_is_immediate_inside_hitbox() {
        let target = koopa(100, true);
        for x in [100, 90, 115, 84, 116] {
            assert_eq!(target.time_to_hitbox_entry(&player(x, false), 3), 0);
        }
    }

    #[test]
    fn stomped_koopa_is_reached_at_full_player_speed() {
        let target = koopa(500, false).with_status(KoopaStatus::Stomped);
        assert_eq!(target.time_to_hitbox_entry(&player(580, false), 4), 16);
        assert_eq!(target.time_to_hitbox_entry(&player(420, false), 4), 16);
    }

    #[test]
    fn advance_reflects_at_both_ends() {
        let mut left_walker = koopa(20, true);
        left_walker.advance(10);
        // 20 - 10 = 10 reflects to 15 + (15 - 10 - 1) = 19.
        assert_eq!(left_walker.position(), player(19, false));

        let mut right_walker = koopa(995, false);
        right_walker.advance(10);
        // 1005 reflects to 1000 + 1 - 5 = 996.
        assert_eq!(right_walker.position(), player(996, true));

        let mut long_walk = koopa(500, false);
        long_walk.advance(2 * 986);
        assert_eq!(long_walk.position(), player(500, false));
    }

    #[test]
    fn advance_matches_tick_by_tick_walk() {
        for (x, facing_left) in [(15, true), (1000, false), (321, true), (640, false)] {
            let mut stepped = koopa(x, facing_left);
            for time in 1..=4000 {
                stepped.advance(1);
                let mut jumped = koopa(x, facing_left);
                jumped.advance(time);
                assert_eq!(jumped.position(), stepped.position(), "x {x} after {time}");
            }
        }
    }

    #[test]
    fn advance_handles_huge_times() {
        let mut target = koopa(500, false);
        target.advance(i64::MAX);
        let x = target.position().x;
        assert!((KOOPA_LEFT_MARGIN..=ROAD_LENGTH).contains(&x), "{x}");
    }

    #[test]
    fn advance_returns_on_road_shorter_than_margin() {
        let mut stuck = Koopa::new(KoopaId(5), Position::new(false, RoadId(0), 13), 10);
        stuck.advance(1);
        assert_eq!(stuck.position(), Position::new(false, RoadId(0), 13));
    }

    #[test]
    fn inactive_koopas_do_not_move() {
        let mut target = koopa(500, true).with_status(KoopaStatus::Stomped);
        target.advance(100);
        assert_eq!(target.position(), player(500, true));
    }

    #[test]
    fn bounce_geometry() {
        let left = koopa(100, true);
        assert_eq!(left.bounce_position(), player(-71, false));
        assert_eq!(left.double_bounce_position(), player(1102, true));
        assert_eq!(left.time_to_bounce(), 86);

        let right = koopa(900, false);
        assert_eq!(right.bounce_position(), player(1101, true));
        assert_eq!(right.double_bounce_position(), player(-102, false));
        assert_eq!(right.time_to_bounce(), 101);
        assert_eq!(right.bounce_hitbox(), Interval::fixed(1085, 1117));
    }
}
