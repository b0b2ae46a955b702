//! Dominance test between two points of a level search.
//!
//! A later state is equivalent to an earlier one when nothing meaningful
//! changed except time the player could have spent running: same NPC slot
//! generator, same level progress, same lockout situation, and a position
//! reachable from the earlier one within the elapsed time.
use mim_core::{GameState, Ticks};

/// Whether `new` (reached at `new_time`) is equivalent to `old` (reached at
/// `old_time`).
pub(crate) fn is_equivalent(
    new: &GameState,
    new_time: Ticks,
    old: &GameState,
    old_time: Ticks,
) -> bool {
    within_run_reach(new, old, (new_time - old_time).abs())
        && same_progress(new, new_time, old, old_time)
        && new.rng() == old.rng()
}

fn within_run_reach(new: &GameState, old: &GameState, elapsed: Ticks) -> bool {
    let (new_player, old_player) = (new.player(), old.player());
    let (new_pos, old_pos) = (new_player.position(), old_player.position());
    if new_player.is_in_castle() != old_player.is_in_castle()
        || new_pos.road != old_pos.road
        || new.current_level_key() != old.current_level_key()
    {
        return false;
    }
    new_pos.x_distance(&old_pos) <= i64::from(old_player.run_speed()) * elapsed
}

fn same_progress(new: &GameState, new_time: Ticks, old: &GameState, old_time: Ticks) -> bool {
    let (new_player, old_player) = (new.player(), old.player());
    if new_player.has_mount() != old_player.has_mount() {
        return false;
    }

    let new_code = new.current_level().map(|level| level.completion_code());
    let old_code = old.current_level().map(|level| level.completion_code());
    if new_code != old_code {
        return false;
    }

    // Lockouts are too wide for the completion code.
    let new_delay = new_player.transition_delay_end() - new_time;
    let old_delay = old_player.transition_delay_end() - old_time;
    new_delay == old_delay || new_delay <= 0
}
