//! Integer geometry for one-dimensional roads.
//!
//! Every quantity is measured in whole frame-units, and every conversion from
//! a distance to a duration rounds up via [`ceil_div`] so that motion stays
//! quantized to whole ticks.

mod interval;
mod position;

pub use interval::{GeometryError, Interval};
pub use position::Position;

/// Game time in ticks (roughly one emulated frame).
///
/// Signed because intermediate quantities such as "remaining lockout" may go
/// negative before being clamped.
pub type Ticks = i64;

/// Sentinel for "never happens".
pub const NEVER: Ticks = Ticks::MAX;

/// Exact signed ceiling division.
///
/// Returns `None` when `divisor` is zero.
pub const fn ceil_div(dividend: i64, divisor: i64) -> Option<i64> {
    if divisor == 0 {
        return None;
    }
    let quotient = dividend / divisor;
    let remainder = dividend % divisor;
    if remainder != 0 && ((remainder < 0) == (divisor < 0)) {
        Some(quotient + 1)
    } else {
        Some(quotient)
    }
}

/// Ticks needed to cover `distance` at `speed` units per tick, rounded up.
pub const fn ticks_to_cover(distance: i64, speed: i64) -> Ticks {
    match ceil_div(distance, speed) {
        Some(ticks) => ticks,
        None => NEVER,
    }
}
