//! Time utilities for the fixed-tick simulation

/// Default simulation tick rate
pub const DEFAULT_TICK_RATE: u32 = 60; // 60 ticks per second

/// The physics constants in this engine are tuned against a 60 Hz baseline.
/// Integration multiplies velocities by `dt * TIME_SCALE`, so a velocity of
/// 1.0 moves one unit per tick at the default rate regardless of the actual
/// configured tick rate.
pub const TIME_SCALE: f32 = 60.0;

/// Calculate delta time for one simulation tick (in seconds)
pub fn tick_delta(tick_rate: u32) -> f32 {
    1.0 / tick_rate.max(1) as f32
}
