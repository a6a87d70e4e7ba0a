//! Sequential upload loop and its progress events.

/// Progress event types emitted by the loop.
pub mod events;
/// Upload loop and summary accumulator.
pub mod runner;
