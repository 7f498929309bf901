//! Shared primitive types used across the entire simulation.

/// Virtual time. Advanced only by scheduled actor delays.
pub type Tick = u64;

/// A session-scoped actor identifier, assigned monotonically from 1.
pub type ActorId = u64;

/// A process-wide session identifier, assigned monotonically from 1.
pub type SessionId = u64;

/// Default number of ticks an actor's turn costs.
pub const TURN: Tick = 12;
