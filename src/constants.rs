//! Rule constants and game defaults.
//!
//! Board size is chosen at runtime through [`GameSettings`](crate::state::GameSettings);
//! the bounds below are what the engine and the coordinate notation accept.

// =============================================================================
// Board Geometry
// =============================================================================

/// Smallest playable board (NxN).
pub const MIN_BOARD_SIZE: usize = 2;

/// Largest playable board. Limited by the 25 column letters of the
/// coordinate notation (A-Z without I).
pub const MAX_BOARD_SIZE: usize = 25;

/// Board size used when the caller does not pick one.
pub const DEFAULT_BOARD_SIZE: usize = 19;

/// Column letters, skipping 'I' (Go convention to avoid confusion with 'J').
pub const COLUMN_LETTERS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

// =============================================================================
// Game Rules
// =============================================================================

/// Consecutive passes that end play and open the scoring phase.
pub const MAX_CONSECUTIVE_PASSES: u32 = 2;

/// Default komi (compensation points for White).
pub const DEFAULT_KOMI: f64 = 6.5;

// =============================================================================
// Demo Playout
// =============================================================================

/// Default cap on moves in a random demo playout, as a multiple of the
/// board area (room for captures and refills).
pub const PLAYOUT_LENGTH_FACTOR: usize = 3;
