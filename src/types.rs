//! Type-safe wrappers for decision-diagram variables and levels.
//!
//! This module provides newtype wrappers that enforce compile-time distinction
//! between variable IDs and level indices, preventing common mistakes in
//! manager code that must consult the variable ordering.

use std::fmt;

/// A variable identifier (1-indexed).
///
/// Variables represent decision points in a diagram. Unlike levels, variable
/// IDs are names: they do not change when the ordering changes.
///
/// # Invariants
///
/// - Variable IDs must be >= 1 (0 is reserved)
/// - [`Var::TERMINAL`] marks terminal nodes and is never a real variable
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Sentinel variable carried by terminal nodes.
    pub const TERMINAL: Self = Var(u32::MAX);

    /// Creates a new variable with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Variables must be 1-indexed.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Variable IDs must be >= 1");
        Var(id)
    }

    /// Returns the raw variable ID as a `u32`.
    pub fn id(self) -> u32 {
        self.0
    }

    /// Returns true for the terminal sentinel.
    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_terminal() {
            write!(f, "<terminal>")
        } else {
            write!(f, "x{}", self.0)
        }
    }
}

impl From<Var> for u32 {
    fn from(var: Var) -> Self {
        var.0
    }
}

impl From<u32> for Var {
    fn from(id: u32) -> Self {
        Var::new(id)
    }
}

/// A level in the variable ordering (0-indexed).
///
/// Levels are positions: level 0 is the topmost (closest to the roots), and
/// levels increase downward toward the terminals. Terminal nodes sit below
/// every level, at [`Level::TERMINAL`].
///
/// # Invariants
///
/// - Every internal node's children have strictly greater levels
/// - The level of a variable is found through the manager's ordering arrays,
///   never assumed equal to `var.id() - 1`
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Level(u32);

impl Level {
    /// The level of terminal nodes: below every variable level.
    pub const TERMINAL: Self = Level(u32::MAX);

    /// Creates a new level with the given index.
    pub fn new(index: u32) -> Self {
        Level(index)
    }

    /// Returns the raw level index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns true for the terminal pseudo-level.
    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_terminal() {
            write!(f, "L<terminal>")
        } else {
            write!(f, "L{}", self.0)
        }
    }
}

impl From<Level> for usize {
    fn from(level: Level) -> Self {
        level.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_creation() {
        let v1 = Var::new(1);
        let v2 = Var::new(2);
        assert_eq!(v1.id(), 1);
        assert_eq!(v2.id(), 2);
        assert!(v1 < v2);
        assert!(!v1.is_terminal());
    }

    #[test]
    #[should_panic(expected = "Variable IDs must be >= 1")]
    fn test_var_zero_panics() {
        Var::new(0);
    }

    #[test]
    fn test_terminal_sentinels() {
        assert!(Var::TERMINAL.is_terminal());
        assert!(Level::TERMINAL.is_terminal());
        // Terminals order below every real level.
        assert!(Level::new(0) < Level::TERMINAL);
        assert!(Level::new(1_000_000) < Level::TERMINAL);
    }

    #[test]
    fn test_level_ordering() {
        let l0 = Level::new(0);
        let l1 = Level::new(1);
        assert_eq!(l0.index(), 0);
        assert!(l0 < l1);
    }
}
