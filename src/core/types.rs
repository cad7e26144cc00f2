//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for units on the battlefield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a wing (a group of units sharing a retreat zone)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WingId(pub u32);

/// Identifier of a player. Wings of different players are foes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_ids_are_unique() {
        assert_ne!(UnitId::new(), UnitId::new());
    }

    #[test]
    fn test_wing_id_ordering() {
        assert!(WingId(1) < WingId(2));
        assert_eq!(PlayerId(3), PlayerId(3));
    }
}
