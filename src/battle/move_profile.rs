//! Move profiles: what terrain and turning cost a given kind of unit
//!
//! A profile is immutable policy. Units carry the profile of their
//! type/tier; the arbiter only ever reads it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::battle::terrain::{HexSideType, HexType};
use crate::core::config::ArbiterConfig;
use crate::core::error::{ArbiterError, Result};

/// Cost of one step or one rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostOutcome {
    /// Adds to the other component of the step
    Add(f32),
    /// Fixed cost, overriding any added cost
    Set(f32),
    /// Only possible as the very first action of an activation
    MinimalMove,
    Impassable,
}

impl CostOutcome {
    /// Combine the cost of entering a hex with the cost of the side crossed.
    ///
    /// IMPASSABLE dominates, then MINIMAL_MOVE. A SET side wins over anything,
    /// a SET hex wins over an ADD side, two ADDs are summed.
    pub fn combine(hex: CostOutcome, side: CostOutcome) -> CostOutcome {
        use CostOutcome::*;
        match (hex, side) {
            (Impassable, _) | (_, Impassable) => Impassable,
            (MinimalMove, _) | (_, MinimalMove) => MinimalMove,
            (_, Set(value)) => Set(value),
            (Set(value), Add(_)) => Set(value),
            (Add(h), Add(s)) => Add(h + s),
        }
    }

    /// The more demanding of two outcomes (used when both hexes of a
    /// formation move at once)
    pub fn worst(a: CostOutcome, b: CostOutcome) -> CostOutcome {
        use CostOutcome::*;
        match (a, b) {
            (Impassable, _) | (_, Impassable) => Impassable,
            (MinimalMove, _) | (_, MinimalMove) => MinimalMove,
            _ => {
                if b.value().unwrap_or(0.0) > a.value().unwrap_or(0.0) {
                    b
                } else {
                    a
                }
            }
        }
    }

    /// Numeric magnitude, only for ADD and SET
    pub fn value(&self) -> Option<f32> {
        match self {
            CostOutcome::Add(value) | CostOutcome::Set(value) => Some(*value),
            CostOutcome::MinimalMove | CostOutcome::Impassable => None,
        }
    }
}

/// Cost of entering each hex type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HexCosts {
    pub clear: CostOutcome,
    pub rough: CostOutcome,
    pub difficult: CostOutcome,
    pub impassable: CostOutcome,
}

impl Default for HexCosts {
    fn default() -> Self {
        Self {
            clear: CostOutcome::Add(1.0),
            rough: CostOutcome::Add(1.5),
            difficult: CostOutcome::Add(2.0),
            impassable: CostOutcome::Impassable,
        }
    }
}

impl HexCosts {
    pub fn get(&self, hex_type: HexType) -> CostOutcome {
        match hex_type {
            HexType::Clear => self.clear,
            HexType::Rough => self.rough,
            HexType::Difficult => self.difficult,
            HexType::Impassable => self.impassable,
        }
    }
}

/// Cost of crossing each hex side type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideCosts {
    pub normal: CostOutcome,
    pub easy: CostOutcome,
    pub difficult: CostOutcome,
    pub climb: CostOutcome,
    pub wall: CostOutcome,
}

impl Default for SideCosts {
    fn default() -> Self {
        Self {
            normal: CostOutcome::Add(0.0),
            easy: CostOutcome::Set(0.5),
            difficult: CostOutcome::Add(0.5),
            climb: CostOutcome::MinimalMove,
            wall: CostOutcome::Impassable,
        }
    }
}

impl SideCosts {
    pub fn get(&self, side_type: HexSideType) -> CostOutcome {
        match side_type {
            HexSideType::Normal => self.normal,
            HexSideType::Easy => self.easy,
            HexSideType::Difficult => self.difficult,
            HexSideType::Climb => self.climb,
            HexSideType::Wall => self.wall,
        }
    }
}

/// Terrain and rotation cost policy of a unit type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MoveProfile {
    pub hexes: HexCosts,
    pub sides: SideCosts,
    /// Cost of turning by 30, 60, ... 180 degrees (index 0 is 30 degrees)
    pub rotations: [CostOutcome; 6],
}

impl Default for MoveProfile {
    fn default() -> Self {
        Self {
            hexes: HexCosts::default(),
            sides: SideCosts::default(),
            rotations: [CostOutcome::Add(0.0); 6],
        }
    }
}

impl MoveProfile {
    /// The standard foot profile: free turns, default terrain costs
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn hex_cost(&self, hex_type: HexType) -> CostOutcome {
        self.hexes.get(hex_type)
    }

    pub fn side_cost(&self, side_type: HexSideType) -> CostOutcome {
        self.sides.get(side_type)
    }

    /// Combined cost of entering a hex of `hex_type` across a `side_type` side
    pub fn step_cost(&self, hex_type: HexType, side_type: HexSideType) -> CostOutcome {
        CostOutcome::combine(self.hex_cost(hex_type), self.side_cost(side_type))
    }

    /// Check that no cost is negative and that every passable step costs at
    /// least `cheapest_step_cost`.
    pub fn validate(&self, cheapest_step_cost: f32) -> Result<()> {
        let declared = [
            self.hexes.clear,
            self.hexes.rough,
            self.hexes.difficult,
            self.hexes.impassable,
            self.sides.normal,
            self.sides.easy,
            self.sides.difficult,
            self.sides.climb,
            self.sides.wall,
        ];
        for cost in declared.iter().chain(self.rotations.iter()) {
            if let Some(value) = cost.value() {
                if !(value >= 0.0) {
                    return Err(ArbiterError::InvalidConfig(format!(
                        "cost {:?} is negative",
                        cost
                    )));
                }
            }
        }

        for hex_type in HexType::all() {
            for side_type in HexSideType::all() {
                let Some(value) = self.step_cost(hex_type, side_type).value() else {
                    continue;
                };
                if value < cheapest_step_cost {
                    return Err(ArbiterError::InvalidConfig(format!(
                        "step into {:?} across {:?} costs {}, below cheapest_step_cost ({})",
                        hex_type, side_type, value, cheapest_step_cost
                    )));
                }
            }
        }

        Ok(())
    }

    /// Cost of a turn of `steps` 30 degree increments. A zero turn is free.
    pub fn rotation_cost(&self, steps: u8) -> CostOutcome {
        match steps {
            0 => CostOutcome::Add(0.0),
            1..=6 => self.rotations[steps as usize - 1],
            _ => panic!("a turn cannot exceed 6 increments, got {}", steps),
        }
    }
}

/// Named profiles, one per unit type and tier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, MoveProfile>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry from TOML, one table per profile name, and validate
    /// every profile against `config`
    pub fn from_toml_str(contents: &str, config: &ArbiterConfig) -> Result<Self> {
        let registry: ProfileRegistry = toml::from_str(contents)?;
        for (name, profile) in &registry.profiles {
            if let Err(ArbiterError::InvalidConfig(reason)) = profile.validate(config.cheapest_step_cost) {
                return Err(ArbiterError::InvalidConfig(format!("profile {}: {}", name, reason)));
            }
        }
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Result<&MoveProfile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ArbiterError::UnknownProfile(name.to_string()))
    }
}

/// Load a profile registry from a TOML file
pub fn load_profiles(path: &Path, config: &ArbiterConfig) -> Result<ProfileRegistry> {
    let contents = fs::read_to_string(path)?;
    ProfileRegistry::from_toml_str(&contents, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impassable_side_dominates() {
        for hex in [
            CostOutcome::Add(1.0),
            CostOutcome::Set(0.5),
            CostOutcome::MinimalMove,
        ] {
            assert_eq!(
                CostOutcome::combine(hex, CostOutcome::Impassable),
                CostOutcome::Impassable
            );
        }
    }

    #[test]
    fn test_set_side_overrides_add_hex() {
        assert_eq!(
            CostOutcome::combine(CostOutcome::Add(2.0), CostOutcome::Set(0.5)),
            CostOutcome::Set(0.5)
        );
    }

    #[test]
    fn test_set_hex_overrides_add_side() {
        assert_eq!(
            CostOutcome::combine(CostOutcome::Set(1.0), CostOutcome::Add(0.5)),
            CostOutcome::Set(1.0)
        );
    }

    #[test]
    fn test_side_set_wins_over_hex_set() {
        assert_eq!(
            CostOutcome::combine(CostOutcome::Set(3.0), CostOutcome::Set(0.5)),
            CostOutcome::Set(0.5)
        );
    }

    #[test]
    fn test_adds_accumulate() {
        assert_eq!(
            CostOutcome::combine(CostOutcome::Add(1.5), CostOutcome::Add(0.5)),
            CostOutcome::Add(2.0)
        );
    }

    #[test]
    fn test_minimal_move_propagates() {
        assert_eq!(
            CostOutcome::combine(CostOutcome::Add(1.0), CostOutcome::MinimalMove),
            CostOutcome::MinimalMove
        );
    }

    #[test]
    fn test_worst() {
        assert_eq!(
            CostOutcome::worst(CostOutcome::Add(1.0), CostOutcome::Set(2.0)),
            CostOutcome::Set(2.0)
        );
        assert_eq!(
            CostOutcome::worst(CostOutcome::MinimalMove, CostOutcome::Add(3.0)),
            CostOutcome::MinimalMove
        );
    }

    #[test]
    fn test_standard_profile() {
        let profile = MoveProfile::standard();
        assert_eq!(
            profile.step_cost(HexType::Clear, HexSideType::Normal),
            CostOutcome::Add(1.0)
        );
        assert_eq!(
            profile.step_cost(HexType::Clear, HexSideType::Wall),
            CostOutcome::Impassable
        );
        assert_eq!(profile.rotation_cost(6), CostOutcome::Add(0.0));
    }

    #[test]
    fn test_registry_from_toml() {
        let registry = ProfileRegistry::from_toml_str(
            r#"
            [cavalry]
            rotations = [
                { type = "ADD", value = 0.5 },
                { type = "ADD", value = 0.5 },
                { type = "MINIMAL_MOVE" },
                { type = "MINIMAL_MOVE" },
                { type = "IMPASSABLE" },
                { type = "IMPASSABLE" },
            ]

            [cavalry.hexes]
            clear = { type = "ADD", value = 1.0 }
            rough = { type = "ADD", value = 2.0 }
            difficult = { type = "IMPASSABLE" }
            impassable = { type = "IMPASSABLE" }
            "#,
            &ArbiterConfig::default(),
        )
        .unwrap();

        let cavalry = registry.get("cavalry").unwrap();
        assert_eq!(cavalry.hex_cost(HexType::Difficult), CostOutcome::Impassable);
        assert_eq!(cavalry.rotation_cost(1), CostOutcome::Add(0.5));
        assert_eq!(cavalry.rotation_cost(5), CostOutcome::Impassable);
        // Missing tables fall back to the standard costs
        assert_eq!(cavalry.side_cost(HexSideType::Wall), CostOutcome::Impassable);
    }

    #[test]
    fn test_registry_rejects_unknown_terrain() {
        let result = ProfileRegistry::from_toml_str(
            r#"
            [foot.hexes]
            clear = { type = "ADD", value = 1.0 }
            rough = { type = "ADD", value = 1.0 }
            difficult = { type = "ADD", value = 1.0 }
            impassable = { type = "IMPASSABLE" }
            swamp = { type = "ADD", value = 3.0 }
            "#,
            &ArbiterConfig::default(),
        );
        assert!(matches!(result, Err(ArbiterError::ConfigParse(_))));
    }

    #[test]
    fn test_standard_profile_is_valid() {
        assert!(MoveProfile::standard().validate(0.5).is_ok());
        // Road into clear ground costs 0.5
        assert!(MoveProfile::standard().validate(0.6).is_err());
    }

    #[test]
    fn test_registry_rejects_free_step() {
        let result = ProfileRegistry::from_toml_str(
            r#"
            [skirmisher.hexes]
            clear = { type = "ADD", value = 0.0 }
            rough = { type = "ADD", value = 1.0 }
            difficult = { type = "ADD", value = 1.0 }
            impassable = { type = "IMPASSABLE" }
            "#,
            &ArbiterConfig::default(),
        );
        assert!(matches!(result, Err(ArbiterError::InvalidConfig(_))));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let mut profile = MoveProfile::standard();
        // Masked by SET side costs, still invalid
        profile.hexes.rough = CostOutcome::Add(-1.0);
        profile.sides.normal = CostOutcome::Set(1.0);
        profile.sides.difficult = CostOutcome::Set(1.0);
        assert!(matches!(
            profile.validate(0.5),
            Err(ArbiterError::InvalidConfig(_))
        ));

        let mut profile = MoveProfile::standard();
        profile.rotations[0] = CostOutcome::Add(-0.5);
        assert!(profile.validate(0.5).is_err());
    }

    #[test]
    fn test_unknown_profile() {
        let registry = ProfileRegistry::new();
        assert!(matches!(
            registry.get("elephants"),
            Err(ArbiterError::UnknownProfile(_))
        ));
    }
}
