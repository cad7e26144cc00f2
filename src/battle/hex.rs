//! Hex coordinate system for battle maps (offset coordinates)
//!
//! Hexes are flat-topped and stacked in columns; odd columns sit half a hex
//! lower than even ones. Angle 0 points up the column, angles grow clockwise.
//! Multiples of 60 cross a hex side, odd multiples of 30 point at a vertex.

use serde::{Deserialize, Serialize};

use crate::core::error::ArbiterError;

/// Offset hex coordinate for battle map
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct HexId {
    pub col: i32,
    pub row: i32,
}

impl HexId {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    fn is_odd_column(&self) -> bool {
        self.col.rem_euclid(2) == 1
    }

    /// Coordinate of the hex across the side at `angle`, ignoring map bounds.
    ///
    /// Panics if `angle` is a vertex angle.
    pub fn adjacent(&self, angle: Angle) -> HexId {
        assert!(angle.is_side(), "no hex lies across vertex angle {}", angle);
        let odd = self.is_odd_column();
        let (dc, dr) = match angle.degrees() {
            0 => (0, -1),
            60 => (1, if odd { 0 } else { -1 }),
            120 => (1, if odd { 1 } else { 0 }),
            180 => (0, 1),
            240 => (-1, if odd { 1 } else { 0 }),
            _ => (-1, if odd { 0 } else { -1 }),
        };
        HexId::new(self.col + dc, self.row + dr)
    }

    /// All 6 adjacent coordinates, indexed like [`Angle::sides`]
    pub fn neighbors(&self) -> [HexId; 6] {
        Angle::sides().map(|angle| self.adjacent(angle))
    }

    /// Side angle leading from `self` to `other`, if they are adjacent
    pub fn direction_to(&self, other: &HexId) -> Option<Angle> {
        Angle::sides()
            .into_iter()
            .find(|angle| self.adjacent(*angle) == *other)
    }

    pub fn is_adjacent(&self, other: &HexId) -> bool {
        self.direction_to(other).is_some()
    }

    /// The two hexes sharing the vertex at `angle` with `self`
    ///
    /// Panics if `angle` is a side angle.
    pub fn vertex_hexes(&self, angle: Angle) -> (HexId, HexId) {
        assert!(angle.is_vertex(), "angle {} is not a vertex angle", angle);
        (
            self.adjacent(angle.rotate(-30)),
            self.adjacent(angle.rotate(30)),
        )
    }

    fn to_cube(self) -> (i32, i32, i32) {
        let x = self.col;
        let z = self.row - (self.col - self.col.rem_euclid(2)) / 2;
        (x, -x - z, z)
    }

    fn from_cube(x: i32, z: i32) -> Self {
        Self::new(x, z + (x - x.rem_euclid(2)) / 2)
    }

    /// Number of steps between two hexes
    pub fn distance(&self, other: &Self) -> u32 {
        let (ax, ay, az) = self.to_cube();
        let (bx, by, bz) = other.to_cube();
        ((ax - bx).abs().max((ay - by).abs()).max((az - bz).abs())) as u32
    }

    /// Get all hexes within range (inclusive), ignoring map bounds
    pub fn hexes_in_range(&self, range: u32) -> Vec<HexId> {
        let range = range as i32;
        let (cx, _, cz) = self.to_cube();
        let mut results = Vec::new();
        for dx in -range..=range {
            for dz in (-range).max(-dx - range)..=range.min(-dx + range) {
                results.push(HexId::from_cube(cx + dx, cz + dz));
            }
        }
        results
    }
}

impl std::fmt::Display for HexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// One of the 12 facing angles, a multiple of 30 degrees in `0..360`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Angle(u16);

impl Angle {
    pub const NORTH: Angle = Angle(0);
    pub const EAST: Angle = Angle(90);
    pub const SOUTH: Angle = Angle(180);
    pub const WEST: Angle = Angle(270);

    /// Build an angle from degrees; any multiple of 30 is accepted and wrapped.
    pub fn new(degrees: i32) -> Result<Self, ArbiterError> {
        if degrees % 30 != 0 {
            return Err(ArbiterError::InvalidAngle(degrees));
        }
        Ok(Angle(degrees.rem_euclid(360) as u16))
    }

    pub fn degrees(self) -> u16 {
        self.0
    }

    /// Crosses a hex side (multiple of 60)
    pub fn is_side(self) -> bool {
        self.0 % 60 == 0
    }

    /// Points at a hex vertex (odd multiple of 30)
    pub fn is_vertex(self) -> bool {
        !self.is_side()
    }

    /// Rotate clockwise by `delta` degrees (negative turns counter-clockwise).
    ///
    /// Panics if `delta` is not a multiple of 30.
    pub fn rotate(self, delta: i32) -> Angle {
        assert!(delta % 30 == 0, "rotation {} is not a multiple of 30", delta);
        Angle((self.0 as i32 + delta).rem_euclid(360) as u16)
    }

    pub fn opposite(self) -> Angle {
        self.rotate(180)
    }

    /// Number of 30 degree increments separating two angles (0..=6)
    pub fn turn_steps(self, other: Angle) -> u8 {
        let diff = (self.0 as i32 - other.0 as i32).rem_euclid(360);
        (diff.min(360 - diff) / 30) as u8
    }

    /// All 12 angles in increasing order
    pub fn all() -> [Angle; 12] {
        std::array::from_fn(|i| Angle(i as u16 * 30))
    }

    /// The 6 side angles (0, 60, ..., 300)
    pub fn sides() -> [Angle; 6] {
        std::array::from_fn(|i| Angle(i as u16 * 60))
    }

    /// The 6 vertex angles (30, 90, ..., 330)
    pub fn vertices() -> [Angle; 6] {
        std::array::from_fn(|i| Angle(i as u16 * 60 + 30))
    }
}

impl Default for Angle {
    fn default() -> Self {
        Angle::NORTH
    }
}

impl TryFrom<i32> for Angle {
    type Error = ArbiterError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Angle::new(degrees)
    }
}

impl From<Angle> for i32 {
    fn from(angle: Angle) -> i32 {
        angle.0 as i32
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The edge shared by two adjacent hexes.
///
/// Stored normalised: `hex` is the end from which the other hex lies at
/// 0, 60 or 120 degrees, so both orderings of a pair compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexSideId {
    hex: HexId,
    angle: Angle,
}

impl HexSideId {
    /// Side between two hexes. Panics if they are not adjacent.
    pub fn new(a: HexId, b: HexId) -> Self {
        let angle = a
            .direction_to(&b)
            .unwrap_or_else(|| panic!("hexes {} and {} are not adjacent", a, b));
        Self::from_angle(a, angle)
    }

    /// Side of `hex` at side angle `angle`
    pub fn from_angle(hex: HexId, angle: Angle) -> Self {
        assert!(angle.is_side(), "angle {} does not cross a side", angle);
        if angle.degrees() >= 180 {
            Self {
                hex: hex.adjacent(angle),
                angle: angle.opposite(),
            }
        } else {
            Self { hex, angle }
        }
    }

    /// The two hexes bordering this side
    pub fn hexes(&self) -> (HexId, HexId) {
        (self.hex, self.hex.adjacent(self.angle))
    }

    /// Angle of the line joining the two hex centres, from the first hex
    pub fn axis(&self) -> Angle {
        self.angle
    }

    pub fn contains(&self, hex: &HexId) -> bool {
        let (a, b) = self.hexes();
        a == *hex || b == *hex
    }

    /// The hex across the side from `hex`. Panics if `hex` is not on it.
    pub fn other(&self, hex: &HexId) -> HexId {
        let (a, b) = self.hexes();
        if a == *hex {
            b
        } else {
            assert!(b == *hex, "hex {} does not border side {:?}", hex, self);
            a
        }
    }
}
