use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Integer cell address in the voxel grid.
///
/// Ordering is lexicographic on (x, y, z) so maps keyed by coordinate iterate
/// the same way on every platform.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Cell containing the given float position.
    ///
    /// Each axis rounds to the nearest integer with halves going up, so
    /// `-0.5` lands on `0` and `2.5` lands on `3`.
    pub fn from_world(pos: Vec3) -> Self {
        Self::from_xyz(pos.x, pos.y, pos.z)
    }

    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: round_half_up(x),
            y: round_half_up(y),
            z: round_half_up(z),
        }
    }

    /// Center of the cell in world space.
    pub fn center(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    pub fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    /// Manhattan distance between two cells.
    pub fn manhattan(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }
}

impl Add<IVec3> for GridCoord {
    type Output = GridCoord;

    fn add(self, rhs: IVec3) -> GridCoord {
        GridCoord::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl From<IVec3> for GridCoord {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// `(v + 0.5).floor()` rounds the sum first, which pushes values just below
// a half and large odd integers into the next cell.
fn round_half_up(v: f32) -> i32 {
    let f = v.floor();
    (if v - f >= 0.5 { f + 1.0 } else { f }) as i32
}
