use serde::{Deserialize, Serialize};

/// Integer bucket of 3-D space. Only ever used as a seeding key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct SpatialCell {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl SpatialCell {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// World-space corner of the cell for a given cell span.
    pub fn origin(self, span: f32) -> Position {
        Position::new(
            self.x as f32 * span,
            self.y as f32 * span,
            self.z as f32 * span,
        )
    }
}

/// Continuous star coordinates, in light-years.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Inclusive box of cells to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellRegion {
    pub min: [u32; 3],
    pub max: [u32; 3],
}

impl Default for CellRegion {
    fn default() -> Self {
        Self {
            min: [0, 0, 0],
            max: [1, 1, 0],
        }
    }
}

impl CellRegion {
    pub fn single(cell: SpatialCell) -> Self {
        Self {
            min: [cell.x, cell.y, cell.z],
            max: [cell.x, cell.y, cell.z],
        }
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min[axis] > self.max[axis])
    }

    pub fn cell_count(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        (0..3)
            .map(|axis| u64::from(self.max[axis] - self.min[axis]) + 1)
            .product()
    }

    /// Cells in generation order: x outermost, z innermost.
    pub fn cells(&self) -> impl Iterator<Item = SpatialCell> + '_ {
        let [x0, y0, z0] = self.min;
        let [x1, y1, z1] = self.max;
        (x0..=x1).flat_map(move |x| {
            (y0..=y1).flat_map(move |y| (z0..=z1).map(move |z| SpatialCell::new(x, y, z)))
        })
    }
}
