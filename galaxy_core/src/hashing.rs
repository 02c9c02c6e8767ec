use std::hash::Hasher;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::space::{Position, SpatialCell};

/// Generator handed out for every cell and every world.
pub type GalaxyRng = ChaCha8Rng;

/// Salt that keeps world streams apart from cell streams.
const WORLD_SALT: u64 = 0x5752_4c44_0000_0001;

/// Scale applied to light-year coordinates before hashing a world.
const WORLD_FIXED_POINT: f32 = 65535.0;

/// FNV-1a 64 used to turn a galaxy seed plus cell or position into an RNG seed.
///
/// The galaxy seed is folded into the offset basis rather than hashed as data,
/// so every galaxy hashes the same three coordinates and only the starting state
/// differs. Coordinates are fed as little-endian `u32` bytes so the result is
/// the same on every platform.
#[derive(Debug, Clone)]
pub struct FnvHasher {
    state: u64,
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl FnvHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }

    /// Seed 0 leaves the standard offset basis, so it hashes like plain FNV-1a.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: Self::OFFSET_BASIS ^ seed,
        }
    }

    pub fn write_u32_le(&mut self, value: u32) {
        self.write(&value.to_le_bytes());
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Order-sensitive hash of three coordinates: x, then y, then z.
pub fn hash_coordinates(seed: u64, x: u32, y: u32, z: u32) -> u64 {
    let mut hasher = FnvHasher::with_seed(seed);
    hasher.write_u32_le(x);
    hasher.write_u32_le(y);
    hasher.write_u32_le(z);
    hasher.finish()
}

pub fn seed_for_cell(seed: u64, cell: SpatialCell) -> u64 {
    hash_coordinates(seed, cell.x, cell.y, cell.z)
}

pub fn rng_for_cell(seed: u64, cell: SpatialCell) -> GalaxyRng {
    GalaxyRng::seed_from_u64(seed_for_cell(seed, cell))
}

/// Seed for a star's world, keyed by its fixed-point position.
pub fn seed_for_position(seed: u64, position: Position) -> u64 {
    hash_coordinates(
        seed ^ WORLD_SALT,
        fixed_point(position.x),
        fixed_point(position.y),
        fixed_point(position.z),
    )
}

pub fn rng_for_position(seed: u64, position: Position) -> GalaxyRng {
    GalaxyRng::seed_from_u64(seed_for_position(seed, position))
}

// Negative coordinates only appear in hand-built catalogs. Going through i64 wraps
// them instead of clamping every one of them to zero.
fn fixed_point(component: f32) -> u32 {
    let scaled = (component * WORLD_FIXED_POINT) as i64;
    scaled as u32
}
