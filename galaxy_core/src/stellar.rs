//! Hash-seeded star-field generation.
//!
//! Each cell gets one generator from [`crate::hashing::rng_for_cell`]. Classes are
//! visited in the fixed order O, B, A, F, G, K, M; each draws a count once and then
//! one attribute factor plus three offsets per star.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    color::Rgba,
    config::GalaxyConfig,
    hashing::{rng_for_cell, GalaxyRng},
    space::{CellRegion, Position, SpatialCell},
};

/// Dense index into the star catalog.
pub type StarId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StellarClass {
    O,
    B,
    A,
    F,
    G,
    K,
    M,
}

impl StellarClass {
    pub const ALL: [StellarClass; 7] = [
        StellarClass::O,
        StellarClass::B,
        StellarClass::A,
        StellarClass::F,
        StellarClass::G,
        StellarClass::K,
        StellarClass::M,
    ];

    pub fn letter(self) -> char {
        match self {
            StellarClass::O => 'O',
            StellarClass::B => 'B',
            StellarClass::A => 'A',
            StellarClass::F => 'F',
            StellarClass::G => 'G',
            StellarClass::K => 'K',
            StellarClass::M => 'M',
        }
    }

    pub fn details(self) -> &'static ClassDetails {
        &CLASS_TABLE[self as usize]
    }
}

/// Rarity, appearance and physical ranges for one stellar class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDetails {
    pub class: StellarClass,
    pub bright_color: Rgba,
    pub dim_color: Rgba,
    pub odds: f32,
    pub fudge: f32,
    pub min_mass: f32,
    pub delta_mass: f32,
    pub min_radius: f32,
    pub delta_radius: f32,
    pub min_luminance: f32,
    pub delta_luminance: f32,
    /// Point size when rendered.
    pub pixels: u8,
}

impl ClassDetails {
    /// Randomised linear count: `scale * (odds - fudge + 2 * fudge * draw)`.
    ///
    /// An approximation of a Poisson draw, not a statistical one.
    pub fn count_for(&self, density_scale: f32, draw: f32) -> usize {
        let expected = density_scale * (self.odds - self.fudge + 2.0 * self.fudge * draw);
        expected.max(0.0) as usize
    }
}

const BRIGHT: u8 = 255;
const TWEEN: u8 = 223;
const MED: u8 = 192;
const DIM: u8 = 128;
const THIRD_DIM: u8 = DIM / 3;

static CLASS_TABLE: [ClassDetails; 7] = [
    ClassDetails {
        class: StellarClass::O,
        bright_color: Rgba::opaque(0, 0, BRIGHT),
        dim_color: Rgba::opaque(0, 0, MED),
        odds: 0.000_000_3,
        fudge: 0.000_000_040_2,
        min_mass: 16.000_01,
        delta_mass: 243.2,
        min_radius: 6.0,
        delta_radius: 17.3,
        min_luminance: 30_000.0,
        delta_luminance: 147_000.2,
        pixels: 11,
    },
    ClassDetails {
        class: StellarClass::B,
        bright_color: Rgba::opaque(DIM, DIM, BRIGHT),
        dim_color: Rgba::opaque(DIM / 9, DIM / 9, DIM),
        odds: 0.0013,
        fudge: 0.0003,
        min_mass: 2.1,
        delta_mass: 13.9,
        min_radius: 1.8,
        delta_radius: 4.8,
        min_luminance: 25.0,
        delta_luminance: 29_975.0,
        pixels: 8,
    },
    ClassDetails {
        class: StellarClass::A,
        bright_color: Rgba::opaque(BRIGHT, BRIGHT, BRIGHT),
        dim_color: Rgba::opaque(DIM, DIM, DIM),
        odds: 0.006,
        fudge: 0.0018,
        min_mass: 1.4,
        delta_mass: 0.7,
        min_radius: 1.4,
        delta_radius: 0.4,
        min_luminance: 5.0,
        delta_luminance: 20.0,
        pixels: 6,
    },
    ClassDetails {
        class: StellarClass::F,
        bright_color: Rgba::opaque(BRIGHT, BRIGHT, TWEEN),
        dim_color: Rgba::opaque(MED, MED, THIRD_DIM),
        odds: 0.03,
        fudge: 0.012,
        min_mass: 1.04,
        delta_mass: 0.36,
        min_radius: 1.15,
        delta_radius: 0.25,
        min_luminance: 1.5,
        delta_luminance: 3.5,
        pixels: 5,
    },
    ClassDetails {
        class: StellarClass::G,
        bright_color: Rgba::opaque(TWEEN, TWEEN, 0),
        dim_color: Rgba::opaque(DIM, DIM, 0),
        odds: 0.076,
        fudge: 0.011_02,
        min_mass: 0.8,
        delta_mass: 0.24,
        min_radius: 0.96,
        delta_radius: 0.19,
        min_luminance: 0.6,
        delta_luminance: 0.9,
        pixels: 4,
    },
    ClassDetails {
        class: StellarClass::K,
        bright_color: Rgba::opaque(0xFE, 0xD8, 0xB1),
        dim_color: Rgba::opaque(0xFE / 3, 0xD8 / 3, 0xB1 / 3),
        odds: 0.121,
        fudge: 0.042,
        min_mass: 0.45,
        delta_mass: 0.35,
        min_radius: 0.7,
        delta_radius: 0.26,
        min_luminance: 0.08,
        delta_luminance: 0.52,
        pixels: 3,
    },
    ClassDetails {
        class: StellarClass::M,
        bright_color: Rgba::opaque(BRIGHT, 0, 0),
        dim_color: Rgba::opaque(DIM, 0, 0),
        odds: 0.7645,
        fudge: 0.04,
        min_mass: 0.08,
        delta_mass: 0.37,
        min_radius: 0.1,
        delta_radius: 0.6,
        min_luminance: 0.0001,
        delta_luminance: 0.0799,
        pixels: 2,
    },
];

/// A generated star. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub id: StarId,
    pub class: StellarClass,
    pub cell: SpatialCell,
    pub position: Position,
    pub mass: f32,
    pub radius: f32,
    pub luminance: f32,
    pub bright_color: Rgba,
    pub dim_color: Rgba,
    pub pixels: u8,
}

impl Star {
    /// Star at an explicit position, with physical attributes interpolated by `factor`.
    pub fn new(
        id: StarId,
        class: StellarClass,
        cell: SpatialCell,
        position: Position,
        factor: f32,
    ) -> Self {
        let details = class.details();
        Self {
            id,
            class,
            cell,
            position,
            mass: details.min_mass + details.delta_mass * factor,
            radius: details.min_radius + details.delta_radius * factor,
            luminance: details.min_luminance + details.delta_luminance * factor,
            bright_color: details.bright_color,
            dim_color: details.dim_color,
            pixels: details.pixels,
        }
    }

    /// Mid-range star of `class` at `position`; handy for hand-built catalogs.
    pub fn at(id: StarId, class: StellarClass, position: Position) -> Self {
        Self::new(id, class, SpatialCell::default(), position, 0.5)
    }
}

/// Emits stars in deterministic order, handing out dense ids.
#[derive(Debug, Clone)]
pub struct StarFieldGenerator {
    seed: u64,
    density_scale: f32,
    cell_span: f32,
    next_id: StarId,
}

impl StarFieldGenerator {
    pub fn new(config: &GalaxyConfig) -> Self {
        Self {
            seed: config.seed,
            density_scale: config.generation.density_scale,
            cell_span: config.generation.cell_span_light_years,
            next_id: 0,
        }
    }

    pub fn generate_region(&mut self, region: &CellRegion) -> Vec<Star> {
        self.generate(region.cells())
    }

    pub fn generate<I>(&mut self, cells: I) -> Vec<Star>
    where
        I: IntoIterator<Item = SpatialCell>,
    {
        let mut stars = Vec::new();
        for cell in cells {
            self.generate_cell_into(cell, &mut stars);
        }
        stars
    }

    pub fn generate_cell(&mut self, cell: SpatialCell) -> Vec<Star> {
        let mut stars = Vec::new();
        self.generate_cell_into(cell, &mut stars);
        stars
    }

    fn generate_cell_into(&mut self, cell: SpatialCell, out: &mut Vec<Star>) {
        let mut rng = rng_for_cell(self.seed, cell);
        let before = out.len();
        for class in StellarClass::ALL {
            self.emit_class(class, cell, &mut rng, out);
        }
        tracing::trace!(
            target: "galaxy3d::stellar",
            x = cell.x,
            y = cell.y,
            z = cell.z,
            stars = out.len() - before,
            "stellar.cell.generated"
        );
    }

    fn emit_class(
        &mut self,
        class: StellarClass,
        cell: SpatialCell,
        rng: &mut GalaxyRng,
        out: &mut Vec<Star>,
    ) {
        let details = class.details();
        let count = details.count_for(self.density_scale, rng.gen::<f32>());
        let origin = cell.origin(self.cell_span);
        out.reserve(count);
        for _ in 0..count {
            let factor: f32 = rng.gen();
            let sx: f32 = rng.gen();
            let sy: f32 = rng.gen();
            let sz: f32 = rng.gen();
            let position = Position::new(
                origin.x + sx * self.cell_span,
                origin.y + sy * self.cell_span,
                origin.z + sz * self.cell_span,
            );
            out.push(Star::new(self.next_id, class, cell, position, factor));
            self.next_id += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(cell: SpatialCell) -> Vec<Star> {
        StarFieldGenerator::new(&GalaxyConfig::default()).generate_cell(cell)
    }

    #[test]
    fn same_cell_same_stars() {
        let a = generate(SpatialCell::new(3, 1, 4));
        let b = generate(SpatialCell::new(3, 1, 4));
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn neighbouring_cells_differ() {
        let a = generate(SpatialCell::new(0, 0, 0));
        let b = generate(SpatialCell::new(0, 0, 1));
        assert_ne!(a, b);
    }

    #[test]
    fn red_dwarfs_dominate() {
        let stars = generate(SpatialCell::new(0, 0, 0));
        let count = |class: StellarClass| stars.iter().filter(|star| star.class == class).count();
        let m = count(StellarClass::M);
        let o = count(StellarClass::O);
        assert!(m > 100, "expected hundreds of M stars, got {m}");
        assert!(m > o * 100);
    }

    #[test]
    fn ids_are_dense_across_cells() {
        let config = GalaxyConfig::default();
        let mut generator = StarFieldGenerator::new(&config);
        let stars = generator.generate_region(&CellRegion {
            min: [0, 0, 0],
            max: [1, 0, 0],
        });
        for (index, star) in stars.iter().enumerate() {
            assert_eq!(star.id, index);
        }
    }

    #[test]
    fn stars_stay_inside_their_cell() {
        let config = GalaxyConfig::default();
        let span = config.generation.cell_span_light_years;
        let cell = SpatialCell::new(2, 0, 1);
        for star in generate(cell) {
            let origin = cell.origin(span);
            assert_eq!(star.cell, cell);
            for (value, low) in [
                (star.position.x, origin.x),
                (star.position.y, origin.y),
                (star.position.z, origin.z),
            ] {
                assert!(value >= low && value <= low + span);
            }
        }
    }

    #[test]
    fn attributes_within_class_ranges() {
        for star in generate(SpatialCell::new(0, 0, 0)) {
            let details = star.class.details();
            assert!(star.mass >= details.min_mass);
            assert!(star.mass <= details.min_mass + details.delta_mass);
            assert!(star.radius >= details.min_radius);
            assert!(star.luminance <= details.min_luminance + details.delta_luminance);
            assert_eq!(star.bright_color, details.bright_color);
            assert_eq!(star.pixels, details.pixels);
        }
    }

    #[test]
    fn rare_class_may_yield_zero() {
        let details = StellarClass::O.details();
        assert_eq!(details.count_for(423.728_813_559, 0.5), 0);
    }

    #[test]
    fn table_order_matches_enum() {
        for class in StellarClass::ALL {
            assert_eq!(class.details().class, class);
        }
    }
}
