#![allow(dead_code)]

use galaxy_core::{GalaxyCatalog, GalaxyConfig, Position, Star, StellarClass};

/// Catalog over the default two-by-two cell region.
pub fn generated_catalog() -> GalaxyCatalog {
    let mut catalog = GalaxyCatalog::new(GalaxyConfig::builtin());
    catalog.build();
    catalog
}

/// Built catalog over hand-placed stars; coordinates are in light-years.
pub fn catalog_from(points: &[(StellarClass, [f32; 3])]) -> GalaxyCatalog {
    let stars = points
        .iter()
        .enumerate()
        .map(|(id, (class, [x, y, z]))| Star::at(id, *class, Position::new(*x, *y, *z)))
        .collect();
    let mut catalog = GalaxyCatalog::with_stars(GalaxyConfig::builtin(), stars);
    catalog.build();
    catalog
}
