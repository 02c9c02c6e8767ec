//! Star filters and the next/previous cursor driven by the viewer.

use std::{fmt, str::FromStr};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::GalaxyCatalog,
    space::Position,
    stellar::StarId,
    world::World,
};

/// Named predicates offered in the filter picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StarFilter {
    #[default]
    All,
    HighTech,
    DryWorlds,
    WaterWorlds,
    LargestWorlds,
    NoWorlds,
    PopulousWorlds,
    EmptyWorlds,
}

impl StarFilter {
    pub const ALL: [StarFilter; 8] = [
        StarFilter::All,
        StarFilter::HighTech,
        StarFilter::DryWorlds,
        StarFilter::WaterWorlds,
        StarFilter::LargestWorlds,
        StarFilter::NoWorlds,
        StarFilter::PopulousWorlds,
        StarFilter::EmptyWorlds,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StarFilter::All => "All",
            StarFilter::HighTech => "High Tech",
            StarFilter::DryWorlds => "Dry Worlds",
            StarFilter::WaterWorlds => "Water Worlds",
            StarFilter::LargestWorlds => "Largest Worlds",
            StarFilter::NoWorlds => "No Worlds",
            StarFilter::PopulousWorlds => "Populous Worlds",
            StarFilter::EmptyWorlds => "Empty Worlds",
        }
    }

    /// Matching star ids in catalog order.
    pub fn apply(self, catalog: &GalaxyCatalog) -> Vec<StarId> {
        match self {
            StarFilter::All => catalog.stars().iter().map(|star| star.id).collect(),
            StarFilter::HighTech => extremal(catalog, Extreme::Max, |w| w.tech_level.value()),
            StarFilter::DryWorlds => extremal(catalog, Extreme::Min, |w| w.hydro_base),
            StarFilter::WaterWorlds => extremal(catalog, Extreme::Max, |w| w.hydro_base),
            StarFilter::LargestWorlds => extremal(catalog, Extreme::Max, |w| w.size_base),
            StarFilter::NoWorlds => extremal(catalog, Extreme::Min, |w| w.size_base),
            StarFilter::PopulousWorlds => {
                extremal(catalog, Extreme::Max, |w| w.population_base)
            }
            StarFilter::EmptyWorlds => extremal(catalog, Extreme::Min, |w| w.population_base),
        }
    }
}

impl fmt::Display for StarFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilter(pub String);

impl fmt::Display for UnknownFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown star filter '{}'", self.0)
    }
}

impl std::error::Error for UnknownFilter {}

impl FromStr for StarFilter {
    type Err = UnknownFilter;

    /// Accepts display names case-insensitively, with spaces, dashes or underscores.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = normalise(value);
        StarFilter::ALL
            .into_iter()
            .find(|filter| normalise(filter.name()) == wanted)
            .ok_or_else(|| UnknownFilter(value.to_string()))
    }
}

fn normalise(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extreme {
    Min,
    Max,
}

/// Every star at the extreme value of `key`, not just the first one found.
fn extremal<F>(catalog: &GalaxyCatalog, extreme: Extreme, key: F) -> Vec<StarId>
where
    F: Fn(&World) -> u8 + Sync,
{
    let keyed = keyed_worlds(catalog, key);
    let target = match extreme {
        Extreme::Min => keyed.iter().map(|(_, value)| *value).min(),
        Extreme::Max => keyed.iter().map(|(_, value)| *value).max(),
    };
    let Some(target) = target else {
        return Vec::new();
    };
    keyed
        .into_iter()
        .filter(|(_, value)| *value == target)
        .map(|(id, _)| id)
        .collect()
}

fn keyed_worlds<F>(catalog: &GalaxyCatalog, key: F) -> Vec<(StarId, u8)>
where
    F: Fn(&World) -> u8 + Sync,
{
    let generator = catalog.world_generator();
    catalog
        .stars()
        .par_iter()
        .map(|star| (star.id, key(&generator.world_for(star))))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorldAttribute {
    Tech,
    Population,
    Size,
    Hydro,
}

impl WorldAttribute {
    pub fn base(self, world: &World) -> u8 {
        match self {
            WorldAttribute::Tech => world.tech_level.value(),
            WorldAttribute::Population => world.population_base,
            WorldAttribute::Size => world.size_base,
            WorldAttribute::Hydro => world.hydro_base,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Exactly,
    AtLeast,
    AtMost,
}

/// Threshold query such as "tech at least 12" or "population exactly 0".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeQuery {
    pub attribute: WorldAttribute,
    pub comparison: Comparison,
    pub value: u8,
}

impl AttributeQuery {
    pub fn new(attribute: WorldAttribute, comparison: Comparison, value: u8) -> Self {
        Self {
            attribute,
            comparison,
            value,
        }
    }

    pub fn matches(&self, world: &World) -> bool {
        let base = self.attribute.base(world);
        match self.comparison {
            Comparison::Exactly => base == self.value,
            Comparison::AtLeast => base >= self.value,
            Comparison::AtMost => base <= self.value,
        }
    }

    pub fn apply(&self, catalog: &GalaxyCatalog) -> Vec<StarId> {
        let generator = catalog.world_generator();
        catalog
            .stars()
            .par_iter()
            .filter(|star| self.matches(&generator.world_for(star)))
            .map(|star| star.id)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// What the viewer needs after the selection moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub star: StarId,
    pub header: String,
    pub camera_target: Position,
    pub world: World,
    /// Neighbour ids with jump length in parsecs, in adjacency order.
    pub jump_targets: Vec<(StarId, f32)>,
}

impl Selection {
    pub fn jump_labels(&self) -> Vec<String> {
        self.jump_targets
            .iter()
            .enumerate()
            .map(|(index, (star, parsecs))| {
                format!("Jump #{} to star {} ({:.2} parsecs)", index + 1, star, parsecs)
            })
            .collect()
    }
}

/// Cursor over the stars matched by the active filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    filter: StarFilter,
    active: Vec<StarId>,
    current: Option<StarId>,
}

impl Selector {
    pub fn new(catalog: &GalaxyCatalog) -> Self {
        let active = StarFilter::All.apply(catalog);
        let current = active.first().copied();
        Self {
            filter: StarFilter::All,
            active,
            current,
        }
    }

    pub fn filter(&self) -> StarFilter {
        self.filter
    }

    pub fn active(&self) -> &[StarId] {
        &self.active
    }

    pub fn current(&self) -> Option<StarId> {
        self.current
    }

    pub fn next(&mut self) -> Option<StarId> {
        self.step(Direction::Next)
    }

    pub fn previous(&mut self) -> Option<StarId> {
        self.step(Direction::Previous)
    }

    /// Moves through the active list, wrapping at both ends. No-op when empty.
    pub fn step(&mut self, direction: Direction) -> Option<StarId> {
        let len = self.active.len();
        if len == 0 {
            return self.current;
        }
        let position = self
            .current
            .and_then(|current| self.active.iter().position(|id| *id == current));
        let index = match (position, direction) {
            (None, Direction::Next) => 0,
            (None, Direction::Previous) => len - 1,
            (Some(index), Direction::Next) => (index + 1) % len,
            (Some(index), Direction::Previous) => (index + len - 1) % len,
        };
        self.current = Some(self.active[index]);
        self.current
    }

    /// Switches the predicate and jumps to its first match. An empty match keeps
    /// the current star and the previous list.
    pub fn select_filter(
        &mut self,
        catalog: &GalaxyCatalog,
        filter: StarFilter,
    ) -> Option<StarId> {
        let matches = filter.apply(catalog);
        tracing::debug!(
            target: "galaxy3d::selection",
            filter = %filter,
            matches = matches.len(),
            "selection.filter"
        );
        if let Some(first) = matches.first().copied() {
            self.filter = filter;
            self.active = matches;
            self.current = Some(first);
        }
        self.current
    }

    /// Follows the `index`-th jump out of the current star.
    pub fn select_jump_target(
        &mut self,
        catalog: &GalaxyCatalog,
        index: usize,
    ) -> Option<StarId> {
        let current = self.current?;
        if let Some((target, _)) = catalog.graph().jump_targets(current).get(index) {
            self.current = Some(*target);
        }
        self.current
    }

    pub fn selection(&self, catalog: &GalaxyCatalog) -> Option<Selection> {
        let star = catalog.star(self.current?)?;
        let world = catalog.world_generator().world_for(star);
        Some(Selection {
            star: star.id,
            header: world.header(),
            camera_target: star.position,
            jump_targets: catalog.graph().jump_targets(star.id),
            world,
        })
    }
}
